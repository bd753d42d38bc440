//! Subcommand implementations.
//!
//! Output goes to any [`Write`] so the commands can be exercised in tests.

use std::io::Write;

use anyhow::Context;
use lazyns_registry::Registry;

use crate::cli::Command;

/// Runs `command` against `registry`.
pub fn run(registry: &Registry<toml::Value>, command: &Command, out: &mut impl Write) -> anyhow::Result<()> {
	match command {
		Command::List => list(registry, out),
		Command::Resolve { names } => resolve(registry, names, out),
		Command::Resources => resources(registry, out),
	}
}

fn list(registry: &Registry<toml::Value>, out: &mut impl Write) -> anyhow::Result<()> {
	let status = registry.status();
	let width = status.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

	writeln!(out, "namespace {}:", registry.namespace())?;
	for (name, state) in status {
		writeln!(out, "  {name:<width$}  {state}")?;
	}
	Ok(())
}

fn resolve(registry: &Registry<toml::Value>, names: &[String], out: &mut impl Write) -> anyhow::Result<()> {
	for name in names {
		let value = registry.resolve(name).with_context(|| format!("could not resolve '{name}'"))?;
		writeln!(out, "{name} = {value}")?;
	}
	writeln!(out)?;
	list(registry, out)
}

fn resources(registry: &Registry<toml::Value>, out: &mut impl Write) -> anyhow::Result<()> {
	for name in registry.discover_resources() {
		writeln!(out, "{name}")?;
	}
	Ok(())
}
