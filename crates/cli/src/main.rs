//! `lazyns` binary.
//!
//! Loads a namespace manifest and lists or resolves its names.

mod cli;
mod commands;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use lazyns_registry::Manifest;

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	setup_tracing(cli.verbose);

	let registry = Manifest::from_path(&cli.manifest)
		.and_then(Manifest::into_registry)
		.with_context(|| format!("loading manifest {}", cli.manifest.display()))?;
	tracing::debug!(namespace = registry.namespace(), names = registry.len(), "registry ready");

	let stdout = std::io::stdout();
	let mut out = stdout.lock();
	commands::run(&registry, &cli.command, &mut out)
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("lazyns=debug,lazyns_registry=debug,warn")
		} else {
			EnvFilter::new("lazyns=info,lazyns_registry=info,warn")
		}
	});

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(true).init();
}
