use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "lazyns")]
#[command(about = "Inspect and resolve lazy namespaces")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Namespace manifest to load
	#[arg(long, short = 'm', env = "LAZYNS_MANIFEST", value_name = "PATH")]
	pub manifest: PathBuf,

	/// Verbose logging
	#[arg(short, long)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
	/// List declared names and their load state without loading anything
	List,
	/// Resolve names in order and print their values
	Resolve {
		/// Names to resolve
		#[arg(required = true)]
		names: Vec<String>,
	},
	/// List names reachable only through the resource directory
	Resources,
}

#[cfg(test)]
mod tests {
	use clap::CommandFactory;

	use super::*;

	#[test]
	fn cli_definition_is_consistent() {
		Cli::command().debug_assert();
	}

	#[test]
	fn parses_resolve_with_names() {
		let cli = Cli::try_parse_from(["lazyns", "-m", "ns.toml", "resolve", "a", "b"]).unwrap();
		assert_eq!(cli.manifest, PathBuf::from("ns.toml"));
		assert_eq!(
			cli.command,
			Command::Resolve {
				names: vec!["a".into(), "b".into()]
			}
		);
	}

	#[test]
	fn resolve_requires_a_name() {
		assert!(Cli::try_parse_from(["lazyns", "--manifest", "ns.toml", "resolve"]).is_err());
	}
}
