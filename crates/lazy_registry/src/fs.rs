//! Filesystem loader backed by TOML units.
//!
//! A dotted location `a.b` names the file `<root>/a/b.toml`. Loading a unit
//! yields its whole table; loading a symbol yields one top-level key of it.

use std::path::{Path, PathBuf};

use crate::error::LoadError;
use crate::recipe::Loader;

/// File extension of units and resources.
pub const UNIT_EXTENSION: &str = "toml";

/// Loads units from a directory tree of TOML files.
#[derive(Debug, Clone)]
pub struct TomlLoader {
	root: PathBuf,
}

impl TomlLoader {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Maps a dotted location onto its unit file.
	pub fn unit_path(&self, location: &str) -> PathBuf {
		let mut path = self.root.clone();
		path.extend(location.split('.'));
		path.set_extension(UNIT_EXTENSION);
		path
	}

	fn read_table(&self, location: &str) -> Result<toml::Table, LoadError> {
		let path = self.unit_path(location);
		if !path.is_file() {
			return Err(LoadError::UnitNotFound {
				location: location.to_string(),
				path,
			});
		}
		parse_file(&path)
	}
}

impl Loader<toml::Value> for TomlLoader {
	fn load_unit(&self, location: &str) -> Result<toml::Value, LoadError> {
		self.read_table(location).map(toml::Value::Table)
	}

	fn load_symbol(&self, location: &str, symbol: &str) -> Result<toml::Value, LoadError> {
		let mut table = self.read_table(location)?;
		table.remove(symbol).ok_or_else(|| LoadError::MissingSymbol {
			location: location.to_string(),
			symbol: symbol.to_string(),
		})
	}

	fn load_resource(&self, path: &Path) -> Result<toml::Value, LoadError> {
		parse_file(path).map(toml::Value::Table)
	}
}

fn parse_file(path: &Path) -> Result<toml::Table, LoadError> {
	let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
		path: path.to_path_buf(),
		source,
	})?;
	content.parse::<toml::Table>().map_err(|e| LoadError::Parse {
		path: path.to_path_buf(),
		message: e.message().to_string(),
	})
}
