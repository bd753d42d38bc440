//! Filesystem-backed fallback for names that were never declared.
//!
//! A resource directory exposes `<root>/<name>.<extension>` files. They are
//! resolvable through [`crate::Registry::resolve`] but deliberately absent from
//! [`crate::Registry::discover`]; use [`crate::Registry::discover_resources`] to
//! enumerate them.

use std::path::{Path, PathBuf};

use crate::declare::is_identifier;

/// Directory of co-located resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDir {
	root: PathBuf,
	extension: String,
}

impl ResourceDir {
	pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
		Self {
			root: root.into(),
			extension: extension.into(),
		}
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Returns the resource path for `name` if such a file exists.
	///
	/// Only plain identifiers are accepted so lookups cannot leave `root`.
	pub fn locate(&self, name: &str) -> Option<PathBuf> {
		if !is_identifier(name) {
			return None;
		}
		let path = self.root.join(format!("{name}.{}", self.extension));
		path.is_file().then_some(path)
	}

	/// Lists resource names in sorted order. An unreadable directory lists nothing.
	pub fn names(&self) -> Vec<String> {
		let entries = match std::fs::read_dir(&self.root) {
			Ok(entries) => entries,
			Err(error) => {
				tracing::debug!(root = %self.root.display(), %error, "resource directory unreadable");
				return Vec::new();
			}
		};

		let mut names: Vec<String> = entries
			.filter_map(|entry| entry.ok())
			.map(|entry| entry.path())
			.filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == self.extension.as_str()))
			.filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
			.filter(|stem| is_identifier(stem))
			.collect();
		names.sort_unstable();
		names
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn locates_and_lists_matching_files() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::write(dir.path().join("beta.toml"), "").unwrap();
		std::fs::write(dir.path().join("alpha.toml"), "").unwrap();
		std::fs::write(dir.path().join("notes.txt"), "").unwrap();
		std::fs::write(dir.path().join("bad-name.toml"), "").unwrap();
		std::fs::create_dir(dir.path().join("sub.toml")).unwrap();

		let res = ResourceDir::new(dir.path(), "toml");
		assert_eq!(res.names(), ["alpha", "beta"]);
		assert_eq!(res.locate("alpha"), Some(dir.path().join("alpha.toml")));
		assert_eq!(res.locate("notes"), None);
		assert_eq!(res.locate("sub"), None);
	}

	#[test]
	fn rejects_path_like_names() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::write(dir.path().join("ok.toml"), "").unwrap();
		let res = ResourceDir::new(dir.path().join("nested"), "toml");
		assert_eq!(res.locate("../ok"), None);
		assert!(res.names().is_empty());
	}
}
