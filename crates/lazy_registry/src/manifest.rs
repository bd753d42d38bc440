//! Namespace manifests.
//!
//! A manifest is a TOML file declaring a namespace:
//!
//! ```toml
//! namespace = "examplepackage"
//! imports = [
//!     "import examplemodule01 as exmodule",
//!     "from .examplemodule02 import myfunction02 as exfunct",
//! ]
//! # Optional. Undeclared names resolve from `<resources>/<name>.toml`.
//! resources = "extras"
//! # Optional. Directory holding the units; defaults to the manifest's directory.
//! root = "."
//! ```
//!
//! Relative paths are resolved against the manifest's directory.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::declare::parse_import_line;
use crate::error::ManifestError;
use crate::fallback::ResourceDir;
use crate::fs::{TomlLoader, UNIT_EXTENSION};
use crate::registry::{Registry, RegistryBuilder};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
	pub namespace: String,
	#[serde(default)]
	pub imports: Vec<String>,
	#[serde(default)]
	pub resources: Option<PathBuf>,
	#[serde(default)]
	pub root: Option<PathBuf>,
	/// Directory relative paths are anchored to.
	#[serde(skip)]
	pub base_dir: PathBuf,
}

impl Manifest {
	/// Reads and parses a manifest file.
	pub fn from_path(path: &Path) -> Result<Self, ManifestError> {
		let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let mut manifest: Self = content.parse()?;
		manifest.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
		tracing::debug!(path = %path.display(), namespace = %manifest.namespace, imports = manifest.imports.len(), "loaded manifest");
		Ok(manifest)
	}

	/// Directory units are loaded from.
	pub fn unit_root(&self) -> PathBuf {
		self.anchor(self.root.as_deref().unwrap_or(Path::new("")))
	}

	/// Resource fallback directory, if configured.
	pub fn resource_dir(&self) -> Option<ResourceDir> {
		self.resources.as_deref().map(|dir| ResourceDir::new(self.anchor(dir), UNIT_EXTENSION))
	}

	/// Declares every import and configures the TOML loader and fallback.
	pub fn into_builder(self) -> Result<RegistryBuilder<toml::Value>, ManifestError> {
		let mut builder = RegistryBuilder::new(self.namespace.as_str()).loader(TomlLoader::new(self.unit_root()));
		if let Some(resources) = self.resource_dir() {
			builder = builder.resource_dir(resources);
		}
		for (index, line) in self.imports.iter().enumerate() {
			let declaration = parse_import_line(line).map_err(|source| ManifestError::Declare { index, source })?;
			builder.push(declaration);
		}
		Ok(builder)
	}

	/// Builds the registry described by this manifest.
	pub fn into_registry(self) -> Result<Registry<toml::Value>, ManifestError> {
		Ok(self.into_builder()?.build())
	}

	fn anchor(&self, path: &Path) -> PathBuf {
		if path.is_absolute() { path.to_path_buf() } else { self.base_dir.join(path) }
	}
}

impl FromStr for Manifest {
	type Err = ManifestError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(toml::from_str(s)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::RegistryError;

	const EXAMPLE: &str = r#"
namespace = "examplepackage"
imports = [
	"import examplemodule01 as exmodule",
	"from .examplemodule02 import myfunction02 as exfunct",
	"from examplemodule02 import MyClassTwo as ExClass",
]
resources = "extras"
"#;

	fn write_package(dir: &Path) -> PathBuf {
		std::fs::write(dir.join("examplemodule01.toml"), "kind = \"module\"\n").unwrap();
		std::fs::write(
			dir.join("examplemodule02.toml"),
			"myfunction02 = \"fn\"\n[MyClassTwo]\nfields = [\"a\", \"b\"]\n",
		)
		.unwrap();
		std::fs::create_dir(dir.join("extras")).unwrap();
		std::fs::write(dir.join("extras").join("bonus.toml"), "hidden = true\n").unwrap();
		let manifest = dir.join("namespace.toml");
		std::fs::write(&manifest, EXAMPLE).unwrap();
		manifest
	}

	#[test]
	fn parses_manifest() {
		let manifest: Manifest = EXAMPLE.parse().unwrap();
		assert_eq!(manifest.namespace, "examplepackage");
		assert_eq!(manifest.imports.len(), 3);
		assert_eq!(manifest.resources.as_deref(), Some(Path::new("extras")));
		assert_eq!(manifest.root, None);
	}

	#[test]
	fn rejects_unknown_fields() {
		let err = "namespace = \"x\"\nimport = []\n".parse::<Manifest>().unwrap_err();
		assert!(matches!(err, ManifestError::Parse(_)));
	}

	#[test]
	fn reports_bad_import_index() {
		let manifest: Manifest = "namespace = \"x\"\nimports = [\"import ok\", \"bogus\"]\n".parse().unwrap();
		match manifest.into_registry() {
			Err(ManifestError::Declare { index, .. }) => assert_eq!(index, 1),
			other => panic!("expected declare error, got {other:?}"),
		}
	}

	#[test]
	fn registry_from_manifest_resolves_lazily() {
		let dir = tempfile::tempdir().unwrap();
		let path = write_package(dir.path());

		let registry = Manifest::from_path(&path).unwrap().into_registry().unwrap();
		assert_eq!(registry.namespace(), "examplepackage");
		assert_eq!(registry.discover(), ["exmodule", "exfunct", "ExClass"]);
		assert!(registry.status().iter().all(|(_, state)| !matches!(state, crate::EntryState::Resolved)));

		assert_eq!(registry.resolve("exfunct").unwrap().as_str(), Some("fn"));
		let class = registry.resolve("ExClass").unwrap();
		assert_eq!(class.get("fields").and_then(|f| f.as_array()).map(Vec::len), Some(2));
		assert_eq!(registry.resolve("exmodule").unwrap().get("kind").and_then(|k| k.as_str()), Some("module"));

		assert_eq!(registry.discover_resources(), ["bonus"]);
		assert_eq!(registry.resolve("bonus").unwrap().get("hidden").and_then(|h| h.as_bool()), Some(true));
		assert_eq!(registry.discover(), ["exmodule", "exfunct", "ExClass"]);
	}

	#[test]
	fn missing_unit_surfaces_as_load_failure() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("namespace.toml");
		std::fs::write(&path, "namespace = \"ns\"\nimports = [\"import gone\"]\n").unwrap();

		let registry = Manifest::from_path(&path).unwrap().into_registry().unwrap();
		let err = registry.resolve("gone").unwrap_err();
		assert!(matches!(err, RegistryError::LoadFailure { .. }));

		std::fs::write(dir.path().join("gone.toml"), "back = 1\n").unwrap();
		assert!(registry.resolve("gone").is_ok());
	}
}
