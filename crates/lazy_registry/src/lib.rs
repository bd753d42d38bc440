//! Lazily materialized symbol registries.
//!
//! A [`Registry`] exposes a fixed set of names without loading what backs them.
//! Each name carries a [`Recipe`]; the recipe runs the first time the name is
//! resolved and its value is cached for every later lookup. Discovery lists the
//! declared names without loading anything.
//!
//! # Modules
//!
//! - [`registry`] - Declaration table, resolution cache, and discovery
//! - [`recipe`] - Typed recipes and the [`Loader`] seam that interprets them
//! - [`declare`] - Import-line declaration syntax
//! - [`fallback`] - Filesystem-backed fallback for undeclared names
//! - [`fs`] - TOML unit loader
//! - [`manifest`] - Namespace manifests
//!
//! # Example
//!
//! ```
//! use lazyns_registry::{Registry, RegistryError};
//!
//! let registry = Registry::builder("examplepackage").factory("greet", || Ok(42)).build();
//!
//! assert_eq!(registry.discover(), ["greet"]);
//! assert_eq!(*registry.resolve("greet")?, 42);
//! assert!(matches!(registry.resolve("missing"), Err(RegistryError::NameNotFound { .. })));
//! # Ok::<(), RegistryError>(())
//! ```

pub mod declare;
pub mod error;
pub mod fallback;
pub mod fs;
pub mod manifest;
pub mod recipe;
pub mod registry;

pub use declare::{Declaration, parse_import_block, parse_import_line};
pub use error::{BoxError, DeclareError, LoadError, ManifestError, RegistryError};
pub use fallback::ResourceDir;
pub use fs::TomlLoader;
pub use manifest::Manifest;
pub use recipe::{Factory, Loader, Recipe};
pub use registry::{EntryState, Registry, RegistryBuilder};
