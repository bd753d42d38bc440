//! Load recipes and the loader seam that interprets them.
//!
//! A recipe is data, not code: it names *what* to load and *where from*, and the
//! registry dispatches it to a [`Loader`] (or runs an in-process [`Factory`]).

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::LoadError;

/// In-process thunk producing a value for one name.
pub type Factory<V> = Arc<dyn Fn() -> Result<V, LoadError> + Send + Sync>;

/// How to obtain the value bound to a declared name.
pub enum Recipe<V> {
	/// Load a unit, or a single symbol out of it.
	Import {
		/// Dotted unit location, e.g. `pkg.module`.
		location: String,
		/// Symbol to extract from the unit; `None` binds the whole unit.
		symbol: Option<String>,
	},
	/// Load a co-located resource file verbatim.
	Resource(PathBuf),
	/// Run an in-process factory.
	Factory(Factory<V>),
}

impl<V> Recipe<V> {
	/// Recipe binding a whole unit.
	pub fn unit(location: impl Into<String>) -> Self {
		Self::Import {
			location: location.into(),
			symbol: None,
		}
	}

	/// Recipe binding one symbol of a unit.
	pub fn symbol(location: impl Into<String>, symbol: impl Into<String>) -> Self {
		Self::Import {
			location: location.into(),
			symbol: Some(symbol.into()),
		}
	}

	/// Recipe wrapping a closure.
	pub fn factory<F>(f: F) -> Self
	where
		F: Fn() -> Result<V, LoadError> + Send + Sync + 'static,
	{
		Self::Factory(Arc::new(f))
	}

	/// Executes the recipe, dispatching non-factory kinds to `loader`.
	pub(crate) fn execute(&self, loader: Option<&dyn Loader<V>>) -> Result<V, LoadError> {
		match self {
			Self::Factory(f) => f(),
			Self::Import { location, symbol } => {
				let loader = loader.ok_or_else(|| LoadError::NoLoader(location.clone()))?;
				match symbol {
					Some(symbol) => loader.load_symbol(location, symbol),
					None => loader.load_unit(location),
				}
			}
			Self::Resource(path) => {
				let loader = loader.ok_or_else(|| LoadError::NoLoader(path.display().to_string()))?;
				loader.load_resource(path)
			}
		}
	}
}

impl<V> Clone for Recipe<V> {
	fn clone(&self) -> Self {
		match self {
			Self::Import { location, symbol } => Self::Import {
				location: location.clone(),
				symbol: symbol.clone(),
			},
			Self::Resource(path) => Self::Resource(path.clone()),
			Self::Factory(f) => Self::Factory(Arc::clone(f)),
		}
	}
}

impl<V> fmt::Debug for Recipe<V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Import { location, symbol } => f.debug_struct("Import").field("location", location).field("symbol", symbol).finish(),
			Self::Resource(path) => f.debug_tuple("Resource").field(path).finish(),
			Self::Factory(_) => f.write_str("Factory(..)"),
		}
	}
}

impl<V> fmt::Display for Recipe<V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Import { location, symbol: None } => write!(f, "import {location}"),
			Self::Import {
				location,
				symbol: Some(symbol),
			} => write!(f, "from {location} import {symbol}"),
			Self::Resource(path) => write!(f, "resource {}", path.display()),
			Self::Factory(_) => f.write_str("factory"),
		}
	}
}

/// Interprets [`Recipe::Import`] and [`Recipe::Resource`] recipes.
pub trait Loader<V>: Send + Sync {
	/// Loads the whole unit at `location`.
	fn load_unit(&self, location: &str) -> Result<V, LoadError>;

	/// Loads `symbol` from the unit at `location`.
	fn load_symbol(&self, location: &str, symbol: &str) -> Result<V, LoadError>;

	/// Loads a resource file verbatim.
	fn load_resource(&self, path: &Path) -> Result<V, LoadError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_matches_declaration_form() {
		assert_eq!(Recipe::<()>::unit("pkg.mod").to_string(), "import pkg.mod");
		assert_eq!(Recipe::<()>::symbol("pkg.mod", "f").to_string(), "from pkg.mod import f");
		assert_eq!(Recipe::<()>::factory(|| Ok(())).to_string(), "factory");
	}

	#[test]
	fn import_without_loader_fails() {
		let err = Recipe::<u8>::unit("pkg").execute(None).unwrap_err();
		assert!(matches!(err, LoadError::NoLoader(ref loc) if loc == "pkg"));
	}

	#[test]
	fn factory_runs_without_loader() {
		assert_eq!(Recipe::factory(|| Ok(7u8)).execute(None).unwrap(), 7);
	}
}
