//! Error types for declaration, loading, and resolution.

use std::path::PathBuf;

/// Boxed error produced by user-supplied factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by [`crate::Registry::resolve`].
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
	/// The name is neither declared nor reachable through the resource fallback.
	#[error("namespace '{namespace}' has no attribute '{name}'{}", suggestion_suffix(.suggestion))]
	NameNotFound {
		namespace: String,
		name: String,
		/// Closest declared name, if one is near enough to be a likely typo.
		suggestion: Option<String>,
	},

	/// The recipe for a declared (or fallback) name failed. The entry stays unresolved.
	#[error("failed to load '{name}' in namespace '{namespace}': {source}")]
	LoadFailure {
		namespace: String,
		name: String,
		#[source]
		source: LoadError,
	},
}

impl RegistryError {
	/// Returns the name the failing lookup was for.
	pub fn name(&self) -> &str {
		match self {
			Self::NameNotFound { name, .. } | Self::LoadFailure { name, .. } => name,
		}
	}

	/// Returns true if a later call may succeed without redeclaring anything.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Self::LoadFailure { .. })
	}
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
	match suggestion {
		Some(s) => format!(" (did you mean '{s}'?)"),
		None => String::new(),
	}
}

/// Failures raised while executing a recipe.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
	#[error("no loader configured for '{0}'")]
	NoLoader(String),

	#[error("'{0}' is already being resolved on this thread")]
	Cycle(String),

	#[error("unit not found: {location} (looked for {})", .path.display())]
	UnitNotFound { location: String, path: PathBuf },

	#[error("unit '{location}' has no symbol '{symbol}'")]
	MissingSymbol { location: String, symbol: String },

	#[error("failed to read {}: {source}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse {}: {message}", .path.display())]
	Parse { path: PathBuf, message: String },

	#[error(transparent)]
	Other(BoxError),
}

impl LoadError {
	/// Wraps an arbitrary error raised inside loaded code.
	pub fn other(err: impl Into<BoxError>) -> Self {
		Self::Other(err.into())
	}
}

/// Malformed declaration line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeclareError {
	#[error("expected 'import' or 'from' at start of declaration: {0:?}")]
	UnknownForm(String),

	#[error("missing 'import' keyword after 'from <unit>': {0:?}")]
	MissingImport(String),

	#[error("invalid name {name:?} in declaration: {line:?}")]
	InvalidName { line: String, name: String },

	#[error("unexpected trailing tokens in declaration: {0:?}")]
	Trailing(String),
}

/// Failures loading a namespace manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
	#[error("failed to read manifest {}: {source}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid manifest: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("invalid entry {index} in imports: {source}")]
	Declare {
		index: usize,
		#[source]
		source: DeclareError,
	},
}
