//! The lazy symbol registry.
//!
//! # Mental Model
//!
//! 1. **Declaration:** [`RegistryBuilder`] collects `(name, recipe)` pairs. Nothing is
//!    executed; a repeated name replaces the earlier recipe but keeps its position.
//! 2. **Resolution:** [`Registry::resolve`] runs a name's recipe on first access and
//!    swaps the recipe for the materialized value. Later calls return the cached
//!    value without touching the recipe.
//! 3. **Discovery:** [`Registry::discover`] lists declared names in declaration order
//!    and never triggers a load.
//!
//! # Invariants
//!
//! - An entry goes `Unresolved -> Resolved` at most once and never reverts.
//! - A failing recipe leaves its entry `Unresolved`; the next `resolve` retries it.
//! - The declared key set is fixed at [`RegistryBuilder::build`].
//!
//! # Concurrency
//!
//! - Discovery is lock-free.
//! - Resolved values and load state are read without taking any lock, so cache
//!   hits never block each other or [`Registry::status`].
//! - Each entry has its own reentrant lock guarding the `Unresolved -> Resolved`
//!   transition. Concurrent `resolve` calls for one unresolved name are serialized
//!   behind a single recipe execution; other names are unaffected.
//! - A recipe that resolves its own name on the same thread fails with
//!   [`LoadError::Cycle`] instead of deadlocking.
//! - Fallback resources load outside the cache lock, so a loader may resolve other
//!   fallback names. Racing loads of one resource keep the first value cached.

mod builder;

use std::cell::RefCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

pub use builder::RegistryBuilder;
use indexmap::IndexMap;
use parking_lot::{Mutex, ReentrantMutex};
use rustc_hash::{FxBuildHasher, FxHashMap};

use crate::error::{LoadError, RegistryError};
use crate::fallback::ResourceDir;
use crate::recipe::{Loader, Recipe};

/// Load state of one entry, as reported by [`Registry::status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryState {
	/// Not loaded yet; carries the recipe's description.
	Unresolved(String),
	/// A recipe execution is in flight.
	Resolving,
	/// Materialized and cached.
	Resolved,
}

impl std::fmt::Display for EntryState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Unresolved(recipe) => write!(f, "unresolved ({recipe})"),
			Self::Resolving => f.write_str("resolving"),
			Self::Resolved => f.write_str("resolved"),
		}
	}
}

struct Slot<V> {
	value: OnceLock<Arc<V>>,
	resolving: AtomicBool,
	/// Recipe description, kept for status reports after the recipe is consumed.
	description: String,
	/// Taken once the value is materialized.
	recipe: ReentrantMutex<RefCell<Option<Recipe<V>>>>,
}

impl<V> Slot<V> {
	fn new(recipe: Recipe<V>) -> Self {
		Self {
			value: OnceLock::new(),
			resolving: AtomicBool::new(false),
			description: recipe.to_string(),
			recipe: ReentrantMutex::new(RefCell::new(Some(recipe))),
		}
	}

	fn state(&self) -> EntryState {
		if self.value.get().is_some() {
			EntryState::Resolved
		} else if self.resolving.load(Ordering::Acquire) {
			EntryState::Resolving
		} else {
			EntryState::Unresolved(self.description.clone())
		}
	}
}

/// Clears the in-flight flag even if the recipe panics.
struct ResolvingFlag<'a>(&'a AtomicBool);

impl Drop for ResolvingFlag<'_> {
	fn drop(&mut self) {
		self.0.store(false, Ordering::Release);
	}
}

/// Namespace of lazily materialized values.
pub struct Registry<V> {
	namespace: String,
	entries: IndexMap<String, Slot<V>, FxBuildHasher>,
	loader: Option<Arc<dyn Loader<V>>>,
	resources: Option<ResourceDir>,
	fallback: Mutex<FxHashMap<String, Arc<V>>>,
}

impl<V> Registry<V> {
	/// Starts declaring a registry for `namespace`.
	pub fn builder(namespace: impl Into<String>) -> RegistryBuilder<V> {
		RegistryBuilder::new(namespace)
	}

	/// Name of the owning namespace, used in diagnostics.
	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	/// Returns the value bound to `name`, running its recipe on first access.
	///
	/// Undeclared names fall back to the resource directory when one is configured.
	pub fn resolve(&self, name: &str) -> Result<Arc<V>, RegistryError> {
		match self.entries.get(name) {
			Some(slot) => self.materialize(name, slot),
			None => self.resolve_resource(name),
		}
	}

	/// Lists every declared name, loaded or not, in declaration order.
	///
	/// Names reachable only through the resource fallback are not included.
	pub fn discover(&self) -> Vec<&str> {
		self.entries.keys().map(String::as_str).collect()
	}

	/// Lists names reachable only through the resource fallback.
	pub fn discover_resources(&self) -> Vec<String> {
		let Some(resources) = &self.resources else {
			return Vec::new();
		};
		resources.names().into_iter().filter(|name| !self.entries.contains_key(name)).collect()
	}

	/// Returns true if `name` is declared.
	pub fn contains(&self, name: &str) -> bool {
		self.entries.contains_key(name)
	}

	/// Returns true if `name` is declared and already materialized.
	pub fn is_resolved(&self, name: &str) -> bool {
		self.entries.get(name).is_some_and(|slot| slot.state() == EntryState::Resolved)
	}

	/// Snapshot of every declared entry's load state. Never triggers a load.
	pub fn status(&self) -> Vec<(&str, EntryState)> {
		self.entries.iter().map(|(name, slot)| (name.as_str(), slot.state())).collect()
	}

	/// Resolves every declared name in discovery order, stopping at the first failure.
	pub fn resolve_all(&self) -> Result<Vec<(&str, Arc<V>)>, RegistryError> {
		self.entries
			.iter()
			.map(|(name, slot)| self.materialize(name, slot).map(|value| (name.as_str(), value)))
			.collect()
	}

	/// Number of declared names.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if nothing is declared.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	fn materialize(&self, name: &str, slot: &Slot<V>) -> Result<Arc<V>, RegistryError> {
		if let Some(value) = slot.value.get() {
			tracing::trace!(namespace = %self.namespace, name, "cache hit");
			return Ok(Arc::clone(value));
		}

		let guard = slot.recipe.lock();
		// Resolved by another thread while we waited.
		if let Some(value) = slot.value.get() {
			return Ok(Arc::clone(value));
		}
		// Only the lock holder sets the flag, so seeing it here means re-entry.
		if slot.resolving.load(Ordering::Acquire) {
			return Err(self.load_failure(name, LoadError::Cycle(name.to_string())));
		}
		let Some(recipe) = guard.borrow().clone() else {
			return Err(self.load_failure(name, LoadError::Cycle(name.to_string())));
		};

		slot.resolving.store(true, Ordering::Release);
		let result = {
			let _flag = ResolvingFlag(&slot.resolving);
			recipe.execute(self.loader.as_deref()).map(|value| Arc::clone(slot.value.get_or_init(|| Arc::new(value))))
		};

		match result {
			Ok(value) => {
				guard.borrow_mut().take();
				tracing::debug!(namespace = %self.namespace, name, %recipe, "materialized");
				Ok(value)
			}
			Err(source) => Err(self.load_failure(name, source)),
		}
	}

	fn resolve_resource(&self, name: &str) -> Result<Arc<V>, RegistryError> {
		let Some(resources) = &self.resources else {
			return Err(self.not_found(name));
		};

		if let Some(value) = self.fallback.lock().get(name) {
			tracing::trace!(namespace = %self.namespace, name, "resource cache hit");
			return Ok(Arc::clone(value));
		}

		let Some(path) = resources.locate(name) else {
			return Err(self.not_found(name));
		};
		let recipe = Recipe::Resource(path);
		let loaded = recipe.execute(self.loader.as_deref()).map_err(|source| self.load_failure(name, source))?;

		let mut cache = self.fallback.lock();
		let value = Arc::clone(cache.entry(name.to_string()).or_insert_with(|| Arc::new(loaded)));
		tracing::debug!(namespace = %self.namespace, name, %recipe, "materialized from resource");
		Ok(value)
	}

	fn not_found(&self, name: &str) -> RegistryError {
		let suggestion = self
			.entries
			.keys()
			.min_by_key(|k| strsim::levenshtein(name, k))
			.filter(|k| strsim::levenshtein(name, k) <= 3)
			.cloned();
		RegistryError::NameNotFound {
			namespace: self.namespace.clone(),
			name: name.to_string(),
			suggestion,
		}
	}

	fn load_failure(&self, name: &str, source: LoadError) -> RegistryError {
		tracing::error!(namespace = %self.namespace, name, error = %source, "failed to load declared name");
		RegistryError::LoadFailure {
			namespace: self.namespace.clone(),
			name: name.to_string(),
			source,
		}
	}
}

impl<V> std::fmt::Debug for Registry<V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Registry")
			.field("namespace", &self.namespace)
			.field("entries", &self.status())
			.field("resources", &self.resources)
			.finish_non_exhaustive()
	}
}
