use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use rustc_hash::{FxBuildHasher, FxHashMap};

use super::{Registry, Slot};
use crate::declare::{Declaration, parse_import_block, parse_import_line};
use crate::error::{DeclareError, LoadError};
use crate::fallback::ResourceDir;
use crate::recipe::{Loader, Recipe};

/// Collects declarations for a [`Registry`].
///
/// Declaring is pure bookkeeping: no recipe runs until the built registry is
/// asked for a name.
pub struct RegistryBuilder<V> {
	namespace: String,
	declarations: Vec<Declaration<V>>,
	loader: Option<Arc<dyn Loader<V>>>,
	resources: Option<ResourceDir>,
}

impl<V> RegistryBuilder<V> {
	pub fn new(namespace: impl Into<String>) -> Self {
		Self {
			namespace: namespace.into(),
			declarations: Vec::new(),
			loader: None,
			resources: None,
		}
	}

	/// Appends a declaration.
	pub fn push(&mut self, declaration: Declaration<V>) {
		self.declarations.push(declaration);
	}

	/// Declares `name` with an explicit recipe.
	pub fn declare(mut self, name: impl Into<String>, recipe: Recipe<V>) -> Self {
		self.push(Declaration::new(name, recipe));
		self
	}

	/// Declares `name` backed by an in-process factory.
	pub fn factory<F>(self, name: impl Into<String>, f: F) -> Self
	where
		F: Fn() -> Result<V, LoadError> + Send + Sync + 'static,
	{
		self.declare(name, Recipe::factory(f))
	}

	/// Declares every pair from `declarations`, in order.
	pub fn declare_all(mut self, declarations: impl IntoIterator<Item = Declaration<V>>) -> Self {
		self.declarations.extend(declarations);
		self
	}

	/// Declares one import-style line, e.g. `from pkg.mod import f as g`.
	pub fn import_line(self, line: &str) -> Result<Self, DeclareError> {
		Ok(self.declare_all([parse_import_line(line)?]))
	}

	/// Declares a block of import-style lines.
	pub fn import_block(self, text: &str) -> Result<Self, DeclareError> {
		Ok(self.declare_all(parse_import_block(text)?))
	}

	/// Sets the loader that interprets import and resource recipes.
	pub fn loader(mut self, loader: impl Loader<V> + 'static) -> Self {
		self.loader = Some(Arc::new(loader));
		self
	}

	/// Enables the filesystem fallback for undeclared names.
	pub fn resource_dir(mut self, resources: ResourceDir) -> Self {
		self.resources = Some(resources);
		self
	}

	/// Freezes the declaration table.
	///
	/// Later declarations of a name replace earlier ones; the name keeps the
	/// position of its first declaration.
	pub fn build(self) -> Registry<V> {
		let mut entries: IndexMap<String, Slot<V>, FxBuildHasher> = IndexMap::with_capacity_and_hasher(self.declarations.len(), FxBuildHasher);

		for Declaration { name, recipe } in self.declarations {
			tracing::trace!(namespace = %self.namespace, name = %name, %recipe, "declare");
			if entries.insert(name.clone(), Slot::new(recipe)).is_some() {
				tracing::debug!(namespace = %self.namespace, name = %name, "redeclared; later recipe wins");
			}
		}

		Registry {
			namespace: self.namespace,
			entries,
			loader: self.loader,
			resources: self.resources,
			fallback: Mutex::new(FxHashMap::default()),
		}
	}
}
