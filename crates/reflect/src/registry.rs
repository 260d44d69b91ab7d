//! Process-lifetime map from component identifier to finalized definition.
//!
//! # Invariants
//!
//! - An entry, once added, is never removed or replaced. Later registrations
//!   under the same identifier are ignored.
//! - [`ReflectionRegistry::lookup`] returns the same [`DefinitionRef`] (by
//!   identity) for the lifetime of the registry; only its contents change.

use graft_model::{ComponentId, DefinitionRef};
use parking_lot::RwLock;
use rustc_hash::FxHashMap as HashMap;

#[derive(Debug, Default)]
pub struct ReflectionRegistry {
	defs: RwLock<HashMap<ComponentId, DefinitionRef>>,
}

impl ReflectionRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores `def` under `id`. Returns `false` for an empty identifier or one
	/// that is already registered.
	pub fn register(&self, id: &ComponentId, def: DefinitionRef) -> bool {
		if id.is_empty() {
			return false;
		}
		let mut defs = self.defs.write();
		if let Some(existing) = defs.get(id) {
			if !existing.ptr_eq(&def) {
				tracing::warn!(target: "graft::registry", component = %id, "registry.duplicate_ignored");
			}
			return false;
		}
		defs.insert(id.clone(), def);
		tracing::debug!(target: "graft::registry", component = %id, "registry.register");
		true
	}

	pub fn lookup(&self, id: &str) -> Option<DefinitionRef> {
		self.defs.read().get(id).cloned()
	}

	/// Registered identifiers, sorted.
	pub fn ids(&self) -> Vec<ComponentId> {
		let mut ids: Vec<_> = self.defs.read().keys().cloned().collect();
		ids.sort();
		ids
	}

	pub fn len(&self) -> usize {
		self.defs.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.defs.read().is_empty()
	}
}
