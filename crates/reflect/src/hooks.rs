//! Chainable registration extension point.
//!
//! The host runs [`RegistrationHooks::run`] exactly once per component type when
//! its definition is finalized. Hooks form a chain: the most recently installed
//! hook runs first and decides when (and whether) the previously installed ones
//! run by calling [`Next::run`]. Independent extensions therefore observe the same
//! event without clobbering each other.

use std::sync::Arc;

use graft_model::DefinitionRef;
use parking_lot::RwLock;

type HookFn = dyn Fn(&DefinitionRef, Next<'_>) + Send + Sync;

#[derive(Clone)]
pub struct RegistrationHook(Arc<HookFn>);

impl RegistrationHook {
	pub fn new(f: impl Fn(&DefinitionRef, Next<'_>) + Send + Sync + 'static) -> Self {
		Self(Arc::new(f))
	}
}

/// Continuation into the hooks installed before the current one.
pub struct Next<'a> {
	rest: &'a [RegistrationHook],
}

impl Next<'_> {
	pub fn run(self, def: &DefinitionRef) {
		if let Some((last, rest)) = self.rest.split_last() {
			(last.0)(def, Next { rest });
		}
	}
}

#[derive(Default)]
pub struct RegistrationHooks {
	chain: RwLock<Vec<RegistrationHook>>,
}

impl RegistrationHooks {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn install(&self, hook: RegistrationHook) {
		self.chain.write().push(hook);
	}

	/// Runs the chain for a freshly finalized definition.
	///
	/// The chain is snapshotted first, so hooks may install further hooks; those
	/// apply from the next registration on.
	pub fn run(&self, def: &DefinitionRef) {
		let chain = self.chain.read().clone();
		Next { rest: &chain }.run(def);
	}

	pub fn len(&self) -> usize {
		self.chain.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.chain.read().is_empty()
	}
}
