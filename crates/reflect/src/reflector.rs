//! The reflection service: registry, pending callbacks and behavior injection
//! behind one owned object.
//!
//! # Registration flow
//!
//! [`Reflector::attach`] installs an interceptor into the host's registration
//! hook chain. When the host finalizes a component type, the interceptor:
//!
//! 1. registers the definition (non-empty, not yet registered identifiers),
//! 2. drains and runs the callbacks queued for that identifier, in order,
//! 3. hands over to the previously installed hooks,
//! 4. wraps the definition's property setter so each instance refreshes its
//!    dispatch list on the first write of each property.
//!
//! # Re-entrancy
//!
//! Callbacks run without any registry, queue or definition lock held, so they
//! may reflect or inject synchronously. Injections replayed from the queue, and
//! any injection into a component whose hooks are still running, are treated as
//! registration-phase and skip composition replay; the host composes the final
//! behavior list right after the hooks return.

use std::sync::{Arc, OnceLock, Weak};

use graft_model::{Behavior, ComponentId, DefinitionRef, Members, PropertySetter};
use parking_lot::Mutex;
use rustc_hash::FxHashSet;

use crate::config::ReflectConfig;
use crate::error::ReflectError;
use crate::hooks::{Next, RegistrationHook};
use crate::host::{HostFramework, sort_dispatch};
use crate::inject::{InsertionOptions, resolve_insertion_index, splice_at};
use crate::pending::PendingQueue;
use crate::registry::ReflectionRegistry;
use crate::{regen, remix};

/// Deferred work for a component that has not registered yet.
pub type PendingCallback = Box<dyn FnOnce(&Reflector, &DefinitionRef) + Send>;

/// Result of [`Reflector::reflect`].
#[derive(Debug, Clone)]
pub enum Reflection {
	/// The identifier was empty.
	Unnamed,
	/// The component has not registered yet.
	Pending,
	Ready(DefinitionRef),
}

impl Reflection {
	pub fn definition(&self) -> Option<&DefinitionRef> {
		match self {
			Self::Ready(def) => Some(def),
			Self::Unnamed | Self::Pending => None,
		}
	}

	pub fn is_ready(&self) -> bool {
		matches!(self, Self::Ready(_))
	}
}

pub enum ReflectOp {
	/// Run now if registered, otherwise once registration happens.
	Callback(PendingCallback),
	/// Merge these members into the definition now; never queued.
	Bundle(Members),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
	Live,
	Registration,
}

pub struct Reflector {
	host: Arc<dyn HostFramework>,
	config: ReflectConfig,
	registry: ReflectionRegistry,
	pending: PendingQueue<PendingCallback>,
	/// Components whose registration hooks are currently running.
	registering: Mutex<FxHashSet<ComponentId>>,
}

impl Reflector {
	pub fn new(host: Arc<dyn HostFramework>) -> Arc<Self> {
		Self::with_config(host, ReflectConfig::default())
	}

	pub fn with_config(host: Arc<dyn HostFramework>, config: ReflectConfig) -> Arc<Self> {
		Arc::new(Self {
			host,
			config,
			registry: ReflectionRegistry::new(),
			pending: PendingQueue::new(),
			registering: Mutex::new(FxHashSet::default()),
		})
	}

	/// Installs the registration interceptor into the host's hook chain.
	///
	/// The hook holds a weak reference; once the reflector is dropped it only
	/// forwards to the rest of the chain.
	pub fn attach(self: &Arc<Self>) {
		let weak: Weak<Self> = Arc::downgrade(self);
		self.host
			.registration_hooks()
			.install(RegistrationHook::new(move |def, next| match weak.upgrade() {
				Some(reflector) => reflector.on_registered(def, next),
				None => next.run(def),
			}));
	}

	pub fn registry(&self) -> &ReflectionRegistry {
		&self.registry
	}

	pub fn lookup(&self, id: &str) -> Option<DefinitionRef> {
		self.registry.lookup(id)
	}

	/// Callbacks still waiting for `id` to register.
	pub fn pending_count(&self, id: &str) -> usize {
		self.pending.pending_for(id)
	}

	/// Identifiers that have callbacks waiting, sorted.
	pub fn waiting(&self) -> Vec<ComponentId> {
		self.pending.waiting()
	}

	fn on_registered(&self, def: &DefinitionRef, next: Next<'_>) {
		let id = def.id();
		// A duplicate leaves the registered definition live: injections into it
		// during this chain still replay.
		let registered = self.registry.register(&id, def.clone());
		if registered {
			self.registering.lock().insert(id.clone());

			let callbacks = self.pending.drain(id.as_str());
			if !callbacks.is_empty() {
				tracing::debug!(target: "graft::pending", component = %id, count = callbacks.len(), "pending.drain");
			}
			for callback in callbacks {
				callback(self, def);
			}
		}

		next.run(def);
		if registered {
			self.registering.lock().remove(id.as_str());
		}

		if self.config.patch_setters {
			self.patch_property_setter(def);
		}
	}

	/// Wraps the per-instance property setter. The first write of a property on
	/// an instance uses the definition's current dispatch list instead of the one
	/// the accessor captured; later writes take the captured fast path.
	fn patch_property_setter(&self, def: &DefinitionRef) {
		let host = self.host.clone();
		let mut guard = def.write();
		let inner = guard.property_setter.clone();

		guard.property_setter = PropertySetter::new(move |instance, property, value, entries| {
			if !instance.mark_patched(property) {
				return inner.call(instance, property, value, entries);
			}
			let current = instance
				.definition()
				.read()
				.dispatch
				.get(property)
				.filter(|list| !list.is_empty())
				.cloned();
			match current {
				Some(mut list) => {
					sort_dispatch(host.as_ref(), &mut list);
					inner.call(instance, property, value, &list)
				}
				None => inner.call(instance, property, value, entries),
			}
		});
	}

	/// Looks up `id` and applies `op`.
	///
	/// Returns [`Reflection::Unnamed`] for an empty identifier. A callback runs
	/// immediately when the component is registered and is queued otherwise; a
	/// bundle is merged immediately or dropped.
	pub fn reflect(&self, id: &str, op: ReflectOp) -> Reflection {
		if id.is_empty() {
			return Reflection::Unnamed;
		}
		let def = self.registry.lookup(id);

		match op {
			ReflectOp::Callback(callback) => match &def {
				Some(def) => callback(self, def),
				None => self.enqueue(ComponentId::from(id), callback),
			},
			ReflectOp::Bundle(bundle) => {
				let Some(def) = &def else {
					return Reflection::Pending;
				};
				let mut guard = def.write();
				for name in bundle.keys() {
					self.host.copy_member(&mut guard.members, &bundle, name);
				}
			}
		}

		def.map_or(Reflection::Pending, Reflection::Ready)
	}

	pub fn when_registered(&self, id: &str, f: impl FnOnce(&Reflector, &DefinitionRef) + Send + 'static) -> Reflection {
		self.reflect(id, ReflectOp::Callback(Box::new(f)))
	}

	pub fn extend(&self, id: &str, bundle: Members) -> Reflection {
		self.reflect(id, ReflectOp::Bundle(bundle))
	}

	fn enqueue(&self, id: ComponentId, callback: PendingCallback) {
		let queued = self.pending.enqueue(&id, callback);
		if queued == self.config.pending_warn_threshold {
			tracing::warn!(
				target: "graft::pending",
				component = %id,
				queued,
				"pending.threshold: component has not registered; callbacks are retained until it does"
			);
		}
	}

	/// Inserts `behaviors` into the composition list of `id`.
	///
	/// Against an unregistered component the injection is queued and applied
	/// when it registers. Against a registered one the behaviors are spliced in
	/// and, unless disabled, members are remixed, the behaviors are prepared by
	/// the host and dispatch metadata is regenerated.
	pub fn inject_behaviors(&self, id: &str, behaviors: Vec<Behavior>, options: InsertionOptions) {
		self.inject(id, behaviors, options, Phase::Live);
	}

	fn inject(&self, id: &str, behaviors: Vec<Behavior>, options: InsertionOptions, phase: Phase) {
		if id.is_empty() {
			return;
		}
		let Some(def) = self.registry.lookup(id) else {
			tracing::debug!(target: "graft::inject", component = id, count = behaviors.len(), "inject.deferred");
			let id = ComponentId::from(id);
			let target = id.clone();
			let replay: PendingCallback = Box::new(move |reflector: &Reflector, _: &DefinitionRef| {
				reflector.inject(target.as_str(), behaviors, options, Phase::Registration)
			});
			self.enqueue(id, replay);
			return;
		};

		// Composition replay during registration would run twice: the host
		// composes the final list once the hooks return.
		let phase = match phase {
			Phase::Live if self.registering.lock().contains(id) => Phase::Registration,
			phase => phase,
		};

		let mut guard = def.write();
		let index = resolve_insertion_index(&guard.behaviors, &options);
		splice_at(&mut guard.behaviors, index, &behaviors);
		tracing::trace!(target: "graft::inject", component = id, index, count = behaviors.len(), ?phase, "inject.splice");

		if phase == Phase::Registration || !self.config.replay_effects {
			return;
		}

		let host = self.host.as_ref();
		remix::remix(host, &mut guard, index, behaviors.len());
		for behavior in &behaviors {
			host.prep_behavior(&mut guard, behavior);
		}
		regen::regenerate(host, &mut guard);
	}
}

static GLOBAL: OnceLock<Arc<Reflector>> = OnceLock::new();

/// Installs the process-wide reflector. It lives until the process exits.
pub fn install_global(reflector: Arc<Reflector>) -> Result<&'static Arc<Reflector>, ReflectError> {
	GLOBAL.set(reflector).map_err(|_| ReflectError::GlobalInstalled)?;
	GLOBAL.get().ok_or(ReflectError::GlobalInstalled)
}

pub fn global() -> Option<&'static Arc<Reflector>> {
	GLOBAL.get()
}
