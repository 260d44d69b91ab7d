//! The seam to the component framework that owns definitions.
//!
//! The reflection layer never builds definitions itself. It relies on the host
//! for the registration event, dispatch ordering, accessor installation, behavior
//! preparation and property-info aggregation.

use std::cmp::Ordering;

use graft_model::{BehaviorModule, ComponentDefinition, DispatchEntry, Members, copy_own_member};

use crate::hooks::RegistrationHooks;

mod standard;

pub use standard::{Declaration, StandardHost, base_property_setter};

pub trait HostFramework: Send + Sync {
	/// The once-per-type registration extension point.
	fn registration_hooks(&self) -> &RegistrationHooks;

	/// Ordering of dispatch entries. Must be a total order; ties keep their
	/// existing relative order because callers sort stably.
	fn compare_dispatch(&self, a: &DispatchEntry, b: &DispatchEntry) -> Ordering;

	/// Installs the accessor for `property`, bound to `entries`.
	fn create_accessors(&self, def: &mut ComponentDefinition, property: &str, entries: &[DispatchEntry]);

	/// Recomputes the aggregated property info of `def`.
	fn rebuild_property_info(&self, def: &mut ComponentDefinition);

	/// Contributes `behavior`'s effects, listeners and host attributes to `def`.
	fn prep_behavior(&self, def: &mut ComponentDefinition, behavior: &BehaviorModule);

	/// Shallow copy of one own member, preserving its descriptor.
	fn copy_member(&self, target: &mut Members, source: &Members, name: &str) -> bool {
		copy_own_member(target, source, name)
	}
}

/// Stable in-place sort with the host comparator.
pub(crate) fn sort_dispatch(host: &dyn HostFramework, entries: &mut [DispatchEntry]) {
	entries.sort_by(|a, b| host.compare_dispatch(a, b));
}
