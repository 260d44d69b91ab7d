//! Member conflict resolution for behaviors inserted after registration.
//!
//! Composition order is precedence: a later behavior's member beats an earlier
//! one's. The host applies that rule when it composes a definition, but a
//! behavior injected afterwards finds the members already merged. For every
//! member the new behavior defines, the resolver decides whether the current
//! definition member may yield to it.
//!
//! Provenance is inferred, not stored: the current member is taken to be
//! inherited from a preceding behavior when it is descriptor-equal to that
//! behavior's member. Two unrelated behaviors sharing an identical member would
//! be indistinguishable, which is accepted.

use graft_model::{Behavior, ComponentDefinition, descriptors_equal, is_lifecycle_member};

use crate::host::HostFramework;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RemixOutcome {
	/// Members the definition did not have yet.
	pub added: usize,
	/// Inherited members replaced by the newer behavior's version.
	pub overridden: usize,
	/// Members left alone (customized, sealed or from a later behavior).
	pub kept: usize,
}

/// Remixes the `count` behaviors that were just spliced in at `start`.
///
/// Behaviors are visited last-inserted first, so a higher-precedence behavior
/// claims a member before an earlier one in the same batch is considered.
pub(crate) fn remix(host: &dyn HostFramework, def: &mut ComponentDefinition, start: usize, count: usize) -> RemixOutcome {
	let mut outcome = RemixOutcome::default();
	let end = (start + count).min(def.behaviors.len());

	for pos in (start..end).rev() {
		let behavior: Behavior = def.behaviors[pos].clone();
		let preceding: Vec<Behavior> = def.behaviors[..pos].to_vec();

		for name in behavior.members().keys() {
			if is_lifecycle_member(name) {
				continue;
			}
			let Some(current) = def.members.get(&**name) else {
				host.copy_member(&mut def.members, behavior.members(), name);
				outcome.added += 1;
				continue;
			};

			let inherited = current.is_replaceable()
				&& preceding
					.iter()
					.filter_map(|p| p.member(name))
					.any(|earlier| descriptors_equal(earlier, current));
			if inherited {
				host.copy_member(&mut def.members, behavior.members(), name);
				outcome.overridden += 1;
			} else {
				outcome.kept += 1;
			}
		}
	}

	tracing::debug!(
		target: "graft::remix",
		component = %def.id(),
		added = outcome.added,
		overridden = outcome.overridden,
		kept = outcome.kept,
		"remix.done"
	);
	outcome
}
