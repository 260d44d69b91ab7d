//! Dispatch table regeneration after a composition change.

use graft_model::ComponentDefinition;

use crate::host::{HostFramework, sort_dispatch};

/// Re-sorts every non-empty dispatch list, reinstalls accessors that may be
/// replaced, then asks the host to rebuild property info.
///
/// Returns the number of accessors installed.
pub(crate) fn regenerate(host: &dyn HostFramework, def: &mut ComponentDefinition) -> usize {
	let properties: Vec<Box<str>> = def
		.dispatch
		.iter()
		.filter(|(_, entries)| !entries.is_empty())
		.map(|(property, _)| property.clone())
		.collect();

	let mut installed = 0;
	for property in properties {
		let Some(entries) = def.dispatch.get_mut(&*property) else {
			continue;
		};
		sort_dispatch(host, entries);
		let entries = entries.clone();

		let replaceable = def.members.get(&*property).is_none_or(|d| d.is_replaceable());
		if replaceable {
			host.create_accessors(def, &property, &entries);
			installed += 1;
		}
	}

	host.rebuild_property_info(def);
	installed
}
