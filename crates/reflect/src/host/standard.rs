//! Reference host: a small component framework built on the model crate.
//!
//! [`StandardHost::define`] is the definition pipeline. The registration hooks
//! run after the definition object exists but before behaviors are composed, so
//! hooks may still change the behavior list and have the host compose it.

use std::cmp::Ordering;
use std::sync::Arc;

use graft_model::{
	Behavior, BehaviorModule, ComponentDefinition, ComponentId, DefinitionRef, DispatchEntry, EffectContext, Getter,
	MemberDescriptor, PropertyDecl, PropertySetter, Setter, is_lifecycle_member,
};
use indexmap::IndexMap;

use super::HostFramework;
use crate::hooks::RegistrationHooks;
use crate::regen;

/// Raw declaration of a component type.
#[derive(Debug)]
pub struct Declaration {
	id: ComponentId,
	behaviors: Vec<Behavior>,
	base: BehaviorModule,
}

impl Declaration {
	pub fn new(id: impl Into<ComponentId>) -> Self {
		let id = id.into();
		let base = BehaviorModule::builder(id.as_str()).build_module();
		Self {
			id,
			behaviors: Vec::new(),
			base,
		}
	}

	pub fn behavior(mut self, behavior: Behavior) -> Self {
		self.behaviors.push(behavior);
		self
	}

	pub fn behaviors(mut self, behaviors: impl IntoIterator<Item = Behavior>) -> Self {
		self.behaviors.extend(behaviors);
		self
	}

	/// The component's own members, properties, effects and listeners.
	pub fn base(mut self, base: BehaviorModule) -> Self {
		self.base = base;
		self
	}
}

/// Stores the value and, unless it is identical to the previous one, fires each
/// entry of the given dispatch list in order.
pub fn base_property_setter() -> PropertySetter {
	PropertySetter::new(|instance, property, value, entries| {
		let old = instance.store(property, value.clone());
		if old.as_ref().is_some_and(|old| old.same(&value)) {
			return;
		}
		let ctx = EffectContext {
			property,
			value: &value,
			old: old.as_ref(),
		};
		for entry in entries {
			entry.fire(&ctx);
		}
	})
}

#[derive(Default)]
pub struct StandardHost {
	hooks: RegistrationHooks,
}

impl StandardHost {
	pub fn new() -> Self {
		Self::default()
	}

	/// Finalizes a declaration into a definition, firing the registration hooks.
	pub fn define(&self, decl: Declaration) -> DefinitionRef {
		let Declaration { id, behaviors, base } = decl;

		let mut def = ComponentDefinition::new(id, base_property_setter());
		def.behaviors = behaviors;
		def.members = base.members().clone();
		def.own_properties = base.properties().clone();
		let def = DefinitionRef::new(def);

		self.hooks.run(&def);
		self.compose(&def, &base);
		def
	}

	fn compose(&self, def: &DefinitionRef, base: &BehaviorModule) {
		let mut guard = def.write();
		let def = &mut *guard;
		let behaviors = def.behaviors.clone();

		// Own members win; among behaviors the later one wins.
		for behavior in behaviors.iter().rev() {
			for name in behavior.members().keys() {
				if is_lifecycle_member(name) || def.members.contains_key(name) {
					continue;
				}
				self.copy_member(&mut def.members, behavior.members(), name);
			}
		}

		for behavior in &behaviors {
			self.prep_behavior(def, behavior);
		}
		self.prep_behavior(def, base);

		regen::regenerate(self, def);
	}
}

impl HostFramework for StandardHost {
	fn registration_hooks(&self) -> &RegistrationHooks {
		&self.hooks
	}

	fn compare_dispatch(&self, a: &DispatchEntry, b: &DispatchEntry) -> Ordering {
		a.kind.rank().cmp(&b.kind.rank())
	}

	fn create_accessors(&self, def: &mut ComponentDefinition, property: &str, entries: &[DispatchEntry]) {
		let name: Arc<str> = Arc::from(property);
		let bound: Arc<[DispatchEntry]> = Arc::from(entries);

		let get = {
			let name = name.clone();
			Getter::new(move |instance| instance.value(&name).cloned())
		};
		let set = Setter::new(move |instance, value| instance.write_property(&name, value, &bound));

		def.members
			.insert(Box::from(property), MemberDescriptor::accessor(Some(get), Some(set)));
	}

	fn rebuild_property_info(&self, def: &mut ComponentDefinition) {
		let mut info: IndexMap<Box<str>, PropertyDecl> = IndexMap::new();
		let declared = def
			.behaviors
			.iter()
			.flat_map(|b| b.properties().iter())
			.chain(def.own_properties.iter());
		for (name, decl) in declared {
			match info.get_mut(name) {
				Some(existing) => existing.merge(decl),
				None => {
					info.insert(name.clone(), decl.clone());
				}
			}
		}
		def.properties = info;
	}

	fn prep_behavior(&self, def: &mut ComponentDefinition, behavior: &BehaviorModule) {
		for effect in behavior.effects() {
			def.dispatch
				.entry(effect.property.clone())
				.or_default()
				.push(effect.entry.clone());
		}
		for (event, handler) in behavior.listeners() {
			def.listeners.insert(event.clone(), handler.clone());
		}
		for (attribute, value) in behavior.host_attributes() {
			def.host_attributes.insert(attribute.clone(), value.clone());
		}
	}
}
