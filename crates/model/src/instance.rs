//! Constructed component instances and their property write path.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::definition::DefinitionRef;
use crate::dispatch::DispatchEntry;
use crate::value::Value;

/// A live instance of a component type.
///
/// Property writes go through the accessor installed on the definition, which
/// forwards to the definition's [`PropertySetter`](crate::PropertySetter) with the
/// dispatch list the accessor captured.
#[derive(Debug)]
pub struct Instance {
	definition: DefinitionRef,
	values: FxHashMap<Box<str>, Value>,
	/// Properties whose write path has already been refreshed for this instance.
	patched: FxHashSet<Box<str>>,
}

impl Instance {
	pub fn new(definition: DefinitionRef) -> Self {
		Self {
			definition,
			values: FxHashMap::default(),
			patched: FxHashSet::default(),
		}
	}

	pub fn definition(&self) -> &DefinitionRef {
		&self.definition
	}

	/// Reads `property` through its accessor when one is installed.
	pub fn get(&self, property: &str) -> Option<Value> {
		let getter = self.definition.read().members.get(property).and_then(|d| d.getter().cloned());
		match getter {
			Some(getter) => getter.call(self),
			None => self.values.get(property).cloned(),
		}
	}

	/// Writes `property` through its accessor; without one the value is stored
	/// and nothing is dispatched.
	pub fn set(&mut self, property: &str, value: Value) {
		let setter = self.definition.read().members.get(property).and_then(|d| d.setter().cloned());
		match setter {
			Some(setter) => setter.call(self, value),
			None => {
				self.store(property, value);
			}
		}
	}

	/// Runs the definition's property setter with an explicit dispatch list.
	pub fn write_property(&mut self, property: &str, value: Value, entries: &[DispatchEntry]) {
		let setter = self.definition.read().property_setter.clone();
		setter.call(self, property, value, entries);
	}

	pub fn value(&self, property: &str) -> Option<&Value> {
		self.values.get(property)
	}

	/// Stores a raw value, returning the previous one.
	pub fn store(&mut self, property: &str, value: Value) -> Option<Value> {
		self.values.insert(Box::from(property), value)
	}

	pub fn is_patched(&self, property: &str) -> bool {
		self.patched.contains(property)
	}

	/// Returns `true` if `property` was not patched before.
	pub fn mark_patched(&mut self, property: &str) -> bool {
		self.patched.insert(Box::from(property))
	}
}
