//! Component definitions and their shared handles.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::behavior::{Behavior, PropertyDecl};
use crate::descriptor::Members;
use crate::dispatch::{DispatchEntry, DispatchTable};
use crate::instance::Instance;
use crate::value::Value;

/// Unique name of a component type. Empty means "absent".
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ComponentId(Arc<str>);

impl ComponentId {
	pub fn new(id: impl AsRef<str>) -> Self {
		Self(Arc::from(id.as_ref()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<&str> for ComponentId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

impl From<String> for ComponentId {
	fn from(id: String) -> Self {
		Self(Arc::from(id))
	}
}

impl Borrow<str> for ComponentId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ComponentId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl fmt::Debug for ComponentId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:?}", &*self.0)
	}
}

type PropertySetterFn = dyn Fn(&mut Instance, &str, Value, &[DispatchEntry]) + Send + Sync;

/// Per-instance property write path: `(instance, property, value, dispatch list)`.
#[derive(Clone)]
pub struct PropertySetter(Arc<PropertySetterFn>);

impl PropertySetter {
	pub fn new(f: impl Fn(&mut Instance, &str, Value, &[DispatchEntry]) + Send + Sync + 'static) -> Self {
		Self(Arc::new(f))
	}

	pub fn call(&self, instance: &mut Instance, property: &str, value: Value, entries: &[DispatchEntry]) {
		(self.0)(instance, property, value, entries)
	}
}

impl fmt::Debug for PropertySetter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "PropertySetter({:p})", Arc::as_ptr(&self.0))
	}
}

/// The finalized, mutable composition of a component type.
#[derive(Debug)]
pub struct ComponentDefinition {
	id: ComponentId,
	/// Composition order; later entries take precedence.
	pub behaviors: Vec<Behavior>,
	pub members: Members,
	pub dispatch: DispatchTable,
	/// Properties declared by the component itself.
	pub own_properties: IndexMap<Box<str>, PropertyDecl>,
	/// Aggregated property info across behaviors and own declarations.
	pub properties: IndexMap<Box<str>, PropertyDecl>,
	pub listeners: IndexMap<Box<str>, Box<str>>,
	pub host_attributes: IndexMap<Box<str>, serde_json::Value>,
	pub property_setter: PropertySetter,
}

impl ComponentDefinition {
	pub fn new(id: impl Into<ComponentId>, property_setter: PropertySetter) -> Self {
		Self {
			id: id.into(),
			behaviors: Vec::new(),
			members: Members::new(),
			dispatch: DispatchTable::new(),
			own_properties: IndexMap::new(),
			properties: IndexMap::new(),
			listeners: IndexMap::new(),
			host_attributes: IndexMap::new(),
			property_setter,
		}
	}

	pub fn id(&self) -> &ComponentId {
		&self.id
	}

	pub fn behavior_names(&self) -> Vec<&str> {
		self.behaviors.iter().map(|b| b.name()).collect()
	}
}

/// Shared handle to a definition. Identity is preserved across in-place mutation.
#[derive(Clone)]
pub struct DefinitionRef(Arc<RwLock<ComponentDefinition>>);

impl DefinitionRef {
	pub fn new(def: ComponentDefinition) -> Self {
		Self(Arc::new(RwLock::new(def)))
	}

	pub fn read(&self) -> RwLockReadGuard<'_, ComponentDefinition> {
		self.0.read()
	}

	pub fn write(&self) -> RwLockWriteGuard<'_, ComponentDefinition> {
		self.0.write()
	}

	pub fn id(&self) -> ComponentId {
		self.0.read().id.clone()
	}

	#[inline]
	pub fn ptr_eq(&self, other: &DefinitionRef) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl fmt::Debug for DefinitionRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.0.try_read() {
			Some(def) => f.debug_tuple("DefinitionRef").field(&def.id).finish(),
			None => f.write_str("DefinitionRef(<locked>)"),
		}
	}
}
