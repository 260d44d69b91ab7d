//! Behavior modules: reusable member bundles composed into definitions.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::descriptor::{MemberDescriptor, Members};
use crate::dispatch::{DispatchEntry, EffectContext, EffectKind};
use crate::value::Value;

/// Shared handle to a behavior module. List membership uses pointer identity.
pub type Behavior = Arc<BehaviorModule>;

/// Member names composed by the host's own rules rather than by member remixing.
pub const LIFECYCLE_MEMBERS: &[&str] = &[
	"hostAttributes",
	"registered",
	"properties",
	"observers",
	"listeners",
	"created",
	"attached",
	"detached",
	"attributeChanged",
	"configure",
	"ready",
];

#[inline]
pub fn is_lifecycle_member(name: &str) -> bool {
	LIFECYCLE_MEMBERS.contains(&name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
	#[default]
	String,
	Number,
	Boolean,
	Object,
	Array,
	Date,
}

/// Declared metadata for one property.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PropertyDecl {
	#[serde(rename = "type")]
	pub kind: PropertyType,
	pub value: Option<serde_json::Value>,
	pub reflect_to_attribute: bool,
	pub notify: bool,
	pub read_only: bool,
}

impl PropertyDecl {
	pub fn of(kind: PropertyType) -> Self {
		Self { kind, ..Self::default() }
	}

	/// Overlays `other` onto `self`; set flags and present defaults win.
	pub fn merge(&mut self, other: &PropertyDecl) {
		self.kind = other.kind;
		if other.value.is_some() {
			self.value = other.value.clone();
		}
		self.reflect_to_attribute |= other.reflect_to_attribute;
		self.notify |= other.notify;
		self.read_only |= other.read_only;
	}
}

/// A dispatch entry declared for a property.
#[derive(Debug, Clone)]
pub struct PropertyEffect {
	pub property: Box<str>,
	pub entry: DispatchEntry,
}

/// A named bundle of members. Read by the engine, never written.
#[derive(Debug, Default)]
pub struct BehaviorModule {
	name: Box<str>,
	members: Members,
	properties: IndexMap<Box<str>, PropertyDecl>,
	effects: Vec<PropertyEffect>,
	listeners: IndexMap<Box<str>, Box<str>>,
	host_attributes: IndexMap<Box<str>, serde_json::Value>,
}

impl BehaviorModule {
	pub fn builder(name: impl Into<Box<str>>) -> BehaviorBuilder {
		BehaviorBuilder {
			module: BehaviorModule {
				name: name.into(),
				..Self::default()
			},
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn members(&self) -> &Members {
		&self.members
	}

	pub fn member(&self, name: &str) -> Option<&MemberDescriptor> {
		self.members.get(name)
	}

	pub fn properties(&self) -> &IndexMap<Box<str>, PropertyDecl> {
		&self.properties
	}

	pub fn effects(&self) -> &[PropertyEffect] {
		&self.effects
	}

	pub fn listeners(&self) -> &IndexMap<Box<str>, Box<str>> {
		&self.listeners
	}

	pub fn host_attributes(&self) -> &IndexMap<Box<str>, serde_json::Value> {
		&self.host_attributes
	}
}

pub struct BehaviorBuilder {
	module: BehaviorModule,
}

impl BehaviorBuilder {
	pub fn member(mut self, name: impl Into<Box<str>>, desc: MemberDescriptor) -> Self {
		self.module.members.insert(name.into(), desc);
		self
	}

	/// Adds a plain data member.
	pub fn method(self, name: impl Into<Box<str>>, value: Value) -> Self {
		self.member(name, MemberDescriptor::data(value))
	}

	pub fn property(mut self, name: impl Into<Box<str>>, decl: PropertyDecl) -> Self {
		self.module.properties.insert(name.into(), decl);
		self
	}

	pub fn effect(mut self, property: impl Into<Box<str>>, entry: DispatchEntry) -> Self {
		self.module.effects.push(PropertyEffect {
			property: property.into(),
			entry,
		});
		self
	}

	/// Declares an observer on `property`.
	pub fn observe(self, property: &str, label: &str, f: impl Fn(&EffectContext<'_>) + Send + Sync + 'static) -> Self {
		self.effect(property, DispatchEntry::new(EffectKind::Observer, label, f))
	}

	pub fn listener(mut self, event: impl Into<Box<str>>, handler: impl Into<Box<str>>) -> Self {
		self.module.listeners.insert(event.into(), handler.into());
		self
	}

	pub fn host_attribute(mut self, attribute: impl Into<Box<str>>, value: serde_json::Value) -> Self {
		self.module.host_attributes.insert(attribute.into(), value);
		self
	}

	pub fn build_module(self) -> BehaviorModule {
		self.module
	}

	pub fn build(self) -> Behavior {
		Arc::new(self.module)
	}
}
