//! Data model for component composition: definitions, behavior modules,
//! member descriptors, dispatch entries and instances.

/// Behavior modules and declared property metadata.
pub mod behavior;
/// Component definitions, identifiers and shared handles.
pub mod definition;
/// Member descriptors and descriptor equality.
pub mod descriptor;
/// Per-property dispatch entries.
pub mod dispatch;
/// Component instances.
pub mod instance;
/// Identity-compared payloads.
pub mod value;

pub use behavior::{
	Behavior, BehaviorBuilder, BehaviorModule, LIFECYCLE_MEMBERS, PropertyDecl, PropertyEffect, PropertyType,
	is_lifecycle_member,
};
pub use definition::{ComponentDefinition, ComponentId, DefinitionRef, PropertySetter};
pub use descriptor::{Getter, MemberDescriptor, MemberValue, Members, Setter, copy_own_member, descriptors_equal};
pub use dispatch::{DispatchEntry, DispatchTable, EffectContext, EffectKind};
pub use instance::Instance;
pub use value::Value;
