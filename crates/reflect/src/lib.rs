//! Deferred component reflection and runtime behavior injection.
//!
//! Component types register with their host framework at unpredictable times.
//! This crate lets other code look up a component's finalized definition (or wait
//! for it) and splice additional behavior modules into its composition list,
//! before or after registration, while keeping merged members, dispatch lists,
//! accessors and property info consistent with the new composition.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`Reflector`] | The service: registry, pending callbacks, injection. |
//! | [`ReflectionRegistry`] | Identifier to definition; entries are permanent. |
//! | [`PendingQueue`] | Callbacks waiting for a component to register. |
//! | [`RegistrationHooks`] | Chainable once-per-type registration extension point. |
//! | [`HostFramework`] | Everything consumed from the component framework. |
//! | [`StandardHost`] | Reference host implementation. |
//! | [`InsertionOptions`] | Caller intent for where behaviors land. |
//!
//! # Failure model
//!
//! Reflection and injection never fail. An empty identifier is a no-op, bad
//! insertion options clamp to a valid index, and work against a component that
//! never registers stays queued for the life of the process.

pub mod config;
pub mod error;
pub mod hooks;
pub mod host;
pub mod inject;
pub mod pending;
mod reflector;
mod regen;
pub mod registry;
pub mod remix;

pub use config::ReflectConfig;
pub use error::ReflectError;
pub use hooks::{Next, RegistrationHook, RegistrationHooks};
pub use host::{Declaration, HostFramework, StandardHost, base_property_setter};
pub use inject::{InsertionOptions, resolve_insertion_index};
pub use pending::PendingQueue;
pub use reflector::{PendingCallback, ReflectOp, Reflection, Reflector, global, install_global};
pub use registry::ReflectionRegistry;
pub use remix::RemixOutcome;

#[cfg(test)]
mod tests;
