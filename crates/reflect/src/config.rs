//! Reflection layer configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ReflectError;

/// Default queue length at which a never-registering component gets reported.
fn default_pending_warn_threshold() -> usize {
	64
}

/// Tunables for a [`Reflector`](crate::Reflector).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReflectConfig {
	/// Re-run remixing, behavior preparation and dispatch regeneration for
	/// injections into components that already registered.
	pub replay_effects: bool,
	/// Wrap each registered definition's property setter so instances pick up
	/// the current dispatch list on their first write of each property.
	pub patch_setters: bool,
	/// Pending callbacks for a single component at which a warning is logged.
	#[serde(default = "default_pending_warn_threshold")]
	pub pending_warn_threshold: usize,
}

impl Default for ReflectConfig {
	fn default() -> Self {
		Self {
			replay_effects: true,
			patch_setters: true,
			pending_warn_threshold: default_pending_warn_threshold(),
		}
	}
}

impl ReflectConfig {
	pub fn from_toml_str(text: &str) -> Result<Self, ReflectError> {
		Ok(toml::from_str(text)?)
	}

	pub fn load(path: &Path) -> Result<Self, ReflectError> {
		let text = std::fs::read_to_string(path).map_err(|source| ReflectError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&text)
	}
}
