use std::path::PathBuf;

/// Errors from the ambient surfaces of the reflection layer.
///
/// Reflection and injection themselves never fail; they degrade to no-ops or
/// deferral instead.
#[derive(Debug, thiserror::Error)]
pub enum ReflectError {
	#[error("failed to read config {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid reflection config: {0}")]
	Parse(#[from] toml::de::Error),

	#[error("a global reflector is already installed")]
	GlobalInstalled,
}
