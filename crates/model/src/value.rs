//! Identity-compared payloads.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Shared member or property payload.
///
/// Two values are the same only when they point at the same allocation. Cloning
/// a `Value` keeps its identity; wrapping an equal-looking payload twice does not.
#[derive(Clone)]
pub struct Value(Arc<dyn Any + Send + Sync>);

impl Value {
	pub fn new<T: Any + Send + Sync>(payload: T) -> Self {
		Self(Arc::new(payload))
	}

	/// Returns the payload if it has type `T`.
	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.0.downcast_ref::<T>()
	}

	/// Identity comparison.
	#[inline]
	pub fn same(&self, other: &Value) -> bool {
		std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
	}
}

impl fmt::Debug for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Value({:p})", Arc::as_ptr(&self.0))
	}
}
