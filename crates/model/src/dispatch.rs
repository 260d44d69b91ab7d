//! Per-property dispatch entries.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::value::Value;

/// Property name to its ordered responders.
pub type DispatchTable = IndexMap<Box<str>, Vec<DispatchEntry>>;

/// Category of a dispatch entry. The host orders entries by [`EffectKind::rank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
	Compute,
	Annotation,
	AnnotatedComputation,
	Reflect,
	Notify,
	Observer,
	ComplexObserver,
	Function,
}

impl EffectKind {
	/// Ordering key; lower runs first.
	pub const fn rank(self) -> u8 {
		match self {
			Self::Compute => 0,
			Self::Annotation => 1,
			Self::AnnotatedComputation => 2,
			Self::Reflect => 3,
			Self::Notify => 4,
			Self::Observer => 5,
			Self::ComplexObserver => 6,
			Self::Function => 7,
		}
	}
}

/// Arguments handed to a firing dispatch entry.
#[derive(Debug)]
pub struct EffectContext<'a> {
	pub property: &'a str,
	pub value: &'a Value,
	pub old: Option<&'a Value>,
}

type EffectFn = dyn Fn(&EffectContext<'_>) + Send + Sync;

/// One responder registered for a property.
#[derive(Clone)]
pub struct DispatchEntry {
	pub kind: EffectKind,
	pub label: Box<str>,
	effect: Arc<EffectFn>,
}

impl DispatchEntry {
	pub fn new(kind: EffectKind, label: impl Into<Box<str>>, effect: impl Fn(&EffectContext<'_>) + Send + Sync + 'static) -> Self {
		Self {
			kind,
			label: label.into(),
			effect: Arc::new(effect),
		}
	}

	#[inline]
	pub fn fire(&self, ctx: &EffectContext<'_>) {
		(self.effect)(ctx)
	}
}

impl fmt::Debug for DispatchEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DispatchEntry")
			.field("kind", &self.kind)
			.field("label", &self.label)
			.finish()
	}
}
