//! Member descriptors and the descriptor comparator.
//!
//! A descriptor carries a member's value (or accessor pair) together with its
//! mutability and visibility flags. The remix pass relies on [`descriptors_equal`]
//! to recognize a definition member that was inherited unchanged from a behavior.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::instance::Instance;
use crate::value::Value;

/// Own members of a definition or behavior, in declaration order.
pub type Members = IndexMap<Box<str>, MemberDescriptor>;

type GetterFn = dyn Fn(&Instance) -> Option<Value> + Send + Sync;
type SetterFn = dyn Fn(&mut Instance, Value) + Send + Sync;

/// Accessor read half, compared by identity.
#[derive(Clone)]
pub struct Getter(Arc<GetterFn>);

impl Getter {
	pub fn new(f: impl Fn(&Instance) -> Option<Value> + Send + Sync + 'static) -> Self {
		Self(Arc::new(f))
	}

	pub fn call(&self, instance: &Instance) -> Option<Value> {
		(self.0)(instance)
	}

	#[inline]
	pub fn same(&self, other: &Getter) -> bool {
		std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
	}
}

/// Accessor write half, compared by identity.
#[derive(Clone)]
pub struct Setter(Arc<SetterFn>);

impl Setter {
	pub fn new(f: impl Fn(&mut Instance, Value) + Send + Sync + 'static) -> Self {
		Self(Arc::new(f))
	}

	pub fn call(&self, instance: &mut Instance, value: Value) {
		(self.0)(instance, value)
	}

	#[inline]
	pub fn same(&self, other: &Setter) -> bool {
		std::ptr::addr_eq(Arc::as_ptr(&self.0), Arc::as_ptr(&other.0))
	}
}

impl fmt::Debug for Getter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Getter({:p})", Arc::as_ptr(&self.0))
	}
}

impl fmt::Debug for Setter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Setter({:p})", Arc::as_ptr(&self.0))
	}
}

#[derive(Debug, Clone)]
pub enum MemberValue {
	Data(Value),
	Accessor {
		get: Option<Getter>,
		set: Option<Setter>,
	},
}

/// Shape of a single own member.
///
/// `None` flags mean "unspecified", which the remix pass treats like `Some(true)`
/// for `configurable`.
#[derive(Debug, Clone)]
pub struct MemberDescriptor {
	pub value: MemberValue,
	pub configurable: Option<bool>,
	pub enumerable: Option<bool>,
	pub writable: Option<bool>,
}

impl MemberDescriptor {
	/// A plain, fully mutable data member.
	pub fn data(value: Value) -> Self {
		Self {
			value: MemberValue::Data(value),
			configurable: Some(true),
			enumerable: Some(true),
			writable: Some(true),
		}
	}

	/// An accessor member. Accessors have no `writable` flag.
	pub fn accessor(get: Option<Getter>, set: Option<Setter>) -> Self {
		Self {
			value: MemberValue::Accessor { get, set },
			configurable: Some(true),
			enumerable: Some(true),
			writable: None,
		}
	}

	/// Marks the member as neither configurable nor writable.
	pub fn sealed(mut self) -> Self {
		self.configurable = Some(false);
		if matches!(self.value, MemberValue::Data(_)) {
			self.writable = Some(false);
		}
		self
	}

	pub fn hidden(mut self) -> Self {
		self.enumerable = Some(false);
		self
	}

	/// Whether the member may be replaced or redefined.
	#[inline]
	pub fn is_replaceable(&self) -> bool {
		self.configurable != Some(false)
	}

	pub fn data_value(&self) -> Option<&Value> {
		match &self.value {
			MemberValue::Data(v) => Some(v),
			MemberValue::Accessor { .. } => None,
		}
	}

	pub fn setter(&self) -> Option<&Setter> {
		match &self.value {
			MemberValue::Accessor { set, .. } => set.as_ref(),
			MemberValue::Data(_) => None,
		}
	}

	pub fn getter(&self) -> Option<&Getter> {
		match &self.value {
			MemberValue::Accessor { get, .. } => get.as_ref(),
			MemberValue::Data(_) => None,
		}
	}
}

/// Structural descriptor equality: value identity, accessor identity, and equal
/// mutability and visibility flags.
pub fn descriptors_equal(a: &MemberDescriptor, b: &MemberDescriptor) -> bool {
	let values = match (&a.value, &b.value) {
		(MemberValue::Data(x), MemberValue::Data(y)) => x.same(y),
		(MemberValue::Accessor { get: ga, set: sa }, MemberValue::Accessor { get: gb, set: sb }) => {
			same_opt(ga.as_ref(), gb.as_ref(), Getter::same) && same_opt(sa.as_ref(), sb.as_ref(), Setter::same)
		}
		_ => false,
	};
	values && a.configurable == b.configurable && a.enumerable == b.enumerable && a.writable == b.writable
}

fn same_opt<T>(a: Option<&T>, b: Option<&T>, eq: impl Fn(&T, &T) -> bool) -> bool {
	match (a, b) {
		(Some(a), Some(b)) => eq(a, b),
		(None, None) => true,
		_ => false,
	}
}

/// Copies the own member `name` from `source` onto `target`, keeping its
/// descriptor shape. Returns `false` when `source` has no such member.
pub fn copy_own_member(target: &mut Members, source: &Members, name: &str) -> bool {
	let Some(desc) = source.get(name) else {
		return false;
	};
	target.insert(Box::from(name), desc.clone());
	true
}
