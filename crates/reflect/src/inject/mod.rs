//! Insertion of behavior modules into a component's composition list.
//!
//! # Insertion point
//!
//! [`resolve_insertion_index`] turns caller intent into one concrete index:
//!
//! 1. `before`: start at `len - 1` and lower the index to the earliest listed
//!    module found in the current list.
//! 2. `after`: start at the `before` result (or `0`) and raise the index to one
//!    past the latest listed module found.
//! 3. `index`: replaces the computed value verbatim.
//! 4. Anything unset or past the end lands at the end.
//!
//! A present list counts even when it is empty: `before: Some(vec![])` lands
//! before the last module and `after: Some(vec![])` lands at the start.

use std::sync::Arc;

use graft_model::Behavior;

/// Where injected behaviors land relative to the existing ones.
#[derive(Debug, Clone, Default)]
pub struct InsertionOptions {
	pub before: Option<Vec<Behavior>>,
	pub after: Option<Vec<Behavior>>,
	pub index: Option<usize>,
}

impl InsertionOptions {
	/// Append at the end.
	pub fn append() -> Self {
		Self::default()
	}

	pub fn before(behaviors: impl IntoIterator<Item = Behavior>) -> Self {
		Self {
			before: Some(behaviors.into_iter().collect()),
			..Self::default()
		}
	}

	pub fn after(behaviors: impl IntoIterator<Item = Behavior>) -> Self {
		Self {
			after: Some(behaviors.into_iter().collect()),
			..Self::default()
		}
	}

	pub fn at(index: usize) -> Self {
		Self {
			index: Some(index),
			..Self::default()
		}
	}
}

/// Resolves `options` against `current` to an index in `0..=current.len()`.
pub fn resolve_insertion_index(current: &[Behavior], options: &InsertionOptions) -> usize {
	let len = current.len();
	let position = |needle: &Behavior| current.iter().position(|b| Arc::ptr_eq(b, needle));
	let mut idx: Option<usize> = None;

	if let Some(before) = &options.before {
		let mut at = len.saturating_sub(1);
		for found in before.iter().filter_map(position) {
			if found < at {
				at = found;
			}
		}
		idx = Some(at);
	}

	if let Some(after) = &options.after {
		let mut at = idx.unwrap_or(0);
		for found in after.iter().filter_map(position) {
			if found >= at {
				at = found + 1;
			}
		}
		idx = Some(at);
	}

	if options.index.is_some() {
		idx = options.index;
	}

	match idx {
		Some(at) if at <= len => at,
		_ => len,
	}
}

/// Splices `behaviors` into `list` starting at `index`, keeping their order.
pub(crate) fn splice_at(list: &mut Vec<Behavior>, index: usize, behaviors: &[Behavior]) {
	let index = index.min(list.len());
	list.splice(index..index, behaviors.iter().cloned());
}
