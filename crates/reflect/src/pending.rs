//! Callbacks waiting for a component to register.
//!
//! Each identifier maps to its callbacks in enqueue order. The list is handed
//! out and forgotten exactly once, when the identifier registers. Callbacks for
//! an identifier that never registers stay queued for the life of the process.

use graft_model::ComponentId;
use parking_lot::Mutex;
use rustc_hash::FxHashMap as HashMap;

#[derive(Debug)]
pub struct PendingQueue<F> {
	queued: Mutex<HashMap<ComponentId, Vec<F>>>,
}

impl<F> Default for PendingQueue<F> {
	fn default() -> Self {
		Self {
			queued: Mutex::new(HashMap::default()),
		}
	}
}

impl<F> PendingQueue<F> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends `callback` for `id`, returning the queue length for `id`.
	pub fn enqueue(&self, id: &ComponentId, callback: F) -> usize {
		let mut queued = self.queued.lock();
		let list = queued.entry(id.clone()).or_default();
		list.push(callback);
		list.len()
	}

	/// Removes and returns every callback queued for `id`, in enqueue order.
	pub fn drain(&self, id: &str) -> Vec<F> {
		self.queued.lock().remove(id).unwrap_or_default()
	}

	pub fn pending_for(&self, id: &str) -> usize {
		self.queued.lock().get(id).map_or(0, Vec::len)
	}

	/// Identifiers with at least one queued callback, sorted.
	pub fn waiting(&self) -> Vec<ComponentId> {
		let mut ids: Vec<_> = self.queued.lock().keys().cloned().collect();
		ids.sort();
		ids
	}

	pub fn is_empty(&self) -> bool {
		self.queued.lock().is_empty()
	}
}
