//! Single-slot cell for a navigation requested while another is resolving.

use parking_lot::Mutex;

/// Holds at most one superseding navigation request.
///
/// A new request overwrites the previous one, so a burst of requests made
/// while the router is busy collapses to the last of the burst.
#[derive(Debug, Default)]
pub struct PendingNavigation {
	slot: Mutex<Option<String>>,
}

impl PendingNavigation {
	/// Creates an empty cell.
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores `path`, returning the request it superseded.
	pub fn replace(&self, path: impl Into<String>) -> Option<String> {
		self.slot.lock().replace(path.into())
	}

	/// Removes and returns the stored request.
	pub fn take(&self) -> Option<String> {
		self.slot.lock().take()
	}

	/// Returns a copy of the stored request.
	pub fn peek(&self) -> Option<String> {
		self.slot.lock().clone()
	}

	/// Drops any stored request.
	pub fn clear(&self) {
		self.slot.lock().take();
	}

	/// Returns `true` if nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.slot.lock().is_none()
	}
}
