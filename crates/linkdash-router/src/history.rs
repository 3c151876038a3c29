//! Browser history integration.
//!
//! The router never touches `window.history` directly; it goes through a
//! [`HistoryBackend`]. [`MemoryHistory`] keeps an in-process entry stack
//! for native hosts and tests, and [`BrowserHistory`] (wasm32 only) drives
//! the real History and Location APIs.

mod memory;
#[cfg(target_arch = "wasm32")]
mod web;

pub use memory::MemoryHistory;
#[cfg(target_arch = "wasm32")]
pub use web::BrowserHistory;

use std::sync::Arc;

/// Identifier returned by [`HistoryBackend::listen`].
pub type ListenerId = u64;

/// Callback invoked when the location changes outside the router.
pub type LocationListener = Arc<dyn Fn() + Send + Sync>;

/// Location change events a backend can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryEvent {
	/// Back/forward traversal (`popstate`).
	PopState,
	/// Fragment change (`hashchange`).
	HashChange,
}

impl HistoryEvent {
	/// DOM event name.
	pub fn event_name(self) -> &'static str {
		match self {
			Self::PopState => "popstate",
			Self::HashChange => "hashchange",
		}
	}
}

/// Access to the history stack and the current location.
pub trait HistoryBackend: Send + Sync {
	/// Returns `pathname + search` of the current location.
	fn location(&self) -> String;

	/// Returns the current fragment including its leading `#`, or `""`.
	fn hash(&self) -> String;

	/// Pushes a new entry for `url`.
	///
	/// # Errors
	///
	/// Returns a message if the backend refuses the update.
	fn push_state(&self, url: &str) -> Result<(), String>;

	/// Replaces the current entry with `url`.
	///
	/// # Errors
	///
	/// Returns a message if the backend refuses the update.
	fn replace_state(&self, url: &str) -> Result<(), String>;

	/// Assigns the fragment, creating a new entry.
	///
	/// # Errors
	///
	/// Returns a message if the backend refuses the update.
	fn set_hash(&self, hash: &str) -> Result<(), String>;

	/// Replaces the current entry with the same document at a new fragment.
	///
	/// # Errors
	///
	/// Returns a message if the backend refuses the update.
	fn replace_hash(&self, hash: &str) -> Result<(), String>;

	/// Moves `delta` entries through the stack.
	fn go(&self, delta: i32);

	/// Registers `listener` for `event`.
	fn listen(&self, event: HistoryEvent, listener: LocationListener) -> ListenerId;

	/// Removes a listener. Unknown ids are ignored.
	fn unlisten(&self, id: ListenerId);
}
