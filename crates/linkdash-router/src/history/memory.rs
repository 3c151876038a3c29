//! In-memory history stack.

use super::{HistoryBackend, HistoryEvent, ListenerId, LocationListener};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug)]
struct Stack {
	entries: Vec<String>,
	index: usize,
}

impl Stack {
	fn current(&self) -> &str {
		self.entries.get(self.index).map_or("/", String::as_str)
	}

	fn push(&mut self, url: String) {
		self.entries.truncate(self.index + 1);
		self.entries.push(url);
		self.index = self.entries.len() - 1;
	}

	fn replace(&mut self, url: String) {
		if let Some(entry) = self.entries.get_mut(self.index) {
			*entry = url;
		}
	}
}

/// History backend that keeps entries in memory.
///
/// Behaves like the browser for the parts the router relies on:
/// `push_state`/`replace_state` fire no events, assigning a different
/// fragment fires `hashchange`, and traversal with [`go`](HistoryBackend::go)
/// fires `popstate` (plus `hashchange` when only the fragment differs).
pub struct MemoryHistory {
	stack: Mutex<Stack>,
	listeners: Mutex<Vec<(ListenerId, HistoryEvent, LocationListener)>>,
	next_id: AtomicU64,
}

impl std::fmt::Debug for MemoryHistory {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MemoryHistory")
			.field("stack", &*self.stack.lock())
			.field("listeners", &self.listeners.lock().len())
			.finish()
	}
}

impl Default for MemoryHistory {
	fn default() -> Self {
		Self::new("/")
	}
}

impl MemoryHistory {
	/// Creates a history whose only entry is `initial_url`.
	pub fn new(initial_url: impl Into<String>) -> Self {
		Self {
			stack: Mutex::new(Stack {
				entries: vec![initial_url.into()],
				index: 0,
			}),
			listeners: Mutex::new(Vec::new()),
			next_id: AtomicU64::new(1),
		}
	}

	/// Returns every entry, oldest first.
	pub fn entries(&self) -> Vec<String> {
		self.stack.lock().entries.clone()
	}

	/// Returns the index of the current entry.
	pub fn index(&self) -> usize {
		self.stack.lock().index
	}

	/// Returns the full URL of the current entry.
	pub fn current_url(&self) -> String {
		self.stack.lock().current().to_string()
	}

	/// Returns the number of registered listeners.
	pub fn listener_count(&self) -> usize {
		self.listeners.lock().len()
	}

	fn emit(&self, event: HistoryEvent) {
		// Collected first so listeners may call back into this backend.
		let targets: Vec<LocationListener> = self
			.listeners
			.lock()
			.iter()
			.filter(|(_, e, _)| *e == event)
			.map(|(_, _, l)| l.clone())
			.collect();
		for listener in targets {
			listener();
		}
	}
}

fn split_fragment(url: &str) -> (&str, &str) {
	match url.find('#') {
		Some(index) => url.split_at(index),
		None => (url, ""),
	}
}

impl HistoryBackend for MemoryHistory {
	fn location(&self) -> String {
		let stack = self.stack.lock();
		split_fragment(stack.current()).0.to_string()
	}

	fn hash(&self) -> String {
		let stack = self.stack.lock();
		split_fragment(stack.current()).1.to_string()
	}

	fn push_state(&self, url: &str) -> Result<(), String> {
		self.stack.lock().push(url.to_string());
		Ok(())
	}

	fn replace_state(&self, url: &str) -> Result<(), String> {
		self.stack.lock().replace(url.to_string());
		Ok(())
	}

	fn set_hash(&self, hash: &str) -> Result<(), String> {
		let changed = {
			let mut stack = self.stack.lock();
			let (base, current) = split_fragment(stack.current());
			let fragment = format!("#{}", hash.trim_start_matches('#'));
			if current == fragment {
				false
			} else {
				let url = format!("{base}{fragment}");
				stack.push(url);
				true
			}
		};
		if changed {
			self.emit(HistoryEvent::HashChange);
		}
		Ok(())
	}

	fn replace_hash(&self, hash: &str) -> Result<(), String> {
		let mut stack = self.stack.lock();
		let base = split_fragment(stack.current()).0.to_string();
		stack.replace(format!("{base}#{}", hash.trim_start_matches('#')));
		Ok(())
	}

	fn go(&self, delta: i32) {
		let moved = {
			let mut stack = self.stack.lock();
			let target = stack.index as i64 + i64::from(delta);
			if delta == 0 || target < 0 || target >= stack.entries.len() as i64 {
				None
			} else {
				let before = split_fragment(stack.current()).0.to_string();
				stack.index = target as usize;
				Some(before == split_fragment(stack.current()).0)
			}
		};
		if let Some(same_document) = moved {
			self.emit(HistoryEvent::PopState);
			if same_document {
				self.emit(HistoryEvent::HashChange);
			}
		}
	}

	fn listen(&self, event: HistoryEvent, listener: LocationListener) -> ListenerId {
		let id = self.next_id.fetch_add(1, Ordering::Relaxed);
		self.listeners.lock().push((id, event, listener));
		id
	}

	fn unlisten(&self, id: ListenerId) {
		self.listeners.lock().retain(|(existing, _, _)| *existing != id);
	}
}
