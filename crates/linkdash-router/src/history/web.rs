//! History backend over `window.history` and `window.location`.

use super::{HistoryBackend, HistoryEvent, ListenerId, LocationListener};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::Event;

type DomListener = Closure<dyn FnMut(Event)>;

// Closures are not `Send`; they live on the (only) browser thread.
thread_local! {
	static LISTENERS: RefCell<HashMap<ListenerId, (HistoryEvent, DomListener)>> =
		RefCell::new(HashMap::new());
	static NEXT_ID: Cell<ListenerId> = const { Cell::new(1) };
}

/// History backend for the browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserHistory;

impl BrowserHistory {
	/// Creates the backend.
	pub fn new() -> Self {
		Self
	}

	fn window() -> Result<web_sys::Window, String> {
		web_sys::window().ok_or_else(|| "no window available".to_string())
	}

	fn history() -> Result<web_sys::History, String> {
		Self::window()?.history().map_err(js_message)
	}
}

fn js_message(value: JsValue) -> String {
	value
		.as_string()
		.unwrap_or_else(|| format!("{:?}", value))
}

impl HistoryBackend for BrowserHistory {
	fn location(&self) -> String {
		let Ok(window) = Self::window() else {
			return "/".to_string();
		};
		let location = window.location();
		let pathname = location.pathname().unwrap_or_else(|_| "/".to_string());
		let search = location.search().unwrap_or_default();
		format!("{pathname}{search}")
	}

	fn hash(&self) -> String {
		Self::window()
			.ok()
			.and_then(|w| w.location().hash().ok())
			.unwrap_or_default()
	}

	fn push_state(&self, url: &str) -> Result<(), String> {
		Self::history()?
			.push_state_with_url(&JsValue::NULL, "", Some(url))
			.map_err(js_message)
	}

	fn replace_state(&self, url: &str) -> Result<(), String> {
		Self::history()?
			.replace_state_with_url(&JsValue::NULL, "", Some(url))
			.map_err(js_message)
	}

	fn set_hash(&self, hash: &str) -> Result<(), String> {
		Self::window()?.location().set_hash(hash).map_err(js_message)
	}

	fn replace_hash(&self, hash: &str) -> Result<(), String> {
		Self::window()?
			.location()
			.replace(&format!("#{}", hash.trim_start_matches('#')))
			.map_err(js_message)
	}

	fn go(&self, delta: i32) {
		let result = Self::history().and_then(|h| h.go_with_delta(delta).map_err(js_message));
		if let Err(err) = result {
			tracing::warn!(delta, error = %err, "history traversal failed");
		}
	}

	fn listen(&self, event: HistoryEvent, listener: LocationListener) -> ListenerId {
		let id = NEXT_ID.with(|next| {
			let id = next.get();
			next.set(id + 1);
			id
		});

		let closure = Closure::<dyn FnMut(Event)>::new(move |_event: Event| listener());

		match Self::window() {
			Ok(window) => {
				if let Err(err) = window.add_event_listener_with_callback(
					event.event_name(),
					closure.as_ref().unchecked_ref(),
				) {
					tracing::warn!(event = event.event_name(), error = %js_message(err), "failed to attach listener");
				}
			}
			Err(err) => tracing::warn!(event = event.event_name(), error = %err, "failed to attach listener"),
		}

		LISTENERS.with(|listeners| listeners.borrow_mut().insert(id, (event, closure)));
		id
	}

	fn unlisten(&self, id: ListenerId) {
		let Some((event, closure)) = LISTENERS.with(|listeners| listeners.borrow_mut().remove(&id)) else {
			return;
		};
		if let Ok(window) = Self::window() {
			if let Err(err) = window.remove_event_listener_with_callback(
				event.event_name(),
				closure.as_ref().unchecked_ref(),
			) {
				tracing::warn!(event = event.event_name(), error = %js_message(err), "failed to detach listener");
			}
		}
	}
}
