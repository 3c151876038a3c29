//! Router configuration.

use crate::guard::RouteGuard;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How the current route is reflected in the URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouterMode {
	/// `pushState`/`replaceState`, listening for `popstate`.
	#[default]
	History,
	/// `location.hash`, listening for `hashchange`.
	Hash,
}

fn default_fallback() -> String {
	"/404".to_string()
}

fn default_max_redirects() -> usize {
	16
}

/// Router settings, fixed for the router's lifetime.
///
/// Everything except `guards` can be deserialized, so the settings can live
/// in the application's config file:
///
/// ```toml
/// mode = "hash"
/// base = ""
/// fallback = "/404"
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct RouterConfig {
	/// URL strategy.
	#[serde(default)]
	pub mode: RouterMode,
	/// Path prefix the application is served under (history mode only).
	#[serde(default)]
	pub base: String,
	/// Path navigated to when nothing matches. Must itself be routable.
	#[serde(default = "default_fallback")]
	pub fallback: String,
	/// Upper bound on consecutive guard redirects within one navigation.
	#[serde(default = "default_max_redirects")]
	pub max_redirects: usize,
	/// Global guards, run before route-specific ones.
	#[serde(skip)]
	pub guards: Vec<Arc<dyn RouteGuard>>,
}

impl std::fmt::Debug for RouterConfig {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouterConfig")
			.field("mode", &self.mode)
			.field("base", &self.base)
			.field("fallback", &self.fallback)
			.field("max_redirects", &self.max_redirects)
			.field("guards", &self.guards.len())
			.finish()
	}
}

impl Default for RouterConfig {
	fn default() -> Self {
		Self {
			mode: RouterMode::default(),
			base: String::new(),
			fallback: default_fallback(),
			max_redirects: default_max_redirects(),
			guards: Vec::new(),
		}
	}
}

impl RouterConfig {
	/// Sets the URL strategy.
	pub fn with_mode(mut self, mode: RouterMode) -> Self {
		self.mode = mode;
		self
	}

	/// Sets the base path.
	pub fn with_base(mut self, base: impl Into<String>) -> Self {
		self.base = base.into();
		self
	}

	/// Sets the fallback path.
	pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
		self.fallback = fallback.into();
		self
	}

	/// Sets the redirect bound.
	pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
		self.max_redirects = max_redirects;
		self
	}

	/// Appends a global guard.
	pub fn with_guard<G>(mut self, guard: G) -> Self
	where
		G: RouteGuard + 'static,
	{
		self.guards.push(Arc::new(guard));
		self
	}

	/// Appends an already shared global guard.
	pub fn with_shared_guard(mut self, guard: Arc<dyn RouteGuard>) -> Self {
		self.guards.push(guard);
		self
	}

	/// Base path without trailing slashes; empty for the root.
	pub(crate) fn normalized_base(&self) -> &str {
		self.base.trim_end_matches('/')
	}
}
