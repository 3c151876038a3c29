//! Route definitions.

use crate::error::PatternError;
use crate::guard::RouteGuard;
use crate::handler::RouteHandler;
use crate::pattern::RoutePattern;
use std::collections::HashMap;
use std::sync::Arc;

/// A single route definition.
///
/// The template is compiled once, when the route is built. Children are
/// matched against whatever part of the path is left after this route's
/// template, so a child template is written relative to its parent.
#[derive(Clone)]
pub struct Route {
	/// Compiled template.
	pattern: RoutePattern,
	/// Optional route name for reverse lookups.
	name: Option<String>,
	/// Free-form metadata, e.g. a page title.
	meta: HashMap<String, serde_json::Value>,
	/// The route handler.
	handler: Arc<dyn RouteHandler>,
	/// Route-specific guards, run after the global guards.
	guards: Vec<Arc<dyn RouteGuard>>,
	/// Nested routes, in priority order.
	children: Vec<Arc<Route>>,
}

impl std::fmt::Debug for Route {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Route")
			.field("pattern", &self.pattern)
			.field("name", &self.name)
			.field("meta", &self.meta)
			.field("guards", &self.guards.len())
			.field("children", &self.children)
			.finish()
	}
}

impl Route {
	/// Creates a new route.
	///
	/// # Panics
	///
	/// Panics if the template is invalid. Use [`Route::try_new`] for
	/// fallible construction.
	pub fn new<H>(path: &str, handler: H) -> Self
	where
		H: RouteHandler + 'static,
	{
		Self::with_handler(path, Arc::new(handler))
	}

	/// Creates a named route.
	///
	/// # Panics
	///
	/// Panics if the template is invalid.
	pub fn named<H>(name: impl Into<String>, path: &str, handler: H) -> Self
	where
		H: RouteHandler + 'static,
	{
		Self::new(path, handler).with_name(name)
	}

	/// Creates a route from an already shared handler.
	///
	/// # Panics
	///
	/// Panics if the template is invalid.
	pub fn with_handler(path: &str, handler: Arc<dyn RouteHandler>) -> Self {
		Self::try_with_handler(path, handler)
			.unwrap_or_else(|e| panic!("Invalid route template '{}': {}", path, e))
	}

	/// Creates a new route, returning an error for an invalid template.
	pub fn try_new<H>(path: &str, handler: H) -> Result<Self, PatternError>
	where
		H: RouteHandler + 'static,
	{
		Self::try_with_handler(path, Arc::new(handler))
	}

	fn try_with_handler(path: &str, handler: Arc<dyn RouteHandler>) -> Result<Self, PatternError> {
		Ok(Self {
			pattern: RoutePattern::compile(path)?,
			name: None,
			meta: HashMap::new(),
			handler,
			guards: Vec::new(),
			children: Vec::new(),
		})
	}

	/// Sets the route name.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Adds a metadata entry.
	pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
		self.meta.insert(key.into(), value.into());
		self
	}

	/// Appends a route-specific guard.
	pub fn with_guard<G>(mut self, guard: G) -> Self
	where
		G: RouteGuard + 'static,
	{
		self.guards.push(Arc::new(guard));
		self
	}

	/// Appends an already shared guard.
	pub fn with_shared_guard(mut self, guard: Arc<dyn RouteGuard>) -> Self {
		self.guards.push(guard);
		self
	}

	/// Appends a child route.
	pub fn with_child(mut self, child: Route) -> Self {
		self.children.push(Arc::new(child));
		self
	}

	/// Appends several child routes, keeping their order.
	pub fn with_children<I>(mut self, children: I) -> Self
	where
		I: IntoIterator<Item = Route>,
	{
		self.children.extend(children.into_iter().map(Arc::new));
		self
	}

	/// Returns the template string.
	pub fn path(&self) -> &str {
		self.pattern.template()
	}

	/// Returns the compiled template.
	pub fn pattern(&self) -> &RoutePattern {
		&self.pattern
	}

	/// Returns the route name.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// Returns a metadata value.
	pub fn meta(&self, key: &str) -> Option<&serde_json::Value> {
		self.meta.get(key)
	}

	/// Returns all metadata.
	pub fn meta_map(&self) -> &HashMap<String, serde_json::Value> {
		&self.meta
	}

	/// Returns the route-specific guards.
	pub fn guards(&self) -> &[Arc<dyn RouteGuard>] {
		&self.guards
	}

	/// Returns the child routes.
	pub fn children(&self) -> &[Arc<Route>] {
		&self.children
	}

	/// Returns the handler.
	pub fn handler(&self) -> &Arc<dyn RouteHandler> {
		&self.handler
	}
}
