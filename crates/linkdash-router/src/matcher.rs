//! Route matching.
//!
//! Routes are tried in registration order and the first match wins; there
//! is no specificity scoring. A route with children that does not match the
//! whole path is tried as a prefix, and its children are matched against
//! the rest of the path.

use crate::route::Route;
use std::collections::HashMap;
use std::sync::Arc;

/// A matched route with extracted parameters.
#[derive(Debug, Clone)]
pub struct MatchedRoute {
	/// The matched route (the innermost one for nested matches).
	pub route: Arc<Route>,
	/// Extracted path parameters, parent values first, child values on top.
	pub params: HashMap<String, String>,
	/// Path that was matched.
	pub path: String,
	/// Value captured by a `*` wildcard, if any.
	pub wildcard: Option<String>,
}

impl MatchedRoute {
	/// Creates a match result.
	pub fn new(
		route: Arc<Route>,
		params: HashMap<String, String>,
		path: impl Into<String>,
		wildcard: Option<String>,
	) -> Self {
		Self {
			route,
			params,
			path: path.into(),
			wildcard,
		}
	}

	/// Returns the matched route's name.
	pub fn name(&self) -> Option<&str> {
		self.route.name()
	}
}

/// Finds the first route matching `path`.
///
/// Returns `None` when nothing matches at any level; the caller decides
/// whether to fall back.
pub fn match_route(path: &str, routes: &[Arc<Route>]) -> Option<MatchedRoute> {
	for route in routes {
		if let Some(found) = route.pattern().matches(path) {
			return Some(MatchedRoute::new(
				Arc::clone(route),
				found.params,
				path,
				found.wildcard,
			));
		}

		if route.children().is_empty() {
			continue;
		}

		let Some((parent, rest)) = route.pattern().match_prefix(path) else {
			continue;
		};

		if let Some(child) = match_route(&rest, route.children()) {
			let mut params = parent.params;
			params.extend(child.params);
			return Some(MatchedRoute::new(child.route, params, path, child.wildcard));
		}
	}

	None
}

/// Finds a route by name anywhere in the tree.
pub(crate) fn find_named<'a>(name: &str, routes: &'a [Arc<Route>]) -> Option<(&'a Arc<Route>, Vec<&'a Arc<Route>>)> {
	for route in routes {
		if route.name() == Some(name) {
			return Some((route, Vec::new()));
		}
		if let Some((found, mut ancestors)) = find_named(name, route.children()) {
			ancestors.insert(0, route);
			return Some((found, ancestors));
		}
	}
	None
}
