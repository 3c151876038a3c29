//! Per-navigation route context.

use crate::query::{self, Query};
use std::collections::HashMap;

/// Resolved parameters, query and path of one navigation.
///
/// Built once the matched route is known and never mutated afterwards. The
/// router keeps the context of the current route only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteContext {
	/// Path parameters, parent values overridden by child values.
	pub params: HashMap<String, String>,
	/// Parsed query string.
	pub query: Query,
	/// Normalized path without the query string.
	pub path: String,
	/// Path and query as requested.
	pub full_path: String,
}

impl RouteContext {
	/// Builds a context from a path, its parsed query and matched params.
	pub fn new(
		path: impl Into<String>,
		full_path: impl Into<String>,
		params: HashMap<String, String>,
		query: Query,
	) -> Self {
		Self {
			params,
			query,
			path: path.into(),
			full_path: full_path.into(),
		}
	}

	/// Returns a path parameter.
	pub fn param(&self, name: &str) -> Option<&str> {
		self.params.get(name).map(String::as_str)
	}

	/// Returns the first query value under `key`.
	pub fn query_value(&self, key: &str) -> Option<&str> {
		self.query.first(key)
	}
}

/// Normalizes a path: one leading `/`, no trailing `/` except for root.
///
/// Any query string or fragment is left untouched.
pub fn normalize_path(path: &str) -> String {
	let (path_part, rest) = match path.find(['?', '#']) {
		Some(index) => path.split_at(index),
		None => (path, ""),
	};

	let trimmed = path_part.trim_start_matches('/').trim_end_matches('/');
	let mut normalized = String::with_capacity(trimmed.len() + 1 + rest.len());
	normalized.push('/');
	normalized.push_str(trimmed);
	normalized.push_str(rest);
	normalized
}

/// Splits a path into its path-only part and its parsed query.
pub fn split_path(full_path: &str) -> (&str, Query) {
	match full_path.split_once('?') {
		Some((path, search)) => (path, query::parse(search)),
		None => (full_path, Query::new()),
	}
}
