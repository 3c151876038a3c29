//! Query string codec.
//!
//! [`parse`] and [`stringify`] convert between the `?a=1&b=2&b=3` portion of
//! a URL and a [`Query`] map. Keys that repeat collect into
//! [`QueryValue::Multiple`] in the order they were seen.

use crate::pattern::decode_component;
use indexmap::IndexMap;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left unescaped by `encodeURIComponent`.
const COMPONENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'-')
	.remove(b'_')
	.remove(b'.')
	.remove(b'!')
	.remove(b'~')
	.remove(b'*')
	.remove(b'\'')
	.remove(b'(')
	.remove(b')');

/// Value stored under one query key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
	/// The key appeared once.
	Single(String),
	/// The key appeared more than once, values in encounter order.
	Multiple(Vec<String>),
}

impl QueryValue {
	/// Returns the first value.
	pub fn first(&self) -> Option<&str> {
		match self {
			Self::Single(v) => Some(v),
			Self::Multiple(vs) => vs.first().map(String::as_str),
		}
	}

	/// Returns every value in order.
	pub fn as_slice(&self) -> &[String] {
		match self {
			Self::Single(v) => std::slice::from_ref(v),
			Self::Multiple(vs) => vs,
		}
	}

	/// Collapses a one-element list to a single value, which is how it
	/// parses back.
	fn normalized(self) -> Self {
		match self {
			Self::Multiple(mut vs) if vs.len() == 1 => Self::Single(vs.remove(0)),
			other => other,
		}
	}

	fn push(&mut self, value: String) {
		match self {
			Self::Single(existing) => {
				let first = std::mem::take(existing);
				*self = Self::Multiple(vec![first, value]);
			}
			Self::Multiple(vs) => vs.push(value),
		}
	}
}

impl From<&str> for QueryValue {
	fn from(value: &str) -> Self {
		Self::Single(value.to_string())
	}
}

impl From<String> for QueryValue {
	fn from(value: String) -> Self {
		Self::Single(value)
	}
}

impl From<Vec<String>> for QueryValue {
	fn from(values: Vec<String>) -> Self {
		Self::Multiple(values).normalized()
	}
}

/// Parsed query string, keyed in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
	entries: IndexMap<String, QueryValue>,
}

impl Query {
	/// Creates an empty query.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&QueryValue> {
		self.entries.get(key)
	}

	/// Returns the first value stored under `key`.
	pub fn first(&self, key: &str) -> Option<&str> {
		self.entries.get(key).and_then(QueryValue::first)
	}

	/// Returns every value stored under `key`, empty if absent.
	pub fn get_all(&self, key: &str) -> &[String] {
		self.entries.get(key).map(QueryValue::as_slice).unwrap_or(&[])
	}

	/// Sets `key`, replacing any previous value.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
		self.entries.insert(key.into(), value.into().normalized());
	}

	/// Sets `key` when `value` is `Some`, removes it otherwise.
	pub fn insert_opt(&mut self, key: impl Into<String>, value: Option<impl Into<QueryValue>>) {
		let key = key.into();
		match value {
			Some(value) => {
				self.entries.insert(key, value.into().normalized());
			}
			None => {
				self.entries.shift_remove(&key);
			}
		}
	}

	/// Adds a value under `key`, turning it into a list if it already exists.
	pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
		let value = value.into();
		match self.entries.entry(key.into()) {
			indexmap::map::Entry::Occupied(mut slot) => slot.get_mut().push(value),
			indexmap::map::Entry::Vacant(slot) => {
				slot.insert(QueryValue::Single(value));
			}
		}
	}

	/// Returns `true` if no keys are present.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Returns the number of distinct keys.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Iterates keys and values in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v))
	}
}

impl<K, V> FromIterator<(K, V)> for Query
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut query = Query::new();
		for (key, value) in iter {
			query.append(key, value);
		}
		query
	}
}

/// Parses a query string.
///
/// A single leading `?` or `#` is ignored. Each pair is split on its first
/// `=`, so further `=` characters stay in the value. Pairs without `=` get
/// an empty value and empty segments are skipped. Malformed percent escapes
/// are kept as-is.
pub fn parse(search: &str) -> Query {
	let search = search
		.strip_prefix('?')
		.or_else(|| search.strip_prefix('#'))
		.unwrap_or(search);

	let mut query = Query::new();
	for pair in search.split('&').filter(|p| !p.is_empty()) {
		let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
		query.append(decode_component(key), decode_component(value));
	}
	query
}

/// Serializes a query without a leading `?`.
///
/// List values become repeated `key=value` pairs in list order. An empty
/// query serializes to the empty string.
pub fn stringify(query: &Query) -> String {
	let mut pairs = Vec::new();
	for (key, value) in query.iter() {
		let key = encode_component(key);
		for v in value.as_slice() {
			pairs.push(format!("{}={}", key, encode_component(v)));
		}
	}
	pairs.join("&")
}

fn encode_component(raw: &str) -> String {
	utf8_percent_encode(raw, COMPONENT_ENCODE_SET).to_string()
}
