//! Route template compilation.
//!
//! A route template is a path made of literal segments, `:name` parameters
//! and an optional `*` wildcard:
//!
//! - `/about` - Exact match only
//! - `/links/:id` - Single parameter (excludes `/`)
//! - `/links/:id/stats/:range` - Multiple parameters
//! - `/files/*` - Wildcard matching the rest of the path (includes `/`)
//!
//! Templates compile to an anchored regex. Captured values are
//! percent-decoded before they are handed out.

use crate::error::PatternError;
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use std::collections::HashMap;

/// Maximum allowed length for a route template in bytes.
const MAX_TEMPLATE_LENGTH: usize = 1024;

/// Maximum allowed number of path segments in a route template.
const MAX_TEMPLATE_SEGMENTS: usize = 32;

/// Maximum allowed size for a compiled template regex (in bytes).
const MAX_REGEX_SIZE: usize = 1 << 20; // 1 MiB

/// Characters escaped when a parameter value is interpolated into a path.
const SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
	.add(b' ')
	.add(b'"')
	.add(b'#')
	.add(b'%')
	.add(b'/')
	.add(b'<')
	.add(b'>')
	.add(b'?')
	.add(b'`')
	.add(b'{')
	.add(b'}');

/// One capturing group of a compiled template, in left-to-right order.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Capture {
	Param(String),
	Wildcard,
}

/// Result of matching a path against a [`RoutePattern`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternMatch {
	/// Named parameters, percent-decoded.
	pub params: HashMap<String, String>,
	/// Named parameter values in template order.
	pub values: Vec<String>,
	/// Value captured by `*`, percent-decoded.
	pub wildcard: Option<String>,
}

/// A compiled route template.
#[derive(Debug, Clone)]
pub struct RoutePattern {
	template: String,
	regex: regex::Regex,
	prefix_regex: regex::Regex,
	captures: Vec<Capture>,
	param_names: Vec<String>,
}

impl RoutePattern {
	/// Compiles a route template.
	///
	/// # Errors
	///
	/// Returns [`PatternError`] if:
	/// - the template exceeds 1024 bytes or 32 segments
	/// - a parameter name appears twice
	/// - the generated regex cannot be built
	pub fn compile(template: &str) -> Result<Self, PatternError> {
		if template.len() > MAX_TEMPLATE_LENGTH {
			return Err(PatternError::TooLong {
				length: template.len(),
				max: MAX_TEMPLATE_LENGTH,
			});
		}

		let segment_count = template.split('/').count();
		if segment_count > MAX_TEMPLATE_SEGMENTS {
			return Err(PatternError::TooManySegments {
				count: segment_count,
				max: MAX_TEMPLATE_SEGMENTS,
			});
		}

		let (source, captures) = Self::translate(template);
		let (prefix_source, _) = Self::translate(template.trim_end_matches('/'));

		let mut param_names: Vec<String> = Vec::new();
		for capture in &captures {
			if let Capture::Param(name) = capture {
				if param_names.contains(name) {
					return Err(PatternError::DuplicateParameter {
						template: template.to_string(),
						name: name.clone(),
					});
				}
				param_names.push(name.clone());
			}
		}

		let regex = Self::build(template, &format!("^{source}$"))?;
		let prefix_regex = Self::build(template, &format!("^{prefix_source}(?:/|$)"))?;

		Ok(Self {
			template: template.to_string(),
			regex,
			prefix_regex,
			captures,
			param_names,
		})
	}

	fn build(template: &str, source: &str) -> Result<regex::Regex, PatternError> {
		regex::RegexBuilder::new(source)
			.size_limit(MAX_REGEX_SIZE)
			.build()
			.map_err(|e| PatternError::InvalidRegex {
				template: template.to_string(),
				reason: e.to_string(),
			})
	}

	/// Turns a template into unanchored regex source plus its capture layout.
	fn translate(template: &str) -> (String, Vec<Capture>) {
		let mut source = String::new();
		let mut captures = Vec::new();
		let mut chars = template.chars().peekable();
		let mut buf = [0u8; 4];

		while let Some(c) = chars.next() {
			match c {
				'*' => {
					source.push_str("(.*)");
					captures.push(Capture::Wildcard);
				}
				':' if chars.peek().is_some_and(|&next| next != '/') => {
					let mut name = String::new();
					while let Some(&next) = chars.peek() {
						if next == '/' {
							break;
						}
						name.push(next);
						chars.next();
					}
					source.push_str("([^/]+)");
					captures.push(Capture::Param(name));
				}
				_ => source.push_str(&regex::escape(c.encode_utf8(&mut buf))),
			}
		}

		(source, captures)
	}

	/// Returns the original template string.
	pub fn template(&self) -> &str {
		&self.template
	}

	/// Returns the parameter names in template order.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Returns whether the template contains a `*` wildcard.
	pub fn has_wildcard(&self) -> bool {
		self.captures.contains(&Capture::Wildcard)
	}

	/// Returns whether this template has neither parameters nor wildcard.
	pub fn is_exact(&self) -> bool {
		self.captures.is_empty()
	}

	/// Checks whether `path` matches this template in full.
	pub fn is_match(&self, path: &str) -> bool {
		self.regex.is_match(path)
	}

	/// Matches `path` against this template and extracts decoded captures.
	pub fn matches(&self, path: &str) -> Option<PatternMatch> {
		let caps = self.regex.captures(path)?;
		Some(self.extract(&caps))
	}

	/// Matches the template as a leading run of whole segments of `path`.
	///
	/// Returns the captures and the remainder of the path, which always
	/// starts with `/`.
	pub fn match_prefix(&self, path: &str) -> Option<(PatternMatch, String)> {
		let caps = self.prefix_regex.captures(path)?;
		let end = caps.get(0).map(|m| m.end()).unwrap_or_default();
		let rest = path[end..].trim_start_matches('/');
		Some((self.extract(&caps), format!("/{rest}")))
	}

	fn extract(&self, caps: &regex::Captures<'_>) -> PatternMatch {
		let mut found = PatternMatch::default();

		for (index, capture) in self.captures.iter().enumerate() {
			let raw = caps.get(index + 1).map(|m| m.as_str()).unwrap_or_default();
			let value = decode_component(raw);
			match capture {
				Capture::Param(name) => {
					found.values.push(value.clone());
					found.params.insert(name.clone(), value);
				}
				Capture::Wildcard => found.wildcard = Some(value),
			}
		}

		found
	}

	/// Builds a concrete path by substituting `params` into the template.
	///
	/// Parameter values are percent-encoded as path segments. A `*`
	/// wildcard is filled from the `"*"` key when present and dropped
	/// otherwise.
	///
	/// # Errors
	///
	/// Returns the name of the first parameter missing from `params`.
	pub fn interpolate(&self, params: &HashMap<String, String>) -> Result<String, String> {
		let mut result = String::with_capacity(self.template.len());
		let mut chars = self.template.chars().peekable();

		while let Some(c) = chars.next() {
			match c {
				'*' => {
					if let Some(rest) = params.get("*") {
						result.push_str(rest);
					}
				}
				':' if chars.peek().is_some_and(|&next| next != '/') => {
					let mut name = String::new();
					while let Some(&next) = chars.peek() {
						if next == '/' {
							break;
						}
						name.push(next);
						chars.next();
					}
					let value = params.get(&name).ok_or_else(|| name.clone())?;
					result.extend(utf8_percent_encode(value, SEGMENT_ENCODE_SET));
				}
				_ => result.push(c),
			}
		}

		Ok(result)
	}
}

/// Percent-decodes a single path or query component.
///
/// Invalid UTF-8 after decoding is replaced rather than rejected.
pub(crate) fn decode_component(raw: &str) -> String {
	percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

impl PartialEq for RoutePattern {
	fn eq(&self, other: &Self) -> bool {
		self.template == other.template
	}
}

impl Eq for RoutePattern {}

impl std::fmt::Display for RoutePattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.template)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_exact_pattern() {
		let pattern = RoutePattern::compile("/about").unwrap();
		assert!(pattern.is_exact());
		assert!(pattern.is_match("/about"));
		assert!(!pattern.is_match("/about/extra"));
		assert!(!pattern.is_match("/aboutx"));
	}

	#[rstest]
	fn test_single_param() {
		let pattern = RoutePattern::compile("/links/:id").unwrap();
		assert!(!pattern.is_exact());
		assert!(pattern.is_match("/links/42"));
		assert!(!pattern.is_match("/links/"));
		assert!(!pattern.is_match("/links/42/edit"));

		let found = pattern.matches("/links/42").unwrap();
		assert_eq!(found.params.get("id"), Some(&"42".to_string()));
		assert_eq!(found.values, vec!["42".to_string()]);
	}

	#[rstest]
	fn test_values_follow_template_order() {
		let pattern = RoutePattern::compile("/:zeta/:alpha/:mid").unwrap();
		let found = pattern.matches("/1/2/3").unwrap();

		assert_eq!(pattern.param_names(), &["zeta", "alpha", "mid"]);
		assert_eq!(found.values, vec!["1", "2", "3"]);
	}

	#[rstest]
	fn test_wildcard_crosses_slashes() {
		let pattern = RoutePattern::compile("/files/*").unwrap();
		assert!(pattern.has_wildcard());

		let found = pattern.matches("/files/a/b/c.txt").unwrap();
		assert_eq!(found.wildcard.as_deref(), Some("a/b/c.txt"));
		assert!(found.params.is_empty());
	}

	#[rstest]
	fn test_wildcard_before_param_keeps_names_aligned() {
		let pattern = RoutePattern::compile("/*/raw/:id").unwrap();
		let found = pattern.matches("/x/y/raw/9").unwrap();

		assert_eq!(found.wildcard.as_deref(), Some("x/y"));
		assert_eq!(found.params.get("id"), Some(&"9".to_string()));
	}

	#[rstest]
	fn test_values_are_percent_decoded() {
		let pattern = RoutePattern::compile("/tags/:tag").unwrap();
		let found = pattern.matches("/tags/rust%20lang").unwrap();
		assert_eq!(found.params.get("tag"), Some(&"rust lang".to_string()));
	}

	#[rstest]
	#[case("/api/v1.0", "/api/v1.0", true)]
	#[case("/api/v1.0", "/api/v1X0", false)]
	#[case("/a+b", "/a+b", true)]
	#[case("/a+b", "/aab", false)]
	#[case("/(x)", "/(x)", true)]
	fn test_metacharacters_are_literal(
		#[case] template: &str,
		#[case] path: &str,
		#[case] expected: bool,
	) {
		let pattern = RoutePattern::compile(template).unwrap();
		assert_eq!(pattern.is_match(path), expected);
	}

	#[rstest]
	fn test_duplicate_param_rejected() {
		let result = RoutePattern::compile("/:id/x/:id");
		assert!(matches!(
			result,
			Err(PatternError::DuplicateParameter { ref name, .. }) if name == "id"
		));
	}

	#[rstest]
	fn test_excessive_length_rejected() {
		// Arrange
		let long_template = "/".to_string() + &"a".repeat(1025);

		// Act
		let result = RoutePattern::compile(&long_template);

		// Assert
		assert!(matches!(result, Err(PatternError::TooLong { .. })));
	}

	#[rstest]
	fn test_excessive_segments_rejected() {
		let segments: Vec<&str> = (0..35).map(|_| "seg").collect();
		let template = format!("/{}", segments.join("/"));

		let result = RoutePattern::compile(&template);

		assert!(matches!(result, Err(PatternError::TooManySegments { .. })));
	}

	#[rstest]
	#[case("/a/:p", "/a/1/2", Some(("1", "/2")))]
	#[case("/a/:p", "/a/1", Some(("1", "/")))]
	#[case("/a/:p/", "/a/1/x/y", Some(("1", "/x/y")))]
	#[case("/a/:p", "/ab/1/2", None)]
	#[case("/a/:p", "/b/1/2", None)]
	fn test_match_prefix(
		#[case] template: &str,
		#[case] path: &str,
		#[case] expected: Option<(&str, &str)>,
	) {
		let pattern = RoutePattern::compile(template).unwrap();
		let found = pattern
			.match_prefix(path)
			.map(|(m, rest)| (m.params.get("p").cloned().unwrap_or_default(), rest));
		assert_eq!(
			found,
			expected.map(|(p, rest)| (p.to_string(), rest.to_string()))
		);
	}

	#[rstest]
	fn test_root_prefix_matches_everything() {
		let pattern = RoutePattern::compile("/").unwrap();
		let (_, rest) = pattern.match_prefix("/links/1").unwrap();
		assert_eq!(rest, "/links/1");
	}

	#[rstest]
	fn test_interpolate() {
		let pattern = RoutePattern::compile("/links/:id/edit").unwrap();
		let mut params = HashMap::new();
		params.insert("id".to_string(), "a b".to_string());

		assert_eq!(pattern.interpolate(&params).unwrap(), "/links/a%20b/edit");
	}

	#[rstest]
	fn test_interpolate_missing_param() {
		let pattern = RoutePattern::compile("/links/:id").unwrap();
		assert_eq!(pattern.interpolate(&HashMap::new()), Err("id".to_string()));
	}

	#[rstest]
	fn test_trailing_colon_is_literal() {
		let pattern = RoutePattern::compile("/weird:").unwrap();
		assert!(pattern.is_exact());
		assert!(pattern.is_match("/weird:"));
	}

	#[rstest]
	fn test_display_and_equality() {
		let p1 = RoutePattern::compile("/links/:id").unwrap();
		let p2 = RoutePattern::compile("/links/:id").unwrap();
		let p3 = RoutePattern::compile("/links/:slug").unwrap();

		assert_eq!(format!("{}", p1), "/links/:id");
		assert_eq!(p1, p2);
		assert_ne!(p1, p3);
	}
}
