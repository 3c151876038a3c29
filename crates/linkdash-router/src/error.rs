//! Error types for client-side navigation.

use thiserror::Error;

/// Result type for router operations.
pub type RouterResult<T> = Result<T, RouterError>;

/// Error raised when a route template cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
	/// Template exceeds the maximum length.
	#[error("template length {length} exceeds maximum allowed length of {max} bytes")]
	TooLong {
		/// Actual length in bytes.
		length: usize,
		/// Allowed maximum.
		max: usize,
	},

	/// Template has too many path segments.
	#[error("template has {count} path segments, exceeding maximum of {max}")]
	TooManySegments {
		/// Actual segment count.
		count: usize,
		/// Allowed maximum.
		max: usize,
	},

	/// The same parameter name appears twice in one template.
	#[error("parameter '{name}' appears more than once in template '{template}'")]
	DuplicateParameter {
		/// Offending template.
		template: String,
		/// Repeated parameter name.
		name: String,
	},

	/// The generated regex was rejected.
	#[error("failed to compile template '{template}': {reason}")]
	InvalidRegex {
		/// Offending template.
		template: String,
		/// Message from the regex engine.
		reason: String,
	},
}

/// Why a navigation did not reach its requested target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationFailureKind {
	/// A guard rejected the navigation.
	Aborted,
	/// A concurrent navigation prevented this one from proceeding.
	Cancelled,
	/// The target is already the current route.
	Duplicated,
	/// Redirect resolution failed, e.g. a redirect loop.
	Redirected,
}

impl std::fmt::Display for NavigationFailureKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			Self::Aborted => "aborted",
			Self::Cancelled => "cancelled",
			Self::Duplicated => "duplicated",
			Self::Redirected => "redirected",
		};
		f.write_str(s)
	}
}

/// A navigation that was abandoned before commit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("navigation {kind} from '{from}' to '{to}'{}", detail(.message))]
pub struct NavigationFailure {
	/// Failure category.
	pub kind: NavigationFailureKind,
	/// Path that was current when the navigation started (empty if none).
	pub from: String,
	/// Requested target path.
	pub to: String,
	/// Optional detail, e.g. the reason given by a guard.
	pub message: Option<String>,
}

impl NavigationFailure {
	/// Creates a failure without a message.
	pub fn new(kind: NavigationFailureKind, from: impl Into<String>, to: impl Into<String>) -> Self {
		Self {
			kind,
			from: from.into(),
			to: to.into(),
			message: None,
		}
	}

	/// Attaches a message.
	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}
}

fn detail(message: &Option<String>) -> String {
	message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

/// Error type for router operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RouterError {
	/// The navigation was abandoned.
	#[error(transparent)]
	Navigation(#[from] NavigationFailure),

	/// No route matched and the fallback could not be used.
	#[error("route not found: {0}")]
	NotFound(String),

	/// The matched route's handler failed.
	#[error(transparent)]
	Handler(anyhow::Error),

	/// A route template could not be compiled.
	#[error("invalid route template: {0}")]
	Pattern(#[from] PatternError),

	/// Missing parameter while building a path.
	#[error("missing parameter: {0}")]
	MissingParameter(String),

	/// No route registered under this name.
	#[error("invalid route name: {0}")]
	InvalidRouteName(String),

	/// The history backend refused an update.
	#[error("history update failed: {0}")]
	History(String),
}

impl RouterError {
	/// Returns the navigation failure, if this is one.
	pub fn as_navigation_failure(&self) -> Option<&NavigationFailure> {
		match self {
			Self::Navigation(failure) => Some(failure),
			_ => None,
		}
	}
}
