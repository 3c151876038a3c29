//! Navigation guards.
//!
//! Guards are consulted in order before a navigation commits: the global
//! guards from [`RouterConfig`](crate::RouterConfig) first, then the
//! matched route's own guards. Each returns a [`GuardOutcome`]; the first
//! outcome that is not [`GuardOutcome::Allow`] ends the chain.

use crate::context::RouteContext;
use crate::matcher::MatchedRoute;
use async_trait::async_trait;
use std::future::Future;
use std::ops::Deref;
use std::sync::Arc;

/// Decision returned by a guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
	/// Continue with the next guard.
	Allow,
	/// Abandon this navigation and navigate to the given path instead.
	Redirect(String),
	/// Reject the navigation, optionally with a reason.
	Deny(Option<String>),
}

impl GuardOutcome {
	/// Shorthand for a redirect.
	pub fn redirect(path: impl Into<String>) -> Self {
		Self::Redirect(path.into())
	}

	/// Shorthand for a denial with a reason.
	pub fn deny(reason: impl Into<String>) -> Self {
		Self::Deny(Some(reason.into()))
	}
}

impl From<bool> for GuardOutcome {
	fn from(allowed: bool) -> Self {
		if allowed { Self::Allow } else { Self::Deny(None) }
	}
}

impl From<&str> for GuardOutcome {
	fn from(path: &str) -> Self {
		Self::Redirect(path.to_string())
	}
}

impl From<String> for GuardOutcome {
	fn from(path: String) -> Self {
		Self::Redirect(path)
	}
}

/// What a guard sees of the pending navigation.
///
/// Dereferences to the [`RouteContext`] that will be committed if every
/// guard allows it.
#[derive(Debug, Clone)]
pub struct GuardContext {
	/// Context of the pending navigation.
	pub context: Arc<RouteContext>,
	/// Route that is current when the navigation started.
	pub from: Option<MatchedRoute>,
	/// Route the navigation resolved to.
	pub to: MatchedRoute,
}

impl Deref for GuardContext {
	type Target = RouteContext;

	fn deref(&self) -> &Self::Target {
		&self.context
	}
}

/// Trait for guards consulted before a navigation commits.
///
/// Implemented for any `Fn(GuardContext) -> impl Future<Output =
/// GuardOutcome>` closure.
#[async_trait]
pub trait RouteGuard: Send + Sync {
	/// Decides whether the navigation may proceed.
	async fn check(&self, ctx: &GuardContext) -> GuardOutcome;
}

#[async_trait]
impl<F, Fut> RouteGuard for F
where
	F: Fn(GuardContext) -> Fut + Send + Sync,
	Fut: Future<Output = GuardOutcome> + Send,
{
	async fn check(&self, ctx: &GuardContext) -> GuardOutcome {
		(self)(ctx.clone()).await
	}
}

/// Runs `guards` one after another and returns the first outcome that is
/// not [`GuardOutcome::Allow`].
pub(crate) async fn run_chain(guards: &[Arc<dyn RouteGuard>], ctx: &GuardContext) -> GuardOutcome {
	for guard in guards {
		match guard.check(ctx).await {
			GuardOutcome::Allow => continue,
			other => return other,
		}
	}
	GuardOutcome::Allow
}
