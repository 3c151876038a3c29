//! Session-aware navigation guards.
//!
//! The guards are installed globally and decide per route from its
//! metadata, so a route opts in by setting a meta key rather than by
//! carrying the guard itself:
//!
//! | Meta key | Guard | Effect |
//! |----------|-------|--------|
//! | `requires_auth: true` | [`RequireAuth`] | signed-out users go to `/login?next=<path>` |
//! | `guest_only: true` | [`GuestOnly`] | signed-in users go to `/dashboard` |
//! | `role: "<name>"` | [`RequireRole`] | other roles are denied |

use crate::session::SessionStore;
use async_trait::async_trait;
use linkdash_router::query::{self, Query};
use linkdash_router::{GuardContext, GuardOutcome, RouteGuard};
use std::sync::Arc;

/// Meta key marking routes that need a signed-in user.
pub const META_REQUIRES_AUTH: &str = "requires_auth";

/// Meta key marking routes only meant for signed-out users.
pub const META_GUEST_ONLY: &str = "guest_only";

/// Meta key naming the role a route requires.
pub const META_ROLE: &str = "role";

fn flag(ctx: &GuardContext, key: &str) -> bool {
	ctx.to
		.route
		.meta(key)
		.and_then(serde_json::Value::as_bool)
		.unwrap_or(false)
}

/// Redirects signed-out users to the login page.
pub struct RequireAuth {
	session: Arc<dyn SessionStore>,
	login_path: String,
}

impl RequireAuth {
	/// Creates the guard with `/login` as the login page.
	pub fn new(session: Arc<dyn SessionStore>) -> Self {
		Self {
			session,
			login_path: "/login".to_string(),
		}
	}

	/// Sets the login page path.
	pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
		self.login_path = path.into();
		self
	}

	fn login_redirect(&self, next: &str) -> String {
		let mut query = Query::new();
		query.insert("next", next);
		format!("{}?{}", self.login_path, query::stringify(&query))
	}
}

#[async_trait]
impl RouteGuard for RequireAuth {
	async fn check(&self, ctx: &GuardContext) -> GuardOutcome {
		if !flag(ctx, META_REQUIRES_AUTH) {
			return GuardOutcome::Allow;
		}

		if let Err(err) = self.session.refresh().await {
			tracing::warn!(error = %err, "session refresh failed");
		}
		if self.session.is_authenticated().await {
			return GuardOutcome::Allow;
		}

		tracing::debug!(path = %ctx.full_path, "sign-in required");
		GuardOutcome::redirect(self.login_redirect(&ctx.full_path))
	}
}

/// Sends signed-in users away from the login and registration pages.
pub struct GuestOnly {
	session: Arc<dyn SessionStore>,
	home_path: String,
}

impl GuestOnly {
	/// Creates the guard with `/dashboard` as the signed-in home.
	pub fn new(session: Arc<dyn SessionStore>) -> Self {
		Self {
			session,
			home_path: "/dashboard".to_string(),
		}
	}

	/// Sets where signed-in users are sent.
	pub fn with_home_path(mut self, path: impl Into<String>) -> Self {
		self.home_path = path.into();
		self
	}
}

#[async_trait]
impl RouteGuard for GuestOnly {
	async fn check(&self, ctx: &GuardContext) -> GuardOutcome {
		if flag(ctx, META_GUEST_ONLY) && self.session.is_authenticated().await {
			GuardOutcome::redirect(self.home_path.clone())
		} else {
			GuardOutcome::Allow
		}
	}
}

/// Denies routes whose `role` meta differs from the user's role.
pub struct RequireRole {
	session: Arc<dyn SessionStore>,
}

impl RequireRole {
	/// Creates the guard.
	pub fn new(session: Arc<dyn SessionStore>) -> Self {
		Self { session }
	}
}

#[async_trait]
impl RouteGuard for RequireRole {
	async fn check(&self, ctx: &GuardContext) -> GuardOutcome {
		let Some(required) = ctx.to.route.meta(META_ROLE).and_then(serde_json::Value::as_str) else {
			return GuardOutcome::Allow;
		};

		match self.session.role().await {
			Some(role) if role == required => GuardOutcome::Allow,
			_ => GuardOutcome::deny(format!("requires role '{required}'")),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::session::MemorySession;
	use linkdash_router::{MatchedRoute, Route, RouteContext, noop_handler};
	use rstest::rstest;

	fn guard_context(route: Route, full_path: &str) -> GuardContext {
		let route = Arc::new(route);
		let (path, query) = linkdash_router::split_path(full_path);
		GuardContext {
			context: Arc::new(RouteContext::new(path, full_path, Default::default(), query)),
			from: None,
			to: MatchedRoute::new(route, Default::default(), path, None),
		}
	}

	fn protected() -> Route {
		Route::with_handler("/dashboard/links", noop_handler()).with_meta(META_REQUIRES_AUTH, true)
	}

	#[rstest]
	#[tokio::test]
	async fn test_require_auth_redirects_with_next() {
		// Arrange
		let session = Arc::new(MemorySession::new());
		let guard = RequireAuth::new(session.clone());

		// Act
		let outcome = guard
			.check(&guard_context(protected(), "/dashboard/links?page=2"))
			.await;

		// Assert
		assert_eq!(
			outcome,
			GuardOutcome::Redirect("/login?next=%2Fdashboard%2Flinks%3Fpage%3D2".to_string())
		);
		assert_eq!(session.refresh_count(), 1);
	}

	#[rstest]
	#[tokio::test]
	async fn test_require_auth_allows_signed_in_user() {
		let session = Arc::new(MemorySession::signed_in("ada", None));
		let guard = RequireAuth::new(session);

		let outcome = guard.check(&guard_context(protected(), "/dashboard/links")).await;

		assert_eq!(outcome, GuardOutcome::Allow);
	}

	#[rstest]
	#[tokio::test]
	async fn test_require_auth_ignores_public_routes() {
		let session = Arc::new(MemorySession::new());
		let guard = RequireAuth::new(session.clone());

		let outcome = guard
			.check(&guard_context(Route::with_handler("/", noop_handler()), "/"))
			.await;

		assert_eq!(outcome, GuardOutcome::Allow);
		assert_eq!(session.refresh_count(), 0);
	}

	#[rstest]
	#[case(true, GuardOutcome::Redirect("/dashboard".to_string()))]
	#[case(false, GuardOutcome::Allow)]
	#[tokio::test]
	async fn test_guest_only(#[case] signed_in: bool, #[case] expected: GuardOutcome) {
		let session = Arc::new(MemorySession::new());
		if signed_in {
			session.sign_in("ada", None);
		}
		let login = Route::with_handler("/login", noop_handler()).with_meta(META_GUEST_ONLY, true);

		let outcome = GuestOnly::new(session).check(&guard_context(login, "/login")).await;

		assert_eq!(outcome, expected);
	}

	#[rstest]
	#[case(Some("admin"), GuardOutcome::Allow)]
	#[case(Some("viewer"), GuardOutcome::deny("requires role 'admin'"))]
	#[case(None, GuardOutcome::deny("requires role 'admin'"))]
	#[tokio::test]
	async fn test_require_role(#[case] role: Option<&str>, #[case] expected: GuardOutcome) {
		let session = Arc::new(MemorySession::signed_in("ada", role));
		let route = Route::with_handler("/admin", noop_handler()).with_meta(META_ROLE, "admin");

		let outcome = RequireRole::new(session).check(&guard_context(route, "/admin")).await;

		assert_eq!(outcome, expected);
	}
}
