//! Application assembly.

use crate::config::AppConfig;
use crate::guards::{GuestOnly, RequireAuth, RequireRole};
use crate::routes::{PageRenderer, dashboard_routes};
use crate::session::SessionStore;
use linkdash_router::{HistoryBackend, Router};
use std::sync::Arc;

pub use linkdash_router::default_history;

/// Builds the dashboard router.
///
/// The session guards run as global guards, before any route guard, in the
/// order authentication, guest-only, role. The router is returned
/// uninitialized; call [`Router::init`] once the page is ready.
pub fn build_router(
	config: &AppConfig,
	history: Arc<dyn HistoryBackend>,
	session: Arc<dyn SessionStore>,
	pages: Arc<dyn PageRenderer>,
) -> Router {
	let router_config = config
		.router
		.clone()
		.with_guard(RequireAuth::new(Arc::clone(&session)))
		.with_guard(GuestOnly::new(Arc::clone(&session)))
		.with_guard(RequireRole::new(session));

	let router = Router::builder(router_config)
		.history(history)
		.routes(dashboard_routes(pages))
		.build();

	tracing::info!(
		mode = ?config.router.mode,
		base = %config.router.base,
		routes = router.route_count(),
		"dashboard router built"
	);
	router
}
