//! The dashboard route table.
//!
//! Rendering is delegated to a [`PageRenderer`]; handlers here only pick the
//! page and pass the route context along.

use crate::guards::{META_GUEST_ONLY, META_REQUIRES_AUTH};
use async_trait::async_trait;
use linkdash_router::{Route, RouteContext, RouteHandler};
use std::sync::Arc;

/// Pages of the dashboard application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
	Landing,
	Login,
	Register,
	Dashboard,
	Links,
	NewLink,
	LinkDetail,
	EditLink,
	NotFound,
}

impl Page {
	/// Name the page's route is registered under.
	pub fn route_name(self) -> &'static str {
		match self {
			Self::Landing => "landing",
			Self::Login => "login",
			Self::Register => "register",
			Self::Dashboard => "dashboard",
			Self::Links => "links",
			Self::NewLink => "link_new",
			Self::LinkDetail => "link_detail",
			Self::EditLink => "link_edit",
			Self::NotFound => "not_found",
		}
	}

	/// Document title.
	pub fn title(self) -> &'static str {
		match self {
			Self::Landing => "Linkdash",
			Self::Login => "Sign in",
			Self::Register => "Create account",
			Self::Dashboard => "Dashboard",
			Self::Links => "Links",
			Self::NewLink => "New link",
			Self::LinkDetail => "Link",
			Self::EditLink => "Edit link",
			Self::NotFound => "Page not found",
		}
	}
}

/// Renders pages into the document.
#[async_trait]
pub trait PageRenderer: Send + Sync {
	/// Renders `page` for the committed navigation `ctx`.
	///
	/// # Errors
	///
	/// Errors propagate to the caller of the navigation.
	async fn render(&self, page: Page, ctx: &RouteContext) -> anyhow::Result<()>;
}

struct PageHandler {
	page: Page,
	pages: Arc<dyn PageRenderer>,
}

#[async_trait]
impl RouteHandler for PageHandler {
	async fn handle(&self, ctx: Arc<RouteContext>) -> anyhow::Result<()> {
		tracing::debug!(page = ?self.page, path = %ctx.path, "rendering page");
		self.pages.render(self.page, &ctx).await
	}
}

fn page(path: &str, page: Page, pages: &Arc<dyn PageRenderer>) -> Route {
	let handler = Arc::new(PageHandler {
		page,
		pages: Arc::clone(pages),
	});
	Route::with_handler(path, handler)
		.with_name(page.route_name())
		.with_meta("title", page.title())
}

fn protected(route: Route) -> Route {
	route.with_meta(META_REQUIRES_AUTH, true)
}

fn guest(route: Route) -> Route {
	route.with_meta(META_GUEST_ONLY, true)
}

/// Builds the dashboard route table.
///
/// `/dashboard` and everything under it require a signed-in user; `/login`
/// and `/register` are for signed-out users only. Child routes carry the
/// meta flag themselves because guards only see the innermost match.
pub fn dashboard_routes(pages: Arc<dyn PageRenderer>) -> Vec<Route> {
	vec![
		page("/", Page::Landing, &pages),
		guest(page("/login", Page::Login, &pages)),
		guest(page("/register", Page::Register, &pages)),
		protected(page("/dashboard", Page::Dashboard, &pages)).with_children([
			protected(page("/links", Page::Links, &pages)),
			protected(page("/links/new", Page::NewLink, &pages)),
			protected(page("/links/:id", Page::LinkDetail, &pages)),
			protected(page("/links/:id/edit", Page::EditLink, &pages)),
		]),
		page("/404", Page::NotFound, &pages),
	]
}

#[cfg(test)]
mod tests {
	use super::*;
	use linkdash_router::match_route;
	use rstest::rstest;

	struct NullPages;

	#[async_trait]
	impl PageRenderer for NullPages {
		async fn render(&self, _page: Page, _ctx: &RouteContext) -> anyhow::Result<()> {
			Ok(())
		}
	}

	fn table() -> Vec<Arc<Route>> {
		dashboard_routes(Arc::new(NullPages))
			.into_iter()
			.map(Arc::new)
			.collect()
	}

	#[rstest]
	#[case("/", "landing")]
	#[case("/login", "login")]
	#[case("/register", "register")]
	#[case("/dashboard", "dashboard")]
	#[case("/dashboard/links", "links")]
	#[case("/dashboard/links/new", "link_new")]
	#[case("/dashboard/links/9", "link_detail")]
	#[case("/dashboard/links/9/edit", "link_edit")]
	#[case("/404", "not_found")]
	fn test_route_names(#[case] path: &str, #[case] name: &str) {
		let found = match_route(path, &table()).unwrap();
		assert_eq!(found.name(), Some(name));
	}

	#[rstest]
	fn test_dashboard_children_are_protected() {
		let found = match_route("/dashboard/links/9/edit", &table()).unwrap();

		assert_eq!(found.route.meta(META_REQUIRES_AUTH), Some(&serde_json::json!(true)));
		assert_eq!(found.route.meta("title"), Some(&serde_json::json!("Edit link")));
		assert_eq!(found.params.get("id").map(String::as_str), Some("9"));
	}

	#[rstest]
	fn test_unknown_dashboard_path_does_not_match() {
		assert!(match_route("/dashboard/settings", &table()).is_none());
	}
}
