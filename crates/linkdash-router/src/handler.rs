//! Route handler abstraction.
//!
//! A handler runs once per committed navigation, after every guard has
//! allowed it. Rendering is the handler's business; the router only awaits
//! it and propagates its error unchanged.

use crate::context::RouteContext;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// Trait for route handlers invoked when a navigation commits.
///
/// Implemented for any `Fn(Arc<RouteContext>) -> impl Future<Output =
/// anyhow::Result<()>>` closure, so most routes never name this trait:
///
/// ```ignore
/// Route::new("/links/:id", |ctx: Arc<RouteContext>| async move {
///     pages.render_link(ctx.param("id").unwrap_or_default()).await
/// });
/// ```
#[async_trait]
pub trait RouteHandler: Send + Sync {
	/// Handles the committed navigation.
	///
	/// # Errors
	///
	/// Any error is returned from `push`/`replace` as
	/// [`RouterError::Handler`](crate::RouterError::Handler).
	async fn handle(&self, ctx: Arc<RouteContext>) -> anyhow::Result<()>;
}

#[async_trait]
impl<F, Fut> RouteHandler for F
where
	F: Fn(Arc<RouteContext>) -> Fut + Send + Sync,
	Fut: Future<Output = anyhow::Result<()>> + Send,
{
	async fn handle(&self, ctx: Arc<RouteContext>) -> anyhow::Result<()> {
		(self)(ctx).await
	}
}

/// Handler that does nothing, for routes that only exist to be redirected
/// away from or matched for their params.
pub fn noop_handler() -> Arc<dyn RouteHandler> {
	Arc::new(|_ctx: Arc<RouteContext>| async { Ok::<_, anyhow::Error>(()) })
}
