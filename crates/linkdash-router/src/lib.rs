//! Linkdash Router - client-side routing for single-page applications
//!
//! Maps browser locations to route handlers without a page reload. Routes
//! are declared with path templates, nested into trees, and protected by
//! asynchronous guards; the router keeps the browser history in sync in
//! either history or hash mode.
//!
//! ## Features
//!
//! - **Path templates**: `:name` parameters and a `*` wildcard, compiled once to regex
//! - **Nested routes**: children match the remainder of their parent's path
//! - **Guards**: global and per-route, able to allow, redirect or deny
//! - **Serialized navigation**: one navigation resolves at a time; the latest
//!   request made meanwhile runs next, earlier ones are dropped
//! - **History backends**: the browser History API on wasm32, an in-memory
//!   stack everywhere else
//!
//! ## Architecture
//!
//! - [`pattern`]: template compilation, matching and interpolation
//! - [`query`]: query string parsing and serialization
//! - [`route`]: route definitions
//! - [`matcher`]: first-match-wins route lookup
//! - [`guard`]: guard trait and outcomes
//! - [`handler`]: route handler trait
//! - [`history`]: history backends
//! - [`core`]: the [`Router`] itself
//!
//! ## Example
//!
//! ```ignore
//! use linkdash_router::{GuardContext, GuardOutcome, Route, RouteContext, Router, RouterConfig, noop_handler};
//! use std::sync::Arc;
//!
//! let router = Router::builder(RouterConfig::default())
//!     .route(Route::with_handler("/", noop_handler()))
//!     .route(
//!         Route::named("link_detail", "/links/:id", |ctx: Arc<RouteContext>| async move {
//!             tracing::info!(id = ctx.param("id"), "showing link");
//!             Ok::<_, anyhow::Error>(())
//!         })
//!         .with_guard(|_ctx: GuardContext| async { GuardOutcome::Allow }),
//!     )
//!     .route(Route::with_handler("/404", noop_handler()))
//!     .build();
//!
//! router.init().await?;
//! router.push("/links/42?tab=stats").await?;
//! ```

pub mod config;
pub mod context;
pub mod core;
pub mod error;
pub mod guard;
pub mod handler;
pub mod history;
pub mod matcher;
pub mod pattern;
pub mod pending;
pub mod query;
pub mod route;

pub use config::{RouterConfig, RouterMode};
pub use context::{RouteContext, normalize_path, split_path};
pub use self::core::{
	NavigateOptions, NavigationOutcome, Router, RouterBuilder, Spawner, default_history,
	default_spawner,
};
pub use error::{NavigationFailure, NavigationFailureKind, PatternError, RouterError, RouterResult};
pub use guard::{GuardContext, GuardOutcome, RouteGuard};
pub use handler::{RouteHandler, noop_handler};
pub use history::{HistoryBackend, HistoryEvent, ListenerId, LocationListener, MemoryHistory};
#[cfg(target_arch = "wasm32")]
pub use history::BrowserHistory;
pub use matcher::{MatchedRoute, match_route};
pub use pattern::{PatternMatch, RoutePattern};
pub use query::{Query, QueryValue};
pub use route::Route;
