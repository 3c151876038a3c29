//! # Linkdash
//!
//! Client-side navigation for the Linkdash link-management dashboard.
//!
//! The routing engine lives in [`linkdash_router`] and is re-exported here as
//! [`router`]. This crate wires it to the application: configuration loaded
//! from TOML, the session-aware guards, the dashboard route table and a
//! tracing setup for native hosts.
//!
//! ## Modules
//!
//! - [`config`]: application settings ([`AppConfig`])
//! - [`session`]: session state consulted by guards
//! - [`guards`]: authentication, guest-only and role guards
//! - [`routes`]: the dashboard route table and the page renderer seam
//! - [`app`]: assembles a ready-to-init [`Router`]
//! - [`telemetry`]: `tracing` subscriber setup
//!
//! ## Example
//!
//! ```ignore
//! use linkdash::{AppConfig, MemorySession, app};
//! use std::sync::Arc;
//!
//! let config = AppConfig::load("linkdash.toml")?;
//! let session = Arc::new(MemorySession::new());
//! let router = app::build_router(&config, app::default_history(), session, pages);
//! router.init().await?;
//! ```

pub mod app;
pub mod config;
pub mod guards;
pub mod routes;
pub mod session;
pub mod telemetry;

pub use linkdash_router as router;

pub use config::{AppConfig, ConfigError};
pub use guards::{GuestOnly, RequireAuth, RequireRole};
pub use linkdash_router::{
	GuardOutcome, NavigationFailure, NavigationFailureKind, Route, RouteContext, Router,
	RouterConfig, RouterError, RouterMode, RouterResult,
};
pub use routes::{Page, PageRenderer, dashboard_routes};
pub use session::{MemorySession, SessionStore};
