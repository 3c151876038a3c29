//! Core Router implementation.
//!
//! [`Router`] owns the route table and the navigation state machine. A
//! navigation goes through these stages:
//!
//! 1. If another navigation is resolving, the request is parked in the
//!    single pending slot and the call returns [`NavigationOutcome::Queued`].
//! 2. A request for the path that is already current (and not a replace)
//!    is dropped with [`NavigationOutcome::Duplicate`].
//! 3. The path is matched; unmatched paths re-resolve as the fallback.
//! 4. Global guards, then route guards, run one after another. A redirect
//!    re-resolves the new target; a denial fails the navigation.
//! 5. The history entry is written, the route becomes current and its
//!    handler is awaited.
//! 6. The pending request, if any, runs next while the router is still
//!    resolving; the flag is cleared once the slot is empty, or on unwind.
//!
//! State is behind `parking_lot` locks that are never held across an
//! `.await`; the resolving flag is the only thing that keeps navigations
//! from interleaving.

use crate::config::{RouterConfig, RouterMode};
use crate::context::{RouteContext, normalize_path, split_path};
use crate::error::{NavigationFailure, NavigationFailureKind, RouterError, RouterResult};
use crate::guard::{GuardContext, GuardOutcome, RouteGuard, run_chain};
use crate::history::{HistoryBackend, HistoryEvent, ListenerId};
use crate::matcher::{MatchedRoute, find_named, match_route};
use crate::pattern::RoutePattern;
use crate::pending::PendingNavigation;
use crate::route::Route;
use futures::future::BoxFuture;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

/// Runs navigations triggered by browser events, which have no caller to
/// await them.
pub type Spawner = Arc<dyn Fn(BoxFuture<'static, ()>) + Send + Sync>;

/// Returns the spawner used when none is configured.
///
/// On wasm32 this is `wasm_bindgen_futures::spawn_local`. Natively it
/// spawns onto the current tokio runtime, if any.
pub fn default_spawner() -> Spawner {
	#[cfg(target_arch = "wasm32")]
	{
		Arc::new(|fut: BoxFuture<'static, ()>| wasm_bindgen_futures::spawn_local(fut))
	}
	#[cfg(not(target_arch = "wasm32"))]
	{
		Arc::new(|fut: BoxFuture<'static, ()>| match tokio::runtime::Handle::try_current() {
			Ok(handle) => {
				handle.spawn(fut);
			}
			Err(_) => tracing::warn!("no tokio runtime available; location change ignored"),
		})
	}
}

/// Returns the history backend used when none is configured: the browser's
/// on wasm32, an in-memory stack elsewhere.
pub fn default_history() -> Arc<dyn HistoryBackend> {
	#[cfg(target_arch = "wasm32")]
	{
		Arc::new(crate::history::BrowserHistory::new())
	}
	#[cfg(not(target_arch = "wasm32"))]
	{
		Arc::new(crate::history::MemoryHistory::default())
	}
}

/// Options for a single navigation request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigateOptions {
	/// Replace the current history entry instead of pushing a new one.
	pub replace: bool,
}

impl NavigateOptions {
	/// Options for a push navigation.
	pub fn push() -> Self {
		Self { replace: false }
	}

	/// Options for a replace navigation.
	pub fn replace() -> Self {
		Self { replace: true }
	}
}

/// How a navigation request settled.
#[derive(Debug, Clone)]
pub enum NavigationOutcome {
	/// A route was committed; carries its context (which may belong to a
	/// redirect or fallback target).
	Committed(Arc<RouteContext>),
	/// Another navigation was resolving; this request was parked.
	Queued,
	/// The requested path is already current.
	Duplicate,
}

impl NavigationOutcome {
	/// Returns the committed context, if any.
	pub fn committed(&self) -> Option<&Arc<RouteContext>> {
		match self {
			Self::Committed(ctx) => Some(ctx),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
	Request,
	Initial,
}

#[derive(Default)]
struct RouterState {
	current_route: Option<MatchedRoute>,
	current_context: Option<Arc<RouteContext>>,
	resolving: bool,
	initialized: bool,
	listener: Option<ListenerId>,
}

struct RouterInner {
	config: RouterConfig,
	routes: RwLock<Vec<Arc<Route>>>,
	history: Arc<dyn HistoryBackend>,
	spawner: Spawner,
	state: Mutex<RouterState>,
	pending: PendingNavigation,
}

/// Clears the resolving flag when dropped.
struct ResolvingLease<'a> {
	state: &'a Mutex<RouterState>,
}

impl Drop for ResolvingLease<'_> {
	fn drop(&mut self) {
		self.state.lock().resolving = false;
	}
}

/// Builder for [`Router`].
pub struct RouterBuilder {
	config: RouterConfig,
	history: Option<Arc<dyn HistoryBackend>>,
	spawner: Option<Spawner>,
	routes: Vec<Arc<Route>>,
}

impl RouterBuilder {
	/// Sets the history backend.
	pub fn history(mut self, history: Arc<dyn HistoryBackend>) -> Self {
		self.history = Some(history);
		self
	}

	/// Sets the spawner for browser-event navigations.
	pub fn spawner(mut self, spawner: Spawner) -> Self {
		self.spawner = Some(spawner);
		self
	}

	/// Registers a route.
	pub fn route(mut self, route: Route) -> Self {
		self.routes.push(Arc::new(route));
		self
	}

	/// Registers several routes in order.
	pub fn routes<I>(mut self, routes: I) -> Self
	where
		I: IntoIterator<Item = Route>,
	{
		self.routes.extend(routes.into_iter().map(Arc::new));
		self
	}

	/// Builds the router. No listener is attached until [`Router::init`].
	pub fn build(self) -> Router {
		Router {
			inner: Arc::new(RouterInner {
				config: self.config,
				routes: RwLock::new(self.routes),
				history: self.history.unwrap_or_else(default_history),
				spawner: self.spawner.unwrap_or_else(default_spawner),
				state: Mutex::new(RouterState::default()),
				pending: PendingNavigation::new(),
			}),
		}
	}
}

/// The client-side router.
///
/// Cheap to clone; clones share the same route table and state. Create one
/// per application and hand it to whatever needs to navigate.
#[derive(Clone)]
pub struct Router {
	inner: Arc<RouterInner>,
}

impl std::fmt::Debug for Router {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let state = self.inner.state.lock();
		f.debug_struct("Router")
			.field("config", &self.inner.config)
			.field("routes_count", &self.inner.routes.read().len())
			.field(
				"current_path",
				&state.current_context.as_ref().map(|c| c.full_path.as_str()),
			)
			.field("resolving", &state.resolving)
			.field("pending", &self.inner.pending.peek())
			.finish()
	}
}

impl Router {
	/// Creates a router over the given history backend.
	pub fn new(config: RouterConfig, history: Arc<dyn HistoryBackend>) -> Self {
		Self::builder(config).history(history).build()
	}

	/// Starts building a router.
	pub fn builder(config: RouterConfig) -> RouterBuilder {
		RouterBuilder {
			config,
			history: None,
			spawner: None,
			routes: Vec::new(),
		}
	}

	/// Returns the configuration.
	pub fn config(&self) -> &RouterConfig {
		&self.inner.config
	}

	/// Returns the history backend.
	pub fn history(&self) -> &Arc<dyn HistoryBackend> {
		&self.inner.history
	}

	/// Appends a route. Earlier routes win when several match.
	pub fn add_route(&self, route: Route) {
		tracing::debug!(path = route.path(), name = route.name(), "route registered");
		self.inner.routes.write().push(Arc::new(route));
	}

	/// Appends several routes in order.
	pub fn add_routes<I>(&self, routes: I)
	where
		I: IntoIterator<Item = Route>,
	{
		for route in routes {
			self.add_route(route);
		}
	}

	/// Returns the number of top-level routes.
	pub fn route_count(&self) -> usize {
		self.inner.routes.read().len()
	}

	/// Navigates to `path`, pushing a history entry.
	///
	/// # Errors
	///
	/// Returns [`RouterError::Navigation`] if a guard rejects the navigation,
	/// [`RouterError::NotFound`] if neither the path nor the fallback match,
	/// and [`RouterError::Handler`] if the route handler fails.
	pub async fn push(&self, path: &str) -> RouterResult<NavigationOutcome> {
		self.navigate(path, NavigateOptions::push()).await
	}

	/// Navigates to `path`, replacing the current history entry.
	///
	/// # Errors
	///
	/// Same as [`Router::push`].
	pub async fn replace(&self, path: &str) -> RouterResult<NavigationOutcome> {
		self.navigate(path, NavigateOptions::replace()).await
	}

	/// Navigates to `path` with explicit options.
	///
	/// # Errors
	///
	/// Same as [`Router::push`].
	pub async fn navigate(
		&self,
		path: &str,
		options: NavigateOptions,
	) -> RouterResult<NavigationOutcome> {
		self.run(path.to_string(), options, Entry::Request).await
	}

	/// Goes one entry back. Resolution happens when the backend reports the
	/// location change.
	pub fn back(&self) {
		self.go(-1);
	}

	/// Goes one entry forward.
	pub fn forward(&self) {
		self.go(1);
	}

	/// Moves `delta` entries through the history stack.
	pub fn go(&self, delta: i32) {
		self.inner.history.go(delta);
	}

	/// Returns the current matched route.
	pub fn current_route(&self) -> Option<MatchedRoute> {
		self.inner.state.lock().current_route.clone()
	}

	/// Returns the context of the current route.
	pub fn current_context(&self) -> Option<Arc<RouteContext>> {
		self.inner.state.lock().current_context.clone()
	}

	/// Returns whether a navigation is resolving.
	pub fn is_resolving(&self) -> bool {
		self.inner.state.lock().resolving
	}

	/// Returns the parked navigation request, if any.
	pub fn pending_path(&self) -> Option<String> {
		self.inner.pending.peek()
	}

	/// Returns whether [`Router::init`] has run since the last destroy.
	pub fn is_initialized(&self) -> bool {
		self.inner.state.lock().initialized
	}

	/// Reads the path from the browser location.
	///
	/// History mode yields `pathname + search` without the base; hash mode
	/// yields the fragment without `#`. An empty result becomes `/`.
	pub fn current_path(&self) -> String {
		let raw = match self.inner.config.mode {
			RouterMode::History => {
				let location = self.inner.history.location();
				let base = self.inner.config.normalized_base();
				match location.strip_prefix(base) {
					Some(rest) if !base.is_empty() && (rest.is_empty() || rest.starts_with(['/', '?'])) => {
						rest.to_string()
					}
					_ => location,
				}
			}
			RouterMode::Hash => {
				let hash = self.inner.history.hash();
				hash.strip_prefix('#').unwrap_or(&hash).to_string()
			}
		};

		if raw.is_empty() { "/".to_string() } else { raw }
	}

	/// Fills a route template with `params`.
	///
	/// # Errors
	///
	/// Returns [`RouterError::Pattern`] for an invalid template and
	/// [`RouterError::MissingParameter`] if a parameter has no value.
	pub fn resolve(&self, template: &str, params: &[(&str, &str)]) -> RouterResult<String> {
		let pattern = RoutePattern::compile(template)?;
		let resolved = pattern
			.interpolate(&params_map(params))
			.map_err(RouterError::MissingParameter)?;
		Ok(normalize_path(&resolved))
	}

	/// Builds the path of a named route, including parent prefixes.
	///
	/// # Errors
	///
	/// Returns [`RouterError::InvalidRouteName`] for unknown names and
	/// [`RouterError::MissingParameter`] if a parameter has no value.
	pub fn reverse(&self, name: &str, params: &[(&str, &str)]) -> RouterResult<String> {
		let routes = self.inner.routes.read();
		let (route, ancestors) = find_named(name, routes.as_slice())
			.ok_or_else(|| RouterError::InvalidRouteName(name.to_string()))?;

		let params = params_map(params);
		let mut path = String::new();
		for pattern in ancestors.iter().map(|r| r.pattern()).chain([route.pattern()]) {
			let part = pattern
				.interpolate(&params)
				.map_err(RouterError::MissingParameter)?;
			let part = part.trim_matches('/');
			if !part.is_empty() {
				path.push('/');
				path.push_str(part);
			}
		}
		Ok(normalize_path(&path))
	}

	/// Turns an application path into an `href` for the configured mode.
	pub fn href(&self, path: &str) -> String {
		let path = normalize_path(path);
		match self.inner.config.mode {
			RouterMode::History => format!("{}{}", self.inner.config.normalized_base(), path),
			RouterMode::Hash => format!("#{}", path),
		}
	}

	/// Attaches the location listener and resolves the current location.
	///
	/// Calling it again before [`Router::destroy`] logs and does nothing.
	///
	/// # Errors
	///
	/// Returns the error of the initial navigation.
	pub async fn init(&self) -> RouterResult<()> {
		{
			let mut state = self.inner.state.lock();
			if state.initialized {
				tracing::info!("router already initialized; init ignored");
				return Ok(());
			}
			state.initialized = true;
		}

		let event = match self.inner.config.mode {
			RouterMode::History => HistoryEvent::PopState,
			RouterMode::Hash => HistoryEvent::HashChange,
		};
		let weak = Arc::downgrade(&self.inner);
		let spawner = Arc::clone(&self.inner.spawner);
		let id = self.inner.history.listen(
			event,
			Arc::new(move || {
				let Some(inner) = weak.upgrade() else {
					return;
				};
				let router = Router { inner };
				(spawner)(Box::pin(async move { router.handle_location_change().await }));
			}),
		);
		self.inner.state.lock().listener = Some(id);

		let path = self.current_path();
		tracing::info!(path = %path, mode = ?self.inner.config.mode, "router initialized");
		self.run(path, NavigateOptions::push(), Entry::Initial)
			.await
			.map(|_| ())
	}

	/// Detaches the location listener and forgets all navigation state.
	///
	/// Safe to call without a prior [`Router::init`].
	pub fn destroy(&self) {
		let listener = {
			let mut state = self.inner.state.lock();
			let listener = state.listener.take();
			*state = RouterState::default();
			self.inner.pending.clear();
			listener
		};
		if let Some(id) = listener {
			self.inner.history.unlisten(id);
		}
		tracing::info!("router destroyed");
	}

	/// Resolves the location after the browser changed it (back/forward or a
	/// fragment change). Failures are logged, never returned.
	pub async fn handle_location_change(&self) {
		let path = self.current_path();
		tracing::debug!(path = %path, "location changed");
		if let Err(err) = self.run(path.clone(), NavigateOptions::push(), Entry::Request).await {
			tracing::warn!(path = %path, error = %err, "navigation after location change failed");
		}
	}

	fn run(
		&self,
		path: String,
		options: NavigateOptions,
		entry: Entry,
	) -> BoxFuture<'_, RouterResult<NavigationOutcome>> {
		Box::pin(async move {
			let target = normalize_path(&path);
			{
				let mut state = self.inner.state.lock();
				if state.resolving && entry != Entry::Initial {
					if let Some(dropped) = self.inner.pending.replace(target.clone()) {
						tracing::debug!(path = %dropped, "pending navigation superseded");
					}
					tracing::debug!(path = %target, "navigation queued behind the one in progress");
					return Ok(NavigationOutcome::Queued);
				}

				if entry != Entry::Initial && is_duplicate(&state, &target, options) {
					tracing::debug!(path = %target, "already at requested path; navigation skipped");
					return Ok(NavigationOutcome::Duplicate);
				}

				state.resolving = true;
				self.inner.pending.clear();
			}

			let _lease = ResolvingLease {
				state: &self.inner.state,
			};
			let result = self.resolve_target(target, options, 0).await;

			// The slot is written and drained only under the state lock; the
			// flag stays set until it is empty.
			loop {
				let next = {
					let mut state = self.inner.state.lock();
					let Some(next) = self.inner.pending.take() else {
						state.resolving = false;
						break;
					};
					if is_duplicate(&state, &next, options) {
						tracing::debug!(path = %next, "pending navigation is already current");
						continue;
					}
					next
				};
				tracing::debug!(path = %next, "running pending navigation");
				if let Err(err) = self.resolve_target(next.clone(), options, 0).await {
					tracing::warn!(path = %next, error = %err, "pending navigation failed");
				}
			}

			result
		})
	}

	fn resolve_target(
		&self,
		target: String,
		options: NavigateOptions,
		redirects: usize,
	) -> BoxFuture<'_, RouterResult<NavigationOutcome>> {
		Box::pin(async move {
			let (path, query) = split_path(&target);
			let routes = self.inner.routes.read().clone();

			let Some(matched) = match_route(path, &routes) else {
				let fallback = normalize_path(&self.inner.config.fallback);
				if split_path(&fallback).0 == path {
					tracing::warn!(path = %target, "fallback route does not match");
					return Err(RouterError::NotFound(target));
				}
				tracing::info!(path = %target, fallback = %fallback, "no route matched; using fallback");
				return self.resolve_target(fallback, options, redirects).await;
			};

			let context = Arc::new(RouteContext::new(
				path,
				target.clone(),
				matched.params.clone(),
				query,
			));

			let (from, from_path) = {
				let state = self.inner.state.lock();
				let from_path = state
					.current_context
					.as_ref()
					.map(|c| c.full_path.clone())
					.unwrap_or_default();
				(state.current_route.clone(), from_path)
			};

			let guard_ctx = GuardContext {
				context: Arc::clone(&context),
				from,
				to: matched.clone(),
			};
			let guards: Vec<Arc<dyn RouteGuard>> = self
				.inner
				.config
				.guards
				.iter()
				.chain(matched.route.guards())
				.cloned()
				.collect();
			let outcome = run_chain(&guards, &guard_ctx).await;

			match outcome {
				GuardOutcome::Allow => {}
				GuardOutcome::Redirect(to) => {
					let max = self.inner.config.max_redirects;
					if redirects >= max {
						tracing::warn!(path = %target, redirect = %to, "redirect limit reached");
						return Err(NavigationFailure::new(
							NavigationFailureKind::Redirected,
							from_path,
							target,
						)
						.with_message(format!("more than {max} redirects"))
						.into());
					}
					let to = normalize_path(&to);
					tracing::info!(from = %target, to = %to, "navigation redirected by guard");
					return self.resolve_target(to, options, redirects + 1).await;
				}
				GuardOutcome::Deny(reason) => {
					tracing::info!(path = %target, reason = ?reason, "navigation rejected by guard");
					let failure =
						NavigationFailure::new(NavigationFailureKind::Aborted, from_path, target);
					return Err(match reason {
						Some(reason) => failure.with_message(reason),
						None => failure,
					}
					.into());
				}
			}

			let browser_path = normalize_path(&self.current_path());
			if target != browser_path || options.replace {
				self.write_history(&target, options.replace)?;
			}

			{
				let mut state = self.inner.state.lock();
				state.current_route = Some(matched.clone());
				state.current_context = Some(Arc::clone(&context));
			}
			tracing::info!(
				path = %target,
				route = matched.name().unwrap_or(matched.route.path()),
				"navigation committed"
			);

			matched
				.route
				.handler()
				.handle(Arc::clone(&context))
				.await
				.map_err(RouterError::Handler)?;

			Ok(NavigationOutcome::Committed(context))
		})
	}

	fn write_history(&self, target: &str, replace: bool) -> RouterResult<()> {
		let history = &self.inner.history;
		let result = match (self.inner.config.mode, replace) {
			(RouterMode::History, false) => history.push_state(&self.href(target)),
			(RouterMode::History, true) => history.replace_state(&self.href(target)),
			(RouterMode::Hash, false) => history.set_hash(target),
			(RouterMode::Hash, true) => history.replace_hash(target),
		};
		result.map_err(RouterError::History)
	}
}

fn params_map(params: &[(&str, &str)]) -> HashMap<String, String> {
	params
		.iter()
		.map(|(k, v)| (k.to_string(), v.to_string()))
		.collect()
}

/// Whether `target` would re-enter the committed location.
fn is_duplicate(state: &RouterState, target: &str, options: NavigateOptions) -> bool {
	!options.replace
		&& state.current_route.is_some()
		&& state
			.current_context
			.as_ref()
			.is_some_and(|ctx| ctx.full_path == target)
}
