//! Session state consulted by the navigation guards.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Read access to the signed-in user's session.
///
/// Implementations usually sit on top of a token kept in browser storage
/// and an API endpoint that validates it.
#[async_trait]
pub trait SessionStore: Send + Sync {
	/// Returns whether a user is signed in.
	async fn is_authenticated(&self) -> bool;

	/// Re-validates the session against its backing store.
	///
	/// # Errors
	///
	/// Returns an error if the backing store cannot be reached. Guards treat
	/// that as "state unchanged" and go on with what they know.
	async fn refresh(&self) -> anyhow::Result<()>;

	/// Returns the signed-in user's role, if any.
	async fn role(&self) -> Option<String>;
}

#[derive(Debug, Clone, Default)]
struct SessionState {
	user: Option<String>,
	role: Option<String>,
}

/// In-memory session for tests and development
///
/// # Examples
///
/// ```
/// use linkdash::session::MemorySession;
///
/// let session = MemorySession::new();
/// session.sign_in("ada", Some("admin"));
/// assert_eq!(session.user().as_deref(), Some("ada"));
/// ```
#[derive(Debug, Default)]
pub struct MemorySession {
	state: RwLock<SessionState>,
	refreshes: AtomicUsize,
}

impl MemorySession {
	/// Creates a signed-out session.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a session already signed in as `user`.
	pub fn signed_in(user: impl Into<String>, role: Option<&str>) -> Self {
		let session = Self::new();
		session.sign_in(user, role);
		session
	}

	/// Signs `user` in with an optional role.
	pub fn sign_in(&self, user: impl Into<String>, role: Option<&str>) {
		let mut state = self.state.write();
		state.user = Some(user.into());
		state.role = role.map(str::to_string);
	}

	/// Signs the current user out.
	pub fn sign_out(&self) {
		*self.state.write() = SessionState::default();
	}

	/// Returns the signed-in user.
	pub fn user(&self) -> Option<String> {
		self.state.read().user.clone()
	}

	/// Returns how many times the session was refreshed.
	pub fn refresh_count(&self) -> usize {
		self.refreshes.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl SessionStore for MemorySession {
	async fn is_authenticated(&self) -> bool {
		self.state.read().user.is_some()
	}

	async fn refresh(&self) -> anyhow::Result<()> {
		self.refreshes.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}

	async fn role(&self) -> Option<String> {
		self.state.read().role.clone()
	}
}
