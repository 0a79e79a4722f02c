//! Consumer-facing facade over a live session controller.

use std::sync::Arc;

use ids_client::Identity;
use tokio::sync::watch;

use crate::controller::{Inner, LoginOptions};
use crate::error::Result;
use crate::snapshot::Snapshot;

/// Shared handle letting a consumer observe and drive the session.
///
/// Obtainable only from a live [`SessionController`], so "accessor without a
/// controller" is unrepresentable rather than a runtime error. Clones are
/// cheap and all observe the same snapshot. An accessor stays usable after
/// the controller is torn down, but operations then perform no state writes.
///
/// [`SessionController`]: crate::controller::SessionController
#[derive(Clone)]
pub struct SessionAccessor {
	inner: Arc<Inner>,
	rx: watch::Receiver<Snapshot>,
}

impl SessionAccessor {
	pub(crate) fn new(inner: Arc<Inner>) -> Self {
		let rx = inner.subscribe();
		Self { inner, rx }
	}

	/// Current snapshot.
	pub fn snapshot(&self) -> Snapshot {
		self.rx.borrow().clone()
	}

	/// Whether the user is currently authenticated.
	pub fn is_authenticated(&self) -> bool {
		self.rx.borrow().is_authenticated()
	}

	/// Whether initialization has not yet completed.
	pub fn is_initializing(&self) -> bool {
		self.rx.borrow().is_initializing
	}

	/// Last failure message, when one is set.
	pub fn error(&self) -> Option<String> {
		self.rx.borrow().error.clone()
	}

	/// Credential of the authenticated user, when present.
	pub fn identity(&self) -> Option<Identity> {
		self.rx.borrow().identity().cloned()
	}

	/// Textual principal of the authenticated user, when one exists.
	pub fn principal_text(&self) -> Option<String> {
		self.rx.borrow().principal_text()
	}

	/// Waits for the next snapshot transition and returns the new value.
	pub async fn changed(&mut self) -> Snapshot {
		// the sender lives inside `inner`, which we hold, so this cannot
		// close while the accessor exists
		let _ = self.rx.changed().await;
		self.rx.borrow_and_update().clone()
	}

	/// Drives the provider login handshake through the controller.
	pub async fn login(&self, options: LoginOptions) -> Result<()> {
		self.inner.login(options).await
	}

	/// Best-effort remote logout; local session always goes anonymous.
	pub async fn logout(&self) -> Result<()> {
		self.inner.logout().await
	}

	/// Re-evaluates the session against the client; no-op without a handle.
	pub async fn refresh(&self) {
		self.inner.refresh().await;
	}
}
