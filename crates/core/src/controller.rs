//! Session lifecycle controller and orchestration.
//!
//! One controller owns one identity-client handle for its whole lifetime.
//! Every operation funnels through the same internals and mutates the same
//! watch-carried snapshot; overlapping session reads are last-write-wins.
//! Dropping the controller fires the teardown signal: operations still in
//! flight run to completion but their results are discarded at the single
//! snapshot-write gate, so nothing is written into a discarded scope.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use ids_client::{
	ClientConnector, DEFAULT_MAX_SESSION_LIFETIME, HandshakeError, HandshakeRequest,
	IdentityClient, handshake_channel,
};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::accessor::SessionAccessor;
use crate::error::{Result, SessionError};
use crate::provider::ProviderResolver;
use crate::snapshot::{Session, Snapshot};

/// Caller-supplied configuration for one login attempt.
#[derive(Debug, Clone, Default)]
pub struct LoginOptions {
	/// Overrides the resolved identity-provider URL.
	pub identity_provider: Option<String>,
	/// Overrides the default maximum session lifetime (8 hours).
	pub max_time_to_live: Option<Duration>,
}

impl LoginOptions {
	/// Sets an explicit identity-provider URL for this attempt.
	pub fn with_identity_provider(mut self, url: impl Into<String>) -> Self {
		self.identity_provider = Some(url.into());
		self
	}

	/// Sets the maximum session lifetime requested from the provider.
	pub fn with_max_time_to_live(mut self, ttl: Duration) -> Self {
		self.max_time_to_live = Some(ttl);
		self
	}
}

/// Owns the single identity-client handle and the authoritative snapshot.
pub struct SessionController {
	inner: Arc<Inner>,
}

impl SessionController {
	/// Creates a controller wired to an explicit connector and resolver.
	pub fn new(connector: Box<dyn ClientConnector>, resolver: ProviderResolver) -> Self {
		let (snapshot, _) = watch::channel(Snapshot::default());
		Self {
			inner: Arc::new(Inner {
				connector,
				resolver,
				snapshot,
				client: OnceLock::new(),
				torn_down: AtomicBool::new(false),
				login_in_flight: AtomicBool::new(false),
			}),
		}
	}

	/// Hands out an accessor for an independent consumer.
	pub fn accessor(&self) -> SessionAccessor {
		SessionAccessor::new(Arc::clone(&self.inner))
	}

	/// Current snapshot.
	pub fn snapshot(&self) -> Snapshot {
		self.inner.snapshot.borrow().clone()
	}

	/// Creates the client handle and reads any existing session.
	///
	/// Invoked once at startup. Creation failure records the error and leaves
	/// the session anonymous; the initializing flag clears on every exit path
	/// so consumers can always detect end-of-initialization.
	pub async fn initialize(&self) {
		self.inner.initialize().await;
	}

	/// Drives the provider login handshake and re-reads the session.
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

	/// Fires the teardown signal without waiting for drop.
	pub fn teardown(&self) {
		self.inner.torn_down.store(true, Ordering::SeqCst);
	}
}

impl Drop for SessionController {
	fn drop(&mut self) {
		self.inner.torn_down.store(true, Ordering::SeqCst);
	}
}

pub(crate) struct Inner {
	connector: Box<dyn ClientConnector>,
	resolver: ProviderResolver,
	snapshot: watch::Sender<Snapshot>,
	client: OnceLock<Arc<dyn IdentityClient>>,
	torn_down: AtomicBool,
	login_in_flight: AtomicBool,
}

impl Inner {
	pub(crate) fn subscribe(&self) -> watch::Receiver<Snapshot> {
		self.snapshot.subscribe()
	}

	/// Single write gate: every snapshot mutation checks teardown first.
	fn write(&self, mutate: impl FnOnce(&mut Snapshot)) {
		if self.torn_down.load(Ordering::SeqCst) {
			return;
		}
		self.snapshot.send_modify(mutate);
	}

	fn record_failure(&self, err: &SessionError) {
		self.write(|s| s.error = Some(err.to_string()));
	}

	fn client(&self) -> Option<Arc<dyn IdentityClient>> {
		self.client.get().map(Arc::clone)
	}

	pub(crate) async fn initialize(&self) {
		// clears the initializing flag on every exit path
		let _done = InitializeGuard { inner: self };
		self.write(|s| s.error = None);

		debug!(target = "ids.session", "creating identity client");
		match self.connector.connect().await {
			Ok(client) => {
				if self.torn_down.load(Ordering::SeqCst) {
					return;
				}
				let client: Arc<dyn IdentityClient> = Arc::from(client);
				if self.client.set(Arc::clone(&client)).is_err() {
					warn!(
						target = "ids.session",
						"initialize ran twice; keeping the original client handle"
					);
					return;
				}
				self.read_session(&client).await;
			}
			Err(err) => {
				let err = SessionError::ClientCreation(err.to_string());
				debug!(target = "ids.session", error = %err, "identity client creation failed");
				self.record_failure(&err);
			}
		}
	}

	/// Queries the client and settles the session from the answer.
	///
	/// Fail-closed: an unreadable session is treated as logged out, never as
	/// unknown or still authenticated.
	async fn read_session(&self, client: &Arc<dyn IdentityClient>) {
		match client.is_authenticated().await {
			Ok(true) => {
				let identity = client.identity();
				debug!(
					target = "ids.session",
					principal = identity.principal_text().as_deref().unwrap_or("<none>"),
					"session is authenticated"
				);
				self.write(|s| s.session = Session::Authenticated(identity));
			}
			Ok(false) => {
				debug!(target = "ids.session", "no existing session");
				self.write(|s| s.session = Session::Anonymous);
			}
			Err(err) => {
				let err = SessionError::SessionCheck(err.to_string());
				warn!(target = "ids.session", error = %err, "session check failed; failing closed");
				self.write(|s| {
					s.error = Some(err.to_string());
					s.session = Session::Anonymous;
				});
			}
		}
	}

	pub(crate) async fn login(&self, options: LoginOptions) -> Result<()> {
		if self.login_in_flight.swap(true, Ordering::SeqCst) {
			return Err(SessionError::LoginInProgress);
		}
		let _flight = FlightGuard { flag: &self.login_in_flight };

		self.write(|s| s.error = None);
		let Some(client) = self.client() else {
			self.record_failure(&SessionError::NotReady);
			return Ok(());
		};

		let request = HandshakeRequest {
			identity_provider: options
				.identity_provider
				.unwrap_or_else(|| self.resolver.resolve()),
			max_time_to_live: options
				.max_time_to_live
				.unwrap_or(DEFAULT_MAX_SESSION_LIFETIME),
		};
		debug!(
			target = "ids.session",
			provider = %request.identity_provider,
			"starting login handshake"
		);

		let (reply, outcome) = handshake_channel();
		client.login(request, reply).await;

		// suspension point: the provider drives the handshake to one outcome
		let outcome = outcome.await.unwrap_or_else(|_| {
			Err(HandshakeError::new(
				"login handshake was abandoned without an outcome",
			))
		});
		if self.torn_down.load(Ordering::SeqCst) {
			return Ok(());
		}
		match outcome {
			Ok(()) => {
				self.read_session(&client).await;
				Ok(())
			}
			Err(err) => {
				let err = SessionError::Login(err.to_string());
				self.record_failure(&err);
				Err(err)
			}
		}
	}

	pub(crate) async fn logout(&self) -> Result<()> {
		self.write(|s| s.error = None);
		let Some(client) = self.client() else {
			return Ok(());
		};

		let remote = client.logout().await;
		// local state goes anonymous even when the remote call failed
		self.write(|s| s.session = Session::Anonymous);
		match remote {
			Ok(()) => Ok(()),
			Err(err) => {
				let err = SessionError::Logout(err.to_string());
				warn!(target = "ids.session", error = %err, "remote logout failed; local session cleared");
				self.record_failure(&err);
				Err(err)
			}
		}
	}

	pub(crate) async fn refresh(&self) {
		if let Some(client) = self.client() {
			self.read_session(&client).await;
		}
	}
}

struct InitializeGuard<'a> {
	inner: &'a Inner,
}

impl Drop for InitializeGuard<'_> {
	fn drop(&mut self) {
		self.inner.write(|s| s.is_initializing = false);
	}
}

struct FlightGuard<'a> {
	flag: &'a AtomicBool,
}

impl Drop for FlightGuard<'_> {
	fn drop(&mut self) {
		self.flag.store(false, Ordering::SeqCst);
	}
}

#[cfg(test)]
mod tests {
	use ids_client::fake::{FakeClientBuilder, FakeConnector};

	use super::*;

	fn controller_for(client: ids_client::fake::FakeIdentityClient) -> SessionController {
		SessionController::new(
			Box::new(FakeConnector::new(client)),
			ProviderResolver::fixed("https://id.test"),
		)
	}

	#[tokio::test]
	async fn teardown_gates_all_snapshot_writes() {
		let (client, _ctl) = FakeClientBuilder::new().build();
		let controller = controller_for(client);
		controller.teardown();
		controller.initialize().await;
		// still the pristine snapshot: not even the initializing flag moved
		assert!(controller.snapshot().is_initializing);
	}

	#[tokio::test]
	async fn login_options_override_resolver_and_lifetime() {
		let (client, ctl) = FakeClientBuilder::new().login_as("user-1").build();
		let controller = controller_for(client);
		controller.initialize().await;
		controller
			.login(
				LoginOptions::default()
					.with_identity_provider("https://override.test")
					.with_max_time_to_live(Duration::from_secs(60)),
			)
			.await
			.unwrap();

		let requests = ctl.requests();
		assert_eq!(requests.len(), 1);
		assert_eq!(requests[0].identity_provider, "https://override.test");
		assert_eq!(requests[0].max_time_to_live, Duration::from_secs(60));
	}

	#[tokio::test]
	async fn login_defaults_use_resolver_and_eight_hours() {
		let (client, ctl) = FakeClientBuilder::new().login_as("user-1").build();
		let controller = controller_for(client);
		controller.initialize().await;
		controller.login(LoginOptions::default()).await.unwrap();

		let requests = ctl.requests();
		assert_eq!(requests[0].identity_provider, "https://id.test");
		assert_eq!(requests[0].max_time_to_live, DEFAULT_MAX_SESSION_LIFETIME);
	}
}
