//! Fake identity client for testing the session core without a provider.
//!
//! Mirrors the production contract while exposing a controller that flips
//! authenticated state, injects failures, pauses session checks, holds login
//! handshakes open, and records every call made against the handle.
//!
//! # Example
//!
//! ```ignore
//! let (client, ctl) = FakeClientBuilder::new().authenticated("abc-def").build();
//! let controller = SessionController::new(
//!     Box::new(FakeConnector::new(client)),
//!     ProviderResolver::fixed("https://id.test"),
//! );
//! controller.initialize().await;
//! assert_eq!(ctl.logout_calls(), 0);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::client::{ClientConnector, IdentityClient};
use crate::error::{ClientError, Result};
use crate::handshake::{HandshakeReply, HandshakeRequest};
use crate::identity::{Identity, Principal};

struct State {
	authenticated: Mutex<bool>,
	identity: Mutex<Identity>,
	check_failure: Mutex<Option<String>>,
	logout_failure: Mutex<Option<String>>,
	hold_handshakes: Mutex<bool>,
	held: Mutex<Vec<HandshakeReply>>,
	requests: Mutex<Vec<HandshakeRequest>>,
	check_calls: AtomicUsize,
	logout_calls: AtomicUsize,
	paused: watch::Sender<bool>,
}

/// Builder for a fake client and its controller.
pub struct FakeClientBuilder {
	authenticated: bool,
	identity: Identity,
	check_failure: Option<String>,
	logout_failure: Option<String>,
	hold_handshakes: bool,
}

impl FakeClientBuilder {
	/// Starts from an unauthenticated client with no principal.
	pub fn new() -> Self {
		Self {
			authenticated: false,
			identity: Identity::without_principal(),
			check_failure: None,
			logout_failure: None,
			hold_handshakes: false,
		}
	}

	/// Starts authenticated as `principal`.
	pub fn authenticated(mut self, principal: &str) -> Self {
		self.authenticated = true;
		self.identity = Identity::new(Principal::from_text(principal));
		self
	}

	/// Sets the identity a successful handshake establishes.
	pub fn login_as(mut self, principal: &str) -> Self {
		self.identity = Identity::new(Principal::from_text(principal));
		self
	}

	/// Makes every session check fail with `message`.
	pub fn check_failure(mut self, message: &str) -> Self {
		self.check_failure = Some(message.to_string());
		self
	}

	/// Makes every remote logout fail with `message`.
	pub fn logout_failure(mut self, message: &str) -> Self {
		self.logout_failure = Some(message.to_string());
		self
	}

	/// Captures handshake replies instead of completing them immediately.
	///
	/// The controller then completes (or abandons) each handshake manually.
	pub fn hold_handshakes(mut self) -> Self {
		self.hold_handshakes = true;
		self
	}

	/// Builds the fake client and the controller that scripts it.
	pub fn build(self) -> (FakeIdentityClient, FakeClientController) {
		let (paused, _) = watch::channel(false);
		let state = Arc::new(State {
			authenticated: Mutex::new(self.authenticated),
			identity: Mutex::new(self.identity),
			check_failure: Mutex::new(self.check_failure),
			logout_failure: Mutex::new(self.logout_failure),
			hold_handshakes: Mutex::new(self.hold_handshakes),
			held: Mutex::new(Vec::new()),
			requests: Mutex::new(Vec::new()),
			check_calls: AtomicUsize::new(0),
			logout_calls: AtomicUsize::new(0),
			paused,
		});
		(
			FakeIdentityClient { state: Arc::clone(&state) },
			FakeClientController { state },
		)
	}
}

impl Default for FakeClientBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Scriptable in-memory stand-in for an external identity client.
#[derive(Clone)]
pub struct FakeIdentityClient {
	state: Arc<State>,
}

#[async_trait]
impl IdentityClient for FakeIdentityClient {
	async fn is_authenticated(&self) -> Result<bool> {
		self.state.check_calls.fetch_add(1, Ordering::SeqCst);
		let mut paused = self.state.paused.subscribe();
		while *paused.borrow_and_update() {
			if paused.changed().await.is_err() {
				break;
			}
		}
		if let Some(message) = self.state.check_failure.lock().clone() {
			return Err(ClientError::Protocol(message));
		}
		Ok(*self.state.authenticated.lock())
	}

	fn identity(&self) -> Identity {
		self.state.identity.lock().clone()
	}

	async fn login(&self, request: HandshakeRequest, reply: HandshakeReply) {
		self.state.requests.lock().push(request);
		if *self.state.hold_handshakes.lock() {
			self.state.held.lock().push(reply);
			return;
		}
		// immediate mode: the handshake establishes a session right away
		*self.state.authenticated.lock() = true;
		reply.succeed();
	}

	async fn logout(&self) -> Result<()> {
		self.state.logout_calls.fetch_add(1, Ordering::SeqCst);
		*self.state.authenticated.lock() = false;
		match self.state.logout_failure.lock().clone() {
			Some(message) => Err(ClientError::Protocol(message)),
			None => Ok(()),
		}
	}
}

/// Controller for scripting a [`FakeIdentityClient`] and inspecting calls.
pub struct FakeClientController {
	state: Arc<State>,
}

impl FakeClientController {
	/// Flips whether the client reports an existing session.
	pub fn set_authenticated(&self, authenticated: bool) {
		*self.state.authenticated.lock() = authenticated;
	}

	/// Replaces the identity the client hands out.
	pub fn set_identity(&self, identity: Identity) {
		*self.state.identity.lock() = identity;
	}

	/// Injects (or clears) a session-check failure.
	pub fn set_check_failure(&self, message: Option<&str>) {
		*self.state.check_failure.lock() = message.map(str::to_string);
	}

	/// Blocks session checks until [`resume_checks`](Self::resume_checks).
	pub fn pause_checks(&self) {
		// send_replace stores the value even while no check is subscribed
		self.state.paused.send_replace(true);
	}

	/// Releases session checks blocked by [`pause_checks`](Self::pause_checks).
	pub fn resume_checks(&self) {
		self.state.paused.send_replace(false);
	}

	/// Completes the oldest held handshake; returns false when none is held.
	///
	/// A success outcome also flips the client to authenticated, matching
	/// immediate mode.
	pub fn complete_next_handshake(&self, outcome: std::result::Result<(), &str>) -> bool {
		let Some(reply) = self.pop_held() else {
			return false;
		};
		match outcome {
			Ok(()) => {
				*self.state.authenticated.lock() = true;
				reply.succeed();
			}
			Err(message) => reply.fail(message),
		}
		true
	}

	/// Drops the oldest held handshake without completing it.
	///
	/// Simulates a client that violates the exactly-once callback contract.
	pub fn abandon_next_handshake(&self) -> bool {
		self.pop_held().is_some()
	}

	/// Number of handshakes currently held open.
	pub fn held_handshakes(&self) -> usize {
		self.state.held.lock().len()
	}

	/// Every handshake request the client has received, in order.
	pub fn requests(&self) -> Vec<HandshakeRequest> {
		self.state.requests.lock().clone()
	}

	/// Number of session checks the client has received, counted at entry
	/// (before any pause gate).
	pub fn check_calls(&self) -> usize {
		self.state.check_calls.load(Ordering::SeqCst)
	}

	/// Number of remote logout calls made against the client.
	pub fn logout_calls(&self) -> usize {
		self.state.logout_calls.load(Ordering::SeqCst)
	}

	fn pop_held(&self) -> Option<HandshakeReply> {
		let mut held = self.state.held.lock();
		if held.is_empty() { None } else { Some(held.remove(0)) }
	}
}

/// Connector yielding a prepared fake client, or a scripted creation failure.
pub struct FakeConnector {
	client: Option<FakeIdentityClient>,
	failure: Option<String>,
}

impl FakeConnector {
	/// Connector that hands out clones of `client`.
	pub fn new(client: FakeIdentityClient) -> Self {
		Self { client: Some(client), failure: None }
	}

	/// Connector whose every connect attempt fails with `message`.
	pub fn failing(message: &str) -> Self {
		Self { client: None, failure: Some(message.to_string()) }
	}
}

#[async_trait]
impl ClientConnector for FakeConnector {
	async fn connect(&self) -> Result<Box<dyn IdentityClient>> {
		if let Some(message) = &self.failure {
			return Err(ClientError::Creation(message.clone()));
		}
		match &self.client {
			Some(client) => Ok(Box::new(client.clone())),
			None => Err(ClientError::Creation("no client configured".to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::handshake::{DEFAULT_MAX_SESSION_LIFETIME, handshake_channel};

	#[tokio::test]
	async fn immediate_mode_completes_handshakes_authenticated() {
		let (client, ctl) = FakeClientBuilder::new().login_as("user-1").build();
		let (reply, outcome) = handshake_channel();
		client
			.login(
				HandshakeRequest {
					identity_provider: "https://id.test".to_string(),
					max_time_to_live: DEFAULT_MAX_SESSION_LIFETIME,
				},
				reply,
			)
			.await;
		assert!(outcome.await.unwrap().is_ok());
		assert!(client.is_authenticated().await.unwrap());
		assert_eq!(ctl.requests().len(), 1);
	}

	#[tokio::test]
	async fn held_handshakes_wait_for_the_controller() {
		let (client, ctl) = FakeClientBuilder::new().hold_handshakes().build();
		let (reply, outcome) = handshake_channel();
		client
			.login(
				HandshakeRequest {
					identity_provider: "https://id.test".to_string(),
					max_time_to_live: DEFAULT_MAX_SESSION_LIFETIME,
				},
				reply,
			)
			.await;
		assert_eq!(ctl.held_handshakes(), 1);
		assert!(ctl.complete_next_handshake(Err("user closed the window")));
		let err = outcome.await.unwrap().unwrap_err();
		assert_eq!(err.to_string(), "user closed the window");
	}

	#[tokio::test]
	async fn paused_checks_resolve_after_resume() {
		let (client, ctl) = FakeClientBuilder::new().authenticated("abc").build();
		ctl.pause_checks();
		let pending = tokio::spawn(async move { client.is_authenticated().await });
		ctl.resume_checks();
		assert!(pending.await.unwrap().unwrap());
	}
}
