//! Bridge between the provider's callback-pair login handshake and a future.
//!
//! The external client reports the outcome of a login handshake by invoking
//! exactly one of two completion callbacks. [`handshake_channel`] models that
//! pair as a [`HandshakeReply`] handed to the client and a [`HandshakeOutcome`]
//! awaited by the caller. The reply consumes `self` on completion, so
//! exactly-once is enforced by move semantics rather than runtime checks.

use std::time::Duration;

use tokio::sync::oneshot;

/// Default maximum session lifetime requested from the provider: 8 hours.
pub const DEFAULT_MAX_SESSION_LIFETIME: Duration = Duration::from_secs(8 * 60 * 60);

/// Fully resolved parameters for one login handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeRequest {
	/// Identity-provider URL the handshake is driven against.
	pub identity_provider: String,
	/// Maximum session lifetime the provider should grant.
	pub max_time_to_live: Duration,
}

/// Error reported through the provider's failure callback.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct HandshakeError {
	/// Human-readable provider message.
	pub message: String,
}

impl HandshakeError {
	/// Wraps a provider failure message.
	pub fn new(message: impl Into<String>) -> Self {
		Self { message: message.into() }
	}
}

/// Awaitable outcome of an in-flight handshake.
///
/// Resolves to `Err(RecvError)` only when the client dropped the reply
/// without completing it, which violates the client contract.
pub type HandshakeOutcome = oneshot::Receiver<std::result::Result<(), HandshakeError>>;

/// Consumed-once completion handle passed to the external client.
#[derive(Debug)]
pub struct HandshakeReply {
	tx: oneshot::Sender<std::result::Result<(), HandshakeError>>,
}

impl HandshakeReply {
	/// Reports a completed handshake.
	pub fn succeed(self) {
		let _ = self.tx.send(Ok(()));
	}

	/// Reports a failed handshake.
	pub fn fail(self, message: impl Into<String>) {
		let _ = self.tx.send(Err(HandshakeError::new(message)));
	}
}

/// Creates the reply handle and the outcome awaited by the caller.
pub fn handshake_channel() -> (HandshakeReply, HandshakeOutcome) {
	let (tx, rx) = oneshot::channel();
	(HandshakeReply { tx }, rx)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn success_callback_resolves_outcome() {
		let (reply, outcome) = handshake_channel();
		reply.succeed();
		assert!(outcome.await.unwrap().is_ok());
	}

	#[tokio::test]
	async fn error_callback_carries_message() {
		let (reply, outcome) = handshake_channel();
		reply.fail("user closed the window");
		let err = outcome.await.unwrap().unwrap_err();
		assert_eq!(err.to_string(), "user closed the window");
	}

	#[tokio::test]
	async fn dropped_reply_is_observable() {
		let (reply, outcome) = handshake_channel();
		drop(reply);
		assert!(outcome.await.is_err());
	}
}
