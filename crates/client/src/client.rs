//! Contracts implemented by external identity-provider clients.

use async_trait::async_trait;

use crate::error::Result;
use crate::handshake::{HandshakeReply, HandshakeRequest};
use crate::identity::Identity;

/// Handle to an external delegated-identity client.
///
/// One handle is created per controller lifetime and shared by every session
/// operation. Each method is non-blocking and atomic from the caller's point
/// of view; no mutual exclusion is layered on top.
#[async_trait]
pub trait IdentityClient: Send + Sync {
	/// Whether the client currently holds a valid session.
	async fn is_authenticated(&self) -> Result<bool>;

	/// Credential for the current session.
	///
	/// Synchronous; valid when the handle is authenticated.
	fn identity(&self) -> Identity;

	/// Starts the provider-driven login handshake.
	///
	/// Returns once the handshake is launched. The client consumes `reply`
	/// exactly once, on whichever of success or failure the provider reports.
	async fn login(&self, request: HandshakeRequest, reply: HandshakeReply);

	/// Best-effort remote session termination.
	async fn logout(&self) -> Result<()>;
}

/// Factory producing the process-wide client handle.
#[async_trait]
pub trait ClientConnector: Send + Sync {
	/// Creates the client handle.
	///
	/// Fails with `ClientError::Creation`; the caller treats that as fatal to
	/// initialization but recoverable by retrying with a new controller.
	async fn connect(&self) -> Result<Box<dyn IdentityClient>>;
}
