//! Contracts and data types at the identity-provider boundary.
//!
//! This crate defines the seam between the session core and the external
//! delegated-identity client: the [`IdentityClient`] handle contract, the
//! [`ClientConnector`] factory that produces it, the credential types the
//! protocol issues, and the bridge that turns the provider's success/error
//! callback pair into a single awaitable outcome.
//!
//! The delegation protocol itself is out of scope; everything here treats the
//! client as opaque. A fully scriptable [`fake`] client ships in-tree so the
//! core (and downstream crates) can test against the contract without a
//! provider.

/// Client handle and connector contracts.
pub mod client;
/// Boundary error type.
pub mod error;
/// Scriptable fake client and controller for tests.
pub mod fake;
/// Login handshake request and callback-pair bridge.
pub mod handshake;
/// Credential and principal data types.
pub mod identity;

pub use client::{ClientConnector, IdentityClient};
pub use error::{ClientError, Result};
pub use handshake::{
	DEFAULT_MAX_SESSION_LIFETIME, HandshakeError, HandshakeOutcome, HandshakeReply,
	HandshakeRequest, handshake_channel,
};
pub use identity::{Identity, Principal};
