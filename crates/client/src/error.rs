//! Error type for identity-provider client implementations.

use thiserror::Error;

/// Convenience alias for client-boundary results.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Failures surfaced by an external identity-provider client.
///
/// Messages pass through verbatim; the session core normalizes them into its
/// snapshot error state without rewording.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
	/// Client handle construction failed.
	#[error("{0}")]
	Creation(String),
	/// A protocol or transport call against an existing handle failed.
	#[error("{0}")]
	Protocol(String),
}
