//! Session-core error taxonomy.

use thiserror::Error;

/// Convenience alias for session operation results.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Failures surfaced by session lifecycle operations.
///
/// Client messages pass through verbatim so the snapshot error state shows
/// exactly what the provider reported. Nothing here terminates the process;
/// every failure is local and recoverable by retrying the operation.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
	/// Identity client construction failed; fatal to initialization.
	#[error("{0}")]
	ClientCreation(String),
	/// The client could not report whether a session exists; fails closed.
	#[error("{0}")]
	SessionCheck(String),
	/// The provider login handshake failed.
	#[error("{0}")]
	Login(String),
	/// The best-effort remote logout failed; local state is still cleared.
	#[error("{0}")]
	Logout(String),
	/// Login was invoked before the client handle exists.
	#[error("identity client is not ready; initialization has not completed")]
	NotReady,
	/// Login was invoked while another attempt is still pending.
	#[error("a login attempt is already in progress")]
	LoginInProgress,
}
