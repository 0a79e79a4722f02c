//! Credential and principal types issued by the external delegation protocol.

use serde::{Deserialize, Serialize};

/// Stable textual identifier for a user.
///
/// The delegation protocol issues the encoding; this crate carries it as
/// opaque text and never re-derives it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal(String);

impl Principal {
	/// Wraps a protocol-issued textual principal.
	pub fn from_text(text: impl Into<String>) -> Self {
		Self(text.into())
	}

	/// Returns the textual encoding.
	pub fn as_text(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Display for Principal {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

/// Opaque credential established by the delegation handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
	principal: Option<Principal>,
}

impl Identity {
	/// Credential carrying a known principal.
	pub fn new(principal: Principal) -> Self {
		Self { principal: Some(principal) }
	}

	/// Credential that cannot produce a principal.
	pub fn without_principal() -> Self {
		Self { principal: None }
	}

	/// Principal carried by this credential, when it can produce one.
	pub fn principal(&self) -> Option<&Principal> {
		self.principal.as_ref()
	}

	/// Textual principal encoding, when available.
	pub fn principal_text(&self) -> Option<String> {
		self.principal.as_ref().map(|p| p.0.clone())
	}
}
