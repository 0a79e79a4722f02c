//! Authoritative session state observed by consumers.

use ids_client::Identity;
use serde::{Deserialize, Serialize};

/// The core's belief about whether, and as whom, the user is signed in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Session {
	/// No authenticated user.
	#[default]
	Anonymous,
	/// Authenticated with the carried credential.
	Authenticated(Identity),
}

impl Session {
	/// Whether this is an authenticated session.
	pub fn is_authenticated(&self) -> bool {
		matches!(self, Session::Authenticated(_))
	}

	/// Credential for the authenticated session, when present.
	pub fn identity(&self) -> Option<&Identity> {
		match self {
			Session::Authenticated(identity) => Some(identity),
			Session::Anonymous => None,
		}
	}
}

/// Point-in-time view of session state.
///
/// Consistent with the most recently *completed* session operation;
/// overlapping operations are last-write-wins by design, since consumers want
/// the most recently known truth rather than the result of the oldest pending
/// check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
	/// Current session value.
	pub session: Session,
	/// True from controller construction until the first session read
	/// attempt completes, success or failure; never true again afterward.
	pub is_initializing: bool,
	/// Last failure message; cleared at the start of each new attempt.
	pub error: Option<String>,
}

impl Default for Snapshot {
	fn default() -> Self {
		Self {
			session: Session::Anonymous,
			is_initializing: true,
			error: None,
		}
	}
}

impl Snapshot {
	/// Whether the session is authenticated.
	pub fn is_authenticated(&self) -> bool {
		self.session.is_authenticated()
	}

	/// Credential for the authenticated session, when present.
	pub fn identity(&self) -> Option<&Identity> {
		self.session.identity()
	}

	/// Textual principal of the authenticated user, when one exists.
	pub fn principal_text(&self) -> Option<String> {
		self.session.identity().and_then(Identity::principal_text)
	}
}

#[cfg(test)]
mod tests {
	use ids_client::Principal;

	use super::*;

	#[test]
	fn default_snapshot_is_anonymous_and_initializing() {
		let snapshot = Snapshot::default();
		assert!(!snapshot.is_authenticated());
		assert!(snapshot.is_initializing);
		assert_eq!(snapshot.principal_text(), None);
		assert_eq!(snapshot.error, None);
	}

	#[test]
	fn authenticated_snapshot_exposes_principal() {
		let snapshot = Snapshot {
			session: Session::Authenticated(Identity::new(Principal::from_text("abc-def"))),
			is_initializing: false,
			error: None,
		};
		assert!(snapshot.is_authenticated());
		assert_eq!(snapshot.principal_text().as_deref(), Some("abc-def"));
	}

	#[test]
	fn identity_without_principal_yields_no_text() {
		let session = Session::Authenticated(Identity::without_principal());
		assert!(session.is_authenticated());
		assert!(session.identity().unwrap().principal_text().is_none());
	}
}
