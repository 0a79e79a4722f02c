//! Session lifecycle management for delegated identity providers.
//!
//! The [`SessionController`] owns exactly one handle to the external identity
//! client, drives its asynchronous initialization, mediates
//! login/logout/refresh against it, and publishes a race-safe [`Snapshot`]
//! that any number of [`SessionAccessor`] consumers observe. Accessors exist
//! only by way of a live controller, so mis-wiring cannot compile.

/// Consumer-facing read/operate facade.
pub mod accessor;
/// Session lifecycle controller and orchestration.
pub mod controller;
/// Session-core error taxonomy.
pub mod error;
/// Identity-provider URL resolution.
pub mod provider;
/// Session and snapshot state model.
pub mod snapshot;

pub use accessor::SessionAccessor;
pub use controller::{LoginOptions, SessionController};
pub use error::{Result, SessionError};
pub use provider::ProviderResolver;
pub use snapshot::{Session, Snapshot};

/// Boundary contracts re-exported for consumers implementing real clients.
pub use ids_client as client;
