//! crates/course_search_core/src/ports.rs
//!
//! Defines the service contracts (traits) the core consumes from the outside world.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of how callers are authenticated or where profiles live.

use async_trait::async_trait;

use crate::domain::{Identity, ProfilePatch, UserProfile};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The error type shared by the ports and the retrieval core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Raw, unverified caller claims lifted off a request by the transport layer.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub user_id: Option<String>,
    pub role: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves the caller behind a request, or fails with `Unauthorized`.
    async fn identify(&self, credentials: &Credentials) -> PortResult<Identity>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Returns the caller's profile, creating a default one on first access.
    async fn get_or_create(&self, identity: &Identity) -> PortResult<UserProfile>;

    /// Merges `patch` into the caller's profile and returns the stored result.
    async fn upsert(&self, identity: &Identity, patch: ProfilePatch) -> PortResult<UserProfile>;
}
