//! services/api/src/adapters/identity.rs
//!
//! Implementations of the `IdentityProvider` port.

use async_trait::async_trait;
use course_search_core::domain::{Identity, Role};
use course_search_core::ports::{Credentials, IdentityProvider, PortError, PortResult};
use tracing::warn;

/// Trusts the identity headers set by the authenticating gateway in front of the service.
///
/// A missing role is treated as `student`, the least privileged role.
#[derive(Clone, Default)]
pub struct GatewayIdentityAdapter;

#[async_trait]
impl IdentityProvider for GatewayIdentityAdapter {
    async fn identify(&self, credentials: &Credentials) -> PortResult<Identity> {
        let uid = credentials
            .user_id
            .as_deref()
            .map(str::trim)
            .filter(|uid| !uid.is_empty())
            .ok_or(PortError::Unauthorized)?;

        let role = match credentials.role.as_deref() {
            None => Role::Student,
            Some(raw) => raw.parse::<Role>().map_err(|e| {
                warn!(uid, "Rejecting caller: {}", e);
                PortError::Unauthorized
            })?,
        };

        Ok(Identity {
            uid: uid.to_string(),
            role,
        })
    }
}

/// Identifies every caller as the same student, for local end-to-end runs.
#[derive(Clone)]
pub struct BypassIdentityAdapter {
    uid: String,
}

impl BypassIdentityAdapter {
    pub const DEFAULT_UID: &'static str = "e2e-user";

    pub fn new() -> Self {
        Self {
            uid: Self::DEFAULT_UID.to_string(),
        }
    }
}

impl Default for BypassIdentityAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for BypassIdentityAdapter {
    async fn identify(&self, _credentials: &Credentials) -> PortResult<Identity> {
        Ok(Identity {
            uid: self.uid.clone(),
            role: Role::Student,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(user_id: Option<&str>, role: Option<&str>) -> Credentials {
        Credentials {
            user_id: user_id.map(str::to_string),
            role: role.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_gateway_requires_user_id() {
        let adapter = GatewayIdentityAdapter;
        assert_eq!(
            adapter.identify(&creds(None, Some("teacher"))).await,
            Err(PortError::Unauthorized)
        );
        assert_eq!(
            adapter.identify(&creds(Some("  "), None)).await,
            Err(PortError::Unauthorized)
        );
    }

    #[tokio::test]
    async fn test_gateway_defaults_to_student() {
        let identity = GatewayIdentityAdapter
            .identify(&creds(Some("u1"), None))
            .await
            .expect("identity");
        assert_eq!(identity.role, Role::Student);
        assert_eq!(identity.uid, "u1");
    }

    #[tokio::test]
    async fn test_gateway_rejects_unknown_role() {
        assert_eq!(
            GatewayIdentityAdapter
                .identify(&creds(Some("u1"), Some("admin")))
                .await,
            Err(PortError::Unauthorized)
        );
    }

    #[tokio::test]
    async fn test_bypass_is_fixed_student() {
        let identity = BypassIdentityAdapter::new()
            .identify(&Credentials::default())
            .await
            .expect("identity");
        assert_eq!(identity.uid, BypassIdentityAdapter::DEFAULT_UID);
        assert_eq!(identity.role, Role::Student);
    }
}
