//! services/api/src/adapters/profiles.rs
//!
//! An in-memory implementation of the `ProfileStore` port. Profiles live for
//! the lifetime of the process.

use async_trait::async_trait;
use chrono::Utc;
use course_search_core::domain::{Identity, ProfilePatch, UserProfile};
use course_search_core::ports::{PortResult, ProfileStore};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
pub struct InMemoryProfileAdapter {
    profiles: RwLock<HashMap<String, UserProfile>>,
}

impl InMemoryProfileAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileAdapter {
    async fn get_or_create(&self, identity: &Identity) -> PortResult<UserProfile> {
        if let Some(profile) = self.profiles.read().get(&identity.uid) {
            return Ok(profile.clone());
        }
        let mut profiles = self.profiles.write();
        let profile = profiles
            .entry(identity.uid.clone())
            .or_insert_with(|| UserProfile::new(identity, Utc::now()));
        Ok(profile.clone())
    }

    async fn upsert(&self, identity: &Identity, patch: ProfilePatch) -> PortResult<UserProfile> {
        let now = Utc::now();
        let mut profiles = self.profiles.write();
        let profile = profiles
            .entry(identity.uid.clone())
            .or_insert_with(|| UserProfile::new(identity, now));
        patch.apply(profile, now);
        Ok(profile.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_search_core::domain::Role;

    fn student(uid: &str) -> Identity {
        Identity {
            uid: uid.to_string(),
            role: Role::Student,
        }
    }

    #[tokio::test]
    async fn test_first_access_creates_default_profile() {
        let store = InMemoryProfileAdapter::new();
        let profile = store.get_or_create(&student("u1")).await.expect("profile");
        assert_eq!(profile.uid, "u1");
        assert_eq!(profile.role, Role::Student);
        assert!(profile.courses.is_empty());

        let again = store.get_or_create(&student("u1")).await.expect("profile");
        assert_eq!(again.created_at, profile.created_at);
    }

    #[tokio::test]
    async fn test_upsert_merges_fields() {
        let store = InMemoryProfileAdapter::new();
        let identity = student("u1");
        store
            .upsert(
                &identity,
                ProfilePatch {
                    department: Some("CS".into()),
                    courses: Some(vec!["cs101".into()]),
                    ..Default::default()
                },
            )
            .await
            .expect("first upsert");

        let updated = store
            .upsert(
                &identity,
                ProfilePatch {
                    courses: Some(vec!["cs101".into(), "ml201".into()]),
                    ..Default::default()
                },
            )
            .await
            .expect("second upsert");

        assert_eq!(updated.department.as_deref(), Some("CS"));
        assert_eq!(updated.courses, vec!["cs101", "ml201"]);
        assert_eq!(updated.role, Role::Student);
        assert!(updated.updated_at >= updated.created_at);
    }
}
