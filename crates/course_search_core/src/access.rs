//! crates/course_search_core/src/access.rs
//!
//! Decides which courses a caller may see in cross-course results.

use std::collections::HashSet;

use crate::domain::{Identity, Role, UserProfile};
use crate::ports::{PortError, PortResult};

pub const ONBOARDING_REQUIRED: &str = "No courses selected. Complete onboarding first.";

/// A caller as the access filter sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Teacher,
    /// A student and the courses they are enrolled in.
    Student(Vec<String>),
}

impl Principal {
    /// Combines the authenticated role with the enrollment stored in the profile.
    pub fn new(identity: &Identity, profile: &UserProfile) -> Self {
        match identity.role {
            Role::Teacher => Principal::Teacher,
            Role::Student => Principal::Student(profile.courses.clone()),
        }
    }
}

/// The set of courses a cross-course query may return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisibilityScope {
    Unrestricted,
    Courses(HashSet<String>),
}

impl VisibilityScope {
    pub fn allows(&self, course_id: &str) -> bool {
        match self {
            VisibilityScope::Unrestricted => true,
            VisibilityScope::Courses(courses) => courses.contains(course_id),
        }
    }
}

/// Resolves the visibility scope for `principal`.
///
/// Students without any enrollment are rejected rather than given an empty scope.
pub fn resolve_scope(principal: &Principal) -> PortResult<VisibilityScope> {
    match principal {
        Principal::Teacher => Ok(VisibilityScope::Unrestricted),
        Principal::Student(courses) if courses.is_empty() => {
            Err(PortError::Forbidden(ONBOARDING_REQUIRED.to_string()))
        }
        Principal::Student(courses) => {
            Ok(VisibilityScope::Courses(courses.iter().cloned().collect()))
        }
    }
}
