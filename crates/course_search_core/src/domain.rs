//! crates/course_search_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any transport or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque key-value bag carried alongside a chunk. Never inspected by the core.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A unit of indexed course text.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentChunk {
    pub id: String,
    pub course_id: String,
    pub source: Option<String>,
    pub chunk_index: Option<i64>,
    pub title: Option<String>,
    pub headings: Option<Vec<String>>,
    /// The only field that is tokenized for ranking.
    pub content: String,
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A chunk as submitted by a writer, before the owning course is stamped on it.
#[derive(Debug, Clone, Default)]
pub struct NewChunk {
    pub id: Option<String>,
    pub source: Option<String>,
    pub chunk_index: Option<i64>,
    pub title: Option<String>,
    pub headings: Option<Vec<String>>,
    pub content: String,
    pub metadata: Metadata,
}

impl NewChunk {
    /// Turns the payload into a stored chunk owned by `course_id`.
    ///
    /// A missing id is replaced with a fresh UUID.
    pub fn into_chunk(self, course_id: &str, now: DateTime<Utc>) -> DocumentChunk {
        DocumentChunk {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            course_id: course_id.to_string(),
            source: self.source,
            chunk_index: self.chunk_index,
            title: self.title,
            headings: self.headings,
            content: self.content,
            metadata: self.metadata,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A partial update to a stored chunk. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ChunkPatch {
    pub source: Option<String>,
    pub chunk_index: Option<i64>,
    pub title: Option<String>,
    pub headings: Option<Vec<String>>,
    pub content: Option<String>,
    pub metadata: Option<Metadata>,
}

impl ChunkPatch {
    pub fn apply(self, chunk: &mut DocumentChunk, now: DateTime<Utc>) {
        if let Some(source) = self.source {
            chunk.source = Some(source);
        }
        if let Some(chunk_index) = self.chunk_index {
            chunk.chunk_index = Some(chunk_index);
        }
        if let Some(title) = self.title {
            chunk.title = Some(title);
        }
        if let Some(headings) = self.headings {
            chunk.headings = Some(headings);
        }
        if let Some(content) = self.content {
            chunk.content = content;
        }
        if let Some(metadata) = self.metadata {
            chunk.metadata = metadata;
        }
        chunk.updated_at = now;
    }
}

/// The role a caller holds in the course platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Teacher,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Who is calling, as established by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub role: Role,
}

/// A caller's stored access-control context.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub uid: String,
    pub role: Role,
    pub department: Option<String>,
    /// Enrolled course ids, in the order they were chosen, without duplicates.
    pub courses: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// The profile a caller gets on first access.
    pub fn new(identity: &Identity, now: DateTime<Utc>) -> Self {
        Self {
            uid: identity.uid.clone(),
            role: identity.role,
            department: None,
            courses: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A merge-update to a profile. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub role: Option<Role>,
    pub department: Option<String>,
    pub courses: Option<Vec<String>>,
}

impl ProfilePatch {
    pub fn apply(self, profile: &mut UserProfile, now: DateTime<Utc>) {
        if let Some(role) = self.role {
            profile.role = role;
        }
        if let Some(department) = self.department {
            profile.department = Some(department);
        }
        if let Some(courses) = self.courses {
            let mut enrolled: Vec<String> = Vec::with_capacity(courses.len());
            for course in courses {
                if !enrolled.contains(&course) {
                    enrolled.push(course);
                }
            }
            profile.courses = enrolled;
        }
        profile.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(content: &str) -> DocumentChunk {
        NewChunk {
            id: Some("c1".to_string()),
            content: content.to_string(),
            ..Default::default()
        }
        .into_chunk("cs101", Utc::now())
    }

    #[test]
    fn test_new_chunk_generates_id_when_absent() {
        let chunk = NewChunk {
            content: "beam search".to_string(),
            ..Default::default()
        }
        .into_chunk("cs101", Utc::now());

        assert!(Uuid::parse_str(&chunk.id).is_ok());
        assert_eq!(chunk.course_id, "cs101");
        assert_eq!(chunk.created_at, chunk.updated_at);
    }

    #[test]
    fn test_patch_only_touches_present_fields() {
        let mut chunk = stored("old content");
        chunk.title = Some("Intro".to_string());
        let created = chunk.created_at;
        let later = created + chrono::Duration::seconds(5);

        ChunkPatch {
            content: Some("new content".to_string()),
            ..Default::default()
        }
        .apply(&mut chunk, later);

        assert_eq!(chunk.content, "new content");
        assert_eq!(chunk.title.as_deref(), Some("Intro"));
        assert_eq!(chunk.created_at, created);
        assert_eq!(chunk.updated_at, later);
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("Teacher".parse::<Role>(), Ok(Role::Teacher));
        assert_eq!(" student ".parse::<Role>(), Ok(Role::Student));
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_profile_patch_dedupes_courses_in_order() {
        let identity = Identity {
            uid: "u1".to_string(),
            role: Role::Student,
        };
        let mut profile = UserProfile::new(&identity, Utc::now());

        ProfilePatch {
            courses: Some(vec!["b".into(), "a".into(), "b".into()]),
            ..Default::default()
        }
        .apply(&mut profile, Utc::now());

        assert_eq!(profile.courses, vec!["b", "a"]);
        assert_eq!(profile.role, Role::Student);
    }
}
