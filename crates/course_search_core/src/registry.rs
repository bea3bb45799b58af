//! crates/course_search_core/src/registry.rs
//!
//! Owns every lexical index: one per course, plus a global index mirroring all of them.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::domain::DocumentChunk;
use crate::lexical::{LexicalIndex, ScopedKey};
use crate::ports::{PortError, PortResult};

/// The index holding a single course's chunks, keyed by chunk id.
pub type CourseIndex = LexicalIndex<String>;
/// The cross-course index, keyed by `(course_id, chunk_id)`.
pub type GlobalIndex = LexicalIndex<ScopedKey>;

/// Keeps course indexes and the global index in lock-step.
///
/// The two writes behind [`IndexRegistry::write`] and [`IndexRegistry::delete`]
/// each lock only their own index; nothing serializes a write against a
/// delete of the same chunk. Readers can therefore see a chunk in one index
/// but not the other, and an interleaving such as course upsert, then a full
/// delete, then global upsert leaves the chunk in the global index only until
/// it is written or deleted again.
#[derive(Debug, Default)]
pub struct IndexRegistry {
    courses: RwLock<HashMap<String, Arc<CourseIndex>>>,
    global: GlobalIndex,
}

impl IndexRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the course's index, creating an empty one on first reference.
    pub fn get_or_create_course_index(&self, course_id: &str) -> Arc<CourseIndex> {
        if let Some(index) = self.courses.read().get(course_id) {
            return Arc::clone(index);
        }
        let mut courses = self.courses.write();
        let index = courses.entry(course_id.to_string()).or_insert_with(|| {
            debug!(course_id, "creating course index");
            Arc::new(CourseIndex::new())
        });
        Arc::clone(index)
    }

    fn course_index(&self, course_id: &str) -> Option<Arc<CourseIndex>> {
        self.courses.read().get(course_id).cloned()
    }

    pub fn global(&self) -> &GlobalIndex {
        &self.global
    }

    /// Upserts the chunk into its course's index and into the global index.
    pub fn write(&self, chunk: DocumentChunk) {
        self.get_or_create_course_index(&chunk.course_id)
            .upsert(chunk.clone());
        self.global.upsert(chunk);
    }

    /// Upserts a batch owned by `course_id`, rebuilding each index once.
    pub fn write_all(&self, course_id: &str, chunks: &[DocumentChunk]) {
        if chunks.is_empty() {
            return;
        }
        debug_assert!(chunks.iter().all(|c| c.course_id == course_id));
        self.get_or_create_course_index(course_id)
            .upsert_many(chunks.iter().cloned());
        self.global.upsert_many(chunks.iter().cloned());
    }

    /// Removes a chunk from its course and from the global index.
    pub fn delete(&self, course_id: &str, chunk_id: &str) -> PortResult<()> {
        let removed = self
            .course_index(course_id)
            .is_some_and(|index| index.delete(&chunk_id.to_string()));
        if !removed {
            return Err(PortError::NotFound(format!(
                "document '{}' in course '{}'",
                chunk_id, course_id
            )));
        }
        self.global.delete(&ScopedKey::new(course_id, chunk_id));
        Ok(())
    }

    pub fn get(&self, course_id: &str, chunk_id: &str) -> Option<DocumentChunk> {
        self.course_index(course_id)?.get(&chunk_id.to_string())
    }

    /// Known course ids, sorted.
    pub fn course_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.courses.read().keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewChunk;
    use chrono::Utc;

    fn chunk_in(course: &str, id: &str, content: &str) -> DocumentChunk {
        NewChunk {
            id: Some(id.to_string()),
            content: content.to_string(),
            ..Default::default()
        }
        .into_chunk(course, Utc::now())
    }

    fn assert_mirrored(registry: &IndexRegistry, course: &str, id: &str) {
        let local = registry.get(course, id);
        let global = registry.global().get(&ScopedKey::new(course, id));
        assert_eq!(
            local.as_ref().map(|c| &c.content),
            global.as_ref().map(|c| &c.content),
            "course and global index disagree on {course}/{id}"
        );
    }

    #[test]
    fn test_get_or_create_returns_same_index() {
        let registry = IndexRegistry::new();
        let a = registry.get_or_create_course_index("cs101");
        let b = registry.get_or_create_course_index("cs101");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.course_ids(), vec!["cs101"]);
    }

    #[test]
    fn test_write_mirrors_into_global() {
        let registry = IndexRegistry::new();
        registry.write(chunk_in("cs101", "d1", "beam search"));
        registry.write(chunk_in("cs101", "d1", "greedy search"));

        assert_mirrored(&registry, "cs101", "d1");
        assert_eq!(registry.global().len(), 1);
        assert_eq!(
            registry.get("cs101", "d1").map(|c| c.content),
            Some("greedy search".to_string())
        );
    }

    #[test]
    fn test_write_all_mirrors_batch_into_global() {
        let registry = IndexRegistry::new();
        registry.write_all(
            "cs101",
            &[
                chunk_in("cs101", "d1", "beam search"),
                chunk_in("cs101", "d2", "greedy decoding"),
            ],
        );
        registry.write_all("ml201", &[]);

        assert_mirrored(&registry, "cs101", "d1");
        assert_mirrored(&registry, "cs101", "d2");
        assert_eq!(registry.global().len(), 2);
        assert_eq!(registry.course_ids(), vec!["cs101"]);
    }

    #[test]
    fn test_write_racing_delete_can_strand_global_copy() {
        // Replays, step by step, a `write` whose global upsert lands after a
        // concurrent `delete` finished.
        let registry = IndexRegistry::new();
        let chunk = chunk_in("cs101", "d1", "beam search");

        registry
            .get_or_create_course_index("cs101")
            .upsert(chunk.clone());
        registry.delete("cs101", "d1").expect("delete after course upsert");
        registry.global().upsert(chunk);

        assert!(registry.get("cs101", "d1").is_none());
        assert!(registry
            .global()
            .get(&ScopedKey::new("cs101", "d1"))
            .is_some());

        // The next delete reports NotFound and cannot clean it up; a rewrite can.
        assert!(registry.delete("cs101", "d1").is_err());
        registry.write(chunk_in("cs101", "d1", "beam search"));
        registry.delete("cs101", "d1").expect("delete after rewrite");
        assert!(registry.global().is_empty());
    }

    #[test]
    fn test_delete_removes_from_both() {
        let registry = IndexRegistry::new();
        registry.write(chunk_in("cs101", "d1", "beam search"));

        registry.delete("cs101", "d1").expect("delete existing");
        assert_mirrored(&registry, "cs101", "d1");
        assert!(registry.get("cs101", "d1").is_none());
        assert!(registry.global().is_empty());
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let registry = IndexRegistry::new();
        assert!(matches!(
            registry.delete("cs101", "ghost"),
            Err(PortError::NotFound(_))
        ));

        registry.write(chunk_in("cs101", "d1", "beam search"));
        assert!(matches!(
            registry.delete("ml201", "d1"),
            Err(PortError::NotFound(_))
        ));
        assert_mirrored(&registry, "cs101", "d1");
    }

    #[test]
    fn test_same_id_in_two_courses_stays_consistent() {
        let registry = IndexRegistry::new();
        registry.write(chunk_in("cs101", "intro", "compilers overview"));
        registry.write(chunk_in("ml201", "intro", "learning overview"));
        assert_eq!(registry.global().len(), 2);

        registry.delete("cs101", "intro").expect("delete cs101 intro");
        assert_mirrored(&registry, "cs101", "intro");
        assert_mirrored(&registry, "ml201", "intro");
        assert_eq!(registry.global().len(), 1);
    }
}
