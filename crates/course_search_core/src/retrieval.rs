//! crates/course_search_core/src/retrieval.rs
//!
//! The retrieval orchestrator: every read and write path of the service goes
//! through [`RetrievalService`], which composes the index registry with the
//! access filter.

use chrono::Utc;
use tracing::{debug, info};

use crate::access::{resolve_scope, Principal};
use crate::domain::{ChunkPatch, DocumentChunk, Metadata, NewChunk};
use crate::lexical::ScoredChunk;
use crate::ports::{PortError, PortResult};
use crate::registry::IndexRegistry;

/// Characters of content shown in a search snippet.
pub const SNIPPET_CHARS: usize = 200;

/// Cross-course queries ask the global index for `page_size * OVERFETCH_FACTOR`
/// hits before dropping the ones the caller may not see. If more than 4/5 are
/// dropped the page comes back short; there is no second pass.
pub const OVERFETCH_FACTOR: usize = 5;

/// How much of a chunk's content a hit carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitView {
    /// The first [`SNIPPET_CHARS`] characters, for result lists.
    Snippet,
    /// The full text, for building RAG prompts.
    FullContent,
}

/// A ranked result, shaped for callers.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
    pub course_id: String,
    pub source: Option<String>,
    pub chunk_index: Option<i64>,
    pub title: Option<String>,
    /// Snippet or full content, depending on the [`HitView`] requested.
    pub text: String,
    pub metadata: Metadata,
}

impl SearchHit {
    fn from_scored(hit: ScoredChunk, view: HitView) -> Self {
        let chunk = hit.chunk;
        let text = match view {
            HitView::Snippet => snippet(&chunk.content),
            HitView::FullContent => chunk.content,
        };
        Self {
            id: chunk.id,
            score: hit.score,
            course_id: chunk.course_id,
            source: chunk.source,
            chunk_index: chunk.chunk_index,
            title: chunk.title,
            text,
            metadata: chunk.metadata,
        }
    }
}

pub fn snippet(content: &str) -> String {
    content.chars().take(SNIPPET_CHARS).collect()
}

/// Hits that matched no query term are not results, on every read path.
/// The index itself still returns them to fill `k`.
fn is_match(hit: &ScoredChunk) -> bool {
    hit.score > 0.0
}

#[derive(Debug, Default)]
pub struct RetrievalService {
    registry: IndexRegistry,
}

impl RetrievalService {
    pub fn new(registry: IndexRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &IndexRegistry {
        &self.registry
    }

    //=====================================================================================
    // Read paths
    //=====================================================================================

    /// Ranked search within one course.
    pub fn search_course(
        &self,
        course_id: &str,
        query: &str,
        page_size: usize,
        view: HitView,
    ) -> Vec<SearchHit> {
        let hits: Vec<SearchHit> = self
            .registry
            .get_or_create_course_index(course_id)
            .search(query, page_size)
            .into_iter()
            .filter(is_match)
            .map(|hit| SearchHit::from_scored(hit, view))
            .collect();
        debug!(course_id, query, page_size, hits = hits.len(), "course search");
        hits
    }

    /// Ranked search across every course `principal` may see.
    pub fn search_all_courses(
        &self,
        principal: &Principal,
        query: &str,
        page_size: usize,
        view: HitView,
    ) -> PortResult<Vec<SearchHit>> {
        let scope = resolve_scope(principal)?;

        let fetched = self
            .registry
            .global()
            .search(query, page_size.saturating_mul(OVERFETCH_FACTOR));
        let fetched_len = fetched.len();

        let hits: Vec<SearchHit> = fetched
            .into_iter()
            .filter(is_match)
            .filter(|hit| scope.allows(&hit.chunk.course_id))
            .take(page_size)
            .map(|hit| SearchHit::from_scored(hit, view))
            .collect();
        debug!(
            query,
            page_size,
            fetched = fetched_len,
            hits = hits.len(),
            "cross-course search"
        );
        Ok(hits)
    }

    //=====================================================================================
    // Write paths
    //=====================================================================================

    /// Stores every chunk under `course_id`, whatever course the payload named.
    ///
    /// The batch is indexed in one pass; a repeated id keeps the last copy.
    pub fn batch_create(&self, course_id: &str, chunks: Vec<NewChunk>) -> Vec<DocumentChunk> {
        let now = Utc::now();
        let stored: Vec<DocumentChunk> = chunks
            .into_iter()
            .map(|new_chunk| new_chunk.into_chunk(course_id, now))
            .collect();
        self.registry.write_all(course_id, &stored);
        info!(course_id, count = stored.len(), "chunks created");
        stored
    }

    /// Applies a partial update to a stored chunk and re-indexes it.
    ///
    /// The read and the write-back are separate steps: a delete that lands
    /// between them is undone, and the patched chunk is stored again.
    pub fn update(
        &self,
        course_id: &str,
        chunk_id: &str,
        patch: ChunkPatch,
    ) -> PortResult<DocumentChunk> {
        let mut chunk = self.registry.get(course_id, chunk_id).ok_or_else(|| {
            PortError::NotFound(format!("document '{}' in course '{}'", chunk_id, course_id))
        })?;
        patch.apply(&mut chunk, Utc::now());
        self.registry.write(chunk.clone());
        info!(course_id, chunk_id, "chunk updated");
        Ok(chunk)
    }

    pub fn delete(&self, course_id: &str, chunk_id: &str) -> PortResult<()> {
        self.registry.delete(course_id, chunk_id)?;
        info!(course_id, chunk_id, "chunk deleted");
        Ok(())
    }
}
