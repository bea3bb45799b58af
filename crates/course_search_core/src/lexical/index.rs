//! A mutable, lock-guarded BM25 corpus for one scope (a course, or every course).

use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::Hash;

use super::bm25::Bm25Model;
use super::tokenizer::tokenize_unique;
use crate::domain::DocumentChunk;

/// How a [`LexicalIndex`] derives the storage key of a chunk.
pub trait IndexKey: Clone + Eq + Hash + Send + Sync + 'static {
    fn of(chunk: &DocumentChunk) -> Self;
}

/// Course indexes are keyed by chunk id alone.
impl IndexKey for String {
    fn of(chunk: &DocumentChunk) -> Self {
        chunk.id.clone()
    }
}

/// Key for indexes that span courses, so equal chunk ids in two courses never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopedKey {
    pub course_id: String,
    pub chunk_id: String,
}

impl ScopedKey {
    pub fn new(course_id: impl Into<String>, chunk_id: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
            chunk_id: chunk_id.into(),
        }
    }
}

impl IndexKey for ScopedKey {
    fn of(chunk: &DocumentChunk) -> Self {
        Self::new(chunk.course_id.clone(), chunk.id.clone())
    }
}

/// A search result: the stored chunk and its BM25 score.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: DocumentChunk,
    pub score: f32,
}

#[derive(Debug)]
struct Corpus<K> {
    /// Keys in first-insertion order; also the document positions of `model`.
    order: Vec<K>,
    docs: HashMap<K, DocumentChunk>,
    model: Bm25Model,
}

impl<K: IndexKey> Corpus<K> {
    fn rebuild(&mut self) {
        let docs = &self.docs;
        self.model = Bm25Model::build(self.order.iter().map(|key| docs[key].content.as_str()));
    }
}

/// A corpus of chunks that answers ranked top-k queries.
///
/// Every write rebuilds the ranking structure from scratch under the exclusive
/// lock, so cost grows linearly with the corpus. Reads share the lock and never
/// observe a half-built model.
#[derive(Debug)]
pub struct LexicalIndex<K: IndexKey = String> {
    inner: RwLock<Corpus<K>>,
}

impl<K: IndexKey> Default for LexicalIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: IndexKey> LexicalIndex<K> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Corpus {
                order: Vec::new(),
                docs: HashMap::new(),
                model: Bm25Model::default(),
            }),
        }
    }

    /// Inserts the chunk, or replaces the one stored under the same key in place.
    pub fn upsert(&self, chunk: DocumentChunk) {
        let key = K::of(&chunk);
        let mut corpus = self.inner.write();
        if !corpus.docs.contains_key(&key) {
            corpus.order.push(key.clone());
        }
        corpus.docs.insert(key, chunk);
        corpus.rebuild();
    }

    /// Upserts every chunk under one exclusive lock and rebuilds once.
    ///
    /// Later chunks in the batch win over earlier ones with the same key.
    pub fn upsert_many<I>(&self, chunks: I)
    where
        I: IntoIterator<Item = DocumentChunk>,
    {
        let mut corpus = self.inner.write();
        for chunk in chunks {
            let key = K::of(&chunk);
            if !corpus.docs.contains_key(&key) {
                corpus.order.push(key.clone());
            }
            corpus.docs.insert(key, chunk);
        }
        corpus.rebuild();
    }

    /// Removes the chunk stored under `key`. Returns `false` when nothing was there.
    pub fn delete(&self, key: &K) -> bool {
        let mut corpus = self.inner.write();
        if corpus.docs.remove(key).is_none() {
            return false;
        }
        corpus.order.retain(|k| k != key);
        corpus.rebuild();
        true
    }

    pub fn get(&self, key: &K) -> Option<DocumentChunk> {
        self.inner.read().docs.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns at most `min(k, len)` chunks, best first.
    ///
    /// Equal scores keep insertion order. Chunks that match no query term score
    /// 0 and may still fill the tail of the result.
    pub fn search(&self, query: &str, k: usize) -> Vec<ScoredChunk> {
        let corpus = self.inner.read();
        if corpus.order.is_empty() || k == 0 {
            return Vec::new();
        }

        let terms = tokenize_unique(query);
        let scores = corpus.model.score(&terms);

        let mut ranked: Vec<(usize, f32)> = scores.into_iter().enumerate().collect();
        // Stable sort: ties stay in insertion order.
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(k);

        ranked
            .into_iter()
            .map(|(pos, score)| ScoredChunk {
                chunk: corpus.docs[&corpus.order[pos]].clone(),
                score,
            })
            .collect()
    }
}
