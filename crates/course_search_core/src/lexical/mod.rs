//! Lexical retrieval: tokenization, BM25 ranking and the per-scope index.

pub mod bm25;
pub mod index;
pub mod tokenizer;

pub use index::{IndexKey, LexicalIndex, ScopedKey, ScoredChunk};
