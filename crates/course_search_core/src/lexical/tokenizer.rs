//! Text tokenizer shared by documents and queries.
//!
//! Text is split on non-word characters and lowercased. Single-character tokens
//! and stopwords are dropped, and what remains is reduced with the Snowball
//! English stemmer.

use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Standard English stopwords (Lucene's default set).
const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

#[inline]
fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn stemmer() -> &'static Stemmer {
    static STEMMER: OnceLock<Stemmer> = OnceLock::new();
    STEMMER.get_or_init(|| Stemmer::create(Algorithm::English))
}

/// Tokenize text into index terms, keeping repeats so term frequency survives.
///
/// ```
/// use course_search_core::lexical::tokenizer::tokenize;
///
/// assert_eq!(tokenize("The Quick Brown Foxes"), vec!["quick", "brown", "fox"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    let stemmer = stemmer();
    text.split(|c: char| !is_word_char(c))
        .map(|w| w.to_lowercase())
        .filter(|w| w.chars().count() >= 2)
        .filter(|w| !is_stopword(w))
        .map(|w| stemmer.stem(&w).into_owned())
        .collect()
}

/// Tokenize and deduplicate, preserving first occurrence order. Used for queries.
pub fn tokenize_unique(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokenize(text)
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}
