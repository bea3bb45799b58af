//! Okapi BM25 ranking structure, built in one pass over a corpus.
//!
//! IDF follows the Lucene variant `ln(1 + (N - df + 0.5) / (df + 0.5))`, which
//! stays positive for every term that occurs in the corpus.

use std::collections::HashMap;

use super::tokenizer::tokenize;

/// Term-frequency saturation.
pub const K1: f32 = 1.5;
/// Document-length normalization.
pub const B: f32 = 0.75;

#[derive(Debug, Clone, Copy)]
struct Posting {
    doc: usize,
    tf: u32,
}

/// Posting lists and length statistics for a fixed, ordered corpus.
///
/// Document positions are the order in which texts were passed to [`Bm25Model::build`].
#[derive(Debug, Default)]
pub struct Bm25Model {
    postings: HashMap<String, Vec<Posting>>,
    doc_lens: Vec<u32>,
    avg_doc_len: f32,
}

impl Bm25Model {
    pub fn build<'a, I>(texts: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut postings: HashMap<String, Vec<Posting>> = HashMap::new();
        let mut doc_lens = Vec::new();

        for (doc, text) in texts.into_iter().enumerate() {
            let tokens = tokenize(text);
            doc_lens.push(tokens.len() as u32);

            let mut tfs: HashMap<String, u32> = HashMap::new();
            for token in tokens {
                *tfs.entry(token).or_insert(0) += 1;
            }
            for (term, tf) in tfs {
                postings.entry(term).or_default().push(Posting { doc, tf });
            }
        }

        let total_len: u64 = doc_lens.iter().map(|&l| u64::from(l)).sum();
        let avg_doc_len = if doc_lens.is_empty() {
            0.0
        } else {
            total_len as f32 / doc_lens.len() as f32
        };

        Self {
            postings,
            doc_lens,
            avg_doc_len,
        }
    }

    pub fn num_docs(&self) -> usize {
        self.doc_lens.len()
    }

    pub fn doc_freq(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, Vec::len)
    }

    pub fn idf(&self, term: &str) -> f32 {
        let n = self.num_docs() as f32;
        let df = self.doc_freq(term) as f32;
        if df == 0.0 {
            return 0.0;
        }
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }

    /// Scores every document against already-tokenized query terms.
    ///
    /// Returns one score per document position; non-matching documents score 0.
    pub fn score(&self, query_terms: &[String]) -> Vec<f32> {
        let mut scores = vec![0.0f32; self.num_docs()];
        // Every posting belongs to a document with at least one token, so avgdl > 0 here.
        let avg_doc_len = self.avg_doc_len.max(f32::EPSILON);

        for term in query_terms {
            let Some(list) = self.postings.get(term) else {
                continue;
            };
            let idf = self.idf(term);
            for posting in list {
                let tf = posting.tf as f32;
                let dl = self.doc_lens[posting.doc] as f32;
                let norm = K1 * (1.0 - B + B * dl / avg_doc_len);
                scores[posting.doc] += idf * (tf * (K1 + 1.0)) / (tf + norm);
            }
        }
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(q: &str) -> Vec<String> {
        crate::lexical::tokenizer::tokenize_unique(q)
    }

    #[test]
    fn test_empty_model() {
        let model = Bm25Model::build(std::iter::empty());
        assert_eq!(model.num_docs(), 0);
        assert!(model.score(&terms("anything")).is_empty());
    }

    #[test]
    fn test_doc_freq_counts_documents_not_occurrences() {
        let model = Bm25Model::build(["beam beam beam", "beam search", "greedy"]);
        assert_eq!(model.doc_freq("beam"), 2);
        assert_eq!(model.doc_freq("greedi"), 1);
        assert_eq!(model.doc_freq("missing"), 0);
    }

    #[test]
    fn test_idf_rarer_terms_weigh_more() {
        let model = Bm25Model::build(["beam search", "beam decoding", "greedy decoding"]);
        assert!(model.idf("search") > model.idf("beam"));
        assert!(model.idf("beam") > 0.0);
        assert_eq!(model.idf("absent"), 0.0);
    }

    #[test]
    fn test_score_matches_formula() {
        // One doc of length 2 in a corpus with avgdl 2: norm = k1.
        let model = Bm25Model::build(["alpha beta", "gamma delta"]);
        let scores = model.score(&terms("alpha"));

        let idf = ((2.0f32 - 1.0 + 0.5) / (1.0 + 0.5) + 1.0).ln();
        let expected = idf * (1.0 * (K1 + 1.0)) / (1.0 + K1);
        assert!((scores[0] - expected).abs() < 1e-6);
        assert_eq!(scores[1], 0.0);
    }

    #[test]
    fn test_term_frequency_saturates() {
        let model = Bm25Model::build(["tok", "tok tok", "tok tok tok tok tok tok tok tok", "other"]);
        let scores = model.score(&terms("tok"));
        assert!(scores[1] > scores[0]);
        // Longer and more repetitive, but length normalization caps the gain.
        assert!(scores[2] < scores[1] * 2.0);
    }
}
