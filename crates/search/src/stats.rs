//! Term statistics for one corpus
//!
//! [`TermStats`] is built once per ranking call and thrown away afterwards.
//! Nothing is shared across calls and nothing is updated incrementally.

use crate::tokenizer::Tokenizer;
use postrank_core::{Error, Result};
use std::collections::HashMap;

// ============================================================================
// TermCounts
// ============================================================================

/// Mapping from term to count
///
/// Only the counts matter. Iteration order is unspecified and no result in
/// this crate depends on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermCounts {
    counts: HashMap<String, usize>,
}

impl TermCounts {
    /// Empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every occurrence in a token sequence
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut counts = TermCounts::new();
        for token in tokens {
            counts.increment(token.as_ref());
        }
        counts
    }

    /// Add one to `term`
    pub fn increment(&mut self, term: &str) {
        if let Some(count) = self.counts.get_mut(term) {
            *count += 1;
        } else {
            self.counts.insert(term.to_owned(), 1);
        }
    }

    /// Count for `term`, 0 if absent
    pub fn get(&self, term: &str) -> usize {
        self.counts.get(term).copied().unwrap_or(0)
    }

    /// True if `term` has a non-zero count
    pub fn contains(&self, term: &str) -> bool {
        self.counts.contains_key(term)
    }

    /// Number of distinct terms
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if no term has been counted
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Distinct terms with their counts, in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(term, &count)| (term.as_str(), count))
    }

    /// Distinct terms, in unspecified order
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }
}

// ============================================================================
// TermStats
// ============================================================================

#[derive(Debug, Clone)]
struct DocTerms {
    tokens: Vec<String>,
    counts: TermCounts,
}

/// Corpus-level statistics needed for BM25
///
/// Invariants:
/// - `corpus_size() >= 1`
/// - `doc_freq(t) <= corpus_size()` for every term
/// - `avg_doc_len() >= 0`; it is 0 only when every document is empty
#[derive(Debug, Clone)]
pub struct TermStats {
    docs: Vec<DocTerms>,
    doc_freq: TermCounts,
    avg_doc_len: f64,
}

impl TermStats {
    /// Tokenize every document once and collect statistics
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCorpus`] if `corpus` yields no documents.
    pub fn build<I, S, T>(corpus: I, tokenizer: &T) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        T: Tokenizer + ?Sized,
    {
        let docs: Vec<DocTerms> = corpus
            .into_iter()
            .map(|doc| {
                let tokens = tokenizer.segment(doc.as_ref());
                let counts = TermCounts::from_tokens(&tokens);
                DocTerms { tokens, counts }
            })
            .collect();

        if docs.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        // One increment per distinct term per document
        let mut doc_freq = TermCounts::new();
        for doc in &docs {
            for term in doc.counts.terms() {
                doc_freq.increment(term);
            }
        }

        let total_len: usize = docs.iter().map(|doc| doc.tokens.len()).sum();
        let avg_doc_len = total_len as f64 / docs.len() as f64;

        Ok(TermStats {
            docs,
            doc_freq,
            avg_doc_len,
        })
    }

    /// Number of documents (N)
    pub fn corpus_size(&self) -> usize {
        self.docs.len()
    }

    /// Mean token count per document
    pub fn avg_doc_len(&self) -> f64 {
        self.avg_doc_len
    }

    /// Number of documents containing `term` at least once
    pub fn doc_freq(&self, term: &str) -> usize {
        self.doc_freq.get(term)
    }

    /// Document frequencies for the whole vocabulary
    pub fn doc_freqs(&self) -> &TermCounts {
        &self.doc_freq
    }

    /// True if any document contains `term`
    pub fn contains(&self, term: &str) -> bool {
        self.doc_freq.contains(term)
    }

    /// Number of distinct terms in the corpus
    pub fn vocabulary_size(&self) -> usize {
        self.doc_freq.len()
    }

    /// Token sequence of document `index`
    pub fn tokens(&self, index: usize) -> Option<&[String]> {
        self.docs.get(index).map(|doc| doc.tokens.as_slice())
    }

    /// Token count of document `index`
    pub fn doc_len(&self, index: usize) -> Option<usize> {
        self.docs.get(index).map(|doc| doc.tokens.len())
    }

    /// Occurrences of `term` in document `index`
    pub fn term_freq(&self, index: usize, term: &str) -> Option<usize> {
        self.docs.get(index).map(|doc| doc.counts.get(term))
    }

    /// Per-document term counts
    pub fn term_counts(&self, index: usize) -> Option<&TermCounts> {
        self.docs.get(index).map(|doc| &doc.counts)
    }
}
