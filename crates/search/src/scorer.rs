//! BM25 scoring
//!
//! This module provides:
//! - PreparedQuery: a query tokenized once, reusable across documents
//! - Bm25Model: term statistics plus parameters for one corpus
//! - TermContribution: per-term score breakdown
//!
//! # BM25 Formula
//!
//! For each query token t that occurs somewhere in the corpus:
//! score += IDF(t) * (tf * (k1 + 1)) / (tf + k1 * (1 - b + b * dl / avgdl))
//!
//! Where:
//! - tf = occurrences of t in the document
//! - dl = document length in tokens
//! - avgdl = average document length
//! - IDF(t) = ln((N - df + 0.5) / (df + 0.5) + 1)
//!
//! The `+ 1` inside the logarithm keeps IDF strictly positive, even for a
//! term present in every document. Repeated query tokens are summed once
//! per occurrence.

use crate::stats::TermStats;
use crate::tokenizer::Tokenizer;
use postrank_core::{Bm25Params, Error, Result};
use rayon::prelude::*;
use tracing::debug;

// ============================================================================
// PreparedQuery
// ============================================================================

/// Query tokenized by a model's tokenizer
///
/// Tokenize once with [`Bm25Model::prepare_query`], then score it against as
/// many documents as needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedQuery {
    tokens: Vec<String>,
}

impl PreparedQuery {
    /// Query tokens in query order, repeats included
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True if the query produced no tokens
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

// ============================================================================
// TermContribution
// ============================================================================

/// Score breakdown for one query token against one document
#[derive(Debug, Clone, PartialEq)]
pub struct TermContribution {
    /// Query token
    pub term: String,
    /// Occurrences in the document
    pub tf: usize,
    /// Inverse document frequency
    pub idf: f64,
    /// Length-normalized term frequency weight
    pub weight: f64,
    /// `idf * weight`, or 0 when `tf == 0`
    pub contribution: f64,
}

// ============================================================================
// Bm25Model
// ============================================================================

/// BM25 model over one corpus
///
/// Built fresh for every batch of candidates; holds no shared mutable state,
/// so independent models can be used from different threads at once.
#[derive(Debug, Clone)]
pub struct Bm25Model<T> {
    stats: TermStats,
    params: Bm25Params,
    tokenizer: T,
}

impl<T: Tokenizer> Bm25Model<T> {
    /// Build a model with validated parameters
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCorpus`] if `corpus` is empty.
    pub fn build<I, S>(corpus: I, tokenizer: T, params: Bm25Params) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stats = TermStats::build(corpus, &tokenizer)?;
        debug!(
            target: "postrank::scorer",
            corpus_size = stats.corpus_size(),
            vocabulary = stats.vocabulary_size(),
            avg_doc_len = stats.avg_doc_len(),
            tokenizer = tokenizer.name(),
            "BM25 model built"
        );
        Ok(Bm25Model {
            stats,
            params,
            tokenizer,
        })
    }

    /// Build a model from raw `k1` and `b`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `k1 < 0` or `b` is outside
    /// `[0, 1]`, and [`Error::EmptyCorpus`] if `corpus` is empty.
    pub fn new<I, S>(corpus: I, tokenizer: T, k1: f64, b: f64) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let params = Bm25Params::new(k1, b)?;
        Self::build(corpus, tokenizer, params)
    }

    /// Build a model with `k1 = 1.5`, `b = 0.75`
    pub fn with_defaults<I, S>(corpus: I, tokenizer: T) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build(corpus, tokenizer, Bm25Params::default())
    }

    /// Corpus statistics
    pub fn stats(&self) -> &TermStats {
        &self.stats
    }

    /// Scoring parameters
    pub fn params(&self) -> Bm25Params {
        self.params
    }

    /// Tokenizer used for the corpus and for queries
    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    /// Number of documents
    pub fn corpus_size(&self) -> usize {
        self.stats.corpus_size()
    }

    /// Smoothed inverse document frequency
    ///
    /// Strictly positive for every `0 <= df <= N`.
    pub fn idf(&self, term: &str) -> f64 {
        let n = self.stats.corpus_size() as f64;
        let df = self.stats.doc_freq(term) as f64;
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }

    /// Tokenize a query once
    pub fn prepare_query(&self, query: &str) -> PreparedQuery {
        PreparedQuery {
            tokens: self.tokenizer.segment(query),
        }
    }

    /// Length-normalized term-frequency weight
    ///
    /// Callers only pass `tf > 0`, which keeps the denominator positive.
    fn weight(&self, tf: usize, doc_len: usize) -> f64 {
        let k1 = self.params.k1();
        let b = self.params.b();
        let tf = tf as f64;
        let avg = self.stats.avg_doc_len();
        // avg is 0 only when every document is empty, in which case no term can match
        let norm = if avg > 0.0 {
            1.0 - b + b * doc_len as f64 / avg
        } else {
            1.0 - b
        };
        tf * (k1 + 1.0) / (tf + k1 * norm)
    }

    fn score_checked(&self, query: &PreparedQuery, doc_index: usize) -> Option<f64> {
        let counts = self.stats.term_counts(doc_index)?;
        let doc_len = self.stats.doc_len(doc_index)?;

        let mut score = 0.0;
        for term in query.tokens() {
            if !self.stats.contains(term) {
                continue;
            }
            let tf = counts.get(term);
            if tf == 0 {
                continue;
            }
            score += self.idf(term) * self.weight(tf, doc_len);
        }
        Some(score)
    }

    /// Score a prepared query against document `doc_index`
    ///
    /// # Panics
    ///
    /// Panics if `doc_index >= corpus_size()`.
    pub fn score_prepared(&self, query: &PreparedQuery, doc_index: usize) -> f64 {
        match self.score_checked(query, doc_index) {
            Some(score) => score,
            None => panic!(
                "{}",
                Error::DocIndexOutOfRange {
                    index: doc_index,
                    corpus_size: self.corpus_size(),
                }
            ),
        }
    }

    /// Score a query against document `doc_index`
    ///
    /// Tokenizes `query` on every call; use [`Self::prepare_query`] and
    /// [`Self::score_prepared`] when scoring many documents.
    ///
    /// # Panics
    ///
    /// Panics if `doc_index >= corpus_size()`.
    pub fn score(&self, query: &str, doc_index: usize) -> f64 {
        self.score_prepared(&self.prepare_query(query), doc_index)
    }

    /// Score a query against document `doc_index`, reporting a bad index as an error
    pub fn try_score(&self, query: &str, doc_index: usize) -> Result<f64> {
        self.score_checked(&self.prepare_query(query), doc_index)
            .ok_or(Error::DocIndexOutOfRange {
                index: doc_index,
                corpus_size: self.corpus_size(),
            })
    }

    /// Scores for every document, in corpus order
    pub fn score_all(&self, query: &PreparedQuery) -> Vec<f64> {
        (0..self.corpus_size())
            .map(|i| self.score_prepared(query, i))
            .collect()
    }

    /// Scores for every document on the rayon pool, in corpus order
    ///
    /// Each document is scored by the same arithmetic as [`Self::score_all`],
    /// so the output is bit-identical.
    pub fn score_all_parallel(&self, query: &PreparedQuery) -> Vec<f64> {
        (0..self.corpus_size())
            .into_par_iter()
            .map(|i| self.score_prepared(query, i))
            .collect()
    }

    /// Per-token breakdown of a document's score
    ///
    /// One entry per query token found in the corpus, in query order.
    /// Summing `contribution` in order reproduces [`Self::score_prepared`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::DocIndexOutOfRange`] for a bad index.
    pub fn explain(
        &self,
        query: &PreparedQuery,
        doc_index: usize,
    ) -> Result<Vec<TermContribution>> {
        let (counts, doc_len) = match (
            self.stats.term_counts(doc_index),
            self.stats.doc_len(doc_index),
        ) {
            (Some(counts), Some(doc_len)) => (counts, doc_len),
            _ => {
                return Err(Error::DocIndexOutOfRange {
                    index: doc_index,
                    corpus_size: self.corpus_size(),
                })
            }
        };

        let contributions = query
            .tokens()
            .iter()
            .filter(|term| self.stats.contains(term))
            .map(|term| {
                let tf = counts.get(term);
                let idf = self.idf(term);
                let (weight, contribution) = if tf == 0 {
                    (0.0, 0.0)
                } else {
                    let weight = self.weight(tf, doc_len);
                    (weight, idf * weight)
                };
                TermContribution {
                    term: term.clone(),
                    tf,
                    idf,
                    weight,
                    contribution,
                }
            })
            .collect();
        Ok(contributions)
    }
}

// ============================================================================
// Tests
// ============================================================================
