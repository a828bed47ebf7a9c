//! Top-K selection
//!
//! Every corpus position is scored, then a stable descending sort keeps equal
//! scores in corpus order. The same pool and query therefore always produce
//! the same selection, which downstream dataset construction relies on.

use crate::scorer::Bm25Model;
use crate::tokenizer::Tokenizer;
use postrank_core::{Bm25Params, Error, Result, ScoringText};
use tracing::debug;

// ============================================================================
// Ranked
// ============================================================================

/// One ranked candidate
///
/// `candidate` borrows the record the caller passed in, so every field on it
/// stays reachable, not just the text it was scored on.
#[derive(Debug)]
pub struct Ranked<'a, C> {
    /// The caller's original record
    pub candidate: &'a C,
    /// Position in the candidate list (and corpus)
    pub index: usize,
    /// BM25 score; higher is more relevant
    pub score: f64,
}

impl<'a, C> Ranked<'a, C> {
    /// `(candidate, score)` pair
    pub fn into_pair(self) -> (&'a C, f64) {
        (self.candidate, self.score)
    }
}

impl<C> Clone for Ranked<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Ranked<'_, C> {}

impl<C> PartialEq for Ranked<'_, C> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.candidate, other.candidate)
            && self.index == other.index
            && self.score.to_bits() == other.score.to_bits()
    }
}

// ============================================================================
// RankOptions
// ============================================================================

/// Options for a ranking call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankOptions {
    /// Maximum number of results; 0 returns nothing
    pub k: usize,
    /// Score on the rayon pool (same output as sequential)
    pub parallel: bool,
}

impl RankOptions {
    /// Sequential ranking returning at most `k` results
    pub fn top(k: usize) -> Self {
        RankOptions { k, parallel: false }
    }

    /// Builder: enable parallel scoring
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl Default for RankOptions {
    fn default() -> Self {
        RankOptions::top(postrank_core::config::DEFAULT_TOP_K)
    }
}

// ============================================================================
// Selection
// ============================================================================

/// Indices of the `k` highest scores, descending, ties in index order
///
/// Scores produced by [`Bm25Model`] are never NaN; `total_cmp` keeps the
/// ordering total regardless.
pub fn top_k_indices(scores: &[f64], k: usize) -> Vec<(usize, f64)> {
    if k == 0 {
        return Vec::new();
    }
    let mut scored: Vec<(usize, f64)> = scores.iter().copied().enumerate().collect();
    // sort_by is stable: equal scores keep their corpus order
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(k);
    scored
}

/// Rank `candidates` against `query` with a model built from them
///
/// `candidates[i]` must be the record corpus position `i` was derived from.
///
/// # Errors
///
/// Returns [`Error::CandidateMismatch`] if `candidates.len()` differs from
/// the model's corpus size.
pub fn rank_top_k<'a, C, T>(
    model: &Bm25Model<T>,
    query: &str,
    candidates: &'a [C],
    k: usize,
) -> Result<Vec<Ranked<'a, C>>>
where
    T: Tokenizer,
{
    rank_top_k_with(model, query, candidates, RankOptions::top(k))
}

/// [`rank_top_k`] with explicit options
pub fn rank_top_k_with<'a, C, T>(
    model: &Bm25Model<T>,
    query: &str,
    candidates: &'a [C],
    options: RankOptions,
) -> Result<Vec<Ranked<'a, C>>>
where
    T: Tokenizer,
{
    if candidates.len() != model.corpus_size() {
        return Err(Error::CandidateMismatch {
            candidates: candidates.len(),
            corpus_size: model.corpus_size(),
        });
    }
    if options.k == 0 {
        return Ok(Vec::new());
    }

    let query = model.prepare_query(query);
    let scores = if options.parallel {
        model.score_all_parallel(&query)
    } else {
        model.score_all(&query)
    };

    let ranked: Vec<Ranked<'a, C>> = top_k_indices(&scores, options.k)
        .into_iter()
        .map(|(index, score)| Ranked {
            candidate: &candidates[index],
            index,
            score,
        })
        .collect();

    debug!(
        target: "postrank::rank",
        query_tokens = query.len(),
        corpus_size = model.corpus_size(),
        returned = ranked.len(),
        parallel = options.parallel,
        "Ranked candidates"
    );
    Ok(ranked)
}

/// Build a throwaway model from `candidates` and rank them
///
/// Each candidate contributes its [`ScoringText`] to the corpus. The model
/// is dropped before returning.
///
/// # Errors
///
/// Returns [`Error::EmptyCorpus`] if `candidates` is empty.
pub fn retrieve_relevant<'a, C, T>(
    query: &str,
    candidates: &'a [C],
    tokenizer: T,
    params: Bm25Params,
    options: RankOptions,
) -> Result<Vec<Ranked<'a, C>>>
where
    C: ScoringText,
    T: Tokenizer,
{
    let corpus: Vec<_> = candidates.iter().map(ScoringText::scoring_text).collect();
    let model = Bm25Model::build(&corpus, tokenizer, params)?;
    rank_top_k_with(&model, query, candidates, options)
}
