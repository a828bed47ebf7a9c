//! Config-driven retrieval
//!
//! [`Retriever`] bundles a tokenizer, BM25 parameters and ranking options so
//! a batch job can rank many candidate pools with one setup. It keeps no
//! per-call state: every `retrieve` builds and drops its own model. Counters
//! live in a caller-owned [`RetrievalStats`].

use crate::rank::{rank_top_k_with, RankOptions, Ranked};
use crate::scorer::Bm25Model;
use crate::tokenizer::{self, Tokenizer};
use postrank_core::{Bm25Params, Result, RetrievalConfig, RetrievalStats, ScoringText};

/// Reusable ranking setup
pub struct Retriever {
    tokenizer: Box<dyn Tokenizer>,
    params: Bm25Params,
    options: RankOptions,
}

impl Retriever {
    /// Create a retriever from its parts
    pub fn new(tokenizer: Box<dyn Tokenizer>, params: Bm25Params, options: RankOptions) -> Self {
        Retriever {
            tokenizer,
            params,
            options,
        }
    }

    /// Create a retriever from a validated config
    ///
    /// # Errors
    ///
    /// Returns an error if `k1` or `b` is out of range.
    pub fn from_config(config: &RetrievalConfig) -> Result<Self> {
        Ok(Retriever::new(
            tokenizer::from_kind(config.tokenizer),
            config.params()?,
            RankOptions::top(config.top_k).parallel(config.parallel),
        ))
    }

    /// Tokenizer shared by every call
    pub fn tokenizer(&self) -> &dyn Tokenizer {
        self.tokenizer.as_ref()
    }

    /// BM25 parameters
    pub fn params(&self) -> Bm25Params {
        self.params
    }

    /// Ranking options
    pub fn options(&self) -> RankOptions {
        self.options
    }

    /// Build a model over one candidate pool
    ///
    /// Use this when the model itself is needed (explaining scores);
    /// otherwise [`Self::retrieve`] builds and drops it internally.
    pub fn model<C: ScoringText>(&self, candidates: &[C]) -> Result<Bm25Model<&dyn Tokenizer>> {
        let corpus: Vec<_> = candidates.iter().map(ScoringText::scoring_text).collect();
        Bm25Model::build(&corpus, self.tokenizer.as_ref(), self.params)
    }

    /// Rank one candidate pool and record the call in `stats`
    ///
    /// `stats` is only updated when ranking succeeds.
    pub fn retrieve<'a, C: ScoringText>(
        &self,
        query: &str,
        candidates: &'a [C],
        stats: &mut RetrievalStats,
    ) -> Result<Vec<Ranked<'a, C>>> {
        let model = self.model(candidates)?;
        let ranked = rank_top_k_with(&model, query, candidates, self.options)?;
        stats.record(candidates.len(), ranked.len());
        Ok(ranked)
    }
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever")
            .field("tokenizer", &self.tokenizer.name())
            .field("params", &self.params)
            .field("options", &self.options)
            .finish()
    }
}
