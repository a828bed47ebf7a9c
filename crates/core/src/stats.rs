//! Running statistics over ranking calls
//!
//! [`RetrievalStats`] is a plain value: callers own it and thread it through
//! the calls they want counted. Separate batches can be combined with
//! [`RetrievalStats::merge`].

use serde::{Deserialize, Serialize};

/// Totals accumulated across ranking calls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalStats {
    /// Ranking calls recorded
    pub queries: u64,
    /// Candidates scored across all calls
    pub total_candidates: u64,
    /// Smallest candidate pool seen (None until the first call)
    pub min_candidates: Option<usize>,
    /// Largest candidate pool seen
    pub max_candidates: usize,
    /// Results returned across all calls
    pub total_returned: u64,
}

impl RetrievalStats {
    /// Empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one ranking call over `candidates` posts that returned `returned` results
    pub fn record(&mut self, candidates: usize, returned: usize) {
        self.queries += 1;
        self.total_candidates += candidates as u64;
        self.total_returned += returned as u64;
        self.min_candidates = Some(match self.min_candidates {
            Some(min) => min.min(candidates),
            None => candidates,
        });
        self.max_candidates = self.max_candidates.max(candidates);
    }

    /// Fold another accumulator into this one
    pub fn merge(&mut self, other: &RetrievalStats) {
        self.queries += other.queries;
        self.total_candidates += other.total_candidates;
        self.total_returned += other.total_returned;
        self.min_candidates = match (self.min_candidates, other.min_candidates) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.max_candidates = self.max_candidates.max(other.max_candidates);
    }

    /// Mean candidate pool size, or 0 when nothing was recorded
    pub fn mean_candidates(&self) -> f64 {
        if self.queries == 0 {
            0.0
        } else {
            self.total_candidates as f64 / self.queries as f64
        }
    }
}
