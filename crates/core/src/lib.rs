//! Core types for postrank
//!
//! This crate defines the foundational types used throughout the system:
//! - Error: Error taxonomy (configuration, usage, loading)
//! - Candidate / Reshare: user post records ranked by the search crate
//! - ScoringText: derivation of the text a candidate is scored on
//! - RetrievalConfig / Bm25Params: validated configuration loaded from `postrank.toml`
//! - RetrievalStats: explicit accumulator of ranking statistics

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod stats;
pub mod types;

pub use config::{Bm25Params, RetrievalConfig, TokenizerKind, CONFIG_FILE_NAME};
pub use error::{Error, Result};
pub use stats::RetrievalStats;
pub use types::{Candidate, Reshare, ScoringText, UserHistory};
