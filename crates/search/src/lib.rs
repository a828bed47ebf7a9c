//! BM25 relevance retrieval for postrank
//!
//! This crate provides:
//! - Tokenizer trait for pluggable word segmentation
//! - TermStats / TermCounts for per-corpus statistics
//! - Bm25Model for scoring a query against corpus documents
//! - rank_top_k for deterministic top-K selection
//! - Retriever for config-driven batch ranking
//!
//! # Usage
//!
//! ```
//! use postrank_core::{Bm25Params, Candidate};
//! use postrank_search::{retrieve_relevant, RankOptions, UnicodeWordTokenizer};
//!
//! let posts = vec![
//!     Candidate::new("猫喜欢睡觉"),
//!     Candidate::new("狗喜欢跑步"),
//!     Candidate::new("猫和狗是朋友"),
//! ];
//! let ranked = retrieve_relevant(
//!     "猫",
//!     &posts,
//!     UnicodeWordTokenizer,
//!     Bm25Params::default(),
//!     RankOptions::top(2),
//! )?;
//! assert!(ranked.iter().all(|r| r.index != 1));
//! # Ok::<(), postrank_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod rank;
pub mod retriever;
pub mod scorer;
pub mod stats;
pub mod tokenizer;

// Re-export commonly used types
pub use rank::{rank_top_k, rank_top_k_with, retrieve_relevant, top_k_indices, RankOptions, Ranked};
pub use retriever::Retriever;
pub use scorer::{Bm25Model, PreparedQuery, TermContribution};
pub use stats::{TermCounts, TermStats};
pub use tokenizer::{
    CharBigramTokenizer, FnTokenizer, Tokenizer, UnicodeWordTokenizer, WhitespaceTokenizer,
};
