//! postrank - BM25 relevance retrieval over a user's post history
//!
//! Given a target article and the posts a user has published, postrank
//! scores every post with Okapi BM25 and returns the top-K most relevant
//! ones, highest score first.
//!
//! # Quick Start
//!
//! ```
//! use postrank::{Candidate, RetrievalConfig, RetrievalStats, Retriever};
//!
//! let posts = vec![
//!     Candidate::new("猫喜欢睡觉"),
//!     Candidate::new("狗喜欢跑步"),
//!     Candidate::new("猫和狗是朋友"),
//! ];
//!
//! let retriever = Retriever::from_config(&RetrievalConfig::default())?;
//! let mut stats = RetrievalStats::new();
//! let top = retriever.retrieve("猫", &posts, &mut stats)?;
//!
//! assert_eq!(top.len(), 3);
//! assert_ne!(top[0].index, 1);
//! assert_eq!(stats.queries, 1);
//! # Ok::<(), postrank::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `postrank-core`: records, configuration, errors and retrieval counters
//! - `postrank-search`: tokenizers, corpus statistics, the BM25 model and ranking
//!
//! This crate re-exports both so callers need a single dependency.

pub use postrank_core::{
    Bm25Params, Candidate, Error, Reshare, Result, RetrievalConfig, RetrievalStats, ScoringText,
    TokenizerKind, UserHistory, CONFIG_FILE_NAME,
};
pub use postrank_search::{
    rank_top_k, rank_top_k_with, retrieve_relevant, top_k_indices, Bm25Model, CharBigramTokenizer,
    FnTokenizer, PreparedQuery, RankOptions, Ranked, Retriever, TermContribution, TermCounts,
    TermStats, Tokenizer, UnicodeWordTokenizer, WhitespaceTokenizer,
};
pub use postrank_search::tokenizer;
