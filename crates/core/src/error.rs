//! Error types for postrank
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Every error is local and synchronous. Nothing here is transient, so
//! callers never retry.

use std::io;
use thiserror::Error;

/// Result type alias for postrank operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for postrank
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid scoring or retrieval configuration (k1, b, tokenizer name, ...)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A model was requested over zero documents
    #[error("Empty corpus: cannot build term statistics over zero documents")]
    EmptyCorpus,

    /// Direct scoring call with a document index outside the corpus
    #[error("Document index {index} out of range for corpus of {corpus_size} documents")]
    DocIndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of documents in the corpus
        corpus_size: usize,
    },

    /// Candidate list does not line up with the corpus the model was built from
    #[error("Candidate count {candidates} does not match corpus size {corpus_size}")]
    CandidateMismatch {
        /// Number of candidates passed to the ranking call
        candidates: usize,
        /// Number of documents in the model's corpus
        corpus_size: usize,
    },

    /// Candidate pool smaller than the caller's required minimum
    #[error("Too few candidates: {candidates} posts, at least {required} required")]
    TooFewCandidates {
        /// Posts left in the pool
        candidates: usize,
        /// Required minimum
        required: usize,
    },

    /// I/O error (reading history or config files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON decoding error
    #[error("JSON error: {0}")]
    Json(String),

    /// TOML decoding or encoding error
    #[error("TOML error: {0}")]
    Toml(String),
}

impl Error {
    /// Shorthand for an [`Error::InvalidConfig`]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }

    /// True for errors caused by a bad configuration value
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::InvalidConfig(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Toml(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Toml(e.to_string())
    }
}
