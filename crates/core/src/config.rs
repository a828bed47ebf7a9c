//! Retrieval configuration via `postrank.toml`
//!
//! All values have defaults, so an empty file is a valid configuration.
//! Values are validated eagerly on load: an out-of-range parameter is
//! rejected, never clamped.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Config file name looked up by the CLI when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "postrank.toml";

/// Default term-frequency saturation
pub const DEFAULT_K1: f64 = 1.5;
/// Default length normalization
pub const DEFAULT_B: f64 = 0.75;
/// Default number of posts returned per query
pub const DEFAULT_TOP_K: usize = 3;

// ============================================================================
// Bm25Params
// ============================================================================

/// Validated BM25 parameters
///
/// Invariants: `k1` is finite and `>= 0`; `b` is in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    k1: f64,
    b: f64,
}

impl Bm25Params {
    /// Create parameters, rejecting values outside their domain
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `k1 < 0`, `b` is outside `[0, 1]`,
    /// or either value is not finite.
    pub fn new(k1: f64, b: f64) -> Result<Self> {
        if !k1.is_finite() || k1 < 0.0 {
            return Err(Error::invalid_config(format!(
                "k1 must be a finite number >= 0, got {}",
                k1
            )));
        }
        if !b.is_finite() || !(0.0..=1.0).contains(&b) {
            return Err(Error::invalid_config(format!(
                "b must be in [0, 1], got {}",
                b
            )));
        }
        Ok(Bm25Params { k1, b })
    }

    /// Term-frequency saturation
    pub fn k1(&self) -> f64 {
        self.k1
    }

    /// Length normalization
    pub fn b(&self) -> f64 {
        self.b
    }
}

impl Default for Bm25Params {
    fn default() -> Self {
        Bm25Params {
            k1: DEFAULT_K1,
            b: DEFAULT_B,
        }
    }
}

// ============================================================================
// TokenizerKind
// ============================================================================

/// Built-in segmentation strategies selectable from config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerKind {
    /// UAX#29 word boundaries, lowercased; Han ideographs become single tokens
    #[default]
    Unicode,
    /// Overlapping character bigrams within each UAX#29 word (adjacent Han ideographs form one run)
    Bigram,
    /// Split on whitespace only
    Whitespace,
}

impl TokenizerKind {
    /// Name used in config files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenizerKind::Unicode => "unicode",
            TokenizerKind::Bigram => "bigram",
            TokenizerKind::Whitespace => "whitespace",
        }
    }
}

impl fmt::Display for TokenizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenizerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "unicode" => Ok(TokenizerKind::Unicode),
            "bigram" => Ok(TokenizerKind::Bigram),
            "whitespace" => Ok(TokenizerKind::Whitespace),
            other => Err(Error::invalid_config(format!(
                "Unknown tokenizer '{}'. Expected \"unicode\", \"bigram\" or \"whitespace\".",
                other
            ))),
        }
    }
}

// ============================================================================
// RetrievalConfig
// ============================================================================

/// Retrieval configuration loaded from `postrank.toml`.
///
/// # Example
///
/// ```toml
/// k1 = 1.5
/// b = 0.75
/// top_k = 5
/// tokenizer = "unicode"
/// parallel = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// BM25 term-frequency saturation
    #[serde(default = "default_k1")]
    pub k1: f64,
    /// BM25 length normalization
    #[serde(default = "default_b")]
    pub b: f64,
    /// Number of posts returned per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Segmentation strategy
    #[serde(default)]
    pub tokenizer: TokenizerKind,
    /// Score candidates on the rayon pool
    #[serde(default)]
    pub parallel: bool,
}

fn default_k1() -> f64 {
    DEFAULT_K1
}

fn default_b() -> f64 {
    DEFAULT_B
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            k1: DEFAULT_K1,
            b: DEFAULT_B,
            top_k: DEFAULT_TOP_K,
            tokenizer: TokenizerKind::default(),
            parallel: false,
        }
    }
}

impl RetrievalConfig {
    /// Validated BM25 parameters from this config
    ///
    /// # Errors
    ///
    /// Returns an error if `k1` or `b` is out of range.
    pub fn params(&self) -> Result<Bm25Params> {
        Bm25Params::new(self.k1, self.b)
    }

    /// Check every field
    pub fn validate(&self) -> Result<()> {
        self.params().map(|_| ())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# postrank retrieval configuration
#
# BM25 term-frequency saturation (>= 0, default 1.5)
k1 = 1.5

# BM25 document length normalization (0..=1, default 0.75)
b = 0.75

# Number of posts returned per query (default 3)
top_k = 3

# Segmentation strategy: "unicode" (default), "bigram" or "whitespace"
tokenizer = "unicode"

# Score candidates in parallel (default false); results are identical
parallel = false
"#
    }

    /// Parse and validate config from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RetrievalConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds an
    /// out-of-range value.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
