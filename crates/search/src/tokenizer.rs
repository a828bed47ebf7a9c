//! Tokenizer adapter
//!
//! Word segmentation is a pluggable strategy. The ranking engine only needs
//! `segment(text) -> tokens`; which language rules apply is the caller's
//! choice. For scripts without spaces between words, naive whitespace
//! splitting is wrong, so a dictionary segmenter can be plugged in through
//! [`FnTokenizer`] without touching the engine.

use postrank_core::TokenizerKind;
use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

/// Word segmentation strategy
///
/// # Thread Safety
///
/// Tokenizers must be Send + Sync so a model can be scored from the rayon pool.
///
/// # Contract
///
/// `segment` must be deterministic: the same input always yields the same
/// token sequence.
pub trait Tokenizer: Send + Sync {
    /// Split text into word-level tokens
    fn segment(&self, text: &str) -> Vec<String>;

    /// Name for debugging and logging
    fn name(&self) -> &str;
}

impl<T: Tokenizer + ?Sized> Tokenizer for &T {
    fn segment(&self, text: &str) -> Vec<String> {
        (**self).segment(text)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for Box<T> {
    fn segment(&self, text: &str) -> Vec<String> {
        (**self).segment(text)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for Arc<T> {
    fn segment(&self, text: &str) -> Vec<String> {
        (**self).segment(text)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

// ============================================================================
// UnicodeWordTokenizer
// ============================================================================

/// UAX#29 word boundaries, lowercased
///
/// Punctuation and whitespace are dropped. Han ideographs carry no word
/// boundary rule, so each one becomes its own token:
///
/// ```
/// use postrank_search::tokenizer::{Tokenizer, UnicodeWordTokenizer};
///
/// let tokens = UnicodeWordTokenizer.segment("Hello, 猫和狗!");
/// assert_eq!(tokens, vec!["hello", "猫", "和", "狗"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeWordTokenizer;

impl Tokenizer for UnicodeWordTokenizer {
    fn segment(&self, text: &str) -> Vec<String> {
        text.unicode_words().map(str::to_lowercase).collect()
    }

    fn name(&self) -> &str {
        "unicode"
    }
}

// ============================================================================
// CharBigramTokenizer
// ============================================================================

/// Overlapping character bigrams within each UAX#29 word, lowercased
///
/// UAX#29 emits Han ideographs one per word, so directly adjacent Han words
/// are joined into one run first. A run of one character yields that
/// character.
///
/// ```
/// use postrank_search::tokenizer::{CharBigramTokenizer, Tokenizer};
///
/// let tokens = CharBigramTokenizer.segment("猫喜欢, 狗");
/// assert_eq!(tokens, vec!["猫喜", "喜欢", "狗"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CharBigramTokenizer;

fn is_han(c: char) -> bool {
    matches!(c,
        '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{20000}'..='\u{2FA1F}')
}

fn push_bigrams(tokens: &mut Vec<String>, run: &[char]) {
    match run.len() {
        0 => {}
        1 => tokens.push(run[0].to_string()),
        _ => tokens.extend(run.windows(2).map(|pair| pair.iter().collect())),
    }
}

impl Tokenizer for CharBigramTokenizer {
    fn segment(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut run: Vec<char> = Vec::new();
        let mut run_end = 0;

        for (start, word) in text.unicode_word_indices() {
            let joins_han_run = start == run_end
                && run.last().is_some_and(|&c| is_han(c))
                && word.chars().all(is_han);
            if !joins_han_run {
                push_bigrams(&mut tokens, &run);
                run.clear();
            }
            run.extend(word.to_lowercase().chars());
            run_end = start + word.len();
        }
        push_bigrams(&mut tokens, &run);
        tokens
    }

    fn name(&self) -> &str {
        "bigram"
    }
}

// ============================================================================
// WhitespaceTokenizer
// ============================================================================

/// Split on Unicode whitespace, no normalization
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn segment(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(String::from).collect()
    }

    fn name(&self) -> &str {
        "whitespace"
    }
}

// ============================================================================
// FnTokenizer
// ============================================================================

/// Adapter for an external segmentation function
///
/// ```
/// use postrank_search::tokenizer::{FnTokenizer, Tokenizer};
///
/// let by_comma = FnTokenizer::new("comma", |text: &str| {
///     text.split(',').map(|s| s.trim().to_string()).collect()
/// });
/// assert_eq!(by_comma.segment("a, b"), vec!["a", "b"]);
/// ```
pub struct FnTokenizer<F> {
    name: String,
    segment_fn: F,
}

impl<F> FnTokenizer<F>
where
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    /// Wrap `segment_fn` under the given name
    pub fn new(name: impl Into<String>, segment_fn: F) -> Self {
        FnTokenizer {
            name: name.into(),
            segment_fn,
        }
    }
}

impl<F> Tokenizer for FnTokenizer<F>
where
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    fn segment(&self, text: &str) -> Vec<String> {
        (self.segment_fn)(text)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> std::fmt::Debug for FnTokenizer<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTokenizer").field("name", &self.name).finish()
    }
}

/// Built-in tokenizer for a config value
pub fn from_kind(kind: TokenizerKind) -> Box<dyn Tokenizer> {
    match kind {
        TokenizerKind::Unicode => Box::new(UnicodeWordTokenizer),
        TokenizerKind::Bigram => Box::new(CharBigramTokenizer),
        TokenizerKind::Whitespace => Box::new(WhitespaceTokenizer),
    }
}
