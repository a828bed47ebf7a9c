//! Candidate post records
//!
//! A [`Candidate`] is one user-authored post as produced by the crawler. The
//! ranking engine never mutates candidates: it derives a scoring string from
//! each one through [`ScoringText`] and hands the original record back.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::path::Path;

// ============================================================================
// ScoringText
// ============================================================================

/// Text a record contributes to the corpus
///
/// Building the corpus is a caller-side decision, separate from tokenization.
/// Implementations must be pure: the same record always yields the same text.
pub trait ScoringText {
    /// Text to tokenize and score for this record
    fn scoring_text(&self) -> Cow<'_, str>;
}

impl ScoringText for str {
    fn scoring_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl ScoringText for String {
    fn scoring_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl<T: ScoringText + ?Sized> ScoringText for &T {
    fn scoring_text(&self) -> Cow<'_, str> {
        (**self).scoring_text()
    }
}

// ============================================================================
// Candidate
// ============================================================================

/// Quoted or reshared post embedded in a candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reshare {
    /// Text of the reshared post
    #[serde(default)]
    pub text: String,

    /// Any other fields the crawler recorded
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Reshare {
    /// Create a reshare with text only
    pub fn new(text: impl Into<String>) -> Self {
        Reshare {
            text: text.into(),
            extra: Map::new(),
        }
    }
}

/// A user-authored post in the candidate pool
///
/// The crawler stores reshares under `retweet`; `reshare` is accepted as well.
/// Fields this type does not model are kept in `extra` and written back out
/// unchanged on serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Post identifier (number or string, as the crawler wrote it)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    /// Post body
    pub text: String,

    /// Quoted/reshared post, if any
    #[serde(
        default,
        rename = "retweet",
        alias = "reshare",
        skip_serializing_if = "Option::is_none"
    )]
    pub reshare: Option<Reshare>,

    /// Remaining crawler fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Candidate {
    /// Create a candidate with body text only
    pub fn new(text: impl Into<String>) -> Self {
        Candidate {
            id: None,
            text: text.into(),
            reshare: None,
            extra: Map::new(),
        }
    }

    /// Builder: set identifier
    pub fn with_id(mut self, id: impl Into<Value>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder: attach reshared text
    pub fn with_reshare(mut self, text: impl Into<String>) -> Self {
        self.reshare = Some(Reshare::new(text));
        self
    }

    /// Identifier rendered as a string
    ///
    /// Numbers render without quotes so `12345` and `"12345"` compare equal.
    pub fn id_string(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl ScoringText for Candidate {
    /// `text`, or `text + " " + reshare.text` when a reshare is attached
    fn scoring_text(&self) -> Cow<'_, str> {
        match &self.reshare {
            Some(reshare) => Cow::Owned(format!("{} {}", self.text, reshare.text)),
            None => Cow::Borrowed(self.text.as_str()),
        }
    }
}

// ============================================================================
// UserHistory
// ============================================================================

/// A user's post history as written by the crawler
///
/// The file is either `{"user": {...}, "weibo": [...]}` or a bare array of
/// posts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserHistory {
    /// Profile fields (description, gender, ...)
    #[serde(default)]
    pub user: Value,

    /// Posts, oldest-first as crawled
    #[serde(default)]
    pub weibo: Vec<Candidate>,
}

impl UserHistory {
    /// Parse a history document from a JSON string
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        match value {
            Value::Array(_) => Ok(UserHistory {
                user: Value::Null,
                weibo: serde_json::from_value(value)?,
            }),
            other => Ok(serde_json::from_value(other)?),
        }
    }

    /// Read and parse a history file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Posts excluding the one with the given identifier
    ///
    /// The target post itself must not compete against the user's history.
    pub fn without_post(&self, id: &str) -> Vec<Candidate> {
        self.weibo
            .iter()
            .filter(|post| post.id_string().as_deref() != Some(id))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scoring_text_plain() {
        let c = Candidate::new("猫喜欢睡觉");
        assert_eq!(c.scoring_text(), "猫喜欢睡觉");
        assert!(matches!(c.scoring_text(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_scoring_text_with_reshare() {
        let c = Candidate::new("转发").with_reshare("原文内容");
        assert_eq!(c.scoring_text(), "转发 原文内容");
        // The record itself is untouched
        assert_eq!(c.text, "转发");
    }

    #[test]
    fn test_scoring_text_empty_reshare_keeps_separator() {
        let c = Candidate::new("hello").with_reshare("");
        assert_eq!(c.scoring_text(), "hello ");
    }

    #[test]
    fn test_scoring_text_for_strings() {
        let s = String::from("abc");
        assert_eq!(s.scoring_text(), "abc");
        assert_eq!("xyz".scoring_text(), "xyz");
        let r = &s;
        assert_eq!(r.scoring_text(), "abc");
    }

    #[test]
    fn test_deserialize_retweet_field() {
        let c: Candidate = serde_json::from_value(json!({
            "id": 4900000000000001u64,
            "text": "看看这个",
            "retweet": { "text": "山姆超市", "user": "someone" },
            "likes": 3
        }))
        .unwrap();

        assert_eq!(c.reshare.as_ref().unwrap().text, "山姆超市");
        assert_eq!(c.reshare.as_ref().unwrap().extra["user"], json!("someone"));
        assert_eq!(c.extra["likes"], json!(3));
        assert_eq!(c.id_string().as_deref(), Some("4900000000000001"));
    }

    #[test]
    fn test_deserialize_reshare_alias() {
        let c: Candidate = serde_json::from_value(json!({
            "text": "a",
            "reshare": { "text": "b" }
        }))
        .unwrap();
        assert_eq!(c.scoring_text(), "a b");
    }

    #[test]
    fn test_serialize_preserves_crawler_fields() {
        let c: Candidate = serde_json::from_value(json!({
            "id": "abc",
            "text": "t",
            "retweet": { "text": "r" },
            "created_at": "2024-09-05"
        }))
        .unwrap();
        let out = serde_json::to_value(&c).unwrap();
        assert_eq!(out["retweet"]["text"], json!("r"));
        assert_eq!(out["created_at"], json!("2024-09-05"));
        assert_eq!(out["id"], json!("abc"));
    }

    #[test]
    fn test_missing_text_is_error() {
        let result: std::result::Result<Candidate, _> =
            serde_json::from_value(json!({ "id": 1 }));
        assert!(result.is_err());
    }

    #[test]
    fn test_user_history_object() {
        let history = UserHistory::from_json_str(
            r#"{"user": {"description": "d"}, "weibo": [{"id": 1, "text": "a"}, {"id": 2, "text": "b"}]}"#,
        )
        .unwrap();
        assert_eq!(history.weibo.len(), 2);
        assert_eq!(history.user["description"], json!("d"));
    }

    #[test]
    fn test_user_history_bare_array() {
        let history = UserHistory::from_json_str(r#"[{"text": "a"}]"#).unwrap();
        assert_eq!(history.weibo.len(), 1);
        assert!(history.user.is_null());
    }

    #[test]
    fn test_user_history_invalid_json() {
        assert!(UserHistory::from_json_str("{").is_err());
    }

    #[test]
    fn test_without_post() {
        let history = UserHistory {
            user: Value::Null,
            weibo: vec![
                Candidate::new("a").with_id(1),
                Candidate::new("b").with_id("2"),
                Candidate::new("c"),
            ],
        };
        let kept = history.without_post("2");
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].text, "a");
        assert_eq!(kept[1].text, "c");

        let kept = history.without_post("1");
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].text, "b");
    }

    #[test]
    fn test_user_history_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("1001.json");
        std::fs::write(&path, r#"{"weibo": [{"text": "x"}]}"#).unwrap();
        let history = UserHistory::from_file(&path).unwrap();
        assert_eq!(history.weibo[0].text, "x");
    }

    #[test]
    fn test_user_history_missing_file() {
        let err = UserHistory::from_file(Path::new("/nonexistent/history.json")).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
