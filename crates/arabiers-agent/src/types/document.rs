//! Documents returned by the search backend

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Secondary content field checked when the primary one is absent
pub const SECONDARY_CONTENT_KEY: &str = "page_content";

/// A scored passage returned by a retriever.
///
/// Backends disagree on where the passage text lives, so both the configured
/// content field and the secondary `page_content` field are kept; the
/// context assembler decides which one to use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDocument {
    /// Primary content field (the configured content key)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Secondary content field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_content: Option<String>,
    /// Relevance score reported by the backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    /// Remaining fields of the backend record
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl RetrievedDocument {
    /// Create a document with primary content only
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// Set the relevance score
    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }

    /// Attach a metadata field
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Build a document from one backend record.
    ///
    /// Objects are split into content, score (`@search.score` or `score`)
    /// and metadata. Bare strings become the primary content. Any other
    /// value is kept as metadata under `value`.
    pub fn from_value(value: Value, content_key: &str) -> Self {
        match value {
            Value::Object(mut fields) => {
                let content = take_string(&mut fields, content_key);
                let page_content = if content_key == SECONDARY_CONTENT_KEY {
                    None
                } else {
                    take_string(&mut fields, SECONDARY_CONTENT_KEY)
                };
                let score = ["@search.score", "score"]
                    .iter()
                    .find_map(|key| fields.remove(*key))
                    .and_then(|v| v.as_f64())
                    .map(|s| s as f32);

                Self {
                    content,
                    page_content,
                    score,
                    metadata: fields,
                }
            }
            Value::String(text) => Self::new(text),
            other => {
                let mut metadata = Map::new();
                metadata.insert("value".to_string(), other);
                Self {
                    metadata,
                    ..Default::default()
                }
            }
        }
    }
}

impl std::fmt::Display for RetrievedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}

/// Remove a field and return it as text if it is a non-null scalar
fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.remove(key)? {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
