//! Prompt and raw generation output

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A fully rendered prompt. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt(String);

impl Prompt {
    /// Wrap rendered prompt text
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Prompt text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the prompt text
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Prompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Prompt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Raw output of the language model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GenerationResult {
    /// Plain generated text
    Text(String),
    /// Structured result object, e.g. an agent output record
    Structured(Value),
}

impl GenerationResult {
    /// Text form of the output before any marker parsing.
    ///
    /// Structured results yield their `output` or `output_text` field when
    /// present, otherwise the whole object serialized as JSON.
    pub fn to_text(&self) -> String {
        match self {
            GenerationResult::Text(text) => text.clone(),
            GenerationResult::Structured(value) => {
                for key in ["output", "output_text"] {
                    match value.get(key) {
                        Some(Value::String(s)) => return s.clone(),
                        Some(Value::Null) | None => continue,
                        Some(other) => return other.to_string(),
                    }
                }
                match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                }
            }
        }
    }
}

impl From<String> for GenerationResult {
    fn from(text: String) -> Self {
        GenerationResult::Text(text)
    }
}

impl From<&str> for GenerationResult {
    fn from(text: &str) -> Self {
        GenerationResult::Text(text.to_string())
    }
}
