//! Request and response payloads of the HTTP API

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::history::HistoryEntry;

/// Body of `POST /api/sessions/:id/ask`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    /// The user's question
    pub question: String,
}

/// Answer to one question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    /// Answer text (markdown)
    pub answer: String,
    /// Answer rendered to HTML
    pub answer_html: String,
    /// History entry recorded for this question
    pub entry: HistoryItem,
    /// Whether the quotation PDF was refreshed
    pub pdf_available: bool,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Body of `POST /api/sessions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
}

/// A history entry prepared for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryItem {
    /// Expander title
    pub label: String,
    pub question: String,
    pub answer: String,
    /// Answer rendered to HTML
    pub answer_html: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl HistoryItem {
    /// Build a display item; `position` is 1-based, newest first
    pub fn from_entry(entry: &HistoryEntry, position: usize) -> Self {
        Self {
            label: entry.label(position),
            question: entry.question.clone(),
            answer: entry.answer.clone(),
            answer_html: crate::server::ui::render_markdown(&entry.answer),
            timestamp: entry.timestamp,
        }
    }
}

/// Body of `GET /api/sessions/:id/history`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    /// Entries, newest first
    pub entries: Vec<HistoryItem>,
    /// Most recent answer, if any
    pub last_response: Option<String>,
    /// Whether a quotation PDF can be downloaded for the last answer
    pub pdf_available: bool,
}
