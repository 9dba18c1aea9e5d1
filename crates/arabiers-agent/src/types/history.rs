//! Per-session question/answer history entries

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Characters of the question shown in a history label
const LABEL_QUESTION_CHARS: usize = 60;

/// One answered question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Question as typed by the user
    pub question: String,
    /// Answer shown to the user
    pub answer: String,
    /// When the answer was produced
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Create an entry stamped with the current time
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            timestamp: Utc::now(),
        }
    }

    /// Expander title, e.g. `Q1: Find the 2025 contract rate... • 14:05`.
    ///
    /// `position` is 1-based in display order (newest first). The time is
    /// shown in the server's local zone, like the PDF download name.
    pub fn label(&self, position: usize) -> String {
        let preview: String = self.question.chars().take(LABEL_QUESTION_CHARS).collect();
        format!(
            "Q{}: {}... • {}",
            position,
            preview,
            self.timestamp.with_timezone(&Local).format("%H:%M")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_label_truncates_question() {
        let local = Local.with_ymd_and_hms(2025, 11, 7, 14, 5, 0).unwrap();
        let entry = HistoryEntry {
            question: "x".repeat(100),
            answer: "a".to_string(),
            timestamp: local.with_timezone(&Utc),
        };
        let label = entry.label(2);
        assert!(label.starts_with("Q2: "));
        assert!(label.contains(&"x".repeat(60)));
        assert!(!label.contains(&"x".repeat(61)));
        assert!(label.ends_with("... • 14:05"));
    }
}
