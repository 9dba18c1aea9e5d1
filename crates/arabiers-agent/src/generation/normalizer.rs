//! Final-answer extraction from raw model output

use regex::Regex;
use std::sync::OnceLock;

use crate::types::GenerationResult;

fn final_answer_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"(?i)final answer:").expect("valid final answer regex"))
}

/// Text after the last `final answer:` marker (any case), trimmed.
///
/// Returns `None` when the marker is absent.
pub fn extract_final_answer(text: &str) -> Option<String> {
    final_answer_marker()
        .find_iter(text)
        .last()
        .map(|m| text[m.end()..].trim().to_string())
}

/// Reduce raw model output to the answer shown to the user.
///
/// Structured results are first reduced to their `output`/`output_text`
/// field (or their JSON form). The answer is then the text after the final
/// answer marker, or the whole trimmed text when there is no marker.
pub fn normalize(raw: &GenerationResult) -> String {
    let text = raw.to_text();
    extract_final_answer(&text).unwrap_or_else(|| text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_after_marker() {
        let raw = GenerationResult::from(
            "Thought: I should look up the rate\nAction: hotel_document_search\nFinal Answer:   USD 210 per night, half board.  \n",
        );
        assert_eq!(normalize(&raw), "USD 210 per night, half board.");
    }

    #[test]
    fn test_marker_is_case_insensitive() {
        assert_eq!(normalize(&"FINAL ANSWER: yes".into()), "yes");
        assert_eq!(normalize(&"final answer:no".into()), "no");
    }

    #[test]
    fn test_without_marker_returns_trimmed_text() {
        let raw = GenerationResult::from("\n  I am Arabiers AI Agent, a hotel expert.  \n");
        assert_eq!(normalize(&raw), "I am Arabiers AI Agent, a hotel expert.");
    }

    #[test]
    fn test_last_marker_wins() {
        let raw =
            GenerationResult::from("Final Answer: draft\nThought: refine\nFinal Answer: done");
        assert_eq!(normalize(&raw), "done");
    }

    #[test]
    fn test_structured_result() {
        let raw =
            GenerationResult::Structured(json!({"output": "Thought: ok\nFinal Answer: 3 nights"}));
        assert_eq!(normalize(&raw), "3 nights");

        let raw = GenerationResult::Structured(json!({"answer": 1}));
        assert_eq!(normalize(&raw), r#"{"answer":1}"#);
    }

    #[test]
    fn test_extract_absent() {
        assert_eq!(extract_final_answer("Action: search"), None);
    }
}
