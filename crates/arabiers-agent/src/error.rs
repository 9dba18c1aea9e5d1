//! Error types for the quotation agent

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, Error>;

/// Which ceiling stopped the agent loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitReason {
    /// `max_iterations` reached without a final answer
    Iterations,
    /// `max_execution_secs` elapsed without a final answer
    Time,
}

impl std::fmt::Display for LimitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LimitReason::Iterations => write!(f, "iteration limit"),
            LimitReason::Time => write!(f, "time limit"),
        }
    }
}

/// Agent errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No retrieval backend could answer the query
    #[error("Document retrieval unavailable (tried: {}): {last_error}", .attempted.join(", "))]
    RetrievalUnavailable {
        attempted: Vec<String>,
        last_error: String,
    },

    /// The language model could not be invoked through any entry point
    #[error("Generation unavailable (tried: {}): {detail}", .attempted.join(", "))]
    GenerationUnavailable {
        attempted: Vec<String>,
        detail: String,
    },

    /// The agent loop ran out of iterations or time
    #[error("Agent stopped due to {reason} (max iterations: {max_iterations}, max execution time: {max_execution_secs}s)")]
    ExecutionLimitExceeded {
        reason: LimitReason,
        max_iterations: u32,
        max_execution_secs: u64,
        partial: String,
    },

    /// A backend does not expose the requested entry point
    #[error("Operation not supported by backend: {0}")]
    Unsupported(String),

    /// Search backend error
    #[error("Search error: {0}")]
    Search(String),

    /// LLM backend error
    #[error("LLM error: {0}")]
    Llm(String),

    /// PDF rendering error
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Unknown UI session
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    /// Malformed client request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a search error
    pub fn search(message: impl Into<String>) -> Self {
        Self::Search(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create a PDF error
    pub fn pdf(message: impl Into<String>) -> Self {
        Self::Pdf(message.into())
    }

    /// Create an unsupported-entry-point error
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported(operation.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Short detail used inside user-facing messages.
    ///
    /// Wrapper variants report their inner cause rather than the full
    /// `Display` chain so the message stays readable in the UI.
    pub fn detail(&self) -> String {
        match self {
            Error::GenerationUnavailable { detail, .. } => detail.clone(),
            Error::RetrievalUnavailable { last_error, .. } => last_error.clone(),
            Error::Search(msg) | Error::Llm(msg) | Error::Pdf(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::Pdf(err.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error", msg.clone()),
            Error::RetrievalUnavailable { .. } => {
                (StatusCode::BAD_GATEWAY, "retrieval_unavailable", self.to_string())
            }
            Error::GenerationUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "generation_unavailable", self.to_string())
            }
            Error::ExecutionLimitExceeded { .. } => {
                (StatusCode::GATEWAY_TIMEOUT, "execution_limit_exceeded", self.to_string())
            }
            Error::Unsupported(op) => (
                StatusCode::NOT_IMPLEMENTED,
                "unsupported",
                format!("Operation not supported: {}", op),
            ),
            Error::Search(msg) => (StatusCode::BAD_GATEWAY, "search_error", msg.clone()),
            Error::Llm(msg) => (StatusCode::SERVICE_UNAVAILABLE, "llm_error", msg.clone()),
            Error::Pdf(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "pdf_error", msg.clone()),
            Error::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("Session not found: {}", id),
            ),
            Error::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "invalid_request", msg.clone()),
            Error::Io(err) if err.kind() == std::io::ErrorKind::NotFound => {
                (StatusCode::NOT_FOUND, "not_found", err.to_string())
            }
            Error::Io(err) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error", err.to_string()),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
            Error::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieval_unavailable_lists_attempts() {
        let err = Error::RetrievalUnavailable {
            attempted: vec!["azure-search".to_string(), "backup".to_string()],
            last_error: "connection refused".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("azure-search, backup"));
        assert!(text.contains("connection refused"));
        assert_eq!(err.detail(), "connection refused");
    }

    #[test]
    fn test_limit_message_names_limits() {
        let err = Error::ExecutionLimitExceeded {
            reason: LimitReason::Iterations,
            max_iterations: 30,
            max_execution_secs: 120,
            partial: String::new(),
        };
        let text = err.to_string();
        assert!(text.contains("iteration limit"));
        assert!(text.contains("30"));
        assert!(text.contains("120s"));
    }

    #[test]
    fn test_status_codes() {
        let resp = Error::SessionNotFound(Uuid::nil()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = Error::InvalidRequest("empty".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
