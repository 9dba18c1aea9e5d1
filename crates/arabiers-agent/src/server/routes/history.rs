//! Session history endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{HistoryItem, HistoryResponse};

/// GET /api/sessions/:id/history - Entries newest first
pub async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryResponse>> {
    let entries = state
        .sessions()
        .history(&id)?
        .iter()
        .enumerate()
        .map(|(i, entry)| HistoryItem::from_entry(entry, i + 1))
        .collect();

    let last_response = state.sessions().last_response(&id)?;
    let pdf_available = last_response.is_some()
        && tokio::fs::try_exists(&state.config().export.pdf_path)
            .await
            .unwrap_or(false);

    Ok(Json(HistoryResponse {
        entries,
        last_response,
        pdf_available,
    }))
}

/// DELETE /api/sessions/:id/history - Clear history and the last response
pub async fn clear_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.sessions().clear(&id)?;
    tracing::info!(session = %id, "History cleared");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::export::generate_pdf;
    use crate::server::build_router;
    use crate::server::state::test_support::stub_state;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    async fn send(app: axum::Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 1_000_000).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_history_newest_first_then_clear() {
        let dir = tempfile::tempdir().unwrap();
        let state = stub_state(dir.path(), &["unused"]);
        let id = state.sessions().create();
        state.sessions().record(&id, "Who are you?", "Arabiers AI Agent").unwrap();
        state.sessions().record(&id, "rate for Kandalama", "USD 190").unwrap();

        let uri = format!("/api/sessions/{}/history", id);
        let (status, body) = send(build_router(state.clone()), "GET", &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["entries"].as_array().unwrap().len(), 2);
        assert_eq!(body["entries"][0]["question"], "rate for Kandalama");
        assert!(body["entries"][1]["label"].as_str().unwrap().starts_with("Q2: Who are you?"));
        assert_eq!(body["last_response"], "USD 190");
        assert_eq!(body["pdf_available"], false);

        let (status, _) = send(build_router(state.clone()), "DELETE", &uri).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(build_router(state), "GET", &uri).await;
        assert!(body["entries"].as_array().unwrap().is_empty());
        assert_eq!(body["last_response"], Value::Null);
    }

    #[tokio::test]
    async fn test_history_reports_existing_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let state = stub_state(dir.path(), &["unused"]);
        let id = state.sessions().create();
        generate_pdf("USD 190", &state.config().export.pdf_path, 3000).unwrap();

        let uri = format!("/api/sessions/{}/history", id);
        let (_, body) = send(build_router(state.clone()), "GET", &uri).await;
        // nothing asked in this session yet
        assert_eq!(body["pdf_available"], false);

        state.sessions().record(&id, "rate for Kandalama", "USD 190").unwrap();
        let (_, body) = send(build_router(state), "GET", &uri).await;
        assert_eq!(body["pdf_available"], true);
    }

    #[tokio::test]
    async fn test_unknown_session_history() {
        let dir = tempfile::tempdir().unwrap();
        let state = stub_state(dir.path(), &["unused"]);

        let uri = format!("/api/sessions/{}/history", uuid::Uuid::new_v4());
        let (status, _) = send(build_router(state), "GET", &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
