//! Session creation and the ask endpoint

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::time::Instant;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::export::generate_pdf;
use crate::server::state::AppState;
use crate::server::ui::render_markdown;
use crate::types::{AskRequest, AskResponse, HistoryItem, SessionCreated};

/// POST /api/sessions - Start a new UI session
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionCreated>) {
    let session_id = state.sessions().create();
    tracing::info!(session = %session_id, "New session");
    (StatusCode::CREATED, Json(SessionCreated { session_id }))
}

/// POST /api/sessions/:id/ask - Answer a question and record it
pub async fn ask(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let start = Instant::now();

    if !state.sessions().exists(&id) {
        return Err(Error::SessionNotFound(id));
    }

    let question = request.question.trim();
    if question.is_empty() {
        return Err(Error::InvalidRequest("Please enter a question.".to_string()));
    }

    tracing::info!(session = %id, "Question: \"{}\"", question);

    let answer = state.service().generate_quotation(question).await;
    let entry = state.sessions().record(&id, question, &answer)?;

    let pdf_available = if state.config().export.auto_export {
        export_answer(&state, &answer).await
    } else {
        tokio::fs::try_exists(&state.config().export.pdf_path)
            .await
            .unwrap_or(false)
    };

    let processing_time_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        session = %id,
        answer_len = answer.len(),
        "Answered in {}ms",
        processing_time_ms
    );

    Ok(Json(AskResponse {
        answer_html: render_markdown(&answer),
        // Newest entry heads the list
        entry: HistoryItem::from_entry(&entry, 1),
        answer,
        pdf_available,
        processing_time_ms,
    }))
}

/// Write the answer to the fixed PDF path; failures are logged only
async fn export_answer(state: &AppState, answer: &str) -> bool {
    let export = state.config().export.clone();
    let text = answer.to_string();

    let export_task = tokio::task::spawn_blocking(move || {
        generate_pdf(&text, &export.pdf_path, export.max_chars)
    });
    match export_task.await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            tracing::warn!("PDF export failed: {}", e);
            false
        }
        Err(e) => {
            tracing::warn!("PDF export task failed: {}", e);
            false
        }
    }
}
