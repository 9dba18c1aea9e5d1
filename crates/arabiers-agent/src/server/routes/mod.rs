//! API routes for the agent server

pub mod ask;
pub mod export;
pub mod history;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Sessions
        .route("/sessions", post(ask::create_session))
        .route("/sessions/:id/ask", post(ask::ask))
        .route(
            "/sessions/:id/history",
            get(history::get_history).delete(history::clear_history),
        )
        // Export
        .route("/quote.pdf", get(export::download_pdf))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let service = state.service();
    Json(serde_json::json!({
        "name": service.agent_name(),
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Sri Lanka hotel quotation assistant over Azure AI Search and Azure OpenAI",
        "mode": service.mode().to_string(),
        "retrievers": service.retriever().backend_names(),
        "endpoints": {
            "POST /api/sessions": "Start a session",
            "POST /api/sessions/:id/ask": "Ask a question",
            "GET /api/sessions/:id/history": "Question history, newest first",
            "DELETE /api/sessions/:id/history": "Clear history",
            "GET /api/quote.pdf": "Download the latest quotation as PDF"
        }
    }))
}
