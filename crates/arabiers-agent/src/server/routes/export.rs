//! Quotation PDF download

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::Response,
};

use crate::error::{Error, Result};
use crate::server::state::AppState;

/// Download name, stamped with the local time of the request
fn download_name() -> String {
    format!(
        "Arabiers_AI_Quote_{}.pdf",
        chrono::Local::now().format("%Y%m%d_%H%M")
    )
}

/// GET /api/quote.pdf - The most recently exported quotation
pub async fn download_pdf(State(state): State<AppState>) -> Result<Response> {
    let path = &state.config().export.pdf_path;
    let bytes = tokio::fs::read(path).await?;

    tracing::debug!("Serving {} ({} bytes)", path.display(), bytes.len());

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", download_name()),
        )
        .body(Body::from(bytes))
        .map_err(|e| Error::internal(format!("Failed to build response: {}", e)))
}
