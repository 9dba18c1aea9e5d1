//! HTTP server for the quotation agent

pub mod routes;
pub mod state;
pub mod ui;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AgentConfig;
use crate::error::{Error, Result};
use state::AppState;

/// Agent HTTP Server
pub struct AgentServer {
    config: AgentConfig,
    state: AppState,
}

impl AgentServer {
    /// Create a new server with the production backends
    pub async fn new(config: AgentConfig) -> Result<Self> {
        let state = AppState::new(config.clone()).await?;
        Ok(Self { config, state })
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let mut router = build_router(self.state.clone());
        if self.config.server.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        tracing::info!("Starting {} on http://{}", self.config.agent.name, addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Build the router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // UI
        .route("/", get(ui::index))
        .route("/assets/styles.css", get(ui::styles))
        .route("/assets/logo.png", get(ui::logo))
        // Health check
        .route("/health", get(health_check))
        .route("/ready", get(readiness))
        .nest("/api", routes::api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Readiness check endpoint
async fn readiness(state: axum::extract::State<AppState>) -> axum::http::StatusCode {
    if state.is_ready() {
        axum::http::StatusCode::OK
    } else {
        axum::http::StatusCode::SERVICE_UNAVAILABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::state::test_support::stub_state;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_and_ready() {
        let dir = tempfile::tempdir().unwrap();
        let state = stub_state(dir.path(), &["unused"]);

        let resp = build_router(state.clone()).oneshot(get("/health")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        state.set_ready(false);
        let resp = build_router(state).oneshot(get("/ready")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_index_page_names_agent() {
        let dir = tempfile::tempdir().unwrap();
        let state = stub_state(dir.path(), &["unused"]);

        let resp = build_router(state).oneshot(get("/")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(resp.into_body(), 1_000_000).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("Arabiers AI Agent"));
        assert!(!html.contains("{{AGENT_NAME}}"));
    }

    #[tokio::test]
    async fn test_logo_and_info() {
        let dir = tempfile::tempdir().unwrap();
        let state = stub_state(dir.path(), &["unused"]);
        crate::export::ensure_logo(&state.config().export.logo_path).unwrap();

        let resp = build_router(state.clone()).oneshot(get("/assets/logo.png")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = build_router(state).oneshot(get("/api/info")).await.unwrap();
        let bytes = axum::body::to_bytes(resp.into_body(), 1_000_000).await.unwrap();
        let info: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(info["name"], "Arabiers AI Agent");
        assert_eq!(info["mode"], "direct");
        assert_eq!(info["retrievers"][0], "stub-retriever");
    }
}
