//! Application state for the agent server

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

use crate::config::AgentConfig;
use crate::error::Result;
use crate::export::ensure_logo;
use crate::service::QuotationService;
use crate::session::SessionStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: AgentConfig,
    /// Quotation pipeline
    service: QuotationService,
    /// UI sessions
    sessions: SessionStore,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create state with the production Azure backends
    pub async fn new(config: AgentConfig) -> Result<Self> {
        tracing::info!(
            "Initializing {} (mode: {})...",
            config.agent.name,
            config.agent.mode
        );

        let service = QuotationService::from_config(&config)?;
        if service.health_check().await {
            tracing::info!("Search index and language model are reachable");
        } else {
            tracing::warn!("Azure backends not reachable yet; answers will report the failure");
        }
        let state = Self::with_service(config, service);

        if let Err(e) = ensure_logo(&state.config().export.logo_path) {
            tracing::warn!("Could not create placeholder logo: {}", e);
        }

        state.set_ready(true);
        tracing::info!("Application state ready");
        Ok(state)
    }

    /// Create state around an existing service
    pub fn with_service(config: AgentConfig, service: QuotationService) -> Self {
        let sessions = SessionStore::with_ttl(Duration::from_secs(config.server.session_ttl_secs));
        Self {
            inner: Arc::new(AppStateInner {
                config,
                service,
                sessions,
                ready: RwLock::new(false),
            }),
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.inner.config
    }

    pub fn service(&self) -> &QuotationService {
        &self.inner.service
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::providers::stub::{StubLlm, StubRetriever};
    use crate::retrieval::RetrieverAdapter;
    use std::path::Path;

    /// State backed by stub backends, exporting into `dir`
    pub fn stub_state(dir: &Path, replies: &[&str]) -> AppState {
        let mut config = AgentConfig::default();
        config.export.pdf_path = dir.join("quote.pdf");
        config.export.logo_path = dir.join("arabiers.png");

        let service = QuotationService::new(
            RetrieverAdapter::single(
                Arc::new(StubRetriever::with_docs(&[
                    "Heritance Kandalama | Superior | HB | USD 190",
                ])),
                config.search.top_k,
            ),
            Arc::new(StubLlm::replying(replies)),
            &config.agent,
        );

        let state = AppState::with_service(config, service);
        state.set_ready(true);
        state
    }
}
