//! Retriever trait for fetching passages from a search index

use async_trait::async_trait;

use crate::error::Result;
use crate::types::RetrievedDocument;

/// Trait for search backends
///
/// Implementations:
/// - `AzureSearchRetriever`: Azure AI Search index
#[async_trait]
pub trait DocumentRetriever: Send + Sync {
    /// Fetch up to `top_k` passages relevant to `query`.
    ///
    /// Backends may return more than asked; callers truncate.
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedDocument>>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
