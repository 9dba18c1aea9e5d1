//! Azure AI Search retriever
//!
//! Runs a full-text query against one index through the REST API and turns
//! each hit into a [`RetrievedDocument`].

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::retrieval::normalize_results;
use crate::types::RetrievedDocument;

use super::retriever::DocumentRetriever;

/// Azure AI Search REST client
pub struct AzureSearchRetriever {
    client: Client,
    config: SearchConfig,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    search: &'a str,
    top: usize,
}

impl AzureSearchRetriever {
    /// Create a new retriever
    pub fn new(config: &SearchConfig) -> Result<Self> {
        if config.service_name.is_empty() || config.index_name.is_empty() {
            return Err(Error::Config(
                "AZURE_SEARCH_SERVICE_NAME and AZURE_SEARCH_INDEX_NAME must be set".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Base URL of the search service
    fn service_url(&self) -> String {
        format!("https://{}.search.windows.net", self.config.service_name)
    }

    /// Document search endpoint for the configured index
    fn search_url(&self) -> String {
        format!(
            "{}/indexes/{}/docs/search?api-version={}",
            self.service_url(),
            self.config.index_name,
            self.config.api_version
        )
    }

    /// Turn a search response body into documents
    pub fn parse_response(body: Value, content_key: &str) -> Vec<RetrievedDocument> {
        normalize_results(body)
            .into_iter()
            .map(|hit| RetrievedDocument::from_value(hit, content_key))
            .collect()
    }
}

#[async_trait]
impl DocumentRetriever for AzureSearchRetriever {
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedDocument>> {
        tracing::debug!(index = %self.config.index_name, top_k, "Searching index");

        let response = self
            .client
            .post(self.search_url())
            .header("api-key", &self.config.api_key)
            .json(&SearchRequest { search: query, top: top_k })
            .send()
            .await
            .map_err(|e| Error::search(format!("Search request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::search(format!(
                "Search failed: HTTP {} - {}",
                status, body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::search(format!("Failed to parse search response: {}", e)))?;

        Ok(Self::parse_response(body, &self.config.content_key))
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!(
            "{}/indexes/{}/stats?api-version={}",
            self.service_url(),
            self.config.index_name,
            self.config.api_version
        );

        match self
            .client
            .get(&url)
            .header("api-key", &self.config.api_key)
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "azure-ai-search"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> SearchConfig {
        SearchConfig {
            service_name: "arabiers".to_string(),
            index_name: "hotel-contracts".to_string(),
            api_key: "key".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_search_url() {
        let retriever = AzureSearchRetriever::new(&config()).unwrap();
        assert_eq!(
            retriever.search_url(),
            "https://arabiers.search.windows.net/indexes/hotel-contracts/docs/search?api-version=2024-05-01-preview"
        );
    }

    #[test]
    fn test_requires_service_and_index() {
        let mut cfg = config();
        cfg.index_name.clear();
        assert!(matches!(AzureSearchRetriever::new(&cfg), Err(Error::Config(_))));
    }

    #[test]
    fn test_parse_value_envelope() {
        let body = json!({
            "@odata.context": "https://arabiers.search.windows.net/...",
            "value": [
                {"@search.score": 3.1, "content": "Cinnamon Bentota Beach, HB, 2 adults: USD 210"},
                {"@search.score": 2.4, "content": "Bentota season supplements"}
            ]
        });

        let docs = AzureSearchRetriever::parse_response(body, "content");
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].score, Some(3.1));
        assert_eq!(
            docs[1].content.as_deref(),
            Some("Bentota season supplements")
        );
    }
}
