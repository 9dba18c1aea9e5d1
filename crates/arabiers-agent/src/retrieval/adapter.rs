//! Retriever adapter
//!
//! Presents one `retrieve(query, top_k)` operation over an ordered list of
//! search backends. Backends are tried one at a time in order and the first
//! success wins. The result never exceeds `top_k` documents.

use serde_json::Value;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::DocumentRetriever;
use crate::types::RetrievedDocument;

/// Envelope keys unwrapped by [`normalize_results`], in lookup order
const RESULT_ENVELOPE_KEYS: &[&str] = &["documents", "results", "value"];

/// Ordered retrieval over one or more backends
pub struct RetrieverAdapter {
    backends: Vec<Arc<dyn DocumentRetriever>>,
    default_top_k: usize,
}

impl RetrieverAdapter {
    /// Create an adapter over `backends`, tried in the given order
    pub fn new(backends: Vec<Arc<dyn DocumentRetriever>>, default_top_k: usize) -> Self {
        Self {
            backends,
            default_top_k: default_top_k.max(1),
        }
    }

    /// Create an adapter over a single backend
    pub fn single(backend: Arc<dyn DocumentRetriever>, default_top_k: usize) -> Self {
        Self::new(vec![backend], default_top_k)
    }

    /// Configured number of documents per query
    pub fn default_top_k(&self) -> usize {
        self.default_top_k
    }

    /// Names of the configured backends, in order
    pub fn backend_names(&self) -> Vec<String> {
        self.backends.iter().map(|b| b.name().to_string()).collect()
    }

    /// Retrieve with the configured `top_k`
    pub async fn retrieve_default(&self, query: &str) -> Result<Vec<RetrievedDocument>> {
        self.retrieve(query, self.default_top_k).await
    }

    /// Retrieve at most `top_k` documents for `query`.
    ///
    /// Fails with [`Error::RetrievalUnavailable`] when no backend succeeds.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedDocument>> {
        let top_k = top_k.max(1);
        let mut attempted = Vec::with_capacity(self.backends.len());
        let mut last_error = "no retrieval backend configured".to_string();

        for backend in &self.backends {
            attempted.push(backend.name().to_string());

            match backend.retrieve(query, top_k).await {
                Ok(mut docs) => {
                    docs.truncate(top_k);
                    tracing::info!(
                        backend = backend.name(),
                        "Retrieved {} document(s)",
                        docs.len()
                    );
                    return Ok(docs);
                }
                Err(e) => {
                    tracing::warn!(backend = backend.name(), "Retrieval failed: {}", e);
                    last_error = e.detail();
                }
            }
        }

        Err(Error::RetrievalUnavailable {
            attempted,
            last_error,
        })
    }

    /// True if any backend reports healthy
    pub async fn health_check(&self) -> bool {
        for backend in &self.backends {
            if matches!(backend.health_check().await, Ok(true)) {
                return true;
            }
        }
        false
    }
}

/// Flatten a backend response into a list of records.
///
/// An array is used as-is. An object carrying a `documents`, `results` or
/// `value` array is unwrapped. Anything else becomes a single record;
/// `null` becomes no records.
pub fn normalize_results(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        Value::Object(mut fields) => {
            for key in RESULT_ENVELOPE_KEYS {
                if matches!(fields.get(*key), Some(Value::Array(_))) {
                    if let Some(Value::Array(items)) = fields.remove(*key) {
                        return items;
                    }
                }
            }
            vec![Value::Object(fields)]
        }
        other => vec![other],
    }
}
