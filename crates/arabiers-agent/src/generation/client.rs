//! Generation client
//!
//! Invokes the language model once per call, preferring the provider's
//! `predict` entry point and falling back to `generate_batch` only when
//! `predict` is not exposed.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::LlmProvider;
use crate::types::{GenerationResult, Prompt};

/// Entry points in preference order
const ENTRY_POINTS: [&str; 2] = ["predict", "generate_batch"];

/// Single-attempt generation over an [`LlmProvider`]
pub struct GenerationClient {
    provider: Arc<dyn LlmProvider>,
}

impl GenerationClient {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Underlying provider
    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    /// Generate output for `prompt`.
    ///
    /// Fails with [`Error::GenerationUnavailable`] when the provider errors
    /// or exposes neither entry point.
    pub async fn generate(&self, prompt: &Prompt) -> Result<GenerationResult> {
        let mut attempted = Vec::with_capacity(ENTRY_POINTS.len());

        attempted.push(ENTRY_POINTS[0].to_string());
        match self.provider.predict(prompt).await {
            Ok(result) => return Ok(result),
            Err(Error::Unsupported(op)) => {
                tracing::debug!("{} not available, falling back to batch generation", op);
            }
            Err(e) => return Err(unavailable(attempted, &e)),
        }

        attempted.push(ENTRY_POINTS[1].to_string());
        match self
            .provider
            .generate_batch(std::slice::from_ref(prompt))
            .await
        {
            Ok(results) => results.into_iter().next().ok_or_else(|| Error::GenerationUnavailable {
                attempted,
                detail: "batch generation returned no results".to_string(),
            }),
            Err(e) => Err(unavailable(attempted, &e)),
        }
    }
}

fn unavailable(attempted: Vec<String>, cause: &Error) -> Error {
    tracing::error!(provider_error = %cause, "Generation failed");
    Error::GenerationUnavailable {
        attempted,
        detail: cause.detail(),
    }
}
