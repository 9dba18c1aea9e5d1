//! LLM provider trait for generating text from a prompt

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::types::{GenerationResult, Prompt};

/// Trait for text generation backends
///
/// A backend exposes up to two entry points. `predict` is the preferred
/// single-prompt call; `generate_batch` is the fallback. A backend that
/// lacks an entry point returns [`Error::Unsupported`] from it.
///
/// Implementations:
/// - `AzureOpenAiClient`: Azure OpenAI deployment (chat or completions)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate output for a single prompt
    async fn predict(&self, prompt: &Prompt) -> Result<GenerationResult> {
        let _ = prompt;
        Err(Error::unsupported(format!("{}::predict", self.name())))
    }

    /// Generate output for several prompts, one result per prompt in order
    async fn generate_batch(&self, prompts: &[Prompt]) -> Result<Vec<GenerationResult>> {
        let _ = prompts;
        Err(Error::unsupported(format!("{}::generate_batch", self.name())))
    }

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model or deployment being used
    fn model(&self) -> &str;
}
