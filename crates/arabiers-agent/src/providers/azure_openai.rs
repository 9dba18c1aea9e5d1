//! Azure OpenAI client for prompt completion
//!
//! `predict` calls the chat-completions API of the deployment. Deployments
//! of completion-only models expose the legacy completions API instead,
//! which serves `generate_batch`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::types::{GenerationResult, Prompt};

use super::llm::LlmProvider;

/// Azure OpenAI REST client bound to one deployment
pub struct AzureOpenAiClient {
    client: Client,
    config: LlmConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Value,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    prompt: Vec<&'a str>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    index: usize,
    text: String,
}

impl AzureOpenAiClient {
    /// Create a new client
    pub fn new(config: &LlmConfig) -> Result<Self> {
        if config.endpoint.is_empty() || config.deployment.is_empty() {
            return Err(Error::Config(
                "AZURE_OPENAI_ENDPOINT and AZURE_OPENAI_DEPLOYMENT must be set".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn deployment_url(&self, operation: &str) -> String {
        format!(
            "{}/openai/deployments/{}/{}?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.deployment,
            operation,
            self.config.api_version
        )
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(url)
            .header("api-key", &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::llm(format!("Generation request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::llm(format!(
                "Generation failed: HTTP {} - {}",
                status, body
            )));
        }

        Ok(response)
    }

    /// Extract the generation result from a chat message object
    fn message_result(message: Value) -> GenerationResult {
        match message.get("content") {
            Some(Value::String(text)) => GenerationResult::Text(text.clone()),
            _ => GenerationResult::Structured(message),
        }
    }
}

#[async_trait]
impl LlmProvider for AzureOpenAiClient {
    async fn predict(&self, prompt: &Prompt) -> Result<GenerationResult> {
        if !self.config.chat_completions {
            return Err(Error::unsupported("azure-openai::predict"));
        }

        tracing::info!("Generating answer with deployment: {}", self.config.deployment);

        let request = ChatRequest {
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.as_str(),
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .post_json(&self.deployment_url("chat/completions"), &request)
            .await?;
        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::llm(format!("Failed to parse generation response: {}", e)))?;

        chat.choices
            .into_iter()
            .next()
            .map(|choice| Self::message_result(choice.message))
            .ok_or_else(|| Error::llm("Generation response contained no choices"))
    }

    async fn generate_batch(&self, prompts: &[Prompt]) -> Result<Vec<GenerationResult>> {
        tracing::info!(
            "Generating {} completion(s) with deployment: {}",
            prompts.len(),
            self.config.deployment
        );

        let request = CompletionRequest {
            prompt: prompts.iter().map(Prompt::as_str).collect(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .post_json(&self.deployment_url("completions"), &request)
            .await?;
        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::llm(format!("Failed to parse completion response: {}", e)))?;

        let mut choices = completion.choices;
        choices.sort_by_key(|c| c.index);
        Ok(choices
            .into_iter()
            .map(|c| GenerationResult::Text(c.text))
            .collect())
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!(
            "{}/openai/deployments?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
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
        "azure-openai"
    }

    fn model(&self) -> &str {
        &self.config.deployment
    }
}
