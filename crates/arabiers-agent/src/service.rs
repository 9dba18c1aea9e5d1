//! Quotation service
//!
//! `generate_quotation` is the single entry point the UI and CLI call. It
//! runs retrieval, prompt assembly, generation and normalization (or the
//! ReAct loop in agent mode) and always hands back a displayable string.

use std::sync::Arc;
use std::time::Instant;

use crate::config::{AgentConfig, AgentMode, AgentSettings};
use crate::error::{Error, Result};
use crate::generation::{
    normalize, AgentLimits, ContextAssembler, GenerationClient, PromptBuilder, PromptMode,
    ReactAgent,
};
use crate::providers::{AzureOpenAiClient, AzureSearchRetriever, LlmProvider};
use crate::retrieval::RetrieverAdapter;

/// Orchestrates one question into one answer
#[derive(Clone)]
pub struct QuotationService {
    retriever: Arc<RetrieverAdapter>,
    generator: Arc<GenerationClient>,
    prompts: PromptBuilder,
    agent: Arc<ReactAgent>,
    mode: AgentMode,
}

impl QuotationService {
    /// Create a service over the given backends
    pub fn new(
        retriever: RetrieverAdapter,
        llm: Arc<dyn LlmProvider>,
        settings: &AgentSettings,
    ) -> Self {
        let retriever = Arc::new(retriever);
        let generator = Arc::new(GenerationClient::new(llm));
        let prompts = PromptBuilder::new(settings.name.clone());
        let agent = Arc::new(ReactAgent::new(
            Arc::clone(&retriever),
            Arc::clone(&generator),
            prompts.clone(),
            AgentLimits::new(settings.max_iterations, settings.max_execution_secs),
        ));

        Self {
            retriever,
            generator,
            prompts,
            agent,
            mode: settings.mode,
        }
    }

    /// Build the production Azure backends from configuration
    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        let search = Arc::new(AzureSearchRetriever::new(&config.search)?);
        tracing::info!(
            "Azure AI Search retriever ready (index: {}, top_k: {})",
            config.search.index_name,
            config.search.top_k
        );

        let llm = Arc::new(AzureOpenAiClient::new(&config.llm)?);
        tracing::info!(
            "Azure OpenAI client ready (deployment: {}, temperature: {})",
            config.llm.deployment,
            config.llm.temperature
        );

        Ok(Self::new(
            RetrieverAdapter::single(search, config.search.top_k),
            llm,
            &config.agent,
        ))
    }

    pub fn mode(&self) -> AgentMode {
        self.mode
    }

    pub fn agent_name(&self) -> &str {
        self.prompts.agent_name()
    }

    /// Retrieval backends, in the order they are tried
    pub fn retriever(&self) -> &RetrieverAdapter {
        &self.retriever
    }

    /// True if the retriever and the language model both answer health checks
    pub async fn health_check(&self) -> bool {
        let llm_ok = matches!(self.generator.provider().health_check().await, Ok(true));
        llm_ok && self.retriever.health_check().await
    }

    /// Answer `query`.
    ///
    /// Never fails: every error is logged and rendered as a user-facing
    /// message naming the agent.
    pub async fn generate_quotation(&self, query: &str) -> String {
        let started = Instant::now();
        let query = query.trim().to_string();

        if query.is_empty() {
            return self.issue("the question is empty");
        }

        tracing::info!(mode = %self.mode, "Generating quotation for: \"{}\"", query);

        let service = self.clone();
        let task = tokio::spawn(async move { service.answer(&query).await });

        let answer = match task.await {
            Ok(Ok(answer)) => answer,
            Ok(Err(e)) => self.render_error(&e),
            Err(e) => {
                tracing::error!("Quotation task failed: {}", e);
                self.issue("an internal error interrupted the request")
            }
        };

        tracing::info!(
            answer_len = answer.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Quotation ready"
        );
        answer
    }

    async fn answer(&self, query: &str) -> Result<String> {
        let answer = match self.mode {
            AgentMode::Direct => self.answer_direct(query).await?,
            AgentMode::Agent => {
                let outcome = self.agent.run(query).await?;
                tracing::info!(
                    iterations = outcome.iterations,
                    tool_calls = outcome.tool_calls,
                    "Agent finished"
                );
                outcome.answer
            }
        };

        if answer.trim().is_empty() {
            return Err(Error::llm("the language model returned an empty response"));
        }
        Ok(answer)
    }

    async fn answer_direct(&self, query: &str) -> Result<String> {
        let docs = match self.retriever.retrieve_default(query).await {
            Ok(docs) => docs,
            Err(e) => {
                tracing::warn!("Continuing without documents: {}", e);
                Vec::new()
            }
        };

        let context = ContextAssembler::assemble(&docs);
        let prompt = self.prompts.build(query, &context, PromptMode::Direct);
        let raw = self.generator.generate(&prompt).await?;

        Ok(normalize(&raw))
    }

    fn render_error(&self, err: &Error) -> String {
        match err {
            Error::ExecutionLimitExceeded {
                reason,
                max_iterations,
                max_execution_secs,
                partial,
            } => {
                tracing::warn!("{}", err);
                let note = format!(
                    "{} stopped after reaching its {} (limit of {} iterations / {} seconds). \
                     Increase AGENT_MAX_ITERATIONS or AGENT_MAX_EXECUTION_SECS to allow longer reasoning.",
                    self.agent_name(),
                    reason,
                    max_iterations,
                    max_execution_secs
                );
                if partial.trim().is_empty() {
                    format!(
                        "{}\n\n{}",
                        self.issue("no answer was produced before the agent stopped"),
                        note
                    )
                } else {
                    format!("{}\n\n{}", partial.trim(), note)
                }
            }
            other => {
                tracing::error!("Quotation failed: {}", other);
                self.issue(&other.detail())
            }
        }
    }

    fn issue(&self, detail: &str) -> String {
        format!(
            "{} encountered an issue: {}. Please try rephrasing your question.",
            self.agent_name(),
            detail.trim().trim_end_matches('.')
        )
    }
}
