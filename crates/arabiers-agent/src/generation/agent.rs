//! ReAct agent loop
//!
//! The model reasons in Thought/Action/Observation turns with the hotel
//! document search as its only tool, until it emits a `Final Answer:` or
//! one of the two ceilings (iterations, wall-clock time) is hit.

use regex::Regex;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use crate::error::{Error, LimitReason, Result};
use crate::retrieval::RetrieverAdapter;

use super::client::GenerationClient;
use super::context::{ContextAssembler, NO_DOCUMENTS_MARKER};
use super::normalizer::extract_final_answer;
use super::prompt::{PromptBuilder, PromptMode, ToolSpec};

/// Name of the document search tool
pub const SEARCH_TOOL_NAME: &str = "hotel_document_search";

const SEARCH_TOOL_DESCRIPTION: &str = "Searches Sri Lanka hotel contracts, rate sheets and tourism documents. \
     Input should be a search query describing the hotel, dates, room and meal plan.";

/// Ceilings for one agent run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentLimits {
    pub max_iterations: u32,
    pub max_execution: Duration,
}

impl AgentLimits {
    pub fn new(max_iterations: u32, max_execution_secs: u64) -> Self {
        Self {
            max_iterations: max_iterations.max(1),
            max_execution: Duration::from_secs(max_execution_secs),
        }
    }

    fn exceeded(&self, reason: LimitReason, partial: String) -> Error {
        Error::ExecutionLimitExceeded {
            reason,
            max_iterations: self.max_iterations,
            max_execution_secs: self.max_execution.as_secs(),
            partial,
        }
    }
}

/// Successful agent run
#[derive(Debug, Clone)]
pub struct AgentOutcome {
    /// Final answer text
    pub answer: String,
    /// Model calls made
    pub iterations: u32,
    /// Tool invocations made
    pub tool_calls: u32,
}

/// One parsed model turn
#[derive(Debug, PartialEq)]
enum Step {
    Final(String),
    Action { tool: String, input: String },
    /// Neither marker present; the text is taken as the answer
    Plain(String),
}

fn action_pattern() -> &'static Regex {
    static ACTION: OnceLock<Regex> = OnceLock::new();
    ACTION.get_or_init(|| {
        Regex::new(r"(?s)Action\s*\d*\s*:[\s]*(.*?)[\s]*Action\s*\d*\s*Input\s*\d*\s*:[\s]*(.*)")
            .expect("valid action regex")
    })
}

fn observation_pattern() -> &'static Regex {
    static OBSERVATION: OnceLock<Regex> = OnceLock::new();
    OBSERVATION
        .get_or_init(|| Regex::new(r"\n\s*Observation\s*:").expect("valid observation regex"))
}

/// Drop anything from a model-written `Observation:` line onwards
fn strip_hallucinated_observation(text: &str) -> &str {
    match observation_pattern().find(text) {
        Some(m) => &text[..m.start()],
        None => text,
    }
}

/// Parse one model turn.
///
/// Anything after a model-written `Observation:` is dropped before either
/// marker is looked at, so an action always runs the real tool.
fn parse_step(output: &str) -> Step {
    let turn = strip_hallucinated_observation(output);

    if let Some(caps) = action_pattern().captures(turn) {
        let tool = caps[1].trim().to_string();
        let input = caps[2]
            .trim()
            .trim_matches('"')
            .trim()
            .to_string();
        return Step::Action { tool, input };
    }

    if let Some(answer) = extract_final_answer(turn) {
        return Step::Final(answer);
    }

    Step::Plain(turn.trim().to_string())
}

/// ReAct loop over the retriever tool
pub struct ReactAgent {
    retriever: Arc<RetrieverAdapter>,
    generator: Arc<GenerationClient>,
    prompts: PromptBuilder,
    limits: AgentLimits,
    tools: Vec<ToolSpec>,
}

impl ReactAgent {
    pub fn new(
        retriever: Arc<RetrieverAdapter>,
        generator: Arc<GenerationClient>,
        prompts: PromptBuilder,
        limits: AgentLimits,
    ) -> Self {
        Self {
            retriever,
            generator,
            prompts,
            limits,
            tools: vec![ToolSpec::new(SEARCH_TOOL_NAME, SEARCH_TOOL_DESCRIPTION)],
        }
    }

    pub fn limits(&self) -> AgentLimits {
        self.limits
    }

    /// Run the loop for `query`.
    ///
    /// Returns [`Error::ExecutionLimitExceeded`] with the last model output
    /// as partial result when a ceiling is hit first.
    pub async fn run(&self, query: &str) -> Result<AgentOutcome> {
        let started = Instant::now();
        let mut scratchpad = String::new();
        let mut partial = String::new();
        let mut tool_calls = 0u32;

        for iteration in 1..=self.limits.max_iterations {
            let Some(remaining) = self.limits.max_execution.checked_sub(started.elapsed()) else {
                return Err(self.limits.exceeded(LimitReason::Time, partial));
            };

            let prompt = self.prompts.build(
                query,
                "",
                PromptMode::Agent {
                    tools: &self.tools,
                    scratchpad: &scratchpad,
                },
            );

            let generation = self.generator.generate(&prompt);
            let raw = match tokio::time::timeout(remaining, generation).await {
                Ok(result) => result?,
                Err(_) => return Err(self.limits.exceeded(LimitReason::Time, partial)),
            };
            let output = raw.to_text();
            tracing::debug!(iteration, output_len = output.len(), "Agent step");

            match parse_step(&output) {
                Step::Final(answer) => {
                    return Ok(AgentOutcome {
                        answer,
                        iterations: iteration,
                        tool_calls,
                    });
                }
                Step::Plain(answer) => {
                    tracing::debug!(
                        iteration,
                        "No action or final answer marker; using output as answer"
                    );
                    return Ok(AgentOutcome {
                        answer,
                        iterations: iteration,
                        tool_calls,
                    });
                }
                Step::Action { tool, input } => {
                    tool_calls += 1;
                    let turn = strip_hallucinated_observation(&output).trim_end();
                    partial = turn.trim().to_string();

                    let remaining = self
                        .limits
                        .max_execution
                        .saturating_sub(started.elapsed());
                    let search = self.invoke_tool(&tool, &input);
                    let observation = match tokio::time::timeout(remaining, search).await {
                        Ok(observation) => observation,
                        Err(_) => return Err(self.limits.exceeded(LimitReason::Time, partial)),
                    };

                    scratchpad.push_str(turn);
                    scratchpad.push_str("\nObservation: ");
                    scratchpad.push_str(&observation);
                    scratchpad.push_str("\nThought:");
                }
            }
        }

        Err(self.limits.exceeded(LimitReason::Iterations, partial))
    }

    /// Run a tool and return its observation text
    async fn invoke_tool(&self, tool: &str, input: &str) -> String {
        if tool != SEARCH_TOOL_NAME {
            tracing::warn!(tool, "Model requested an unknown tool");
            return format!(
                "{} is not a valid tool, try one of [{}].",
                tool,
                self.tool_names()
            );
        }

        tracing::info!(query = input, "Agent searching documents");
        match self.retriever.retrieve_default(input).await {
            Ok(docs) => ContextAssembler::assemble(&docs),
            Err(e) => {
                tracing::warn!("Agent document search failed: {}", e);
                NO_DOCUMENTS_MARKER.to_string()
            }
        }
    }

    fn tool_names(&self) -> String {
        self.tools
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
