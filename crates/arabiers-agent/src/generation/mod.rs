//! Prompt assembly, generation and answer extraction

pub mod agent;
pub mod client;
pub mod context;
pub mod normalizer;
pub mod prompt;

pub use agent::{AgentLimits, AgentOutcome, ReactAgent};
pub use client::GenerationClient;
pub use context::{ContextAssembler, CONTEXT_SEPARATOR, NO_DOCUMENTS_MARKER};
pub use normalizer::{extract_final_answer, normalize};
pub use prompt::{PromptBuilder, PromptMode, ToolSpec};
