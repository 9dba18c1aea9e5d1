//! arabiers-agent: retrieval-augmented hotel quotation agent
//!
//! Questions about Sri Lanka hotels and tourism are answered from documents
//! in an Azure AI Search index, with Azure OpenAI generating the answer.
//! The crate ships the orchestration pipeline, a browser UI served by axum,
//! per-session history and PDF export of the latest quotation.

pub mod config;
pub mod error;
pub mod export;
pub mod generation;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod service;
pub mod session;
pub mod types;

pub use config::{AgentConfig, AgentMode};
pub use error::{Error, Result};
pub use service::QuotationService;
pub use types::{GenerationResult, HistoryEntry, Prompt, RetrievedDocument};
