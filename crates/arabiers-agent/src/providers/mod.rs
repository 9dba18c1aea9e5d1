//! Provider abstractions for document retrieval and text generation
//!
//! The orchestration layer only sees these traits; the Azure clients are the
//! production implementations.

pub mod azure_openai;
pub mod azure_search;
pub mod llm;
pub mod retriever;

#[cfg(test)]
pub(crate) mod stub;

pub use azure_openai::AzureOpenAiClient;
pub use azure_search::AzureSearchRetriever;
pub use llm::LlmProvider;
pub use retriever::DocumentRetriever;
