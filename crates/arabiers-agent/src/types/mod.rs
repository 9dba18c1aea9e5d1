//! Core types for the quotation agent

pub mod api;
pub mod document;
pub mod generation;
pub mod history;

pub use api::{AskRequest, AskResponse, HistoryItem, HistoryResponse, SessionCreated};
pub use document::RetrievedDocument;
pub use generation::{GenerationResult, Prompt};
pub use history::HistoryEntry;
