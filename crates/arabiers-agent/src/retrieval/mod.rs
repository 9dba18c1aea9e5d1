//! Document retrieval in front of the search backends

pub mod adapter;

pub use adapter::{normalize_results, RetrieverAdapter};
