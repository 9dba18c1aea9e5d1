//! Quotation export: text-to-PDF rendering and the UI logo asset

pub mod logo;
pub mod pdf;

pub use logo::ensure_logo;
pub use pdf::{chunk_text, generate_pdf, render_pdf};
