//! Context window assembly from retrieved documents

use crate::types::RetrievedDocument;

/// Separator placed between passages
pub const CONTEXT_SEPARATOR: &str = "\n---\n";

/// Context used when retrieval produced nothing
pub const NO_DOCUMENTS_MARKER: &str = "(no documents found)";

/// Joins passages into the context block handed to the prompt builder
pub struct ContextAssembler;

impl ContextAssembler {
    /// Build the context block.
    ///
    /// Documents keep their retrieval order. An empty input yields
    /// [`NO_DOCUMENTS_MARKER`] so the prompt never carries an empty context.
    pub fn assemble(docs: &[RetrievedDocument]) -> String {
        if docs.is_empty() {
            return NO_DOCUMENTS_MARKER.to_string();
        }

        docs.iter()
            .map(Self::document_text)
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR)
    }

    /// Passage text of one document: primary content, then secondary
    /// content, then the document's string form.
    pub fn document_text(doc: &RetrievedDocument) -> String {
        if let Some(content) = &doc.content {
            return content.clone();
        }
        if let Some(content) = &doc.page_content {
            return content.clone();
        }
        doc.to_string()
    }
}
