//! Prompt templates for LLM summarization.
//!
//! Every prompt lives here so a wording change touches exactly one place and
//! tests can inspect the text without a model. Callers can replace the
//! instruction paragraph via [`crate::config::SummaryConfig::instructions`];
//! the content block and the trailing `Summary:` cue are always kept so the
//! model sees the same framing.

use serde::{Deserialize, Serialize};

/// Where the text being summarised came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Rendered web page text.
    Website,
    /// Text extracted from a PDF.
    Document,
}

/// Instruction paragraph for web pages.
pub const WEBSITE_INSTRUCTIONS: &str = "Please provide a comprehensive summary of the following website content.\n\
Focus on the main topics, key information, and overall purpose of the website.";

/// Instruction paragraph for PDF documents.
pub const DOCUMENT_INSTRUCTIONS: &str = "Please provide a comprehensive summary of the following PDF document content.\n\
Focus on the main topics, key information, and overall purpose of the document.";

impl SourceKind {
    pub fn instructions(&self) -> &'static str {
        match self {
            SourceKind::Website => WEBSITE_INSTRUCTIONS,
            SourceKind::Document => DOCUMENT_INSTRUCTIONS,
        }
    }

    /// Heading placed above the embedded content.
    pub fn content_label(&self) -> &'static str {
        match self {
            SourceKind::Website => "Website Content:",
            SourceKind::Document => "Document Content:",
        }
    }
}

/// Build the user prompt embedding `content` verbatim.
pub fn summary_prompt(kind: SourceKind, content: &str, instructions: Option<&str>) -> String {
    format!(
        "{}\n\n{}\n{}\n\nSummary:",
        instructions.unwrap_or(kind.instructions()),
        kind.content_label(),
        content
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn website_prompt_layout() {
        let p = summary_prompt(SourceKind::Website, "BODY", None);
        assert!(p.starts_with("Please provide a comprehensive summary of the following website"));
        assert!(p.contains("Website Content:\nBODY\n"));
        assert!(p.ends_with("Summary:"));
    }

    #[test]
    fn document_prompt_uses_document_wording() {
        let p = summary_prompt(SourceKind::Document, "BODY", None);
        assert!(p.contains("PDF document content"));
        assert!(p.contains("Document Content:\nBODY"));
    }

    #[test]
    fn instruction_override_keeps_framing() {
        let p = summary_prompt(SourceKind::Website, "BODY", Some("Three bullet points."));
        assert!(p.starts_with("Three bullet points.\n\nWebsite Content:"));
        assert!(!p.contains("comprehensive"));
        assert!(p.ends_with("Summary:"));
    }
}
