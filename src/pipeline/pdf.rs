//! PDF text extraction via lopdf.
//!
//! Parsing and content-stream decoding are CPU-bound, so the work runs on
//! tokio's blocking pool rather than stalling an async worker thread.
//!
//! Pages are visited in page-number order. Each page's text is trimmed of
//! trailing whitespace and followed by a blank line, so a two-page document
//! yields `"<page 1>\n\n<page 2>\n\n"`.

use crate::error::StepError;
use lopdf::Document;
use std::path::Path;
use tracing::{debug, info};

/// Separator appended after every page.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Extract the text of every page of a PDF file.
pub async fn extract_text(pdf_path: &Path) -> Result<String, StepError> {
    let path = pdf_path.to_path_buf();

    tokio::task::spawn_blocking(move || extract_text_blocking(&path))
        .await
        .map_err(|e| StepError::PdfUnreadable {
            detail: format!("extraction task panicked: {e}"),
        })?
}

/// Blocking implementation of [`extract_text`].
pub fn extract_text_blocking(pdf_path: &Path) -> Result<String, StepError> {
    if !pdf_path.exists() {
        return Err(StepError::PdfNotFound {
            path: pdf_path.to_path_buf(),
        });
    }

    let document = Document::load(pdf_path).map_err(|e| StepError::PdfUnreadable {
        detail: e.to_string(),
    })?;

    extract_from_document(&document)
}

/// Extract text from PDF bytes already in memory.
pub fn extract_text_from_bytes(bytes: &[u8]) -> Result<String, StepError> {
    let document = Document::load_mem(bytes).map_err(|e| StepError::PdfUnreadable {
        detail: e.to_string(),
    })?;
    extract_from_document(&document)
}

fn extract_from_document(document: &Document) -> Result<String, StepError> {
    // get_pages() is a BTreeMap keyed by 1-based page number
    let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
    info!("PDF loaded: {} pages", page_numbers.len());

    let mut text = String::new();
    for page_num in page_numbers {
        let page_text =
            document
                .extract_text(&[page_num])
                .map_err(|e| StepError::PdfUnreadable {
                    detail: format!("page {page_num}: {e}"),
                })?;
        debug!("Page {}: {} chars", page_num, page_text.len());
        text.push_str(page_text.trim_end());
        text.push_str(PAGE_SEPARATOR);
    }

    Ok(text)
}
