//! The fetch step: turn a [`Source`] into extracted text.
//!
//! Web pages go through a [`PageLoader`]; local PDFs and `.pdf` URLs go
//! through [`crate::pipeline::pdf`]. Whatever the route, the result is a
//! [`StepOutcome`]: `success` with non-empty text, or `error` with the text
//! cleared. Nothing here returns `Err` or panics on a bad page.

use crate::config::SummaryConfig;
use crate::error::StepError;
use crate::pipeline::browser::PageLoader;
use crate::pipeline::input::{download_pdf, is_pdf_url, Source};
use crate::pipeline::pdf;
use crate::prompts::SourceKind;
use crate::state::StepOutcome;
use std::path::Path;
use tracing::{debug, info, warn};
use url::Url;

pub const WEBSITE_SUCCESS: &str = "Successfully extracted text from website";
pub const PDF_SUCCESS: &str = "Successfully extracted text from PDF";

/// Which prompt the extracted text of `source` should be summarised with.
pub fn source_kind(source: &Source) -> SourceKind {
    match source {
        Source::Url(url) if !is_pdf_url(url) => SourceKind::Website,
        _ => SourceKind::Document,
    }
}

/// Extract text from any source.
pub async fn fetch(loader: &dyn PageLoader, source: &Source, config: &SummaryConfig) -> StepOutcome {
    match source {
        Source::Url(url) => fetch_url(loader, url, config).await,
        Source::Pdf(path) => read_pdf(path).await,
    }
}

/// Extract the visible text of a web page, or of a PDF behind a URL.
pub async fn fetch_url(loader: &dyn PageLoader, url: &Url, config: &SummaryConfig) -> StepOutcome {
    if is_pdf_url(url) {
        let downloaded = match download_pdf(url, config.download_timeout_secs).await {
            Ok(d) => d,
            Err(e) => {
                warn!("PDF download failed: {}", e);
                return StepOutcome::fetch_failed(&e);
            }
        };
        // `downloaded` owns the temp dir; it is removed when this scope ends.
        return read_pdf(downloaded.path()).await;
    }

    info!("Loading page {}", url);
    let result = loader.load_text(url).await;
    into_outcome(result, WEBSITE_SUCCESS)
}

/// Extract the text of a local PDF.
pub async fn read_pdf(path: &Path) -> StepOutcome {
    info!("Reading PDF {}", path.display());
    into_outcome(pdf::extract_text(path).await, PDF_SUCCESS)
}

fn into_outcome(result: Result<String, StepError>, success: &str) -> StepOutcome {
    match result {
        Ok(text) if text.trim().is_empty() => {
            warn!("Extraction produced no text");
            StepOutcome::fetch_failed(&StepError::EmptyContent)
        }
        Ok(text) => {
            debug!("Extracted {} chars", text.chars().count());
            StepOutcome::extracted(text, success)
        }
        Err(e) => {
            warn!("Extraction failed: {}", e);
            StepOutcome::fetch_failed(&e)
        }
    }
}
