//! Error types for the content-summary library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`SummaryError`] is **fatal**: the request cannot be started at all
//!   (malformed URL, missing file, LLM credential absent). Returned as
//!   `Err(SummaryError)` before the pipeline runs, so no browser is launched
//!   and no model is called.
//!
//! * [`StepError`] is **non-fatal**: one pipeline step failed (navigation
//!   timeout, empty page, unreadable PDF, remote LLM error). Its `Display`
//!   text becomes the [`crate::state::PipelineState::message`] and the state
//!   moves to `error`; the process keeps serving.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the content-summary library.
///
/// Step-level failures use [`StepError`] and are folded into the
/// [`crate::state::PipelineState`] rather than propagated here.
#[derive(Debug, Error)]
pub enum SummaryError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The input is not a well-formed absolute HTTP/HTTPS URL.
    #[error("Invalid URL '{input}': {reason}")]
    InvalidUrl { input: String, reason: String },

    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The API key for the configured provider is not set.
    #[error("{var} not found in environment variables (required by provider '{provider}')")]
    MissingCredential { provider: String, var: String },

    /// The configured provider could not be constructed.
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not write an uploaded document to its temporary file.
    #[error("Failed to store uploaded file: {source}")]
    UploadFailed {
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal failure of a single pipeline step.
///
/// The message texts are user-facing: the UI shows them verbatim after an
/// `Error: ` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum StepError {
    /// Browser launch, navigation or script evaluation failed.
    #[error("Error extracting text: {detail}")]
    Navigation { detail: String },

    /// Navigation plus settle delay exceeded the page-load timeout.
    #[error("Error extracting text: page did not load within {secs}s")]
    NavigationTimeout { secs: u64 },

    /// The page or document produced no visible text.
    #[error("Failed to extract text: Empty content")]
    EmptyContent,

    /// The PDF path does not exist.
    #[error("Error extracting text from PDF: file not found '{path}'")]
    PdfNotFound { path: PathBuf },

    /// The PDF could not be parsed or a page could not be decoded.
    #[error("Error extracting text from PDF: {detail}")]
    PdfUnreadable { detail: String },

    /// A PDF URL could not be downloaded.
    #[error("Failed to download '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    /// A PDF URL download exceeded its timeout.
    #[error("Download timed out after {secs}s for '{url}'")]
    DownloadTimeout { url: String, secs: u64 },

    /// The summarizer received empty or whitespace-only text.
    #[error("Failed to generate summary: Empty content")]
    EmptyInput,

    /// The LLM call failed (auth, rate limit, network, malformed response).
    #[error("Error generating summary: {detail}")]
    LlmFailed { detail: String },
}
