//! # content-summary
//!
//! Fetch a web page or PDF, extract its text, and summarise it with a hosted
//! LLM. The same pipeline backs a JSON API, a small web UI and a CLI.
//!
//! ## Pipeline Overview
//!
//! ```text
//! URL / PDF
//!  │
//!  ├─ 1. Input      validate the URL or path (malformed input never runs)
//!  ├─ 2. Fetch      Chromium renders the page and reads body.innerText,
//!  │                or lopdf extracts each page of the PDF
//!  ├─ 3. Summarize  truncate to 100 000 chars, one LLM call
//!  └─ 4. State      input, status, message, text_content, summary
//! ```
//!
//! Each request gets its own browser; nothing is cached or retried.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use content_summary::{Pipeline, SummaryConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads ANTHROPIC_API_KEY (the default provider) from the environment.
//!     let pipeline = Pipeline::from_config(SummaryConfig::default())?;
//!     let state = pipeline.summarize_url("https://example.com").await?;
//!     println!("{}: {}", state.status, state.display_text());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `server` | on      | axum router with the JSON API and web UI |
//! | `cli`    | on      | The `content-summary` binary (clap, indicatif, dotenvy) |
//!
//! Disable both when using only the library:
//! ```toml
//! content-summary = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod prompts;
#[cfg(feature = "server")]
pub mod server;
pub mod state;
pub mod summarize;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ErrorPolicy, SummaryConfig, SummaryConfigBuilder};
pub use error::{StepError, SummaryError};
pub use pipeline::browser::{ChromiumLoader, PageLoader};
pub use pipeline::input::Source;
pub use pipeline::llm::{ProviderModel, SummaryModel, SummaryRequest};
pub use progress::{NoopProgressCallback, PipelineProgressCallback, ProgressCallback, Step};
pub use prompts::SourceKind;
pub use state::{PipelineState, Status, StepOutcome};
pub use summarize::{extract, Pipeline};
