//! Progress-callback trait for pipeline step events.
//!
//! Inject an [`Arc<dyn PipelineProgressCallback>`] via
//! [`crate::config::SummaryConfigBuilder::progress_callback`] to receive
//! events as the orchestrator moves through its steps. The CLI uses this to
//! drive a spinner; a server could forward the events to a log or a socket.
//!
//! # Example
//!
//! ```rust
//! use content_summary::{PipelineProgressCallback, Step, Status, SummaryConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     finished: AtomicUsize,
//! }
//!
//! impl PipelineProgressCallback for CountingCallback {
//!     fn on_step_complete(&self, step: Step, status: Status) {
//!         self.finished.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{step} finished: {status}");
//!     }
//! }
//!
//! let config = SummaryConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { finished: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::state::Status;
use std::fmt;
use std::sync::Arc;

/// One stage of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Load the page or read the PDF and extract its text.
    Fetch,
    /// Send the text to the model.
    Summarize,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Fetch => f.write_str("fetch"),
            Step::Summarize => f.write_str("summarize"),
        }
    }
}

/// Called by the orchestrator as it runs each step.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must be `Send + Sync`: one callback
/// instance is shared by every concurrent request of a server.
pub trait PipelineProgressCallback: Send + Sync {
    /// Called once before the first step.
    fn on_pipeline_start(&self, input: &str) {
        let _ = input;
    }

    /// Called just before a step runs.
    fn on_step_start(&self, step: Step) {
        let _ = step;
    }

    /// Called after a step with the status it reported.
    fn on_step_complete(&self, step: Step, status: Status) {
        let _ = (step, status);
    }

    /// Called once with the terminal status.
    fn on_pipeline_complete(&self, status: Status, message: &str) {
        let _ = (status, message);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl PipelineProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::SummaryConfig`].
pub type ProgressCallback = Arc<dyn PipelineProgressCallback>;
