//! The record threaded through the pipeline.
//!
//! A [`PipelineState`] is created once per request, handed to each step in
//! turn, and dropped after the response is rendered. Steps never mutate the
//! state they receive: each produces a [`StepOutcome`] that
//! [`PipelineState::merge`] folds over the previous state, yielding the next.

use crate::error::StepError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Message carried by a freshly created state.
pub const INITIAL_MESSAGE: &str = "Starting content summarization";

/// Lifecycle of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// No step has completed yet.
    #[default]
    Pending,
    /// The last step succeeded.
    Success,
    /// A step failed. Sticky: a later success never clears it.
    Error,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Success => "success",
            Status::Error => "error",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of one summarization request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineState {
    /// URL string or file path as given to the pipeline.
    pub input: String,
    pub status: Status,
    /// Human-readable description of the last step's result.
    pub message: String,
    /// Text extracted by the fetch step. Empty until that step succeeds.
    pub text_content: String,
    /// Model output. Empty until the summarize step succeeds.
    pub summary: String,
}

impl PipelineState {
    /// Create the initial `pending` state for an input.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            status: Status::Pending,
            message: INITIAL_MESSAGE.to_string(),
            text_content: String::new(),
            summary: String::new(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == Status::Error
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Fold a step's outcome over this state, producing the next state.
    ///
    /// Content fields present in the outcome replace the previous values.
    /// Once the state is `error`, a successful outcome does not overwrite
    /// the status or message.
    pub fn merge(self, outcome: StepOutcome) -> Self {
        let keep_error = self.is_error() && outcome.status == Status::Success;
        Self {
            input: self.input,
            status: if keep_error { self.status } else { outcome.status },
            message: if keep_error {
                self.message
            } else {
                outcome.message
            },
            text_content: outcome.text_content.unwrap_or(self.text_content),
            summary: outcome.summary.unwrap_or(self.summary),
        }
    }

    /// Text shown in the UI output field: the summary, or `Error: <message>`.
    pub fn display_text(&self) -> String {
        if self.is_success() && !self.summary.is_empty() {
            self.summary.clone()
        } else {
            format!("Error: {}", self.message)
        }
    }
}

/// The partial result produced by one pipeline step.
///
/// `None` content fields leave the previous state's value untouched;
/// `Some(String::new())` clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub status: Status,
    pub message: String,
    pub text_content: Option<String>,
    pub summary: Option<String>,
}

impl StepOutcome {
    /// Successful fetch carrying the extracted text.
    pub fn extracted(text: String, message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
            text_content: Some(text),
            summary: None,
        }
    }

    /// Successful summarize carrying the model output.
    pub fn summarized(summary: String) -> Self {
        Self {
            status: Status::Success,
            message: "Successfully generated summary".to_string(),
            text_content: None,
            summary: Some(summary),
        }
    }

    /// Failed fetch: text is cleared.
    pub fn fetch_failed(err: &StepError) -> Self {
        Self {
            status: Status::Error,
            message: err.to_string(),
            text_content: Some(String::new()),
            summary: None,
        }
    }

    /// Failed summarize: summary is cleared.
    pub fn summary_failed(err: &StepError) -> Self {
        Self {
            status: Status::Error,
            message: err.to_string(),
            text_content: None,
            summary: Some(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_pending_and_empty() {
        let s = PipelineState::new("https://example.com");
        assert_eq!(s.status, Status::Pending);
        assert_eq!(s.message, INITIAL_MESSAGE);
        assert!(s.text_content.is_empty());
        assert!(s.summary.is_empty());
    }

    #[test]
    fn merge_applies_outcome_fields() {
        let s = PipelineState::new("x")
            .merge(StepOutcome::extracted("hello".into(), "ok"))
            .merge(StepOutcome::summarized("short".into()));
        assert_eq!(s.status, Status::Success);
        assert_eq!(s.text_content, "hello");
        assert_eq!(s.summary, "short");
        assert_eq!(s.message, "Successfully generated summary");
    }

    #[test]
    fn error_is_not_overwritten_by_success() {
        let s = PipelineState::new("x")
            .merge(StepOutcome::fetch_failed(&StepError::EmptyContent))
            .merge(StepOutcome::summarized("made up".into()));
        assert_eq!(s.status, Status::Error);
        assert_eq!(s.message, "Failed to extract text: Empty content");
        assert_eq!(s.summary, "made up");
    }

    #[test]
    fn later_error_replaces_earlier_error() {
        let s = PipelineState::new("x")
            .merge(StepOutcome::fetch_failed(&StepError::EmptyContent))
            .merge(StepOutcome::summary_failed(&StepError::EmptyInput));
        assert!(s.is_error());
        assert_eq!(s.message, "Failed to generate summary: Empty content");
    }

    #[test]
    fn status_serialises_lowercase() {
        let json = serde_json::to_string(&Status::Success).unwrap();
        assert_eq!(json, "\"success\"");
        let back: Status = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(back, Status::Error);
    }

    #[test]
    fn display_text_prefers_summary() {
        let ok = PipelineState::new("x").merge(StepOutcome::summarized("S".into()));
        assert_eq!(ok.display_text(), "S");

        let failed = PipelineState::new("x")
            .merge(StepOutcome::fetch_failed(&StepError::EmptyContent));
        assert_eq!(
            failed.display_text(),
            "Error: Failed to extract text: Empty content"
        );
    }
}
