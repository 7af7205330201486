//! Configuration types for the summarization pipeline.
//!
//! All pipeline behaviour is controlled through [`SummaryConfig`], built via
//! its [`SummaryConfigBuilder`]. The config is constructed once at startup and
//! shared by reference with every request; nothing in the pipeline reads the
//! environment on its own except the LLM provider factory, which picks up the
//! API key that [`SummaryConfig::check_credentials`] has already verified.

use crate::error::SummaryError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Default character ceiling applied to extracted text before prompting.
pub const DEFAULT_MAX_INPUT_CHARS: usize = 100_000;

/// Configuration for a summarization pipeline.
///
/// Built via [`SummaryConfig::builder()`] or using
/// [`SummaryConfig::default()`].
///
/// # Example
/// ```rust
/// use content_summary::SummaryConfig;
///
/// let config = SummaryConfig::builder()
///     .provider_name("anthropic")
///     .max_tokens(800)
///     .headless(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_input_chars, 100_000);
/// ```
#[derive(Clone)]
pub struct SummaryConfig {
    /// LLM provider name: "anthropic" (default), "openai", "gemini", "ollama".
    pub provider_name: String,

    /// LLM model identifier. If None, uses [`default_model_for`] the provider.
    pub model: Option<String>,

    /// Sampling temperature. Default: 0.2.
    ///
    /// Summaries should stay close to the source; low temperature keeps the
    /// output focused and repeatable.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 1000.
    pub max_tokens: usize,

    /// Character ceiling for text sent to the model. Default: 100 000.
    ///
    /// Longer inputs are cut to their first `max_input_chars` characters.
    pub max_input_chars: usize,

    /// Replacement for the instruction paragraph of the summary prompt.
    pub instructions: Option<String>,

    /// Run the browser without a window. Default: true.
    pub headless: bool,

    /// Chrome/Chromium binary. If None, chromiumoxide searches the usual locations.
    pub chrome_executable: Option<PathBuf>,

    /// Upper bound on navigation plus settle delay, in seconds. Default: 30.
    pub page_load_timeout_secs: u64,

    /// Quiet period after the load event before reading the page. Default: 500.
    ///
    /// Script-heavy pages keep fetching content after `load`; waiting a short
    /// while approximates a network-idle state.
    pub settle_ms: u64,

    /// Download timeout for PDF URLs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// What the orchestrator does after a failed step. Default: [`ErrorPolicy::Halt`].
    pub error_policy: ErrorPolicy,

    /// Trace project name recorded on every pipeline span (`LANGSMITH_PROJECT`).
    pub trace_project: Option<String>,

    /// Receives step start/complete events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            provider_name: "anthropic".to_string(),
            model: None,
            temperature: 0.2,
            max_tokens: 1000,
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            instructions: None,
            headless: true,
            chrome_executable: None,
            page_load_timeout_secs: 30,
            settle_ms: 500,
            download_timeout_secs: 120,
            error_policy: ErrorPolicy::default(),
            trace_project: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SummaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummaryConfig")
            .field("provider_name", &self.provider_name)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_input_chars", &self.max_input_chars)
            .field("instructions", &self.instructions)
            .field("headless", &self.headless)
            .field("chrome_executable", &self.chrome_executable)
            .field("page_load_timeout_secs", &self.page_load_timeout_secs)
            .field("settle_ms", &self.settle_ms)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("error_policy", &self.error_policy)
            .field("trace_project", &self.trace_project)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ProgressCallback>"),
            )
            .finish()
    }
}

impl SummaryConfig {
    /// Create a new builder for `SummaryConfig`.
    pub fn builder() -> SummaryConfigBuilder {
        SummaryConfigBuilder {
            config: Self::default(),
        }
    }

    /// The model that will be requested from the provider.
    pub fn effective_model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| default_model_for(&self.provider_name))
    }

    /// Verify the provider's API key is present in the environment.
    ///
    /// Called once at startup; a missing key is fatal.
    pub fn check_credentials(&self) -> Result<(), SummaryError> {
        let Some(var) = credential_var(&self.provider_name) else {
            return Ok(());
        };
        match std::env::var(var) {
            Ok(v) if !v.trim().is_empty() => Ok(()),
            _ => Err(SummaryError::MissingCredential {
                provider: self.provider_name.clone(),
                var: var.to_string(),
            }),
        }
    }
}

/// Builder for [`SummaryConfig`].
#[derive(Debug)]
pub struct SummaryConfigBuilder {
    config: SummaryConfig,
}

impl SummaryConfigBuilder {
    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = name.into().to_lowercase();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 1.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn max_input_chars(mut self, n: usize) -> Self {
        self.config.max_input_chars = n;
        self
    }

    pub fn instructions(mut self, text: impl Into<String>) -> Self {
        self.config.instructions = Some(text.into());
        self
    }

    pub fn headless(mut self, v: bool) -> Self {
        self.config.headless = v;
        self
    }

    pub fn chrome_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.chrome_executable = Some(path.into());
        self
    }

    pub fn page_load_timeout_secs(mut self, secs: u64) -> Self {
        self.config.page_load_timeout_secs = secs;
        self
    }

    pub fn settle_ms(mut self, ms: u64) -> Self {
        self.config.settle_ms = ms;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.config.error_policy = policy;
        self
    }

    pub fn trace_project(mut self, name: impl Into<String>) -> Self {
        self.config.trace_project = Some(name.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SummaryConfig, SummaryError> {
        let c = &self.config;
        if c.provider_name.trim().is_empty() {
            return Err(SummaryError::InvalidConfig(
                "Provider name must not be empty".into(),
            ));
        }
        if c.max_tokens == 0 {
            return Err(SummaryError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        if c.max_input_chars == 0 {
            return Err(SummaryError::InvalidConfig(
                "max_input_chars must be ≥ 1".into(),
            ));
        }
        if c.page_load_timeout_secs == 0 {
            return Err(SummaryError::InvalidConfig(
                "Page-load timeout must be ≥ 1s".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums & lookups ──────────────────────────────────────────────────────

/// How the orchestrator reacts when a step reports `error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorPolicy {
    /// Stop after the failing step; its error is the terminal state. (default)
    #[default]
    Halt,
    /// Run every step regardless. The summarizer then sees empty content and
    /// reports its own empty-input error, so the terminal message reflects
    /// the last step that ran.
    Continue,
}

/// Environment variable holding the API key for a provider, if it needs one.
pub fn credential_var(provider: &str) -> Option<&'static str> {
    match provider {
        "anthropic" => Some("ANTHROPIC_API_KEY"),
        "openai" => Some("OPENAI_API_KEY"),
        "gemini" => Some("GEMINI_API_KEY"),
        _ => None,
    }
}

/// Model used when none is configured.
pub fn default_model_for(provider: &str) -> &'static str {
    match provider {
        "openai" => "gpt-4.1-mini",
        "gemini" => "gemini-2.0-flash",
        "ollama" => "llama3.2",
        _ => "claude-sonnet-4-20250514",
    }
}
