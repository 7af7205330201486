//! LLM interaction: truncate, build the prompt, make one generation call.
//!
//! All prompt wording lives in [`crate::prompts`]. The model itself sits
//! behind [`SummaryModel`] so the orchestrator can be driven by any backend;
//! [`ProviderModel`] adapts an edgequake-llm provider.
//!
//! There is exactly one request per summary. A failed call is reported as a
//! step error, never retried.

use crate::config::SummaryConfig;
use crate::error::{StepError, SummaryError};
use crate::prompts::{summary_prompt, SourceKind};
use crate::state::StepOutcome;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Everything a model needs for one summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRequest {
    /// Complete user prompt, content already embedded.
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: usize,
}

/// A hosted model that turns a prompt into a summary.
#[async_trait]
pub trait SummaryModel: Send + Sync {
    async fn generate(&self, request: &SummaryRequest) -> Result<String, StepError>;
}

/// [`SummaryModel`] backed by an edgequake-llm provider.
#[derive(Clone)]
pub struct ProviderModel {
    provider: Arc<dyn LLMProvider>,
}

impl ProviderModel {
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self { provider }
    }

    /// Create the configured provider. Its API key is read from the
    /// environment by the provider factory.
    pub fn from_config(config: &SummaryConfig) -> Result<Self, SummaryError> {
        create_provider(&config.provider_name, config.effective_model()).map(Self::new)
    }
}

#[async_trait]
impl SummaryModel for ProviderModel {
    async fn generate(&self, request: &SummaryRequest) -> Result<String, StepError> {
        let start = Instant::now();
        let messages = vec![ChatMessage::user(request.prompt.as_str())];
        let options = build_options(request);

        let response = self
            .provider
            .chat(&messages, Some(&options))
            .await
            .map_err(|e| StepError::LlmFailed {
                detail: e.to_string(),
            })?;

        debug!(
            "{} input tokens, {} output tokens, {:?}",
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed()
        );

        if response.content.trim().is_empty() {
            return Err(StepError::LlmFailed {
                detail: "model returned an empty response".to_string(),
            });
        }
        Ok(response.content)
    }
}

/// Instantiate a named provider with the given model.
pub fn create_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, SummaryError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        SummaryError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Summarise `text` with one model call.
///
/// Empty or whitespace-only text short-circuits to an error without calling
/// the model. Never propagates an error: failures come back as an `error`
/// outcome with an empty summary.
pub async fn summarize(
    model: &dyn SummaryModel,
    text: &str,
    kind: SourceKind,
    config: &SummaryConfig,
) -> StepOutcome {
    if text.trim().is_empty() {
        warn!("Text to summarize is empty");
        return StepOutcome::summary_failed(&StepError::EmptyInput);
    }

    let truncated = truncate_chars(text, config.max_input_chars);
    if truncated.len() < text.len() {
        info!(
            "Text truncated to {} characters (from {} bytes)",
            config.max_input_chars,
            text.len()
        );
    }

    let request = build_request(kind, truncated, config);
    info!("Sending summary request ({} prompt bytes)", request.prompt.len());

    match model.generate(&request).await {
        Ok(summary) => {
            info!("Received summary of length: {}", summary.len());
            StepOutcome::summarized(summary)
        }
        Err(e) => {
            warn!("Summary generation failed: {}", e);
            StepOutcome::summary_failed(&e)
        }
    }
}

/// The first `max_chars` characters of `text`, never splitting a character.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Build the request for already-truncated content.
pub fn build_request(kind: SourceKind, content: &str, config: &SummaryConfig) -> SummaryRequest {
    SummaryRequest {
        prompt: summary_prompt(kind, content, config.instructions.as_deref()),
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    }
}

/// Build `CompletionOptions` from a summary request.
fn build_options(request: &SummaryRequest) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(request.temperature),
        max_tokens: Some(request.max_tokens),
        ..Default::default()
    }
}
