//! Pipeline entry points.
//!
//! A [`Pipeline`] owns the page loader, the model and the configuration, and
//! runs the fixed sequence fetch → summarize for one input at a time. It
//! holds no per-request state, so a single instance behind an `Arc` serves
//! every request of the HTTP server.
//!
//! Every run returns a [`PipelineState`]. Step failures end up in its
//! `status` and `message`; `Err(SummaryError)` is reserved for inputs that
//! cannot be started at all.

use crate::config::{ErrorPolicy, SummaryConfig};
use crate::error::SummaryError;
use crate::pipeline::browser::{ChromiumLoader, PageLoader};
use crate::pipeline::fetch;
use crate::pipeline::input::{parse_url, ScopedUpload, Source};
use crate::pipeline::llm::{self, ProviderModel, SummaryModel};
use crate::progress::{PipelineProgressCallback, Step};
use crate::state::PipelineState;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, info_span, Instrument};

/// The fetch → summarize sequence with its collaborators.
pub struct Pipeline {
    loader: Arc<dyn PageLoader>,
    model: Arc<dyn SummaryModel>,
    config: SummaryConfig,
}

impl Pipeline {
    pub fn new(
        loader: Arc<dyn PageLoader>,
        model: Arc<dyn SummaryModel>,
        config: SummaryConfig,
    ) -> Self {
        Self {
            loader,
            model,
            config,
        }
    }

    /// Production pipeline: Chromium for pages, the configured LLM provider
    /// for summaries.
    ///
    /// # Errors
    /// [`SummaryError::MissingCredential`] if the provider's API key is not
    /// set, or [`SummaryError::ProviderNotConfigured`] if the provider cannot
    /// be created.
    pub fn from_config(config: SummaryConfig) -> Result<Self, SummaryError> {
        config.check_credentials()?;
        let model = ProviderModel::from_config(&config)?;
        let loader = ChromiumLoader::from_config(&config);
        info!(
            "Pipeline ready: provider={} model={}",
            config.provider_name,
            config.effective_model()
        );
        Ok(Self::new(Arc::new(loader), Arc::new(model), config))
    }

    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    /// Summarise a URL given as text.
    ///
    /// # Errors
    /// [`SummaryError::InvalidUrl`] if `input` is not an absolute HTTP/HTTPS
    /// URL. Nothing is fetched in that case.
    pub async fn summarize_url(&self, input: &str) -> Result<PipelineState, SummaryError> {
        let url = parse_url(input)?;
        Ok(self.run(&Source::Url(url)).await)
    }

    /// Summarise a local PDF. A missing or corrupt file is a step error.
    pub async fn summarize_pdf(&self, path: impl AsRef<Path>) -> PipelineState {
        self.run(&Source::Pdf(path.as_ref().to_path_buf())).await
    }

    /// Summarise uploaded PDF bytes.
    ///
    /// The bytes are written to a temporary `.pdf` file that is deleted
    /// before this returns, whatever the outcome. The state's `input` is
    /// that temporary path.
    pub async fn summarize_pdf_bytes(&self, bytes: &[u8]) -> Result<PipelineState, SummaryError> {
        let upload = ScopedUpload::from_bytes(bytes)?;
        let state = self.run(&Source::Pdf(upload.path().to_path_buf())).await;
        drop(upload);
        Ok(state)
    }

    /// Run the fetch step only.
    pub async fn extract(&self, source: &Source) -> PipelineState {
        extract(self.loader.as_ref(), source, &self.config).await
    }

    /// Run the full pipeline for an already-validated source.
    pub async fn run(&self, source: &Source) -> PipelineState {
        let span = info_span!(
            "pipeline",
            input = %source.label(),
            trace_project = self.config.trace_project.as_deref()
        );
        self.run_steps(source).instrument(span).await
    }

    async fn run_steps(&self, source: &Source) -> PipelineState {
        let start = Instant::now();
        let input = source.label();
        info!("Starting summarization: {}", input);
        notify(&self.config, |cb| cb.on_pipeline_start(&input));

        let mut state = PipelineState::new(input);

        // ── Step 1: Fetch ────────────────────────────────────────────────
        notify(&self.config, |cb| cb.on_step_start(Step::Fetch));
        let outcome = fetch::fetch(self.loader.as_ref(), source, &self.config).await;
        state = state.merge(outcome);
        notify(&self.config, |cb| cb.on_step_complete(Step::Fetch, state.status));

        // ── Step 2: Summarize ────────────────────────────────────────────
        if state.is_error() && self.config.error_policy == ErrorPolicy::Halt {
            info!("Fetch failed, skipping summarize");
        } else {
            notify(&self.config, |cb| cb.on_step_start(Step::Summarize));
            let outcome = llm::summarize(
                self.model.as_ref(),
                &state.text_content,
                fetch::source_kind(source),
                &self.config,
            )
            .await;
            state = state.merge(outcome);
            notify(&self.config, |cb| {
                cb.on_step_complete(Step::Summarize, state.status)
            });
        }

        info!(
            "Pipeline finished: {} ({}) in {}ms",
            state.status,
            state.message,
            start.elapsed().as_millis()
        );
        notify(&self.config, |cb| {
            cb.on_pipeline_complete(state.status, &state.message)
        });
        state
    }
}

/// Run the fetch step alone with any loader. Needs no model or credential.
pub async fn extract(
    loader: &dyn PageLoader,
    source: &Source,
    config: &SummaryConfig,
) -> PipelineState {
    let input = source.label();
    let span = info_span!("extract", input = %input);
    async {
        notify(config, |cb| cb.on_pipeline_start(&input));
        notify(config, |cb| cb.on_step_start(Step::Fetch));
        let state = PipelineState::new(input.clone())
            .merge(fetch::fetch(loader, source, config).await);
        notify(config, |cb| cb.on_step_complete(Step::Fetch, state.status));
        notify(config, |cb| {
            cb.on_pipeline_complete(state.status, &state.message)
        });
        state
    }
    .instrument(span)
    .await
}

fn notify(config: &SummaryConfig, f: impl FnOnce(&dyn PipelineProgressCallback)) {
    if let Some(ref cb) = config.progress_callback {
        f(cb.as_ref());
    }
}
