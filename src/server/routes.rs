//! Request handlers for the JSON API and the web UI.

use super::error::ApiError;
use super::AppState;
use crate::pipeline::input::{normalize_url, parse_url, Source};
use crate::state::{PipelineState, Status};
use crate::summarize::Pipeline;
use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

const INDEX_HTML: &str = include_str!("ui/index.html");

/// Shown when `/ui/pdf` receives no file.
pub const NO_PDF_UPLOADED: &str = "Error: No PDF file uploaded.";

#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub url: String,
    pub status: Status,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl From<PipelineState> for SummarizeResponse {
    fn from(state: PipelineState) -> Self {
        Self {
            url: state.input,
            status: state.status,
            message: state.message,
            summary: Some(state.summary).filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UiOutput {
    pub output: String,
}

impl UiOutput {
    fn error(detail: impl std::fmt::Display) -> Self {
        Self {
            output: format!("Error: {detail}"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

/// GET /
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// POST /summarize
///
/// Request body: `{"url": "https://..."}`
///
/// Response: `{"url", "status", "message", "summary"?}`. Step failures are
/// reported with status `error` and HTTP 200.
///
/// Errors:
/// - 422: body is not JSON with a `url` string, or the URL is not an
///   absolute HTTP/HTTPS URL
/// - 500: the pipeline task panicked
pub async fn summarize(
    State(state): State<AppState>,
    body: Result<Json<UrlRequest>, JsonRejection>,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let Json(request) = body.map_err(|rejection| ApiError::Rejected {
        status: rejection.status(),
        detail: rejection.body_text(),
    })?;
    let url = parse_url(&request.url)?;
    info!("POST /summarize {}", url);

    let result = run_isolated(state.pipeline.clone(), Source::Url(url)).await?;
    Ok(Json(SummarizeResponse::from(result)))
}

/// POST /ui/website
///
/// A bare domain is treated as `https://<domain>`. Always answers with
/// `{"output"}`: the summary, or `Error: <message>`.
pub async fn ui_website(
    State(state): State<AppState>,
    body: Result<Json<UrlRequest>, JsonRejection>,
) -> Json<UiOutput> {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => return Json(UiOutput::error(rejection.body_text())),
    };

    let normalized = normalize_url(&request.url);
    info!("Processing URL: {}", normalized);
    let url = match parse_url(&normalized) {
        Ok(url) => url,
        Err(e) => return Json(UiOutput::error(e)),
    };

    match run_isolated(state.pipeline.clone(), Source::Url(url)).await {
        Ok(result) => Json(UiOutput {
            output: result.display_text(),
        }),
        Err(e) => Json(UiOutput::error(e)),
    }
}

/// POST /ui/pdf
///
/// Multipart form with the PDF in field `file`. The upload is written to a
/// temporary file that is removed before the response is sent.
pub async fn ui_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UiOutput>, ApiError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_rejected)? {
        if field.name() == Some("file") {
            upload = Some(field.bytes().await.map_err(multipart_rejected)?);
            break;
        }
    }

    let bytes = match upload {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => {
            warn!("PDF form submitted without a file");
            return Ok(Json(UiOutput {
                output: NO_PDF_UPLOADED.to_string(),
            }));
        }
    };
    info!("Processing uploaded PDF ({} bytes)", bytes.len());

    let pipeline = state.pipeline.clone();
    let joined = tokio::spawn(async move { pipeline.summarize_pdf_bytes(&bytes).await }).await;

    let output = match joined {
        Ok(Ok(result)) => result.display_text(),
        Ok(Err(e)) => format!("Error: {e}"),
        Err(e) => format!("Error: {}", pipeline_failure(e).detail()),
    };
    Ok(Json(UiOutput { output }))
}

/// Run the pipeline in its own task so a panic becomes a 500 instead of
/// tearing down the connection.
async fn run_isolated(pipeline: Arc<Pipeline>, source: Source) -> Result<PipelineState, ApiError> {
    tokio::spawn(async move { pipeline.run(&source).await })
        .await
        .map_err(pipeline_failure)
}

fn pipeline_failure(e: tokio::task::JoinError) -> ApiError {
    warn!("Pipeline task failed: {}", e);
    ApiError::Internal(format!("Error running summarization pipeline: {e}"))
}

fn multipart_rejected(e: axum::extract::multipart::MultipartError) -> ApiError {
    ApiError::Rejected {
        status: e.status(),
        detail: e.body_text(),
    }
}
