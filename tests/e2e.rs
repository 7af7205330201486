//! End-to-end tests against a real Chromium and a live LLM provider.
//!
//! Gated behind the `E2E_ENABLED` environment variable so they do not run in
//! CI unless explicitly requested. The summarization tests also need the
//! provider's API key (`ANTHROPIC_API_KEY` by default).
//!
//! Run with:
//!   E2E_ENABLED=1 cargo test --test e2e -- --nocapture

mod common;

use common::build_pdf;
use content_summary::pipeline::input::resolve_input;
use content_summary::{extract, ChromiumLoader, Pipeline, Status, SummaryConfig};

macro_rules! e2e_skip_unless_enabled {
    () => {
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        common::init_tracing();
    };
}

/// Build the production pipeline, or skip when no credential is configured.
fn live_pipeline() -> Option<Pipeline> {
    match Pipeline::from_config(SummaryConfig::default()) {
        Ok(p) => Some(p),
        Err(e) => {
            println!("SKIP — {e}");
            None
        }
    }
}

#[tokio::test]
async fn extract_example_dot_com() {
    e2e_skip_unless_enabled!();

    let config = SummaryConfig::default();
    let loader = ChromiumLoader::from_config(&config);
    let source = resolve_input("example.com").unwrap();

    let state = extract(&loader, &source, &config).await;
    assert_eq!(state.status, Status::Success, "message: {}", state.message);
    assert!(state.text_content.contains("Example Domain"));
}

#[tokio::test]
async fn unreachable_host_is_step_error() {
    e2e_skip_unless_enabled!();

    let config = SummaryConfig::builder()
        .page_load_timeout_secs(10)
        .build()
        .unwrap();
    let loader = ChromiumLoader::from_config(&config);
    let source = resolve_input("https://does-not-exist.invalid").unwrap();

    let state = extract(&loader, &source, &config).await;
    assert_eq!(state.status, Status::Error);
    assert!(state.text_content.is_empty());
    println!("message: {}", state.message);
}

#[tokio::test]
async fn summarize_example_dot_com() {
    e2e_skip_unless_enabled!();
    let Some(pipeline) = live_pipeline() else {
        return;
    };

    let state = pipeline.summarize_url("https://example.com").await.unwrap();
    assert_eq!(state.status, Status::Success, "message: {}", state.message);
    assert!(!state.summary.trim().is_empty());
    println!("summary:\n{}", state.summary);
}

#[tokio::test]
async fn summarize_generated_pdf() {
    e2e_skip_unless_enabled!();
    let Some(pipeline) = live_pipeline() else {
        return;
    };

    let pdf = build_pdf(&[
        "Rust is a systems programming language.",
        "It guarantees memory safety without a garbage collector.",
    ]);
    let state = pipeline.summarize_pdf_bytes(&pdf).await.unwrap();
    assert_eq!(state.status, Status::Success, "message: {}", state.message);
    assert!(state.summary.to_lowercase().contains("rust"));
}
