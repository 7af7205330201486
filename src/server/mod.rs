//! HTTP adapter: JSON API plus a single-page web UI.
//!
//! | route          | method | body                 | response                         |
//! |----------------|--------|----------------------|----------------------------------|
//! | `/`            | GET    |                      | HTML UI                          |
//! | `/health`      | GET    |                      | `{"status": "healthy"}`          |
//! | `/summarize`   | POST   | `{"url"}`            | `{url, status, message, summary?}` |
//! | `/ui/website`  | POST   | `{"url"}`            | `{"output"}`                     |
//! | `/ui/pdf`      | POST   | multipart `file`     | `{"output"}`                     |

pub mod error;
pub mod routes;

use crate::summarize::Pipeline;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Largest request body accepted, which bounds PDF uploads. 32 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

pub fn router(pipeline: Arc<Pipeline>) -> Router {
    router_with_limit(pipeline, DEFAULT_MAX_UPLOAD_BYTES)
}

pub fn router_with_limit(pipeline: Arc<Pipeline>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/summarize", post(routes::summarize))
        .route("/ui/website", post(routes::ui_website))
        .route("/ui/pdf", post(routes::ui_pdf))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { pipeline })
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(pipeline: Arc<Pipeline>, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(pipeline))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down"),
        Err(e) => {
            warn!("Cannot listen for Ctrl-C, serving until killed: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
