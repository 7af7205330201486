use crate::error::SummaryError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// An error returned by the HTTP adapter as `{"detail": ...}`.
#[derive(Debug)]
pub enum ApiError {
    /// The request was well-formed HTTP but its content is unusable (422).
    Validation(String),
    /// An extractor rejected the request body (status chosen by axum).
    Rejected { status: StatusCode, detail: String },
    /// Something failed that the caller cannot fix (500).
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Rejected { status, .. } => *status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            ApiError::Validation(d) | ApiError::Internal(d) => d,
            ApiError::Rejected { detail, .. } => detail,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.detail())
    }
}

impl From<SummaryError> for ApiError {
    fn from(e: SummaryError) -> Self {
        match e {
            SummaryError::UploadFailed { .. } | SummaryError::Internal(_) => {
                ApiError::Internal(e.to_string())
            }
            other => ApiError::Validation(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            detail: match self {
                ApiError::Validation(d) | ApiError::Internal(d) => d,
                ApiError::Rejected { detail, .. } => detail,
            },
        };
        (status, Json(body)).into_response()
    }
}
