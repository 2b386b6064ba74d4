use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Application-wide error taxonomy.
///
/// Only `InvalidRequest` is ever surfaced to callers as a hard failure;
/// upstream and per-listing errors are recovered inside the pipeline
/// (page skipped, region aborted, listing dropped) and logged.
#[derive(Error, Debug)]
pub enum AppError {
    /// Caller supplied an empty query or an empty region list.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Transport or non-2xx failure talking to the upstream search API.
    #[error("upstream unavailable: {0}")]
    Upstream(String),

    /// A listing is missing fields the pipeline requires (e.g. its id).
    #[error("malformed listing: {0}")]
    MalformedListing(String),
}

impl AppError {
    /// True if the pipeline absorbs this error locally instead of
    /// propagating it to the caller.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AppError::Upstream(_) | AppError::MalformedListing(_))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Upstream(e.to_string())
    }
}

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::MalformedListing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_classification() {
        assert!(AppError::Upstream("503".into()).is_recoverable());
        assert!(AppError::MalformedListing("no id".into()).is_recoverable());
        assert!(!AppError::InvalidRequest("empty query".into()).is_recoverable());
    }
}
