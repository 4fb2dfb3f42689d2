//! Client-facing errors for the streaming endpoint
//!
//! Only input validation produces an error response. Failures after the
//! extraction tool has been started end the stream instead; see
//! [`FinishReason`](super::FinishReason).

use axum::{
    body::Body,
    http::{Response, StatusCode, header},
    response::IntoResponse,
};
use thiserror::Error;

/// Errors rejecting a `/stream` request before any process is spawned
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// The `url` query parameter was absent or empty
    #[error("Missing url parameter")]
    MissingUrl,

    /// The `url` parameter did not parse as an absolute URL
    #[error("Invalid url")]
    InvalidUrl(String),

    /// The `url` parameter used a scheme other than http or https
    #[error("Invalid protocol")]
    InvalidProtocol(String),
}

impl StreamError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    /// Short label for logging
    pub fn category(&self) -> &'static str {
        match self {
            StreamError::MissingUrl => "missing_url",
            StreamError::InvalidUrl(_) => "invalid_url",
            StreamError::InvalidProtocol(_) => "invalid_protocol",
        }
    }
}

impl IntoResponse for StreamError {
    fn into_response(self) -> Response<Body> {
        (
            self.status(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.to_string(),
        )
            .into_response()
    }
}
