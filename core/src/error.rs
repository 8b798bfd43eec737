//! Error types for the summarizer client.
//!
//! # Design
//! Every failure ends up as one user-visible string, so the variants exist
//! to pick the right text rather than to drive control flow. `Service` keeps
//! the `detail` the server reported; when it is absent the caller supplies
//! an operation-specific fallback through [`ApiError::display_message`].

use std::time::Duration;

use thiserror::Error;

/// Errors produced while building, executing, or parsing a summarization
/// request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Input was rejected before any request was built.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The service could not be reached or the connection broke mid-flight.
    #[error("transport failed: {0}")]
    Transport(String),

    /// No response arrived within the configured bound.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The service answered with a non-2xx status.
    #[error("HTTP {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Service { status: u16, detail: Option<String> },

    /// A 2xx response whose body is not a summary.
    #[error("malformed response body: {0}")]
    MalformedResponse(String),

    /// The request payload could not be encoded.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Text to show the user for this error.
    ///
    /// Validation messages and service-provided details are shown verbatim;
    /// everything else collapses to `fallback`.
    pub fn display_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Validation(msg) => msg.clone(),
            ApiError::Service {
                detail: Some(detail),
                ..
            } if !detail.is_empty() => detail.clone(),
            ApiError::Timeout(_) => {
                "The summarization service did not respond in time".to_string()
            }
            _ => fallback.to_string(),
        }
    }
}
