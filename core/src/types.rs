//! Wire DTOs for the summarization API.
//!
//! # Design
//! These mirror the service's JSON schema but are defined independently of
//! the mock-server crate; the integration tests catch schema drift.

use serde::{Deserialize, Serialize};

/// Request payload for `POST /summarize-text`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextRequest {
    pub text: String,
}

/// Success payload shared by `/upload-pdf` and `/summarize-text`.
///
/// Both lengths are counted by the service; nothing here assumes
/// `summary_length <= original_length`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryResponse {
    pub summary: String,
    pub original_length: u64,
    pub summary_length: u64,
}

/// Payload of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    pub ollama_accessible: bool,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Error payload. `detail` is a plain string for service-raised errors but a
/// list of objects for request-validation failures, so it is kept loose here.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub(crate) fn detail_text(&self) -> Option<String> {
        self.detail
            .as_ref()
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }
}
