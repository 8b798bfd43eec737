use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;

pub const DEFAULT_MODEL: &str = "orca-mini";

/// Longest summary the lead-sentence summarizer returns, in characters.
const MAX_SUMMARY_CHARS: usize = 200;

/// Request body cap. axum's 2 MiB default would refuse ordinary PDFs.
pub const MAX_UPLOAD_BYTES: usize = 500 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
    pub original_length: u64,
    pub summary_length: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub ollama_accessible: bool,
}

/// Stands in for the language model behind the real service.
pub trait Summarizer: Send + Sync + 'static {
    fn summarize(&self, text: &str) -> Result<String, String>;

    fn model(&self) -> &str {
        DEFAULT_MODEL
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Returns the first sentence, capped at `MAX_SUMMARY_CHARS`.
#[derive(Debug, Clone, Default)]
pub struct LeadSentence;

impl Summarizer for LeadSentence {
    fn summarize(&self, text: &str) -> Result<String, String> {
        let text = text.trim();
        let mut end = text.len();
        let mut chars = text.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if matches!(c, '.' | '!' | '?') {
                let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
                if at_boundary {
                    end = i + c.len_utf8();
                    break;
                }
            }
        }
        Ok(text[..end].chars().take(MAX_SUMMARY_CHARS).collect())
    }
}

/// Always fails, as if the model backend were unreachable.
#[derive(Debug, Clone)]
pub struct Offline {
    pub reason: String,
}

impl Summarizer for Offline {
    fn summarize(&self, _text: &str) -> Result<String, String> {
        Err(self.reason.clone())
    }

    fn is_available(&self) -> bool {
        false
    }
}

#[derive(Clone)]
pub struct AppState {
    summarizer: Arc<dyn Summarizer>,
}

/// Error rendered as `{"detail": ...}` with the given status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: serde_json::Value,
}

impl ApiError {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: serde_json::Value::String(detail.into()),
        }
    }

    fn missing_field(field: &str) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: json!([{ "loc": ["body", field], "msg": "Field required", "type": "missing" }]),
        }
    }

    fn invalid_json(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(_) => Self::missing_field("text"),
            other => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                detail: json!([{ "loc": ["body"], "msg": other.body_text(), "type": "json_invalid" }]),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

pub fn app() -> Router {
    app_with(LeadSentence)
}

pub fn app_with(summarizer: impl Summarizer) -> Router {
    let state = AppState {
        summarizer: Arc::new(summarizer),
    };
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/upload-pdf", post(upload_pdf))
        .route("/summarize-text", post(summarize_text))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, LeadSentence).await
}

pub async fn run_with(
    listener: TcpListener,
    summarizer: impl Summarizer,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(summarizer)).await
}

async fn root(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "message": "PDF Summarizer API is running",
        "ollama_model": state.summarizer.model(),
    }))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let accessible = state.summarizer.is_available();
    Json(HealthResponse {
        status: if accessible { "healthy" } else { "unhealthy" }.to_string(),
        ollama_accessible: accessible,
    })
}

async fn upload_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SummaryResponse>, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
        upload = Some((filename, bytes.to_vec()));
    }
    let Some((filename, bytes)) = upload else {
        return Err(ApiError::missing_field("file"));
    };

    if !filename.to_lowercase().ends_with(".pdf") {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Only PDF files are allowed"));
    }
    if bytes.is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Empty file"));
    }
    let extracted = extract_text(&bytes)?;
    if extracted.trim().is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "No text found in PDF"));
    }

    tracing::info!(%filename, bytes = bytes.len(), "summarizing pdf");
    summarize(state.summarizer.as_ref(), &extracted).map(Json)
}

async fn summarize_text(
    State(state): State<AppState>,
    request: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let Json(request) = request.map_err(ApiError::invalid_json)?;
    if request.text.trim().is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Text cannot be empty"));
    }
    tracing::info!(chars = request.text.chars().count(), "summarizing text");
    summarize(state.summarizer.as_ref(), &request.text).map(Json)
}

fn summarize(summarizer: &dyn Summarizer, text: &str) -> Result<SummaryResponse, ApiError> {
    let summary = summarizer.summarize(text).map_err(|reason| {
        tracing::warn!(%reason, "summarization failed");
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error during summarization: {reason}"),
        )
    })?;
    let summary = summary.trim().to_string();
    Ok(SummaryResponse {
        original_length: text.chars().count() as u64,
        summary_length: summary.chars().count() as u64,
        summary,
    })
}

/// Mock extraction: a PDF must start with the `%PDF-` marker, and everything
/// after the header line is taken as the document text.
fn extract_text(bytes: &[u8]) -> Result<String, ApiError> {
    if !bytes.starts_with(b"%PDF-") {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "Error extracting text from PDF: missing %PDF header",
        ));
    }
    let content = String::from_utf8_lossy(bytes);
    let body = content.split_once('\n').map(|(_, rest)| rest).unwrap_or("");
    Ok(body.trim().to_string())
}
