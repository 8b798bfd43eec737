//! Stateless HTTP request builder and response parser for the summarization
//! API.
//!
//! # Design
//! `SummarizerClient` holds only a `base_url`. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`. The caller executes the round-trip in between,
//! which keeps this module deterministic and free of I/O.
//!
//! PDF uploads are encoded here as `multipart/form-data` so the request stays
//! plain bytes that any host can send unchanged.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::file::{PdfFile, PDF_MIME};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ErrorBody, HealthStatus, SummaryResponse, TextRequest};

pub const UPLOAD_PDF_PATH: &str = "/upload-pdf";
pub const SUMMARIZE_TEXT_PATH: &str = "/summarize-text";
pub const HEALTH_PATH: &str = "/health";

/// Multipart field the service reads the PDF from.
pub const FILE_FIELD: &str = "file";

pub const EMPTY_TEXT_MESSAGE: &str = "Please enter some text to summarize";

#[derive(Debug, Clone)]
pub struct SummarizerClient {
    base_url: String,
}

impl SummarizerClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_upload_pdf(&self, file: &PdfFile) -> HttpRequest {
        let boundary = format!("summarizer-{}", uuid::Uuid::new_v4().simple());
        self.build_upload_pdf_with_boundary(file, &boundary)
    }

    /// Same as [`build_upload_pdf`](Self::build_upload_pdf) with a caller-chosen
    /// boundary. The boundary must not occur inside the file bytes.
    pub fn build_upload_pdf_with_boundary(&self, file: &PdfFile, boundary: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}{UPLOAD_PDF_PATH}", self.base_url),
            headers: vec![(
                "content-type".to_string(),
                format!("multipart/form-data; boundary={boundary}"),
            )],
            body: Some(encode_multipart(file, boundary)),
        }
    }

    /// Text that is blank after trimming is refused with
    /// `ApiError::Validation`; otherwise it is sent untrimmed.
    pub fn build_summarize_text(&self, text: &str) -> Result<HttpRequest, ApiError> {
        if text.trim().is_empty() {
            return Err(ApiError::Validation(EMPTY_TEXT_MESSAGE.to_string()));
        }
        let payload = TextRequest {
            text: text.to_string(),
        };
        let body =
            serde_json::to_vec(&payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}{SUMMARIZE_TEXT_PATH}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_health(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{HEALTH_PATH}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Parse the response of either summarization endpoint.
    pub fn parse_summary(&self, response: HttpResponse) -> Result<SummaryResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_health(&self, response: HttpResponse) -> Result<HealthStatus, ApiError> {
        parse_json(response)
    }
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::MalformedResponse(e.to_string()))
}

/// Map a non-2xx response to `ApiError::Service`, pulling `detail` out of the
/// body when the body is JSON and `detail` is a string.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let detail = serde_json::from_str::<ErrorBody>(&response.body)
        .ok()
        .and_then(|body| body.detail_text());
    Err(ApiError::Service {
        status: response.status,
        detail,
    })
}

fn encode_multipart(file: &PdfFile, boundary: &str) -> Vec<u8> {
    let filename: String = file
        .name()
        .chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .map(|c| if c == '"' { '\'' } else { c })
        .collect();

    let mut body = Vec::with_capacity(file.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{FILE_FIELD}\"; filename=\"{filename}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {PDF_MIME}\r\n\r\n").as_bytes());
    body.extend_from_slice(file.bytes());
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::{FileCandidate, FileOrigin};

    fn client() -> SummarizerClient {
        SummarizerClient::new("http://localhost:8000")
    }

    fn pdf(name: &str, bytes: &[u8]) -> PdfFile {
        PdfFile::accept(FileCandidate {
            name: name.to_string(),
            content_type: Some(PDF_MIME.to_string()),
            bytes: bytes.to_vec(),
            origin: FileOrigin::Picker,
        })
        .unwrap()
    }

    #[test]
    fn build_summarize_text_produces_json_post() {
        let req = client().build_summarize_text("Hello world").unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8000/summarize-text");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({ "text": "Hello world" }));
    }

    #[test]
    fn build_summarize_text_keeps_text_untrimmed() {
        let req = client().build_summarize_text("  padded  ").unwrap();
        let body: serde_json::Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["text"], "  padded  ");
    }

    #[test]
    fn build_summarize_text_refuses_blank_text() {
        for text in ["", " ", "\n\t"] {
            let err = client().build_summarize_text(text).unwrap_err();
            assert_eq!(err, ApiError::Validation(EMPTY_TEXT_MESSAGE.to_string()));
            assert_eq!(err.display_message("fallback"), EMPTY_TEXT_MESSAGE);
        }
    }

    #[test]
    fn build_upload_pdf_produces_multipart_post() {
        let file = pdf("report.pdf", b"%PDF-1.4\nbody");
        let req = client().build_upload_pdf_with_boundary(&file, "XYZ");
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8000/upload-pdf");
        assert_eq!(req.header("content-type"), Some("multipart/form-data; boundary=XYZ"));

        let body = String::from_utf8(req.body.unwrap()).unwrap();
        assert_eq!(
            body,
            "--XYZ\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"report.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\n\
             %PDF-1.4\nbody\r\n\
             --XYZ--\r\n"
        );
    }

    #[test]
    fn build_upload_pdf_keeps_binary_bytes() {
        let bytes = [0x25, 0x50, 0x44, 0x46, 0x00, 0xff, 0xfe];
        let file = pdf("bin.pdf", &bytes);
        let req = client().build_upload_pdf(&file);
        let body = req.body.unwrap();
        assert!(body.windows(bytes.len()).any(|w| w == bytes));
    }

    #[test]
    fn build_upload_pdf_random_boundary_matches_header() {
        let file = pdf("a.pdf", b"%PDF-");
        let req = client().build_upload_pdf(&file);
        let ct = req.header("content-type").unwrap().to_string();
        let boundary = ct.strip_prefix("multipart/form-data; boundary=").unwrap();
        let body = String::from_utf8(req.body.unwrap()).unwrap();
        assert!(body.starts_with(&format!("--{boundary}\r\n")));
        assert!(body.ends_with(&format!("--{boundary}--\r\n")));
    }

    #[test]
    fn filename_quotes_and_newlines_are_neutralised() {
        let file = pdf("a\"b\r\n.pdf", b"%PDF-");
        let req = client().build_upload_pdf_with_boundary(&file, "B");
        let body = String::from_utf8(req.body.unwrap()).unwrap();
        assert!(body.contains("filename=\"a'b.pdf\""));
    }

    #[test]
    fn build_health_is_plain_get() {
        let req = client().build_health();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8000/health");
        assert!(req.body.is_none());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = SummarizerClient::new("http://localhost:8000/");
        assert_eq!(client.build_health().path, "http://localhost:8000/health");
    }

    #[test]
    fn parse_summary_success() {
        let response = HttpResponse::new(
            200,
            r#"{"summary":"Hello world.","original_length":29,"summary_length":12}"#,
        );
        let summary = client().parse_summary(response).unwrap();
        assert_eq!(summary.summary, "Hello world.");
        assert_eq!(summary.original_length, 29);
        assert_eq!(summary.summary_length, 12);
    }

    #[test]
    fn parse_summary_service_detail() {
        let response = HttpResponse::new(413, r#"{"detail":"File too large"}"#);
        let err = client().parse_summary(response).unwrap_err();
        assert_eq!(
            err,
            ApiError::Service {
                status: 413,
                detail: Some("File too large".to_string())
            }
        );
    }

    #[test]
    fn parse_summary_error_without_body() {
        let err = client().parse_summary(HttpResponse::new(502, "")).unwrap_err();
        assert_eq!(
            err,
            ApiError::Service {
                status: 502,
                detail: None
            }
        );
    }

    #[test]
    fn parse_summary_error_with_plain_text_body() {
        let err = client()
            .parse_summary(HttpResponse::new(500, "Internal Server Error"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Service { status: 500, detail: None }));
    }

    #[test]
    fn parse_summary_bad_json() {
        let err = client()
            .parse_summary(HttpResponse::new(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[test]
    fn parse_summary_missing_field() {
        let err = client()
            .parse_summary(HttpResponse::new(200, r#"{"summary":"x"}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[test]
    fn parse_health_unhealthy() {
        let health = client()
            .parse_health(HttpResponse::new(
                200,
                r#"{"status":"unhealthy","ollama_accessible":false}"#,
            ))
            .unwrap();
        assert!(!health.is_healthy());
        assert!(!health.ollama_accessible);
    }
}
