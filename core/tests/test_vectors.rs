//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results or errors. Request bodies are compared as
//! parsed JSON where they are JSON, so field ordering cannot cause false
//! negatives.

use summarizer_core::{
    ApiError, FileCandidate, FileOrigin, HttpMethod, HttpRequest, HttpResponse, PdfFile,
    SummarizerClient, SummaryResponse,
};

const BASE_URL: &str = "http://localhost:8000";

fn client() -> SummarizerClient {
    SummarizerClient::new(BASE_URL)
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn expected_headers(expected_req: &serde_json::Value) -> Vec<(String, String)> {
    expected_req["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

fn check_request_line(name: &str, req: &HttpRequest, expected_req: &serde_json::Value) {
    assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: path");
    assert_eq!(req.headers, expected_headers(expected_req), "{name}: headers");
}

fn simulated_response(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    )
}

/// Check a parse outcome against either `expected_result` or `expected_error`.
fn check_outcome(name: &str, case: &serde_json::Value, result: Result<SummaryResponse, ApiError>) {
    if let Some(expected_error) = case.get("expected_error") {
        let err = result.unwrap_err();
        match expected_error["kind"].as_str().unwrap() {
            "Service" => {
                let status = expected_error["status"].as_u64().unwrap() as u16;
                let detail = expected_error["detail"].as_str().map(str::to_string);
                assert_eq!(err, ApiError::Service { status, detail }, "{name}: error");
            }
            "MalformedResponse" => {
                assert!(matches!(err, ApiError::MalformedResponse(_)), "{name}: expected MalformedResponse")
            }
            other => panic!("{name}: unknown expected_error kind: {other}"),
        }
    } else {
        let summary = result.unwrap();
        let expected: SummaryResponse = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(summary, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Summarize text
// ---------------------------------------------------------------------------

#[test]
fn summarize_text_test_vectors() {
    let raw = include_str!("../../test-vectors/summarize_text.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = case["input"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_summarize_text(input).unwrap();
        check_request_line(name, &req, expected_req);
        let req_body: serde_json::Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(req_body, expected_req["body"], "{name}: body");

        // Verify parse
        check_outcome(name, case, c.parse_summary(simulated_response(case)));
    }
}

// ---------------------------------------------------------------------------
// Upload PDF
// ---------------------------------------------------------------------------

#[test]
fn upload_pdf_test_vectors() {
    let raw = include_str!("../../test-vectors/upload_pdf.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let file = PdfFile::accept(FileCandidate {
            name: input["name"].as_str().unwrap().to_string(),
            content_type: None,
            bytes: input["content"].as_str().unwrap().as_bytes().to_vec(),
            origin: FileOrigin::Picker,
        })
        .unwrap();
        let boundary = case["boundary"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_upload_pdf_with_boundary(&file, boundary);
        check_request_line(name, &req, expected_req);
        let body = String::from_utf8(req.body.unwrap()).unwrap();
        assert_eq!(body, expected_req["body"].as_str().unwrap(), "{name}: body");

        // Verify parse
        check_outcome(name, case, c.parse_summary(simulated_response(case)));
    }
}
