//! The view controller: one session's state plus the single-request gate.
//!
//! # Design
//! Submitting does not perform I/O. `submit_*` validates input, moves the
//! state to busy and hands back a `PendingRequest` carrying a
//! `RequestToken`. The host sends the request however it likes and reports
//! the outcome through `settle` (or `abandon`). Because the controller is
//! not borrowed while the request is in flight, mode switches and draft
//! edits keep working; a second submission is refused until the token is
//! settled.
//!
//! `run_*` do the whole cycle through a `Transport` and settle on every
//! exit path.

use thiserror::Error;

pub use crate::client::EMPTY_TEXT_MESSAGE;

use crate::client::SummarizerClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::file::PdfFile;
use crate::http::{HttpRequest, HttpResponse};
use crate::state::{Mode, SessionState, SummaryResult};
use crate::transport::Transport;

pub const PDF_SUCCESS_MESSAGE: &str = "PDF summarized successfully!";
pub const TEXT_SUCCESS_MESSAGE: &str = "Text summarized successfully!";
pub const PDF_FALLBACK_MESSAGE: &str = "Error processing PDF";
pub const TEXT_FALLBACK_MESSAGE: &str = "Error summarizing text";

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Pdf,
    Text,
}

impl RequestKind {
    pub fn success_message(self) -> &'static str {
        match self {
            RequestKind::Pdf => PDF_SUCCESS_MESSAGE,
            RequestKind::Text => TEXT_SUCCESS_MESSAGE,
        }
    }

    pub fn fallback_message(self) -> &'static str {
        match self {
            RequestKind::Pdf => PDF_FALLBACK_MESSAGE,
            RequestKind::Text => TEXT_FALLBACK_MESSAGE,
        }
    }
}

/// A request the host must execute and then settle.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub token: RequestToken,
    pub kind: RequestKind,
    pub request: HttpRequest,
}

/// Why a submission did not produce a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("a request is already in flight")]
    Busy,

    #[error("text is empty")]
    EmptyText,

    #[error("could not build request: {0}")]
    Encoding(ApiError),
}

#[derive(Debug, Clone)]
pub struct ViewController {
    client: SummarizerClient,
    state: SessionState,
    in_flight: Option<(RequestToken, RequestKind)>,
    next_token: u64,
}

impl ViewController {
    pub fn new(client: SummarizerClient) -> Self {
        Self {
            client,
            state: SessionState::new(),
            in_flight: None,
            next_token: 1,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(SummarizerClient::new(&config.api_url))
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn client(&self) -> &SummarizerClient {
        &self.client
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Token of the outstanding request, if any.
    pub fn in_flight(&self) -> Option<RequestToken> {
        self.in_flight.map(|(token, _)| token)
    }

    pub fn select_mode(&mut self, mode: Mode) {
        self.transition(|s| s.with_mode(mode));
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.transition(|s| s.with_draft(text));
    }

    pub fn submit_file(&mut self, file: &PdfFile) -> Result<PendingRequest, SubmitRejected> {
        self.ensure_idle()?;
        let request = self.client.build_upload_pdf(file);
        tracing::debug!(name = file.name(), bytes = file.len(), "submitting pdf");
        Ok(self.issue(RequestKind::Pdf, request))
    }

    /// Submit `text` as-is. Blank text is refused through
    /// `ApiError::Validation` and shown as the error message.
    pub fn submit_text(&mut self, text: &str) -> Result<PendingRequest, SubmitRejected> {
        self.ensure_idle()?;
        let request = match self.client.build_summarize_text(text) {
            Ok(request) => request,
            Err(err) => {
                tracing::debug!(error = %err, "text rejected");
                let message = err.display_message(RequestKind::Text.fallback_message());
                self.transition(|s| s.fail(message));
                return Err(match err {
                    ApiError::Validation(_) => SubmitRejected::EmptyText,
                    other => SubmitRejected::Encoding(other),
                });
            }
        };
        tracing::debug!(chars = text.chars().count(), "submitting text");
        Ok(self.issue(RequestKind::Text, request))
    }

    pub fn submit_draft(&mut self) -> Result<PendingRequest, SubmitRejected> {
        let draft = self.state.draft_text.clone();
        self.submit_text(&draft)
    }

    /// Report how the request for `token` ended. Busy is released whatever
    /// the outcome. Returns false, leaving state untouched, if `token` is
    /// not the outstanding request.
    pub fn settle(&mut self, token: RequestToken, outcome: Result<HttpResponse, ApiError>) -> bool {
        let Some(kind) = self.take_in_flight(token) else {
            tracing::warn!(token = token.as_raw(), "ignoring settle for unknown request");
            return false;
        };

        let parsed = outcome.and_then(|response| self.client.parse_summary(response));
        match parsed {
            Ok(summary) => {
                tracing::debug!(
                    token = token.as_raw(),
                    original = summary.original_length,
                    summary = summary.summary_length,
                    "request succeeded"
                );
                let result = SummaryResult::from(summary);
                self.transition(|s| s.succeed(result, kind.success_message()));
            }
            Err(err) => {
                tracing::debug!(token = token.as_raw(), error = %err, "request failed");
                let message = err.display_message(kind.fallback_message());
                self.transition(|s| s.fail(message));
            }
        }
        true
    }

    /// The host gave up on `token` without an outcome. Busy is released and
    /// nothing else changes.
    pub fn abandon(&mut self, token: RequestToken) -> bool {
        if self.take_in_flight(token).is_none() {
            return false;
        }
        tracing::debug!(token = token.as_raw(), "request abandoned");
        self.transition(SessionState::release);
        true
    }

    pub fn clear_all(&mut self) {
        self.transition(SessionState::cleared);
    }

    pub fn run_file<T: Transport + ?Sized>(
        &mut self,
        file: &PdfFile,
        transport: &T,
    ) -> Result<(), SubmitRejected> {
        let pending = self.submit_file(file)?;
        self.execute(pending, transport);
        Ok(())
    }

    pub fn run_text<T: Transport + ?Sized>(
        &mut self,
        text: &str,
        transport: &T,
    ) -> Result<(), SubmitRejected> {
        let pending = self.submit_text(text)?;
        self.execute(pending, transport);
        Ok(())
    }

    pub fn run_draft<T: Transport + ?Sized>(&mut self, transport: &T) -> Result<(), SubmitRejected> {
        let pending = self.submit_draft()?;
        self.execute(pending, transport);
        Ok(())
    }

    fn execute<T: Transport + ?Sized>(&mut self, pending: PendingRequest, transport: &T) {
        let guard = SettleGuard {
            controller: self,
            token: pending.token,
        };
        let outcome = transport.execute(&pending.request);
        guard.finish(outcome);
    }

    fn ensure_idle(&self) -> Result<(), SubmitRejected> {
        if let Some((token, _)) = self.in_flight {
            tracing::warn!(token = token.as_raw(), "submission refused while busy");
            return Err(SubmitRejected::Busy);
        }
        Ok(())
    }

    fn issue(&mut self, kind: RequestKind, request: HttpRequest) -> PendingRequest {
        let token = RequestToken(self.next_token);
        self.next_token += 1;
        self.in_flight = Some((token, kind));
        self.transition(SessionState::begin);
        PendingRequest {
            token,
            kind,
            request,
        }
    }

    fn take_in_flight(&mut self, token: RequestToken) -> Option<RequestKind> {
        match self.in_flight {
            Some((current, kind)) if current == token => {
                self.in_flight = None;
                Some(kind)
            }
            _ => None,
        }
    }

    fn transition(&mut self, f: impl FnOnce(SessionState) -> SessionState) {
        let state = std::mem::take(&mut self.state);
        self.state = f(state);
    }
}

/// Settles the outstanding request when dropped, so a panicking transport
/// still leaves the controller idle.
struct SettleGuard<'a> {
    controller: &'a mut ViewController,
    token: RequestToken,
}

impl SettleGuard<'_> {
    fn finish(self, outcome: Result<HttpResponse, ApiError>) {
        self.controller.settle(self.token, outcome);
    }
}

impl Drop for SettleGuard<'_> {
    fn drop(&mut self) {
        if self.controller.in_flight() == Some(self.token) {
            self.controller.settle(
                self.token,
                Err(ApiError::Transport("request did not complete".to_string())),
            );
        }
    }
}
