//! Session view state.
//!
//! # Design
//! `SessionState` is a value. Every transition consumes the old state and
//! returns the new one, so the controller never pokes at individual fields
//! and each transition can be tested on its own.
//!
//! After any settled request exactly one display outcome is populated:
//! either `error_message`, or `success_message` together with `result`.

use crate::types::SummaryResponse;

/// Which input panel is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Upload,
    Text,
}

/// Coarse view phase derived from the state fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Busy,
    Success,
    Error,
}

/// A summary plus the before/after character counts reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryResult {
    pub summary_text: String,
    pub original_length: u64,
    pub summary_length: u64,
}

impl SummaryResult {
    /// `round((1 - summary/original) * 100)`.
    ///
    /// Zero when `original_length` is zero. Negative when the summary came
    /// back longer than the input.
    pub fn reduction_percent(&self) -> i64 {
        if self.original_length == 0 {
            return 0;
        }
        let ratio = self.summary_length as f64 / self.original_length as f64;
        ((1.0 - ratio) * 100.0).round() as i64
    }
}

impl From<SummaryResponse> for SummaryResult {
    fn from(r: SummaryResponse) -> Self {
        Self {
            summary_text: r.summary,
            original_length: r.original_length,
            summary_length: r.summary_length,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    pub mode: Mode,
    pub busy: bool,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
    pub result: Option<SummaryResult>,
    pub draft_text: String,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        if self.busy {
            Phase::Busy
        } else if self.error_message.is_some() {
            Phase::Error
        } else if self.result.is_some() {
            Phase::Success
        } else {
            Phase::Idle
        }
    }

    /// Switch panels. Displayed results and messages stay.
    pub fn with_mode(self, mode: Mode) -> Self {
        Self { mode, ..self }
    }

    pub fn with_draft(self, draft_text: String) -> Self {
        Self { draft_text, ..self }
    }

    /// A request was issued: clear every outcome and mark busy.
    pub fn begin(self) -> Self {
        Self {
            busy: true,
            error_message: None,
            success_message: None,
            result: None,
            ..self
        }
    }

    pub fn succeed(self, result: SummaryResult, message: &str) -> Self {
        Self {
            busy: false,
            error_message: None,
            success_message: Some(message.to_string()),
            result: Some(result),
            ..self
        }
    }

    /// Show an error. Also used for input rejected before any request, in
    /// which case `busy` is already false.
    pub fn fail(self, message: String) -> Self {
        Self {
            busy: false,
            error_message: Some(message),
            success_message: None,
            result: None,
            ..self
        }
    }

    /// Drop the busy flag and nothing else.
    pub fn release(self) -> Self {
        Self {
            busy: false,
            ..self
        }
    }

    /// Empty every outcome and the draft. Mode and busy are untouched.
    pub fn cleared(self) -> Self {
        Self {
            error_message: None,
            success_message: None,
            result: None,
            draft_text: String::new(),
            ..self
        }
    }
}
