//! Client core for a PDF/text summarization service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), and wraps them in a
//! `ViewController` that owns one session's view state: input mode, draft
//! text, busy flag, and the single displayed outcome.
//!
//! # Design
//! - `SummarizerClient` is stateless and only knows `base_url`.
//! - `SessionState` is a value moved through pure transitions.
//! - `ViewController` gates submissions on one outstanding `RequestToken`
//!   and releases it on every exit path.
//! - `UreqTransport` is the optional blocking executor; other hosts settle
//!   requests themselves.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod file;
pub mod http;
pub mod state;
pub mod transport;
pub mod types;

pub use client::SummarizerClient;
pub use config::ClientConfig;
pub use controller::{PendingRequest, RequestKind, RequestToken, SubmitRejected, ViewController};
pub use error::ApiError;
pub use file::{FileCandidate, FileOrigin, PdfFile};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use state::{Mode, Phase, SessionState, SummaryResult};
pub use transport::{Transport, UreqTransport};
pub use types::{HealthStatus, SummaryResponse, TextRequest};
