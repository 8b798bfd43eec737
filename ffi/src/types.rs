//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, pointer plus length for byte buffers,
//! and enums with explicit discriminants. Conversion functions live here to
//! keep `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use summarizer_core::{
    HttpMethod, Mode, PendingRequest, SessionState, SubmitRejected, ViewController,
};

/// Opaque handle to a `ViewController`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiController {
    pub(crate) inner: ViewController,
}

/// Allocate a C string, dropping interior NULs rather than failing.
pub(crate) fn to_c_string(s: &str) -> *mut c_char {
    CString::new(s.replace('\0', ""))
        .unwrap_or_default()
        .into_raw()
}

pub(crate) fn opt_c_string(s: Option<&str>) -> *mut c_char {
    s.map(to_c_string).unwrap_or(std::ptr::null_mut())
}

/// Free a string produced by `to_c_string`. Null is ignored.
pub(crate) fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiMode {
    Upload = 0,
    Text = 1,
}

impl From<Mode> for FfiMode {
    fn from(m: Mode) -> Self {
        match m {
            Mode::Upload => FfiMode::Upload,
            Mode::Text => FfiMode::Text,
        }
    }
}

impl FfiMode {
    /// Decode a raw discriminant from C; unknown values are rejected.
    pub(crate) fn decode(raw: i32) -> Option<Mode> {
        match raw {
            0 => Some(Mode::Upload),
            1 => Some(Mode::Text),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
        }
    }
}

#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An issued request as C-compatible plain data.
///
/// The C caller sends `body[0..body_len]` to `path` with the given headers,
/// then reports the outcome with `summarizer_settle` (or one of the
/// `summarizer_settle_*` failure calls) quoting `token`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub token: u64,
    pub method: FfiHttpMethod,
    pub path: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut u8,
    pub body_len: usize,
}

impl FfiHttpRequest {
    pub(crate) fn from_pending(pending: PendingRequest) -> *mut Self {
        let req = pending.request;
        let path = to_c_string(&req.path);

        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .iter()
                .map(|(k, v)| FfiHeader {
                    key: to_c_string(k),
                    value: to_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        let (body, body_len) = match req.body {
            Some(bytes) if !bytes.is_empty() => {
                let boxed = bytes.into_boxed_slice();
                let len = boxed.len();
                (Box::into_raw(boxed) as *mut u8, len)
            }
            _ => (std::ptr::null_mut(), 0),
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            token: pending.token.as_raw(),
            method: req.method.into(),
            path,
            headers,
            headers_len,
            body,
            body_len,
        }))
    }

    /// Release everything `from_pending` allocated.
    pub(crate) fn free(ptr: *mut Self) {
        let req = unsafe { Box::from_raw(ptr) };
        free_c_string(req.path);
        if !req.headers.is_null() && req.headers_len > 0 {
            let slice = std::ptr::slice_from_raw_parts_mut(req.headers, req.headers_len as usize);
            let headers = unsafe { Box::from_raw(slice) };
            for h in headers.iter() {
                free_c_string(h.key);
                free_c_string(h.value);
            }
        }
        if !req.body.is_null() && req.body_len > 0 {
            let slice = std::ptr::slice_from_raw_parts_mut(req.body, req.body_len);
            drop(unsafe { Box::from_raw(slice) });
        }
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller builds this on the stack after the round-trip. The FFI layer
/// reads but does not free these fields. A null `body` means an empty body.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Submit result
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiSubmitCode {
    Ok = 0,
    Busy = 1,
    EmptyText = 2,
    NotPdf = 3,
    Encoding = 4,
    NullArg = 5,
    Panic = 6,
}

/// Result envelope for all submit operations.
///
/// On success `code` is `Ok`, `message` is null and `request` must be
/// executed. Otherwise `request` is null and `message` says why.
#[repr(C)]
pub struct FfiSubmitResult {
    pub code: FfiSubmitCode,
    pub message: *mut c_char,
    pub request: *mut FfiHttpRequest,
}

impl FfiSubmitResult {
    fn boxed(code: FfiSubmitCode, message: *mut c_char, request: *mut FfiHttpRequest) -> *mut Self {
        Box::into_raw(Box::new(FfiSubmitResult {
            code,
            message,
            request,
        }))
    }

    pub(crate) fn from_core(result: Result<PendingRequest, SubmitRejected>) -> *mut Self {
        match result {
            Ok(pending) => Self::boxed(
                FfiSubmitCode::Ok,
                std::ptr::null_mut(),
                FfiHttpRequest::from_pending(pending),
            ),
            Err(rejected) => {
                let code = match rejected {
                    SubmitRejected::Busy => FfiSubmitCode::Busy,
                    SubmitRejected::EmptyText => FfiSubmitCode::EmptyText,
                    SubmitRejected::Encoding(_) => FfiSubmitCode::Encoding,
                };
                Self::boxed(code, to_c_string(&rejected.to_string()), std::ptr::null_mut())
            }
        }
    }

    pub(crate) fn not_pdf(name: &str) -> *mut Self {
        let msg = format!("not a PDF file: {name}");
        Self::boxed(FfiSubmitCode::NotPdf, to_c_string(&msg), std::ptr::null_mut())
    }

    pub(crate) fn invalid_utf8(name: &str) -> *mut Self {
        let msg = format!("argument is not valid UTF-8: {name}");
        Self::boxed(FfiSubmitCode::Encoding, to_c_string(&msg), std::ptr::null_mut())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        let msg = format!("null argument: {name}");
        Self::boxed(FfiSubmitCode::NullArg, to_c_string(&msg), std::ptr::null_mut())
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiSubmitCode::Panic, to_c_string(msg), std::ptr::null_mut())
    }
}

// ---------------------------------------------------------------------------
// View snapshot
// ---------------------------------------------------------------------------

/// Everything a UI needs to render one frame.
///
/// String fields are null when empty/absent, except `draft_text` which is
/// always a valid (possibly empty) string. The result fields are only
/// meaningful when `has_result` is true.
#[repr(C)]
pub struct FfiViewSnapshot {
    pub mode: FfiMode,
    pub busy: bool,
    pub error_message: *mut c_char,
    pub success_message: *mut c_char,
    pub has_result: bool,
    pub summary_text: *mut c_char,
    pub original_length: u64,
    pub summary_length: u64,
    pub reduction_percent: i64,
    pub draft_text: *mut c_char,
}

impl FfiViewSnapshot {
    pub(crate) fn from_state(state: &SessionState) -> *mut Self {
        let (has_result, summary_text, original_length, summary_length, reduction_percent) =
            match &state.result {
                Some(r) => (
                    true,
                    to_c_string(&r.summary_text),
                    r.original_length,
                    r.summary_length,
                    r.reduction_percent(),
                ),
                None => (false, std::ptr::null_mut(), 0, 0, 0),
            };
        Box::into_raw(Box::new(FfiViewSnapshot {
            mode: state.mode.into(),
            busy: state.busy,
            error_message: opt_c_string(state.error_message.as_deref()),
            success_message: opt_c_string(state.success_message.as_deref()),
            has_result,
            summary_text,
            original_length,
            summary_length,
            reduction_percent,
            draft_text: to_c_string(&state.draft_text),
        }))
    }
}
