//! C-ABI wrapper around `summarizer-core`'s `ViewController`.
//!
//! # Overview
//! A UI host written in any language with a C FFI drives one session
//! through these functions: it forwards user events (mode switch, draft
//! edits, submissions, clear), executes the `FfiHttpRequest` a submission
//! hands back, reports the outcome with `summarizer_settle*`, and renders
//! whatever `summarizer_snapshot` returns.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Submissions return a `FfiSubmitResult` envelope; state-changing calls
//!   return `bool` (false on null handle, stale token, or bad argument).
//! - The C caller owns all returned pointers and must call the matching
//!   `summarizer_free_*` function to release them.

pub mod types;

use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::catch_unwind;
use std::time::Duration;

use summarizer_core::{
    ApiError, ClientConfig, FileCandidate, FileOrigin, HttpResponse, PdfFile, RequestToken,
    SummarizerClient, ViewController,
};

use types::*;

/// Borrow a C string as `&str`; `None` if it is not valid UTF-8.
fn c_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

/// Copy a C string, replacing invalid UTF-8 sequences.
fn c_string_lossy(ptr: *const c_char) -> String {
    String::from_utf8_lossy(unsafe { CStr::from_ptr(ptr) }.to_bytes()).into_owned()
}

/// Run `f` on the controller behind `ctrl`; false on null or panic.
fn with_controller(ctrl: *mut FfiController, f: impl FnOnce(&mut ViewController) -> bool) -> bool {
    if ctrl.is_null() {
        return false;
    }
    catch_unwind(std::panic::AssertUnwindSafe(|| {
        let ctrl = unsafe { &mut *ctrl };
        f(&mut ctrl.inner)
    }))
    .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Controller lifecycle
// ---------------------------------------------------------------------------

/// Create a controller talking to `base_url`.
///
/// Returns null if `base_url` is null or not UTF-8, or if an internal panic
/// occurs.
/// The caller must free the returned pointer with `summarizer_controller_free`.
#[unsafe(no_mangle)]
pub extern "C" fn summarizer_controller_new(base_url: *const c_char) -> *mut FfiController {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let Some(base_url) = c_str(base_url) else {
            return std::ptr::null_mut();
        };
        let client = SummarizerClient::new(base_url);
        Box::into_raw(Box::new(FfiController {
            inner: ViewController::new(client),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a controller from `SUMMARIZER_API_URL` (default
/// `http://localhost:8000`).
#[unsafe(no_mangle)]
pub extern "C" fn summarizer_controller_from_env() -> *mut FfiController {
    catch_unwind(|| {
        let config = ClientConfig::from_env();
        Box::into_raw(Box::new(FfiController {
            inner: ViewController::from_config(&config),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a controller. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn summarizer_controller_free(ctrl: *mut FfiController) {
    if !ctrl.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(ctrl) });
        });
    }
}

// ---------------------------------------------------------------------------
// User events
// ---------------------------------------------------------------------------

/// Switch input mode: 0 = upload, 1 = text. Unknown values return false.
#[unsafe(no_mangle)]
pub extern "C" fn summarizer_select_mode(ctrl: *mut FfiController, mode: i32) -> bool {
    let Some(mode) = FfiMode::decode(mode) else {
        return false;
    };
    with_controller(ctrl, |c| {
        c.select_mode(mode);
        true
    })
}

/// Replace the draft text. Null clears it; text that is not UTF-8 is
/// refused and returns false.
#[unsafe(no_mangle)]
pub extern "C" fn summarizer_set_draft(ctrl: *mut FfiController, text: *const c_char) -> bool {
    with_controller(ctrl, |c| {
        let text = if text.is_null() { Some("") } else { c_str(text) };
        match text {
            Some(text) => {
                c.set_draft(text);
                true
            }
            None => false,
        }
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn summarizer_clear_all(ctrl: *mut FfiController) -> bool {
    with_controller(ctrl, |c| {
        c.clear_all();
        true
    })
}

// ---------------------------------------------------------------------------
// Submissions
// ---------------------------------------------------------------------------

/// Submit the current draft text.
#[unsafe(no_mangle)]
pub extern "C" fn summarizer_submit_draft(ctrl: *mut FfiController) -> *mut FfiSubmitResult {
    catch_unwind(std::panic::AssertUnwindSafe(|| {
        if ctrl.is_null() {
            return FfiSubmitResult::null_arg("ctrl");
        }
        let ctrl = unsafe { &mut *ctrl };
        FfiSubmitResult::from_core(ctrl.inner.submit_draft())
    }))
    .unwrap_or_else(|_| FfiSubmitResult::panic("panic in summarizer_submit_draft"))
}

/// Submit `text` directly, bypassing the draft. Text that is not UTF-8
/// returns `Encoding` and leaves the session untouched.
#[unsafe(no_mangle)]
pub extern "C" fn summarizer_submit_text(
    ctrl: *mut FfiController,
    text: *const c_char,
) -> *mut FfiSubmitResult {
    catch_unwind(std::panic::AssertUnwindSafe(|| {
        if ctrl.is_null() {
            return FfiSubmitResult::null_arg("ctrl");
        }
        if text.is_null() {
            return FfiSubmitResult::null_arg("text");
        }
        let Some(text) = c_str(text) else {
            return FfiSubmitResult::invalid_utf8("text");
        };
        let ctrl = unsafe { &mut *ctrl };
        FfiSubmitResult::from_core(ctrl.inner.submit_text(text))
    }))
    .unwrap_or_else(|_| FfiSubmitResult::panic("panic in summarizer_submit_text"))
}

/// Submit a file chosen by picker or drop. `content_type` may be null.
///
/// Files that fail the PDF filter return `NotPdf` and leave the session
/// untouched, as does a `name` or `content_type` that is not UTF-8
/// (`Encoding`). `data` may be null only when `len` is 0.
#[unsafe(no_mangle)]
pub extern "C" fn summarizer_submit_file(
    ctrl: *mut FfiController,
    name: *const c_char,
    content_type: *const c_char,
    data: *const u8,
    len: usize,
) -> *mut FfiSubmitResult {
    catch_unwind(std::panic::AssertUnwindSafe(|| {
        if ctrl.is_null() {
            return FfiSubmitResult::null_arg("ctrl");
        }
        if name.is_null() {
            return FfiSubmitResult::null_arg("name");
        }
        if data.is_null() && len > 0 {
            return FfiSubmitResult::null_arg("data");
        }
        let Some(name) = c_str(name) else {
            return FfiSubmitResult::invalid_utf8("name");
        };
        let content_type = if content_type.is_null() {
            None
        } else {
            match c_str(content_type) {
                Some(content_type) => Some(content_type.to_string()),
                None => return FfiSubmitResult::invalid_utf8("content_type"),
            }
        };
        let ctrl = unsafe { &mut *ctrl };
        let bytes = if len == 0 {
            Vec::new()
        } else {
            unsafe { std::slice::from_raw_parts(data, len) }.to_vec()
        };
        let candidate = FileCandidate {
            name: name.to_string(),
            content_type,
            bytes,
            origin: FileOrigin::Picker,
        };
        let display_name = candidate.name.clone();
        match PdfFile::accept(candidate) {
            Some(file) => FfiSubmitResult::from_core(ctrl.inner.submit_file(&file)),
            None => FfiSubmitResult::not_pdf(&display_name),
        }
    }))
    .unwrap_or_else(|_| FfiSubmitResult::panic("panic in summarizer_submit_file"))
}

// ---------------------------------------------------------------------------
// Settlement
// ---------------------------------------------------------------------------

fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() {
        String::new()
    } else {
        c_string_lossy(resp.body)
    };
    HttpResponse::new(resp.status, body)
}

/// Report the HTTP response for `token`.
///
/// Returns false if `token` is not the outstanding request; the session is
/// then unchanged. A null `response` settles the request as a transport
/// failure so the session never stays busy.
#[unsafe(no_mangle)]
pub extern "C" fn summarizer_settle(
    ctrl: *mut FfiController,
    token: u64,
    response: *const FfiHttpResponse,
) -> bool {
    with_controller(ctrl, |c| {
        let outcome = if response.is_null() {
            Err(ApiError::Transport("no response".to_string()))
        } else {
            Ok(ffi_response_to_core(unsafe { &*response }))
        };
        c.settle(RequestToken::from_raw(token), outcome)
    })
}

/// Report that the request for `token` failed before any response arrived.
/// `message` may be null.
#[unsafe(no_mangle)]
pub extern "C" fn summarizer_settle_transport_error(
    ctrl: *mut FfiController,
    token: u64,
    message: *const c_char,
) -> bool {
    with_controller(ctrl, |c| {
        let message = if message.is_null() {
            String::new()
        } else {
            c_string_lossy(message)
        };
        c.settle(RequestToken::from_raw(token), Err(ApiError::Transport(message)))
    })
}

/// Report that the request for `token` exceeded the host's `timeout_ms`.
#[unsafe(no_mangle)]
pub extern "C" fn summarizer_settle_timeout(
    ctrl: *mut FfiController,
    token: u64,
    timeout_ms: u64,
) -> bool {
    with_controller(ctrl, |c| {
        c.settle(
            RequestToken::from_raw(token),
            Err(ApiError::Timeout(Duration::from_millis(timeout_ms))),
        )
    })
}

/// Drop the request for `token` without an outcome (e.g. the view was
/// closed). Busy is released; nothing else changes.
#[unsafe(no_mangle)]
pub extern "C" fn summarizer_abandon(ctrl: *mut FfiController, token: u64) -> bool {
    with_controller(ctrl, |c| c.abandon(RequestToken::from_raw(token)))
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Copy the current view state. Returns null if `ctrl` is null.
/// Free with `summarizer_free_snapshot`.
#[unsafe(no_mangle)]
pub extern "C" fn summarizer_snapshot(ctrl: *const FfiController) -> *mut FfiViewSnapshot {
    catch_unwind(|| {
        if ctrl.is_null() {
            return std::ptr::null_mut();
        }
        let ctrl = unsafe { &*ctrl };
        FfiViewSnapshot::from_state(ctrl.inner.state())
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiSubmitResult` and the request it carries. Safe to call with
/// null.
#[unsafe(no_mangle)]
pub extern "C" fn summarizer_free_submit_result(result: *mut FfiSubmitResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        free_c_string(result.message);
        if !result.request.is_null() {
            FfiHttpRequest::free(result.request);
        }
    });
}

/// Free an `FfiViewSnapshot`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn summarizer_free_snapshot(snapshot: *mut FfiViewSnapshot) {
    if snapshot.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let snapshot = unsafe { Box::from_raw(snapshot) };
        free_c_string(snapshot.error_message);
        free_c_string(snapshot.success_message);
        free_c_string(snapshot.summary_text);
        free_c_string(snapshot.draft_text);
    });
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
