//! FFI bindings for trigger relabeling
//!
//! This module provides C-compatible functions for calling the relabeler from
//! other languages (the epoching scripts load it through `ctypes`). All
//! functions use C strings (null-terminated) and return allocated memory that
//! must be freed by the caller using `relabel_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::config::{EpochingConfig, RelabelConfig};
use crate::convention::Convention;
use crate::pipeline::{relabel_session_json as relabel_session, SessionProcessor};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Read a required string argument, recording an error naming it when absent
unsafe fn required_arg(ptr: *const c_char, name: &str) -> Option<String> {
    let value = cstr_to_string(ptr);
    if value.is_none() {
        set_last_error(&format!("Invalid {name} string pointer"));
    }
    value
}

/// NULL selects convention A
unsafe fn convention_arg(ptr: *const c_char) -> Option<Convention> {
    if ptr.is_null() {
        return Some(Convention::default());
    }
    let raw = required_arg(ptr, "convention")?;
    match raw.parse::<Convention>() {
        Ok(convention) => Some(convention),
        Err(e) => {
            set_last_error(&e);
            None
        }
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Relabel one session and return the hand-off payload JSON.
///
/// # Safety
/// - `events_json` and `trials_json` must be valid null-terminated C strings.
/// - `convention` must be a valid null-terminated C string (`"a"` or `"b"`)
///   or NULL for convention A.
/// - Returns a newly allocated string that must be freed with `relabel_free_string`.
/// - Returns NULL on error; call `relabel_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn relabel_session_json(
    events_json: *const c_char,
    trials_json: *const c_char,
    convention: *const c_char,
) -> *mut c_char {
    clear_last_error();

    let Some(events) = required_arg(events_json, "events JSON") else {
        return ptr::null_mut();
    };
    let Some(trials) = required_arg(trials_json, "trials JSON") else {
        return ptr::null_mut();
    };
    let Some(convention) = convention_arg(convention) else {
        return ptr::null_mut();
    };

    match relabel_session(events, trials, convention) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateful Processor API
// ============================================================================

/// Opaque handle to a SessionProcessor
pub struct SessionProcessorHandle {
    processor: SessionProcessor,
}

/// Create a processor for the given convention with default epoching parameters.
///
/// # Safety
/// - `convention` must be a valid null-terminated C string or NULL.
/// - Returns a pointer that must be freed with `relabel_processor_free`.
/// - Returns NULL on error.
#[no_mangle]
pub unsafe extern "C" fn relabel_processor_new(
    convention: *const c_char,
) -> *mut SessionProcessorHandle {
    clear_last_error();

    let Some(convention) = convention_arg(convention) else {
        return ptr::null_mut();
    };

    let processor = SessionProcessor::new(RelabelConfig {
        convention,
        ..RelabelConfig::default()
    });
    Box::into_raw(Box::new(SessionProcessorHandle { processor }))
}

/// Free a processor.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `relabel_processor_new`, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn relabel_processor_free(processor: *mut SessionProcessorHandle) {
    if !processor.is_null() {
        drop(Box::from_raw(processor));
    }
}

/// Replace the processor's epoching parameters from JSON.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `relabel_processor_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns 0 on success, -1 on error (see `relabel_last_error`).
#[no_mangle]
pub unsafe extern "C" fn relabel_processor_set_epoching(
    processor: *mut SessionProcessorHandle,
    json: *const c_char,
) -> i32 {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return -1;
    }
    let handle = &mut *processor;

    let Some(json) = required_arg(json, "epoching JSON") else {
        return -1;
    };

    let epoching = match EpochingConfig::from_json(&json) {
        Ok(epoching) => epoching,
        Err(e) => {
            set_last_error(&e.to_string());
            return -1;
        }
    };

    match handle.processor.set_epoching(epoching) {
        Ok(()) => 0,
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

/// Relabel one session with a processor.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `relabel_processor_new`.
/// - `session_id`, `events_json` and `trials_json` must be valid null-terminated C strings.
/// - Returns a newly allocated string that must be freed with `relabel_free_string`.
/// - Returns NULL on error; call `relabel_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn relabel_processor_process(
    processor: *mut SessionProcessorHandle,
    session_id: *const c_char,
    events_json: *const c_char,
    trials_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }
    let handle = &*processor;

    let Some(session_id) = required_arg(session_id, "session id") else {
        return ptr::null_mut();
    };
    let Some(events) = required_arg(events_json, "events JSON") else {
        return ptr::null_mut();
    };
    let Some(trials) = required_arg(trials_json, "trials JSON") else {
        return ptr::null_mut();
    };

    match handle.processor.process_json(&session_id, &events, &trials) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by relabel functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a relabel function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn relabel_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next relabel function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn relabel_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn relabel_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
