//! FFI bindings for vitalbench
//!
//! This module provides C-compatible functions for calling vitalbench from other
//! languages. All functions use C strings (null-terminated) and return allocated
//! memory that must be freed by the caller using `vb_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::pipeline::{compare_json, measurements_to_report, BenchmarkProcessor};

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

/// Convert a C string argument, recording an error naming `what` on failure
unsafe fn arg_to_string(ptr: *const c_char, what: &str) -> Option<String> {
    if ptr.is_null() {
        set_last_error(&format!("Null {what} pointer"));
        return None;
    }
    match CStr::from_ptr(ptr).to_str() {
        Ok(s) => Some(s.to_string()),
        Err(_) => {
            set_last_error(&format!("Invalid UTF-8 in {what}"));
            None
        }
    }
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

fn result_to_cstr<E: std::fmt::Display>(result: Result<String, E>) -> *mut c_char {
    match result {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Compare one value against the bundled benchmarks.
///
/// Returns the comparison JSON, or the string `null` when no comparison is
/// available for the metric or age.
///
/// # Safety
/// - `metric` must be a valid null-terminated C string (e.g. "VO2_MAX").
/// - Returns a newly allocated string that must be freed with `vb_free_string`.
/// - Returns NULL on error; call `vb_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn vb_compare(metric: *const c_char, value: f64, age: u32) -> *mut c_char {
    clear_last_error();

    let Some(metric) = arg_to_string(metric, "metric") else {
        return ptr::null_mut();
    };

    result_to_cstr(compare_json(&metric, value, age))
}

/// Build a comparison report from a JSON array of measurements.
///
/// # Safety
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `vb_free_string`.
/// - Returns NULL on error; call `vb_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn vb_measurements_to_report(json: *const c_char, age: u32) -> *mut c_char {
    clear_last_error();

    let Some(json) = arg_to_string(json, "JSON") else {
        return ptr::null_mut();
    };

    result_to_cstr(measurements_to_report(json, age))
}

// ============================================================================
// Stateful Processor API
// ============================================================================

/// Opaque handle to a BenchmarkProcessor
pub struct VbProcessorHandle {
    processor: BenchmarkProcessor,
}

/// Create a processor over the bundled benchmark table.
///
/// # Safety
/// - Returns a pointer to a newly allocated processor.
/// - Must be freed with `vb_processor_free`.
#[no_mangle]
pub unsafe extern "C" fn vb_processor_new() -> *mut VbProcessorHandle {
    clear_last_error();
    Box::into_raw(Box::new(VbProcessorHandle {
        processor: BenchmarkProcessor::new(),
    }))
}

/// Free a processor.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `vb_processor_new`, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn vb_processor_free(processor: *mut VbProcessorHandle) {
    if !processor.is_null() {
        drop(Box::from_raw(processor));
    }
}

/// Replace the processor's benchmark table with one loaded from JSON.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `vb_processor_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns 0 on success, non-zero on error; the previous table is kept on error.
#[no_mangle]
pub unsafe extern "C" fn vb_processor_load_table(
    processor: *mut VbProcessorHandle,
    json: *const c_char,
) -> i32 {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return -1;
    }
    let handle = &mut *processor;

    let Some(json) = arg_to_string(json, "JSON") else {
        return -1;
    };

    match handle.processor.load_table(&json) {
        Ok(()) => 0,
        Err(e) => {
            set_last_error(&e.to_string());
            -1
        }
    }
}

/// Save the processor's benchmark table to JSON.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `vb_processor_new`.
/// - Returns a newly allocated string that must be freed with `vb_free_string`.
/// - Returns NULL on error; call `vb_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn vb_processor_save_table(processor: *mut VbProcessorHandle) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }
    let handle = &*processor;

    result_to_cstr(handle.processor.save_table())
}

/// Build a comparison report with the processor's benchmark table.
///
/// # Safety
/// - `processor` must be a valid pointer returned by `vb_processor_new`.
/// - `json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `vb_free_string`.
/// - Returns NULL on error; call `vb_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn vb_processor_report(
    processor: *mut VbProcessorHandle,
    json: *const c_char,
    age: u32,
) -> *mut c_char {
    clear_last_error();

    if processor.is_null() {
        set_last_error("Null processor pointer");
        return ptr::null_mut();
    }
    let handle = &*processor;

    let Some(json) = arg_to_string(json, "JSON") else {
        return ptr::null_mut();
    };

    result_to_cstr(handle.processor.report_json(&json, age))
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by vitalbench functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a vitalbench function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn vb_free_string(ptr: *mut c_char) {
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
/// - The returned pointer is valid until the next vitalbench call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn vb_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn vb_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
