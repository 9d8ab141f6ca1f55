//! C ABI for the log transport.
//!
//! Mirrors the Rust API over an opaque handle. All failures come back as the
//! negative `RINGLOG_*` codes; the read call overloads its return value with
//! bytes-copied-on-success. Null-pointer checks happen here, at the
//! boundary -- the safe Rust API has no way to express them.

use std::os::raw::{c_char, c_int};
use std::{ptr, slice};

use crate::mpsc::{Level, RingLog};

pub const RINGLOG_OK: i32 = 0;
pub const RINGLOG_ERR_FULL: i32 = -1;
pub const RINGLOG_ERR_INVALID: i32 = -2;
pub const RINGLOG_ERR_EMPTY: i32 = -3;
pub const RINGLOG_ERR_BUSY: i32 = -4;

/// Handle to a logger instance (opaque pointer).
pub struct RingLogHandle {
    inner: RingLog<'static>,
}

#[inline]
fn level_from_c(level: c_int) -> Option<Level> {
    u32::try_from(level).ok().and_then(Level::from_raw)
}

/// Create a logger over caller-provided storage.
///
/// # Arguments
/// * `buffer` - Pointer to the backing region. Must stay valid (and be left
///   alone) until `ringlog_free`. Must be 4-byte aligned.
/// * `capacity` - Region size in bytes; power of two.
///
/// # Returns
/// * Pointer to `RingLogHandle`, or NULL on invalid arguments.
#[no_mangle]
pub extern "C" fn ringlog_new(buffer: *mut u8, capacity: u32) -> *mut RingLogHandle {
    match unsafe { RingLog::from_raw(buffer, capacity) } {
        Ok(inner) => Box::into_raw(Box::new(RingLogHandle { inner })),
        Err(_) => ptr::null_mut(),
    }
}

/// Free a logger handle. The backing buffer itself is the caller's to
/// release.
#[no_mangle]
pub extern "C" fn ringlog_free(log: *mut RingLogHandle) {
    if !log.is_null() {
        unsafe {
            let _ = Box::from_raw(log);
        }
    }
}

/// Set the minimum level. Out-of-range levels are ignored.
#[no_mangle]
pub extern "C" fn ringlog_set_level(log: *mut RingLogHandle, level: c_int) {
    if log.is_null() {
        return;
    }
    if let Some(level) = level_from_c(level) {
        unsafe { &(*log).inner }.set_level(level);
    }
}

/// Get the minimum level; `NONE` for a NULL handle.
#[no_mangle]
pub extern "C" fn ringlog_get_level(log: *const RingLogHandle) -> c_int {
    if log.is_null() {
        return Level::None as c_int;
    }
    unsafe { &(*log).inner }.level() as c_int
}

/// Record a NUL-terminated message. Signal-safe.
///
/// # Returns
/// * `RINGLOG_OK` on success (or when the record was filtered by level),
///   negative error code otherwise.
#[no_mangle]
pub extern "C" fn ringlog_write(
    log: *mut RingLogHandle,
    level: c_int,
    timestamp: u32,
    message: *const c_char,
) -> i32 {
    if log.is_null() || message.is_null() {
        return RINGLOG_ERR_INVALID;
    }
    let Some(level) = level_from_c(level) else {
        return RINGLOG_ERR_INVALID;
    };
    let payload = unsafe { std::ffi::CStr::from_ptr(message) }.to_bytes();
    match unsafe { &(*log).inner }.write_raw(level, timestamp, payload) {
        Ok(()) => RINGLOG_OK,
        Err(e) => e.code(),
    }
}

/// Record a raw byte range. Signal-safe.
#[no_mangle]
pub extern "C" fn ringlog_write_raw(
    log: *mut RingLogHandle,
    level: c_int,
    timestamp: u32,
    message: *const u8,
    length: usize,
) -> i32 {
    if log.is_null() || message.is_null() {
        return RINGLOG_ERR_INVALID;
    }
    let Some(level) = level_from_c(level) else {
        return RINGLOG_ERR_INVALID;
    };
    let payload = unsafe { slice::from_raw_parts(message, length) };
    match unsafe { &(*log).inner }.write_raw(level, timestamp, payload) {
        Ok(()) => RINGLOG_OK,
        Err(e) => e.code(),
    }
}

/// Drain the next record. Consumer thread only.
///
/// # Arguments
/// * `level` / `timestamp` - Output pointers for the record header fields.
/// * `out` - Output buffer for the payload; NUL-terminated on success.
/// * `out_len` - Size of `out`; at most `out_len - 1` payload bytes are
///   copied, silently truncating longer records.
///
/// # Returns
/// * Number of payload bytes copied (>= 0) on success.
/// * `RINGLOG_ERR_EMPTY` when there is nothing to drain.
/// * `RINGLOG_ERR_BUSY` when the next record is not yet committed.
/// * `RINGLOG_ERR_INVALID` on NULL arguments, zero `out_len`, or a corrupt
///   record.
#[no_mangle]
pub extern "C" fn ringlog_read(
    log: *mut RingLogHandle,
    level: *mut c_int,
    timestamp: *mut u32,
    out: *mut c_char,
    out_len: usize,
) -> i32 {
    if log.is_null() || level.is_null() || timestamp.is_null() || out.is_null() || out_len == 0 {
        return RINGLOG_ERR_INVALID;
    }
    let out = unsafe { slice::from_raw_parts_mut(out as *mut u8, out_len) };
    match unsafe { &(*log).inner }.read(out) {
        Ok(entry) => {
            unsafe {
                *level = entry.level as c_int;
                *timestamp = entry.timestamp;
            }
            entry.len as i32
        }
        Err(e) => e.code(),
    }
}

/// Occupied bytes; 0 for a NULL handle.
#[no_mangle]
pub extern "C" fn ringlog_available(log: *const RingLogHandle) -> u32 {
    if log.is_null() {
        return 0;
    }
    unsafe { &(*log).inner }.available()
}

/// True when the ring holds no records; also true for a NULL handle.
#[no_mangle]
pub extern "C" fn ringlog_is_empty(log: *const RingLogHandle) -> bool {
    if log.is_null() {
        return true;
    }
    unsafe { &(*log).inner }.is_empty()
}

/// Constant name for a level ordinal; `"UNKNOWN"` outside the defined range.
#[no_mangle]
pub extern "C" fn ringlog_level_name(level: c_int) -> *const c_char {
    let name: &'static [u8] = match level_from_c(level) {
        Some(Level::Trace) => b"TRACE\0",
        Some(Level::Debug) => b"DEBUG\0",
        Some(Level::Info) => b"INFO\0",
        Some(Level::Warn) => b"WARN\0",
        Some(Level::Error) => b"ERROR\0",
        Some(Level::Fatal) => b"FATAL\0",
        Some(Level::None) => b"NONE\0",
        None => b"UNKNOWN\0",
    };
    name.as_ptr() as *const c_char
}
