//! C embedding surface.
//!
//! A thin `extern "C"` wrapper around [`voyager_core::Context`],
//! sufficient to build an interactive prompt in any host language:
//!
//! ```c
//! vy_ctx*   vy_open(const char* db_path);   /* NULL => in-memory */
//! void      vy_close(vy_ctx*);
//! vy_result vy_exec(vy_ctx*, const char* input);
//! int       vy_depth(vy_ctx*);
//! char*     vy_repr(vy_ctx*, int level);    /* free with vy_free */
//! int       vy_undo(vy_ctx*);
//! int       vy_redo(vy_ctx*);
//! vy_state  vy_get_state(vy_ctx*);
//! char*     vy_get_setting(vy_ctx*, const char* key);
//! void      vy_free(char*);
//! ```
//!
//! All functions tolerate NULL handles. Returned strings are
//! heap-allocated and owned by the caller until passed to [`vy_free`].

// C-style type names are part of the exported ABI.
#![allow(non_camel_case_types)]

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::path::Path;

use voyager_core::Context;

/// Opaque context handle exposed to C.
pub struct vy_ctx {
    context: Context,
}

/// Result flag of one evaluation.
#[repr(C)]
pub struct vy_result {
    pub ok: c_int,
}

/// Undo/redo availability.
#[repr(C)]
#[derive(Default)]
pub struct vy_state {
    pub undo_levels: c_int,
    pub redo_levels: c_int,
}

/// Open a context at `db_path`, or in memory when `db_path` is NULL.
/// Returns NULL when the store cannot be opened.
///
/// # Safety
///
/// `db_path` must be NULL or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn vy_open(db_path: *const c_char) -> *mut vy_ctx {
    let path = if db_path.is_null() {
        None
    } else {
        match CStr::from_ptr(db_path).to_str() {
            Ok(s) => Some(s.to_owned()),
            Err(_) => return std::ptr::null_mut(),
        }
    };
    match Context::open(path.as_deref().map(Path::new)) {
        Ok(context) => Box::into_raw(Box::new(vy_ctx { context })),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Close a context and release the store handle.
///
/// # Safety
///
/// `ctx` must be NULL or a pointer returned by [`vy_open`], not yet
/// closed.
#[no_mangle]
pub unsafe extern "C" fn vy_close(ctx: *mut vy_ctx) {
    if !ctx.is_null() {
        drop(Box::from_raw(ctx));
    }
}

/// Execute one input line. On failure the error value is the new top
/// of stack and `ok` is 0.
///
/// # Safety
///
/// `ctx` must be a live context handle; `input` NULL or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn vy_exec(ctx: *mut vy_ctx, input: *const c_char) -> vy_result {
    if ctx.is_null() || input.is_null() {
        return vy_result { ok: 0 };
    }
    let Ok(input) = CStr::from_ptr(input).to_str() else {
        return vy_result { ok: 0 };
    };
    let ok = (*ctx).context.exec(input).is_ok();
    vy_result { ok: ok as c_int }
}

/// Current stack depth, 0 for a NULL handle.
///
/// # Safety
///
/// `ctx` must be NULL or a live context handle.
#[no_mangle]
pub unsafe extern "C" fn vy_depth(ctx: *mut vy_ctx) -> c_int {
    if ctx.is_null() {
        return 0;
    }
    (*ctx).context.depth().unwrap_or(0) as c_int
}

/// Display string for a 1-based stack level, or NULL when the level is
/// out of range. Free with [`vy_free`].
///
/// # Safety
///
/// `ctx` must be NULL or a live context handle.
#[no_mangle]
pub unsafe extern "C" fn vy_repr(ctx: *mut vy_ctx, level: c_int) -> *mut c_char {
    if ctx.is_null() {
        return std::ptr::null_mut();
    }
    match (*ctx).context.repr_at(level as i64) {
        Ok(s) => CString::new(s)
            .map(CString::into_raw)
            .unwrap_or(std::ptr::null_mut()),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Undo the most recent evaluation. Returns 1 on success.
///
/// # Safety
///
/// `ctx` must be NULL or a live context handle.
#[no_mangle]
pub unsafe extern "C" fn vy_undo(ctx: *mut vy_ctx) -> c_int {
    if ctx.is_null() {
        return 0;
    }
    matches!((*ctx).context.undo(), Ok(true)) as c_int
}

/// Redo the next evaluation forward. Returns 1 on success.
///
/// # Safety
///
/// `ctx` must be NULL or a live context handle.
#[no_mangle]
pub unsafe extern "C" fn vy_redo(ctx: *mut vy_ctx) -> c_int {
    if ctx.is_null() {
        return 0;
    }
    matches!((*ctx).context.redo(), Ok(true)) as c_int
}

/// Undo/redo levels currently available.
///
/// # Safety
///
/// `ctx` must be NULL or a live context handle.
#[no_mangle]
pub unsafe extern "C" fn vy_get_state(ctx: *mut vy_ctx) -> vy_state {
    if ctx.is_null() {
        return vy_state::default();
    }
    let context = &(*ctx).context;
    vy_state {
        undo_levels: context.undo_levels().unwrap_or(0) as c_int,
        redo_levels: context.redo_levels().unwrap_or(0) as c_int,
    }
}

/// Metadata value for `key`, or NULL when absent. Free with
/// [`vy_free`].
///
/// # Safety
///
/// `ctx` must be NULL or a live context handle; `key` NULL or
/// NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn vy_get_setting(ctx: *mut vy_ctx, key: *const c_char) -> *mut c_char {
    if ctx.is_null() || key.is_null() {
        return std::ptr::null_mut();
    }
    let Ok(key) = CStr::from_ptr(key).to_str() else {
        return std::ptr::null_mut();
    };
    match (*ctx).context.get_setting(key) {
        Ok(Some(value)) => CString::new(value)
            .map(CString::into_raw)
            .unwrap_or(std::ptr::null_mut()),
        _ => std::ptr::null_mut(),
    }
}

/// Release a string returned by [`vy_repr`] or [`vy_get_setting`].
///
/// # Safety
///
/// `ptr` must be NULL or a pointer returned by this library, not yet
/// freed.
#[no_mangle]
pub unsafe extern "C" fn vy_free(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}
