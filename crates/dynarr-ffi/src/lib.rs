//! C FFI bindings for the dynarr dynamic array.
//!
//! Exposes the type-erased surface: containers are referenced by `u64`
//! handles and store `void*` element handles that are never dereferenced
//! or freed. Every exported function returns a status code or an
//! absence signal; panics are caught at the boundary.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

use std::any::Any;
use std::cell::RefCell;
use std::os::raw::c_char;

thread_local! {
    /// Message of the most recent panic caught on this thread.
    pub(crate) static LAST_PANIC: RefCell<String> = const { RefCell::new(String::new()) };
}

/// Store a caught panic payload in [`LAST_PANIC`].
pub(crate) fn record_panic(payload: &(dyn Any + Send)) {
    let msg = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("unknown panic payload")
    };
    tracing::error!(message = %msg, "panic caught at FFI boundary");
    LAST_PANIC.with(|cell| *cell.borrow_mut() = msg);
}

/// Run `$body`, returning `$fallback` if it panics.
macro_rules! ffi_guard_or {
    ($fallback:expr, $body:block) => {
        match ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| $body)) {
            Ok(value) => value,
            Err(payload) => {
                $crate::record_panic(payload.as_ref());
                $fallback
            }
        }
    };
}

/// Run a status-returning `$body`, mapping a panic to `DaStatus::Panicked`.
macro_rules! ffi_guard {
    ($body:block) => {
        ffi_guard_or!($crate::status::DaStatus::Panicked as i32, $body)
    };
}

/// Lock a mutex inside a status-returning guard body.
///
/// A poisoned mutex means an earlier call panicked mid-update; report
/// `Panicked` instead of touching the table.
macro_rules! ffi_lock {
    ($mutex:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(_) => return $crate::status::DaStatus::Panicked as i32,
        }
    };
}

pub mod array;
pub(crate) mod handle;
pub mod status;

/// Copy the last caught panic message for this thread into `buf`.
///
/// Returns the full message length in bytes (excluding the terminator),
/// or 0 if no panic has been recorded. When `buf` is non-null and `cap`
/// is non-zero, writes at most `cap - 1` bytes followed by a NUL.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn da_last_panic_message(buf: *mut c_char, cap: usize) -> i32 {
    LAST_PANIC.with(|cell| {
        let msg = cell.borrow();
        let bytes = msg.as_bytes();
        if !buf.is_null() && cap > 0 {
            let n = bytes.len().min(cap - 1);
            // SAFETY: caller guarantees `buf` points to at least `cap` writable bytes.
            unsafe {
                std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf as *mut u8, n);
                *buf.add(n) = 0;
            }
        }
        i32::try_from(bytes.len()).unwrap_or(i32::MAX)
    })
}
