//! C FFI bindings for the chunkstack chunked stack.
//!
//! Exposes `RawStack` behind opaque `u64` handles so C callers get the
//! procedural create/push/pop/destroy surface without sharing Rust
//! pointers. Every entry point returns a [`StackStatus`] code and never
//! unwinds across the boundary.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

use std::cell::RefCell;
use std::ffi::c_char;

thread_local! {
    /// Message of the last panic caught by `ffi_guard!` on this thread.
    static LAST_PANIC: RefCell<String> = const { RefCell::new(String::new()) };
}

/// Record a caught panic payload for `chunkstack_last_panic_message`.
fn record_panic(payload: &(dyn std::any::Any + Send)) {
    let msg = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_owned()
    };
    tracing::error!(panic = %msg, "panic caught at FFI boundary");
    LAST_PANIC.with(|cell| *cell.borrow_mut() = msg);
}

/// Run an FFI body, converting any panic into `StackStatus::Panicked`.
///
/// `return` inside the body returns from the guarded closure, so early
/// exits with a status code work as in a plain function.
macro_rules! ffi_guard {
    ($body:block) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| -> i32 { $body })) {
            Ok(status) => status,
            Err(payload) => {
                $crate::record_panic(&*payload);
                $crate::status::StackStatus::Panicked as i32
            }
        }
    };
}

/// Lock a mutex inside `ffi_guard!`, returning `InternalError` if poisoned.
macro_rules! ffi_lock {
    ($mutex:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(_) => return $crate::status::StackStatus::InternalError as i32,
        }
    };
}

mod handle;
pub mod stack;
pub mod status;

pub use stack::*;
pub use status::StackStatus;

/// Copy the last caught panic message on this thread into `buf`.
///
/// Returns the full message length in bytes (excluding the terminator),
/// or 0 if no panic has been caught. Pass a null `buf` to query the length.
/// At most `cap - 1` bytes are written, followed by a NUL terminator.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn chunkstack_last_panic_message(buf: *mut c_char, cap: usize) -> i32 {
    LAST_PANIC.with(|cell| {
        let msg = cell.borrow();
        if !buf.is_null() && cap > 0 {
            let n = msg.len().min(cap - 1);
            // SAFETY: buf points to at least `cap` writable bytes per caller
            // contract, and n + 1 <= cap.
            unsafe {
                std::ptr::copy_nonoverlapping(msg.as_ptr(), buf.cast::<u8>(), n);
                *buf.add(n) = 0;
            }
        }
        i32::try_from(msg.len()).unwrap_or(i32::MAX)
    })
}
