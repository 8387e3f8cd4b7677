//! C-compatible status codes.
//!
//! [`StackStatus`] is a `repr(i32)` enum covering every error condition
//! reported across the C boundary, with a conversion from
//! [`StackError`].

use chunkstack::StackError;

/// C-compatible status code returned by all FFI functions.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackStatus {
    /// Success.
    Ok = 0,
    /// Handle is invalid or was already destroyed.
    InvalidHandle = -1,
    /// An argument is null or otherwise invalid.
    InvalidArgument = -2,
    /// Element size or chunk capacity rejected at creation.
    ConfigError = -3,
    /// Pop, peek or discard on a stack with no elements.
    StackEmpty = -4,
    /// Internal error (e.g. poisoned mutex after a prior panic).
    InternalError = -20,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&StackError> for StackStatus {
    fn from(_e: &StackError) -> Self {
        StackStatus::ConfigError
    }
}
