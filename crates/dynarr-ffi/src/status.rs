//! C-compatible status codes.
//!
//! [`DaStatus`] is a `repr(i32)` enum covering every outcome of the C
//! surface. Conversions from [`ArrayError`] are provided.

use dynarr::ArrayError;

/// C-compatible status code returned by mutating FFI functions.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DaStatus {
    /// Success.
    Ok = 0,
    /// Slot storage could not be allocated or grown.
    AllocationFailure = -1,
    /// Index is at or beyond the live length.
    OutOfBounds = -2,
    /// Container handle is absent or destroyed, an out-pointer is null,
    /// or a configuration is invalid.
    InvalidArgument = -3,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&ArrayError> for DaStatus {
    fn from(e: &ArrayError) -> Self {
        match e {
            ArrayError::AllocationFailed { .. } | ArrayError::CapacityOverflow { .. } => {
                DaStatus::AllocationFailure
            }
            ArrayError::OutOfBounds { .. } => DaStatus::OutOfBounds,
            ArrayError::InvalidConfig(_) => DaStatus::InvalidArgument,
        }
    }
}
