//! Array error types.

use std::error::Error;
use std::fmt;

use crate::config::ConfigError;

/// Errors that can occur during array operations.
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayError {
    /// The allocator could not provide the requested slot storage.
    AllocationFailed {
        /// Number of slots requested.
        requested: usize,
    },
    /// Growing past `capacity` by `factor` overflows `usize`.
    CapacityOverflow {
        /// Capacity at the time of the failed growth.
        capacity: usize,
        /// The configured growth factor.
        factor: usize,
    },
    /// A write addressed a slot at or beyond the live length.
    OutOfBounds {
        /// The rejected index.
        index: usize,
        /// Live length at the time of the call.
        len: usize,
    },
    /// The resize policy failed validation at construction.
    InvalidConfig(ConfigError),
}

impl ArrayError {
    /// Whether this error came from storage allocation rather than indexing.
    pub fn is_allocation(&self) -> bool {
        matches!(
            self,
            Self::AllocationFailed { .. } | Self::CapacityOverflow { .. }
        )
    }
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed { requested } => {
                write!(f, "allocation failed: requested {requested} slots")
            }
            Self::CapacityOverflow { capacity, factor } => {
                write!(f, "capacity overflow: {capacity} x {factor} exceeds usize")
            }
            Self::OutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
            Self::InvalidConfig(e) => write!(f, "invalid config: {e}"),
        }
    }
}

impl Error for ArrayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidConfig(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for ArrayError {
    fn from(e: ConfigError) -> Self {
        Self::InvalidConfig(e)
    }
}

/// An element handed back by a mutation that refused it.
///
/// [`DynArray::push`](crate::DynArray::push) and
/// [`DynArray::set`](crate::DynArray::set) take the element by value; on
/// failure it travels back to the caller here instead of being dropped.
pub struct Rejected<T> {
    error: ArrayError,
    element: T,
}

impl<T> Rejected<T> {
    pub(crate) fn new(error: ArrayError, element: T) -> Self {
        Self { error, element }
    }

    /// The reason the element was refused.
    pub fn error(&self) -> &ArrayError {
        &self.error
    }

    /// Recover the refused element.
    pub fn into_element(self) -> T {
        self.element
    }

    /// Split into the error and the refused element.
    pub fn into_parts(self) -> (ArrayError, T) {
        (self.error, self.element)
    }
}

impl<T> fmt::Debug for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejected")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element rejected: {}", self.error)
    }
}

impl<T> Error for Rejected<T> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

impl<T> From<Rejected<T>> for ArrayError {
    fn from(r: Rejected<T>) -> Self {
        r.error
    }
}
