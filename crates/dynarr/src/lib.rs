//! Amortized-growth, hysteresis-shrinking dynamic array.
//!
//! [`DynArray`] is a contiguous sequential container with index-based
//! random access, append, replace, and order-preserving removal. Its
//! storage grows geometrically when full and shrinks once occupancy drops
//! to a configurable fraction of capacity, never below a fixed floor.
//!
//! # Resize policy
//!
//! ```text
//! push   : len == capacity        → capacity *= growth_factor
//! remove : 0 < len <= cap * 0.25  → capacity *= shrink_factor (≥ min_capacity)
//! ```
//!
//! The gap between the growth trigger (100% full) and the shrink trigger
//! (25% full) keeps alternating push/remove near a capacity boundary from
//! reallocating on every call.
//!
//! # Ownership
//!
//! The container owns its slot storage and whatever `T` it holds. Store a
//! non-owning handle type (`&U`, `*mut U`, an index) to keep element
//! lifetime with the caller; removal and replacement always hand the old
//! element back instead of dropping it.
//!
//! All allocation goes through `Vec::try_reserve_exact`, so allocation
//! failure is reported as [`ArrayError::AllocationFailed`] rather than
//! aborting the process.
//!
//! # Example
//!
//! ```
//! use dynarr::DynArray;
//!
//! let mut names = DynArray::with_capacity(0)?;
//! names.push("alice")?;
//! names.push("bob")?;
//! assert_eq!(names.get(1), Some(&"bob"));
//! assert_eq!(names.remove(0), Some("alice"));
//! assert_eq!(names.capacity(), 8);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod array;
pub mod config;
pub mod error;
pub mod iter;
pub mod stats;

// Public re-exports for the primary API surface.
pub use array::DynArray;
pub use config::{ArrayConfig, ConfigError};
pub use error::{ArrayError, Rejected};
pub use iter::Iter;
pub use stats::ResizeStats;
