//! Resize event counters.

/// Counts of storage resizes performed by a [`DynArray`](crate::DynArray).
///
/// Growth is amortized O(1) only if `grows` stays logarithmic in the
/// number of pushes; these counters make that observable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResizeStats {
    /// Successful growth steps.
    pub grows: u64,
    /// Successful shrink steps.
    pub shrinks: u64,
    /// Shrinks that failed to allocate and were skipped.
    pub failed_shrinks: u64,
}

impl ResizeStats {
    /// Total successful reallocations.
    pub fn resizes(&self) -> u64 {
        self.grows + self.shrinks
    }
}
