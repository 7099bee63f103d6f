//! The dynamic array container.
//!
//! [`DynArray`] tracks its logical capacity separately from the backing
//! `Vec`, so the resize policy in [`ArrayConfig`] alone decides when and
//! how far storage moves. Every reallocation goes through
//! `try_reserve_exact`; a refused allocation leaves the array exactly as
//! it was.

use std::fmt;
use std::mem;

use tracing::{debug, warn};

use crate::config::ArrayConfig;
use crate::error::{ArrayError, Rejected};
use crate::iter::Iter;
use crate::stats::ResizeStats;

/// A contiguous, index-addressed sequence with geometric growth and
/// hysteresis shrinking.
///
/// Live elements occupy indices `0..len()` in insertion order, shifted
/// left as earlier elements are removed. `len() <= capacity()` and
/// `capacity() >= config().min_capacity` hold after every operation.
pub struct DynArray<T> {
    /// Live elements. Reserved to at least `capacity` slots.
    items: Vec<T>,
    /// Logical slot count governed by the resize policy.
    capacity: usize,
    config: ArrayConfig,
    stats: ResizeStats,
}

impl<T> DynArray<T> {
    /// Create an empty array with the default resize policy.
    ///
    /// Storage is sized to `max(requested, 8)`. Returns
    /// [`ArrayError::AllocationFailed`] if that cannot be reserved.
    pub fn with_capacity(requested: usize) -> Result<Self, ArrayError> {
        Self::with_config(ArrayConfig::new(), requested)
    }

    /// Create an empty array with a custom resize policy.
    ///
    /// The config is validated first; an invalid policy is reported as
    /// [`ArrayError::InvalidConfig`] before anything is allocated.
    pub fn with_config(config: ArrayConfig, requested: usize) -> Result<Self, ArrayError> {
        config.validate()?;
        let capacity = config.initial_capacity(requested);
        let items = reserve(capacity)?;
        Ok(Self {
            items,
            capacity,
            config,
            stats: ResizeStats::default(),
        })
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no live elements.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of slots currently reserved.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The resize policy this array was built with.
    pub fn config(&self) -> &ArrayConfig {
        &self.config
    }

    /// Resize counters since construction.
    pub fn stats(&self) -> ResizeStats {
        self.stats
    }

    /// Append an element at index `len()`.
    ///
    /// A full array grows by `growth_factor` first. If growth fails the
    /// array is untouched and the element comes back inside the error.
    pub fn push(&mut self, element: T) -> Result<(), Rejected<T>> {
        if self.items.len() == self.capacity {
            if let Err(e) = self.grow() {
                return Err(Rejected::new(e, element));
            }
        }
        self.items.push(element);
        Ok(())
    }

    /// Shared reference to the element at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Mutable reference to the element at `index`, or `None` past the end.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Replace the element at `index`, returning the previous one.
    ///
    /// The previous element is handed back untouched; dropping or freeing
    /// it is up to the caller. Fails with [`ArrayError::OutOfBounds`] when
    /// `index >= len()`.
    pub fn set(&mut self, index: usize, element: T) -> Result<T, Rejected<T>> {
        let len = self.items.len();
        match self.items.get_mut(index) {
            Some(slot) => Ok(mem::replace(slot, element)),
            None => Err(Rejected::new(ArrayError::OutOfBounds { index, len }, element)),
        }
    }

    /// Remove and return the element at `index`, shifting later elements
    /// left by one.
    ///
    /// Returns `None` if `index >= len()`. May shrink storage afterwards;
    /// a failed shrink is skipped and does not affect the removal.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index);
        if self.config.should_shrink(self.items.len(), self.capacity) {
            self.shrink();
        }
        Some(removed)
    }

    /// Iterate over live elements in index order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// The live elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    fn grow(&mut self) -> Result<(), ArrayError> {
        let old = self.capacity;
        let target = self
            .config
            .growth_target(old)
            .ok_or(ArrayError::CapacityOverflow {
                capacity: old,
                factor: self.config.growth_factor,
            })?;
        self.items
            .try_reserve_exact(target - self.items.len())
            .map_err(|_| ArrayError::AllocationFailed { requested: target })?;
        self.capacity = target;
        self.stats.grows += 1;
        debug!(
            old_capacity = old,
            new_capacity = target,
            len = self.items.len(),
            "array grew"
        );
        Ok(())
    }

    fn shrink(&mut self) {
        let old = self.capacity;
        let target = self.config.shrink_target(old).max(self.items.len());
        if target >= old {
            // Already at the floor.
            return;
        }
        match reserve(target) {
            Ok(mut fresh) => {
                fresh.append(&mut self.items);
                self.items = fresh;
                self.capacity = target;
                self.stats.shrinks += 1;
                debug!(
                    old_capacity = old,
                    new_capacity = target,
                    len = self.items.len(),
                    "array shrank"
                );
            }
            Err(e) => {
                self.stats.failed_shrinks += 1;
                warn!(capacity = old, target, error = %e, "shrink skipped");
            }
        }
    }
}

/// Allocate an empty `Vec` with room for exactly `capacity` elements.
fn reserve<T>(capacity: usize) -> Result<Vec<T>, ArrayError> {
    let mut items = Vec::new();
    items
        .try_reserve_exact(capacity)
        .map_err(|_| ArrayError::AllocationFailed {
            requested: capacity,
        })?;
    Ok(items)
}

impl<T: fmt::Debug> fmt::Debug for DynArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynArray")
            .field("items", &self.items)
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl<'a, T> IntoIterator for &'a DynArray<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
