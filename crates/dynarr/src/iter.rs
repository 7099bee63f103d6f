//! Index-order iteration over live elements.

use std::iter::FusedIterator;

use crate::array::DynArray;

/// Borrowing iterator over a [`DynArray`], yielding `get(0)..get(len)`.
///
/// Created by [`DynArray::iter`]. Each call to `iter()` starts again from
/// index 0 and sees the array as it is at that moment.
#[derive(Debug)]
pub struct Iter<'a, T> {
    array: &'a DynArray<T>,
    index: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(array: &'a DynArray<T>) -> Self {
        Self { array, index: 0 }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            array: self.array,
            index: self.index,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let item = self.array.get(self.index)?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.array.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
