// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grow-by-doubling buffer shared by the node arena and query results.

use alloc::collections::TryReserveError;
use alloc::vec::Vec;
use core::ops::{Deref, DerefMut};

/// Smallest capacity a buffer grows to on its first allocation.
const MIN_CAPACITY: usize = 2;

/// A growable sequence whose capacity doubles when it runs out of room.
///
/// Growth can be fallible ([`try_reserve`](Self::try_reserve),
/// [`try_push`](Self::try_push)) so the tree can report allocation failure as a
/// value. [`clear`](Self::clear) keeps the allocation, which is what makes reusing
/// one buffer across frames cheap.
///
/// Query results are appended to a `GrowBuffer`; the tree never clears it for you.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrowBuffer<T> {
    items: Vec<T>,
}

impl<T> Default for GrowBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GrowBuffer<T> {
    /// Create an empty buffer without allocating.
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Create an empty buffer with room for exactly `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Create an empty buffer with room for `capacity` items, reporting allocation failure.
    ///
    /// # Errors
    ///
    /// Returns the allocator's error if the storage cannot be obtained.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let mut items = Vec::new();
        items.try_reserve_exact(capacity)?;
        Ok(Self { items })
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if there are no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items the buffer can hold without growing.
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    /// Make room for `additional` more items.
    ///
    /// When the current capacity is too small the buffer grows to at least double
    /// its capacity. On failure the buffer is left untouched.
    ///
    /// # Errors
    ///
    /// Returns the allocator's error if the larger storage cannot be obtained.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        let len = self.items.len();
        let needed = len.saturating_add(additional);
        let capacity = self.items.capacity();
        if needed <= capacity {
            return Ok(());
        }
        let target = needed
            .max(capacity.saturating_mul(2))
            .max(MIN_CAPACITY);
        self.items.try_reserve_exact(target - len)
    }

    /// Append `value`, reporting allocation failure instead of aborting.
    ///
    /// # Errors
    ///
    /// Returns the allocator's error if the buffer was full and could not grow;
    /// `value` is dropped in that case.
    pub fn try_push(&mut self, value: T) -> Result<(), TryReserveError> {
        self.try_reserve(1)?;
        self.items.push(value);
        Ok(())
    }

    /// Append `value`, doubling the capacity if the buffer is full.
    pub fn push(&mut self, value: T) {
        let capacity = self.items.capacity();
        if self.items.len() == capacity {
            self.items.reserve_exact(capacity.max(MIN_CAPACITY));
        }
        self.items.push(value);
    }

    /// Remove and return the last item.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Remove every item, keeping the allocation.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Keep the first `len` items and drop the rest, keeping the allocation.
    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    /// The items as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// The items as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    /// Empty the buffer and re-type it.
    ///
    /// Keeping the allocation is best-effort: when `U` has the same size and
    /// alignment as `T` the standard library usually collects in place, but that is
    /// not guaranteed, and the result may start with no capacity.
    ///
    /// This is how a buffer of `&'a E` becomes a buffer of `&'b E` for the next frame.
    #[must_use]
    pub fn recycle<U>(self) -> GrowBuffer<U> {
        let mut items = self.items;
        items.clear();
        GrowBuffer {
            items: items.into_iter().filter_map(|_| None).collect(),
        }
    }
}

impl<T> Deref for GrowBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> DerefMut for GrowBuffer<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.items
    }
}

impl<T> Extend<T> for GrowBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> FromIterator<T> for GrowBuffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut out = Self::new();
        out.extend(iter);
        out
    }
}

impl<T> IntoIterator for GrowBuffer<T> {
    type Item = T;
    type IntoIter = alloc::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a GrowBuffer<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> From<Vec<T>> for GrowBuffer<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T> From<GrowBuffer<T>> for Vec<T> {
    fn from(buffer: GrowBuffer<T>) -> Self {
        buffer.items
    }
}
