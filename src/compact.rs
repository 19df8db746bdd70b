//! Exact-growth vector backing every per-node array.
//!
//! A corpus of a few megabytes produces millions of nodes, each holding a
//! handful of edges and document ids. At that scale the capacity word of a
//! `Vec` and its geometric over-allocation dominate the footprint, so the
//! arrays here keep a 32-bit length/capacity header and grow one slot at a
//! time.

use std::fmt;
use std::ops::{Deref, DerefMut};

use mediumvec::Vec32;

pub(crate) struct CompactVec<T> {
    inner: Vec32<T>,
}

impl<T> CompactVec<T> {
    pub(crate) fn new() -> Self {
        Self { inner: Vec32::new() }
    }

    /// Appends `value`, reallocating the buffer to exactly `len + 1` slots.
    pub(crate) fn push_exact(&mut self, value: T) {
        let mut grown = std::mem::replace(&mut self.inner, Vec32::new()).into_vec();
        grown.reserve_exact(1);
        grown.push(value);
        self.inner = Vec32::from_vec(grown);
    }
}

impl<T> Default for CompactVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for CompactVec<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.inner
    }
}

impl<T> DerefMut for CompactVec<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.inner
    }
}

impl<T: fmt::Debug> fmt::Debug for CompactVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
