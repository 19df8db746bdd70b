//! Labeled edges of the suffix tree.
//!
//! A label never owns text: it is a span into a document the tree already
//! holds, so splitting an edge only moves offsets around.

use std::rc::Rc;

use crate::{IndexType, NodeID};

/// This structure represents a slice into a shared document buffer backed by `Rc<[char]>`.
#[derive(Debug, Clone)]
struct MappedSubstring {
    data: Rc<[char]>,
    start: IndexType,
    end: IndexType,
}

impl MappedSubstring {
    fn new(data: Rc<[char]>, start: IndexType, end: IndexType) -> Self {
        assert!(
            start <= end && end as usize <= data.len(),
            "Span {}..{} out of bounds for a document of {} code points",
            start,
            end,
            data.len()
        );
        Self { data, start, end }
    }

    fn len(&self) -> IndexType {
        self.end - self.start
    }

    fn as_slice(&self) -> &[char] {
        &self.data[self.start as usize..self.end as usize]
    }
}

/// A directed edge: a label spanning part of an indexed document, and the
/// node reached by following it.
#[derive(Debug, Clone)]
pub struct Edge {
    label: MappedSubstring,
    dest: NodeID,
}

impl Edge {
    pub(crate) fn new(data: Rc<[char]>, start: IndexType, end: IndexType, dest: NodeID) -> Self {
        Self {
            label: MappedSubstring::new(data, start, end),
            dest,
        }
    }

    /// Number of code points in the label.
    pub fn len(&self) -> usize {
        self.label.len() as usize
    }

    /// Always false for edges of a built tree.
    pub fn is_empty(&self) -> bool {
        self.label.len() == 0
    }

    /// The code point at `index` within the label.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn code_point_at(&self, index: usize) -> char {
        self.label.as_slice()[index]
    }

    /// The label as code points, borrowed from the underlying document.
    pub fn as_slice(&self) -> &[char] {
        self.label.as_slice()
    }

    /// The label copied into a `String`.
    pub fn label(&self) -> String {
        self.as_slice().iter().collect()
    }

    /// Tests whether `len` code points of the label starting at `offset` equal
    /// `other[other_offset..other_offset + len]`. A region reaching past the
    /// end of either side never matches.
    pub fn region_matches(
        &self,
        offset: usize,
        other: &[char],
        other_offset: usize,
        len: usize,
    ) -> bool {
        let ours = offset
            .checked_add(len)
            .and_then(|end| self.as_slice().get(offset..end));
        let theirs = other_offset
            .checked_add(len)
            .and_then(|end| other.get(other_offset..end));
        match (ours, theirs) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Tests whether the label begins with `prefix`.
    pub fn starts_with(&self, prefix: &[char]) -> bool {
        self.as_slice().starts_with(prefix)
    }

    pub(crate) fn dest(&self) -> NodeID {
        self.dest
    }

    pub(crate) fn set_dest(&mut self, dest: NodeID) {
        self.dest = dest;
    }

    /// Re-points the label at `data[start..end]` without copying.
    pub(crate) fn set_label(&mut self, data: Rc<[char]>, start: IndexType, end: IndexType) {
        self.label = MappedSubstring::new(data, start, end);
    }

    /// Drops the first `count` code points of the label.
    pub(crate) fn shrink_front(&mut self, count: IndexType) {
        assert!(count < self.label.len(), "Cannot shrink an edge label to nothing");
        self.label.start += count;
    }
}
