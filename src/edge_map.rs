//! Character-keyed edge storage for a single node.
//!
//! One instance exists per node, so this trades a little lookup work for
//! the smallest footprint possible: two parallel arrays sized exactly to
//! their contents. Up to `BSEARCH_THRESHOLD` entries stay in insertion order
//! and are scanned linearly; past it both arrays are kept sorted by key and
//! searched with a binary search.

use crate::compact::CompactVec;
use crate::edge::Edge;

const BSEARCH_THRESHOLD: usize = 6;

#[derive(Debug, Default)]
pub(crate) struct EdgeMap {
    keys: CompactVec<char>,
    edges: CompactVec<Edge>,
}

impl EdgeMap {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts or replaces the edge for `key`, returning the previous one.
    pub(crate) fn put(&mut self, key: char, edge: Edge) -> Option<Edge> {
        if let Some(idx) = self.search(key) {
            return Some(std::mem::replace(&mut self.edges[idx], edge));
        }
        self.keys.push_exact(key);
        self.edges.push_exact(edge);
        if self.keys.len() > BSEARCH_THRESHOLD {
            self.sort_arrays();
        }
        None
    }

    pub(crate) fn get(&self, key: char) -> Option<&Edge> {
        self.search(key).map(|idx| &self.edges[idx])
    }

    pub(crate) fn get_mut(&mut self, key: char) -> Option<&mut Edge> {
        self.search(key).map(move |idx| &mut self.edges[idx])
    }

    /// All current edges, in no particular order.
    pub(crate) fn values(&self) -> std::slice::Iter<'_, Edge> {
        self.edges.iter()
    }

    fn search(&self, key: char) -> Option<usize> {
        if self.keys.len() > BSEARCH_THRESHOLD {
            self.keys.binary_search(&key).ok()
        } else {
            self.keys.iter().position(|&k| k == key)
        }
    }

    /// Insertion sort over both arrays. Only the freshly appended entry can
    /// be out of place, except on the insertion that crosses the threshold.
    fn sort_arrays(&mut self) {
        for i in 1..self.keys.len() {
            let mut j = i;
            while j > 0 && self.keys[j - 1] > self.keys[j] {
                self.keys.swap(j - 1, j);
                self.edges.swap(j - 1, j);
                j -= 1;
            }
        }
    }
}
