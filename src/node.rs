//! Vertices of the suffix tree.

use crate::compact::CompactVec;
use crate::edge::Edge;
use crate::edge_map::EdgeMap;
use crate::{DocId, NodeID, INVALID};

const UNCOUNTED: u32 = u32::MAX;

/// Bound on how many distinct ids a collection walk gathers.
///
/// The bound only caps the work done; which ids make it into a limited
/// result is unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// Gather every reachable id.
    All,
    /// Stop as soon as this many distinct ids have been gathered.
    AtMost(usize),
}

impl Limit {
    pub(crate) fn is_reached(self, found: usize) -> bool {
        match self {
            Limit::All => false,
            Limit::AtMost(max) => found >= max,
        }
    }
}

/// This is a node in the tree. `edges` holds the outgoing edges keyed by
/// the first code point of their label.
/// `suffix_link` contains the suffix link of this node (a term used in the
/// context of Ukkonen's algorithm); it is an index into the same arena and
/// never implies ownership.
/// `ids` lists the documents attached directly to this node. Ids only ever
/// arrive in non-decreasing order, so appending keeps the list sorted and
/// membership is a binary search.
#[derive(Debug)]
pub(crate) struct Node {
    edges: EdgeMap,

    suffix_link: NodeID,

    ids: CompactVec<DocId>,

    /// Distinct ids reachable from this node, as of the last recount.
    count: u32,
}

impl Node {
    pub(crate) fn new() -> Self {
        Self {
            edges: EdgeMap::new(),
            suffix_link: INVALID,
            ids: CompactVec::new(),
            count: UNCOUNTED,
        }
    }

    pub(crate) fn edge(&self, ch: char) -> Option<&Edge> {
        self.edges.get(ch)
    }

    pub(crate) fn edge_mut(&mut self, ch: char) -> Option<&mut Edge> {
        self.edges.get_mut(ch)
    }

    /// Inserts or replaces the edge starting with `ch`.
    pub(crate) fn add_edge(&mut self, ch: char, edge: Edge) -> Option<Edge> {
        self.edges.put(ch, edge)
    }

    pub(crate) fn edges(&self) -> &EdgeMap {
        &self.edges
    }

    pub(crate) fn ids(&self) -> &[DocId] {
        &self.ids
    }

    pub(crate) fn contains(&self, id: DocId) -> bool {
        self.ids.binary_search(&id).is_ok()
    }

    /// Attaches `id` to this node only. Returns `false` if it was already
    /// there, which tells the caller to stop propagating along suffix links.
    pub(crate) fn push_ref(&mut self, id: DocId) -> bool {
        if self.contains(id) {
            return false;
        }
        debug_assert!(
            self.ids.last().map_or(true, |&last| last < id),
            "Document ids must arrive in non-decreasing order"
        );
        self.ids.push_exact(id);
        true
    }

    pub(crate) fn suffix_link(&self) -> Option<NodeID> {
        (self.suffix_link != INVALID).then_some(self.suffix_link)
    }

    pub(crate) fn set_suffix_link(&mut self, node: NodeID) {
        assert!(node != INVALID, "Invalid suffix link");
        self.suffix_link = node;
    }

    pub(crate) fn cached_count(&self) -> Option<usize> {
        (self.count != UNCOUNTED).then_some(self.count as usize)
    }

    pub(crate) fn set_count(&mut self, count: usize) {
        self.count = u32::try_from(count).expect("Distinct id count exceeds u32");
    }
}
