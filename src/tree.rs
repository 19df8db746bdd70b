//! The tree engine: construction and every query over the node arena.

use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use log::{debug, trace};
use rustc_hash::FxHashSet;

use crate::edge::Edge;
use crate::error::{Result, TreeError};
use crate::node::{Limit, Node};
use crate::{DocId, IndexType, NodeID, INVALID, ROOT};

/// A data structure used to store the current state during the Ukkonen's algorithm.
#[derive(Debug, Clone, Copy)]
struct ReferencePoint {
    /// The active node.
    node: NodeID,

    /// The active point index into the current document. The active string
    /// runs from here to the end of the current phase.
    index: usize,
}

impl ReferencePoint {
    const fn new(node: NodeID, index: usize) -> Self {
        Self { node, index }
    }
}

/// Per-insertion state.
struct Insertion {
    doc: Rc<[char]>,
    id: DocId,

    /// The last leaf created or reached. Consecutive leaves are chained with
    /// suffix links so that attaching an id to one marks every later suffix.
    active_leaf: NodeID,
}

/// This is the generalized suffix tree, implemented using Ukkonen's Algorithm.
///
/// Instead of appending a unique terminator to every document, each node
/// records the ids of the documents whose suffixes pass through it. A
/// substring search walks down from the root and collects the ids below the
/// point where the query ends.
///
/// Document ids must be inserted in non-decreasing order; the same id may be
/// used for several consecutive insertions.
///
/// # Examples
///
/// ```
/// use generalized_suffix_index::GeneralizedSuffixTree;
/// let mut tree = GeneralizedSuffixTree::new();
/// tree.insert("banana", 0).unwrap();
/// tree.insert("bano", 1).unwrap();
/// tree.insert("ba", 2).unwrap();
/// assert_eq!(tree.search("ban").into_iter().collect::<Vec<_>>(), vec![0, 1]);
/// assert_eq!(tree.search_limited("ba", 2).len(), 2);
/// ```
#[derive(Debug)]
pub struct GeneralizedSuffixTree {
    node_storage: Vec<Node>,
    document_count: usize,
    last_id: Option<DocId>,

    /// Set by `compute_count`, cleared by every insertion.
    counts_fresh: bool,
}

impl Default for GeneralizedSuffixTree {
    fn default() -> Self {
        Self::with_capacity(1)
    }
}

impl GeneralizedSuffixTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty tree whose node arena can hold `nodes` nodes
    /// (the root included) before reallocating.
    #[must_use]
    pub fn with_capacity(nodes: usize) -> Self {
        let mut node_storage = Vec::with_capacity(nodes.max(1));
        node_storage.push(Node::new());
        Self {
            node_storage,
            document_count: 0,
            last_id: None,
            counts_fresh: false,
        }
    }

    /// Indexes every suffix of `text` under `id`.
    ///
    /// Inserting again under the previous id adds the new text to the same
    /// document. Nothing is modified when an error is returned.
    ///
    /// # Errors
    ///
    /// [`TreeError::OutOfOrderId`] if `id` is lower than the previous id, and
    /// [`TreeError::DocumentTooLong`] if `text` has `u32::MAX` code points or more.
    pub fn insert(&mut self, text: &str, id: DocId) -> Result<()> {
        if let Some(last) = self.last_id {
            if id < last {
                return Err(TreeError::OutOfOrderId { id, last });
            }
        }
        let doc: Rc<[char]> = text.chars().collect();
        if doc.len() >= IndexType::MAX as usize {
            return Err(TreeError::DocumentTooLong(doc.len()));
        }

        if self.last_id != Some(id) {
            self.document_count += 1;
        }
        self.last_id = Some(id);
        self.counts_fresh = false;

        let before = self.node_storage.len();
        let len = doc.len();
        self.process_suffixes(Insertion {
            doc,
            id,
            active_leaf: ROOT,
        });
        debug!(
            "Inserted document {}: {} code points, {} new nodes",
            id,
            len,
            self.node_storage.len() - before
        );
        Ok(())
    }

    fn process_suffixes(&mut self, mut ins: Insertion) {
        let mut active_point = ReferencePoint::new(ROOT, 0);
        for i in 0..ins.doc.len() {
            active_point = self.update(&mut ins, active_point, i);
            active_point = self.canonize(&ins.doc, active_point.node, active_point.index, i + 1);
        }

        let leaf = ins.active_leaf;
        if leaf != ROOT
            && leaf != active_point.node
            && self.get_node(leaf).suffix_link().is_none()
        {
            self.get_node_mut(leaf).set_suffix_link(active_point.node);
        }
    }

    /// One phase: extends every suffix that does not yet end with `doc[i]`.
    fn update(
        &mut self,
        ins: &mut Insertion,
        active_point: ReferencePoint,
        i: usize,
    ) -> ReferencePoint {
        let end = i + 1;
        let ch = ins.doc[i];
        // The active string without its last character.
        let cut = |start: usize| if start < end { end - 1 } else { end };

        let mut node = active_point.node;
        let mut start = active_point.index;
        let mut oldr = ROOT;

        let (mut is_endpoint, mut r) = self.test_and_split(ins, node, start, i, ch, i);
        while !is_endpoint {
            let leaf = match self.get_node(r).edge(ch).map(Edge::dest) {
                Some(dest) => dest,
                None => {
                    let leaf = self.create_node();
                    self.add_ref(leaf, ins.id);
                    let doc_end = ins.doc.len() as IndexType;
                    let edge = Edge::new(Rc::clone(&ins.doc), i as IndexType, doc_end, leaf);
                    self.get_node_mut(r).add_edge(ch, edge);
                    leaf
                }
            };

            if ins.active_leaf != ROOT {
                self.get_node_mut(ins.active_leaf).set_suffix_link(leaf);
            }
            ins.active_leaf = leaf;

            if oldr != ROOT {
                self.get_node_mut(oldr).set_suffix_link(r);
            }
            oldr = r;

            match self.get_node(node).suffix_link() {
                None => {
                    assert!(node == ROOT, "Only the root may lack a suffix link");
                    assert!(start < end, "Active string underflow at the root");
                    start += 1;
                }
                Some(link) => {
                    let point = self.canonize(&ins.doc, link, start, cut(start));
                    node = point.node;
                    start = point.index;
                }
            }

            (is_endpoint, r) = self.test_and_split(ins, node, start, cut(start), ch, i);
        }

        if oldr != ROOT {
            self.get_node_mut(oldr).set_suffix_link(r);
        }
        ReferencePoint::new(node, start)
    }

    /// Tests whether `doc[start..end]` followed by `ch` is already spelled
    /// below `node`, splitting the edge the span ends in when it is not.
    ///
    /// Returns whether the end point was reached, and the node that a new
    /// leaf edge has to hang from otherwise.
    fn test_and_split(
        &mut self,
        ins: &Insertion,
        node: NodeID,
        start: usize,
        end: usize,
        ch: char,
        i: usize,
    ) -> (bool, NodeID) {
        let point = self.canonize(&ins.doc, node, start, end);
        let node = point.node;

        if point.index < end {
            let key = ins.doc[point.index];
            let matched = end - point.index;
            let edge = self.get_node(node).edge(key).expect("Active edge must exist");
            if edge.len() > matched && edge.code_point_at(matched) == ch {
                return (true, node);
            }
            let inner = self.split_edge(node, key, &ins.doc, point.index, end);
            return (false, inner);
        }

        let Some(edge) = self.get_node(node).edge(ch) else {
            return (false, node);
        };
        let rest = &ins.doc[i..];
        let label_len = edge.len();
        let dest = edge.dest();
        let label_in_rest = label_len <= rest.len() && edge.region_matches(0, rest, 0, label_len);
        let rest_in_label = rest.len() < label_len && edge.starts_with(rest);

        if label_in_rest && label_len == rest.len() {
            // The remaining text is this edge exactly.
            self.add_ref(dest, ins.id);
            (true, node)
        } else if rest_in_label {
            let inner = self.split_edge(node, ch, &ins.doc, i, ins.doc.len());
            self.add_ref(inner, ins.id);
            (false, node)
        } else {
            (true, node)
        }
    }

    /// Interposes a new node on the edge of `parent` keyed by `key`, right
    /// after its first `end - start` code points, and re-labels the upper
    /// half with `data[start..end]`.
    fn split_edge(
        &mut self,
        parent: NodeID,
        key: char,
        data: &Rc<[char]>,
        start: usize,
        end: usize,
    ) -> NodeID {
        let at = end - start;
        let inner = self.create_node();

        let mut tail = self.get_node(parent).edge(key).cloned().expect("Edge to split must exist");
        tail.shrink_front(at as IndexType);
        let tail_key = tail.code_point_at(0);
        trace!(
            "Splitting edge {:?} of node {} after {} code points into node {}",
            key,
            parent,
            at,
            inner
        );
        self.get_node_mut(inner).add_edge(tail_key, tail);

        let head = self.get_node_mut(parent).edge_mut(key).expect("Edge to split must exist");
        head.set_label(Rc::clone(data), start as IndexType, end as IndexType);
        head.set_dest(inner);
        inner
    }

    /// Walks down from `node` along `doc[start..end]` as long as whole edges
    /// fit in what is left of the span.
    fn canonize(
        &self,
        doc: &[char],
        mut node: NodeID,
        mut start: usize,
        end: usize,
    ) -> ReferencePoint {
        while start < end {
            let Some(edge) = self.get_node(node).edge(doc[start]) else {
                break;
            };
            let len = edge.len();
            if len > end - start || !edge.region_matches(0, doc, start, len) {
                break;
            }
            start += len;
            node = edge.dest();
        }
        ReferencePoint::new(node, start)
    }

    /// Attaches `id` to `node` and to every node along its suffix link chain,
    /// stopping at the first one that already has it.
    fn add_ref(&mut self, node: NodeID, id: DocId) {
        let mut next = Some(node);
        while let Some(current) = next {
            let node = self.get_node_mut(current);
            if !node.push_ref(id) {
                break;
            }
            next = node.suffix_link();
        }
    }

    fn create_node(&mut self) -> NodeID {
        assert!(self.node_storage.len() < INVALID as usize, "Node arena exhausted");
        self.node_storage.push(Node::new());
        (self.node_storage.len() - 1) as NodeID
    }

    /// Returns the ids of every document containing `word`.
    ///
    /// The empty string is not considered a substring of anything.
    #[must_use]
    pub fn search(&self, word: &str) -> BTreeSet<DocId> {
        self.search_with(word, Limit::All)
    }

    /// Like [`search`](Self::search) but stops after `limit` ids. Which of
    /// the matching ids are returned is unspecified.
    #[must_use]
    pub fn search_limited(&self, word: &str, limit: usize) -> BTreeSet<DocId> {
        self.search_with(word, Limit::AtMost(limit))
    }

    fn search_with(&self, word: &str, limit: Limit) -> BTreeSet<DocId> {
        let word: Vec<char> = word.chars().collect();
        match self.search_node(&word) {
            Some(node) => self.collect(node, limit),
            None => BTreeSet::new(),
        }
    }

    /// Checks whether `word` is a substring of any of the indexed documents.
    #[must_use]
    pub fn is_substr(&self, word: &str) -> bool {
        let word: Vec<char> = word.chars().collect();
        self.search_node(&word).is_some()
    }

    /// The node at or below the point where `word` ends.
    fn search_node(&self, word: &[char]) -> Option<NodeID> {
        let mut node = ROOT;
        let mut index = 0;
        while index < word.len() {
            let edge = self.get_node(node).edge(word[index])?;
            let remaining = word.len() - index;
            let matched = remaining.min(edge.len());
            if !edge.region_matches(0, word, index, matched) {
                return None;
            }
            if edge.len() >= remaining {
                return Some(edge.dest());
            }
            node = edge.dest();
            index += matched;
        }
        None
    }

    fn collect(&self, node: NodeID, limit: Limit) -> BTreeSet<DocId> {
        let mut result = BTreeSet::new();
        if limit.is_reached(0) {
            return result;
        }
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let node = self.get_node(current);
            for &id in node.ids() {
                result.insert(id);
                if limit.is_reached(result.len()) {
                    return result;
                }
            }
            stack.extend(node.edges().values().map(Edge::dest));
        }
        result
    }

    /// Every node reachable from the root, parents before children.
    fn preorder(&self) -> Vec<NodeID> {
        let mut order = Vec::with_capacity(self.node_storage.len());
        let mut stack = vec![ROOT];
        while let Some(node) = stack.pop() {
            order.push(node);
            stack.extend(self.get_node(node).edges().values().map(Edge::dest));
        }
        order
    }

    /// Number of distinct ids reachable from each node, indexed by node.
    /// Each node starts from its largest child's set and folds the other
    /// children into it.
    fn distinct_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.node_storage.len()];
        let mut sets: Vec<Option<FxHashSet<DocId>>> = vec![None; self.node_storage.len()];

        for &node in self.preorder().iter().rev() {
            let mut children: Vec<FxHashSet<DocId>> = self
                .get_node(node)
                .edges()
                .values()
                .filter_map(|edge| sets[edge.dest() as usize].take())
                .collect();
            let largest = (0..children.len()).max_by_key(|&idx| children[idx].len());
            let mut set = largest.map(|idx| children.swap_remove(idx)).unwrap_or_default();
            for child in children {
                set.extend(child);
            }
            set.extend(self.get_node(node).ids().iter().copied());
            counts[node as usize] = set.len();
            sets[node as usize] = Some(set);
        }
        counts
    }

    /// Recomputes and caches, on every node, the number of distinct document
    /// ids reachable from it. Returns the root's count.
    ///
    /// Has to be called again after any insertion before cached counts can
    /// be read.
    pub fn compute_count(&mut self) -> usize {
        let counts = self.distinct_counts();
        for (node, &count) in self.node_storage.iter_mut().zip(counts.iter()) {
            node.set_count(count);
        }
        self.counts_fresh = true;
        debug!("Computed distinct counts over {} nodes", counts.len());
        counts[ROOT as usize]
    }

    /// The root's cached distinct-id count.
    ///
    /// # Errors
    ///
    /// [`TreeError::CountNotComputed`] unless [`compute_count`](Self::compute_count)
    /// ran after the last insertion.
    pub fn result_count(&self) -> Result<usize> {
        self.root().cached_count()
    }

    /// Returns every longest string that occurs in all registered documents.
    ///
    /// The result is empty when no document is registered, when one of them
    /// is empty, or when they share no code point. With a single document
    /// the result is that document.
    #[must_use]
    pub fn longest_common_substring(&self) -> BTreeSet<String> {
        let mut result = BTreeSet::new();
        if self.document_count == 0 {
            return result;
        }

        let order = self.preorder();
        let mut depth = vec![0usize; self.node_storage.len()];
        let mut incoming: Vec<Option<(NodeID, &Edge)>> = vec![None; self.node_storage.len()];
        for &node in &order {
            for edge in self.get_node(node).edges().values() {
                depth[edge.dest() as usize] = depth[node as usize] + edge.len();
                incoming[edge.dest() as usize] = Some((node, edge));
            }
        }

        let counts = self.distinct_counts();
        let common: Vec<NodeID> = order
            .iter()
            .copied()
            .filter(|&node| {
                counts[node as usize] == self.document_count && depth[node as usize] > 0
            })
            .collect();
        let best = common.iter().map(|&node| depth[node as usize]).max().unwrap_or(0);
        for &node in common.iter().filter(|&&node| depth[node as usize] == best) {
            let mut labels = Vec::new();
            let mut current = node;
            while let Some((parent, edge)) = incoming[current as usize] {
                labels.push(edge.as_slice());
                current = parent;
            }
            result.insert(labels.iter().rev().flat_map(|label| label.iter()).collect::<String>());
        }

        debug!(
            "Longest common substring over {} documents: length {}, {} results",
            self.document_count,
            best,
            result.len()
        );
        result
    }

    /// Number of distinct document ids inserted so far. Consecutive
    /// insertions under the same id count once.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.document_count
    }

    /// Number of nodes in the tree, the root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_storage.len()
    }

    /// A read-only handle on the root, for walking the tree.
    #[must_use]
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef { tree: self, id: ROOT }
    }

    fn get_node(&self, node_id: NodeID) -> &Node {
        &self.node_storage[node_id as usize]
    }

    fn get_node_mut(&mut self, node_id: NodeID) -> &mut Node {
        &mut self.node_storage[node_id as usize]
    }
}

impl fmt::Display for GeneralizedSuffixTree {
    /// One line per edge, indented by depth: the edge label followed by the
    /// ids attached to the node it leads to.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack: Vec<(&Edge, usize)> =
            self.get_node(ROOT).edges().values().rev().map(|e| (e, 0)).collect();
        while let Some((edge, depth)) = stack.pop() {
            let dest = self.get_node(edge.dest());
            writeln!(f, "{:indent$}{} {:?}", "", edge.label(), dest.ids(), indent = depth * 4)?;
            stack.extend(dest.edges().values().rev().map(|e| (e, depth + 1)));
        }
        Ok(())
    }
}

/// A read-only view of one node, obtained from [`GeneralizedSuffixTree::root`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a GeneralizedSuffixTree,
    id: NodeID,
}

impl<'a> NodeRef<'a> {
    /// Position of the node in the tree's arena. The root is at 0.
    #[must_use]
    pub fn index(&self) -> usize {
        self.id as usize
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.id == ROOT
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.tree.get_node(self.id).edges().is_empty()
    }

    /// Ids attached directly to this node, sorted.
    #[must_use]
    pub fn ids(&self) -> &'a [DocId] {
        self.tree.get_node(self.id).ids()
    }

    /// Outgoing edges with the nodes they lead to.
    pub fn edges(&self) -> impl Iterator<Item = (&'a Edge, NodeRef<'a>)> + 'a {
        let tree = self.tree;
        tree.get_node(self.id)
            .edges()
            .values()
            .map(move |edge| (edge, NodeRef { tree, id: edge.dest() }))
    }

    #[must_use]
    pub fn suffix_link(&self) -> Option<NodeRef<'a>> {
        let tree = self.tree;
        tree.get_node(self.id).suffix_link().map(|id| NodeRef { tree, id })
    }

    /// Ids attached to this node or to any node below it.
    #[must_use]
    pub fn collect(&self, limit: Limit) -> BTreeSet<DocId> {
        self.tree.collect(self.id, limit)
    }

    /// The distinct-id count cached by the last
    /// [`compute_count`](GeneralizedSuffixTree::compute_count).
    ///
    /// # Errors
    ///
    /// [`TreeError::CountNotComputed`] if counts were never computed or the
    /// tree changed since.
    pub fn cached_count(&self) -> Result<usize> {
        if !self.tree.counts_fresh {
            return Err(TreeError::CountNotComputed);
        }
        self.tree.get_node(self.id).cached_count().ok_or(TreeError::CountNotComputed)
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("index", &self.id)
            .field("ids", &self.ids())
            .finish()
    }
}
