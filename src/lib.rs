//! A Generalized Suffix Tree implementation using Ukkonen's algorithm, indexing
//! Unicode documents by id.
//!
//! Every document is split into code points and inserted with an id. The tree
//! then answers which documents contain a given substring, and which strings
//! are the longest ones shared by all documents.
//!
//! ```
//! use generalized_suffix_index::GeneralizedSuffixTree;
//!
//! let mut tree = GeneralizedSuffixTree::new();
//! tree.insert("tablett", 0).unwrap();
//! tree.insert("fleischtablett", 1).unwrap();
//! tree.insert("grünen", 2).unwrap();
//!
//! assert!(tree.search("blet").contains(&1));
//! assert_eq!(tree.search("ün").len(), 1);
//! assert!(tree.search("tablets").is_empty());
//! ```
//!
//! Node arrays are kept as small as possible: a large corpus yields millions
//! of nodes, each with only a few edges and ids.

mod compact;
mod edge;
mod edge_map;
pub mod error;
mod node;
pub mod text;
mod tree;

use std::collections::BTreeSet;

pub use edge::Edge;
pub use error::{Result, TreeError};
pub use node::Limit;
pub use tree::{GeneralizedSuffixTree, NodeRef};

/// Caller-supplied document identifier.
pub type DocId = u32;

type NodeID = u32;
type IndexType = u32;

// Special nodes.
const ROOT: NodeID = 0;
const INVALID: NodeID = NodeID::MAX;

/// Longest substrings common to all of `sequences`, found by indexing them
/// under ids `0..n`.
///
/// A single sequence is its own longest common substring; an empty slice
/// yields an empty set.
///
/// ```
/// use generalized_suffix_index::longest_common_substrings;
/// let found = longest_common_substrings(&["abcdefg", "xxcdeyy", "cdez"]).unwrap();
/// assert_eq!(found.into_iter().collect::<Vec<_>>(), vec!["cde".to_string()]);
/// ```
///
/// # Errors
///
/// Fails with [`TreeError::DocumentTooLong`] if a sequence cannot be indexed.
pub fn longest_common_substrings<S: AsRef<str>>(sequences: &[S]) -> Result<BTreeSet<String>> {
    let mut tree = GeneralizedSuffixTree::new();
    for (id, sequence) in (0..).zip(sequences) {
        tree.insert(sequence.as_ref(), id)?;
    }
    Ok(tree.longest_common_substring())
}
