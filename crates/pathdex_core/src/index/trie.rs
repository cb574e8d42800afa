//! Path trie.

use crate::entity::{Handle, HandleSet};
use crate::index::PATH_SEPARATOR;
use std::collections::HashMap;

/// Position of a node inside a [`PathTrie`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The root node. It stands for the entity itself and has no path.
    pub const ROOT: NodeId = NodeId(0);

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Default)]
struct TrieNode {
    /// Segment leading to this node (empty for the root).
    segment: Box<str>,
    /// Parent node (none for the root).
    parent: Option<NodeId>,
    /// Child nodes keyed by segment.
    children: HashMap<Box<str>, NodeId>,
    /// Stringified value to holders.
    leaves: HashMap<Box<str>, HandleSet>,
}

/// Trie of field paths with value leaves.
///
/// Nodes live in one flat arena and refer to each other by [`NodeId`],
/// so the whole trie is dropped as a single collection. A node is
/// reachable only through the exact segment sequence that created it.
///
/// A [`NodeId`] this trie did not hand out is treated as not found.
///
/// # Example
///
/// ```
/// use pathdex_core::{Handle, PathTrie};
///
/// let mut trie = PathTrie::new();
/// trie.insert(&["meta", "region"], "AMISH", Handle::new(0));
///
/// let node = trie.lookup_path("meta.region").unwrap();
/// assert_eq!(trie.count_matching(node, &["AMISH".to_string()]), 1);
/// assert!(trie.lookup_path("meta.facility").is_none());
/// ```
#[derive(Debug)]
pub struct PathTrie {
    nodes: Vec<TrieNode>,
}

impl PathTrie {
    /// Creates a trie holding only the root.
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
        }
    }

    /// Returns the child of `node` for `segment`, if present.
    pub fn child(&self, node: NodeId, segment: &str) -> Option<NodeId> {
        self.node(node)?.children.get(segment).copied()
    }

    /// Returns the child of `node` for `segment`, creating it if missing.
    ///
    /// Returns `None` if `node` is not part of this trie.
    pub fn child_or_insert(&mut self, node: NodeId, segment: &str) -> Option<NodeId> {
        // Node count is bounded by distinct paths, far below u32::MAX
        let next = NodeId(self.nodes.len() as u32);
        let children = &mut self.nodes.get_mut(node.index())?.children;
        if let Some(&existing) = children.get(segment) {
            return Some(existing);
        }

        children.insert(segment.into(), next);
        self.nodes.push(TrieNode {
            segment: segment.into(),
            parent: Some(node),
            ..TrieNode::default()
        });
        Some(next)
    }

    /// Adds `handle` to the holders of `value` at `node`.
    ///
    /// Returns false if the handle was already recorded there, or if
    /// `node` is not part of this trie.
    pub fn add_match(&mut self, node: NodeId, value: &str, handle: Handle) -> bool {
        let Some(entry) = self.nodes.get_mut(node.index()) else {
            return false;
        };
        let leaves = &mut entry.leaves;
        match leaves.get_mut(value) {
            Some(holders) => holders.insert(handle),
            None => {
                let mut holders = HandleSet::new();
                holders.insert(handle);
                leaves.insert(value.into(), holders);
                true
            }
        }
    }

    /// Inserts `(path, value, handle)`, creating missing nodes.
    ///
    /// Inserting the same triple twice leaves the trie unchanged.
    pub fn insert(&mut self, path: &[&str], value: &str, handle: Handle) -> NodeId {
        let mut node = NodeId::ROOT;
        for segment in path {
            match self.child_or_insert(node, segment) {
                Some(child) => node = child,
                // descent starts at this trie's root, every step is known
                None => break,
            }
        }
        self.add_match(node, value, handle);
        node
    }

    /// Descends by exact segment match.
    pub fn lookup(&self, path: &[&str]) -> Option<NodeId> {
        path.iter()
            .try_fold(NodeId::ROOT, |node, segment| self.child(node, segment))
    }

    /// Descends along a dotted path.
    pub fn lookup_path(&self, path: &str) -> Option<NodeId> {
        path.split(PATH_SEPARATOR)
            .try_fold(NodeId::ROOT, |node, segment| self.child(node, segment))
    }

    /// Returns the holders of one value at `node`.
    pub fn leaf(&self, node: NodeId, value: &str) -> Option<&HandleSet> {
        self.node(node)?.leaves.get(value)
    }

    /// Sums the holder counts of every accepted value at `node`.
    ///
    /// An upper bound on the size of [`values_matching`](Self::values_matching),
    /// computed without touching any handle.
    pub fn count_matching<S: AsRef<str>>(&self, node: NodeId, accepted: &[S]) -> usize {
        accepted
            .iter()
            .filter_map(|v| self.leaf(node, v.as_ref()))
            .map(HandleSet::len)
            .sum()
    }

    /// Adds the holders of every accepted value at `node` into `out`.
    pub fn values_matching<S: AsRef<str>>(&self, node: NodeId, accepted: &[S], out: &mut HandleSet) {
        for holders in accepted.iter().filter_map(|v| self.leaf(node, v.as_ref())) {
            out.extend(holders.iter().copied());
        }
    }

    /// Iterates the value leaves of `node`.
    pub fn values(&self, node: NodeId) -> impl Iterator<Item = (&str, &HandleSet)> + '_ {
        self.node(node)
            .into_iter()
            .flat_map(|entry| entry.leaves.iter())
            .map(|(v, holders)| (v.as_ref(), holders))
    }

    /// Returns true if `node` has at least one value leaf.
    pub fn has_values(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|entry| !entry.leaves.is_empty())
    }

    /// Rebuilds the dotted path of `node`.
    ///
    /// Empty for the root and for nodes of another trie.
    pub fn path_of(&self, node: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = node;
        while let Some(entry) = self.node(current) {
            let Some(parent) = entry.parent else {
                break;
            };
            segments.push(&*entry.segment);
            current = parent;
        }
        segments.reverse();
        segments.join(".")
    }

    /// Returns every node holding values with its dotted path, sorted by path.
    pub fn leaf_paths(&self) -> Vec<(String, NodeId)> {
        let mut paths: Vec<(String, NodeId)> = (0..self.nodes.len())
            .map(|i| NodeId(i as u32))
            .filter(|&id| self.has_values(id))
            .map(|id| (self.path_of(id), id))
            .collect();
        paths.sort();
        paths
    }

    /// Returns the number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, node: NodeId) -> Option<&TrieNode> {
        self.nodes.get(node.index())
    }
}

impl Default for PathTrie {
    fn default() -> Self {
        Self::new()
    }
}
