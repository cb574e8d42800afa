//! Index structures for path/value lookup.
//!
//! An indexed document is reduced to two structures:
//!
//! - [`PathTrie`]: one node per distinct field path, each node mapping a
//!   stringified scalar to the handles that hold it at that path
//! - [`NestedGroups`]: per nested-object path, one snapshot per distinct
//!   occurrence, so that several conditions can be required to hold
//!   within the same occurrence
//!
//! Both are written only by the flattener and read only by the query
//! evaluator.

mod flatten;
mod groups;
mod trie;

pub(crate) use flatten::flatten;
pub use groups::{InstanceSnapshot, NestedGroups};
pub use trie::{NodeId, PathTrie};

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '.';

/// Splits a dotted path into its segments.
pub fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split(PATH_SEPARATOR)
}
