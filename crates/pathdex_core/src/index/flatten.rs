//! Document flattening.
//!
//! Walks one document depth-first and writes every scalar into the
//! [`PathTrie`] and every nested object occurrence into the
//! [`NestedGroups`]:
//!
//! - A map extends the path by each field name
//! - An array keeps the path of its field, so list elements share it
//! - A scalar is rendered and stored at the current path
//! - Null contributes nothing
//!
//! Any map below the root is an occurrence. Its snapshot holds every
//! scalar emitted while walking it, descendants included, and is recorded
//! under the map's own path once the map is fully walked.

use super::{InstanceSnapshot, NestedGroups, NodeId, PathTrie, PATH_SEPARATOR};
use crate::entity::Handle;
use pathdex_codec::{render_scalar, Value};

/// Counts produced by one flattening pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FlattenOutcome {
    /// Scalars written to the trie.
    pub values: u64,
    /// Non-empty snapshots handed to the grouper.
    pub instances: u64,
}

/// Flattens `document` into `trie` and `groups` on behalf of `handle`.
pub(crate) fn flatten(
    trie: &mut PathTrie,
    groups: &mut NestedGroups,
    handle: Handle,
    document: &Value,
) -> FlattenOutcome {
    let mut walker = Walker {
        trie,
        groups,
        handle,
        path: String::new(),
        open: Vec::new(),
        outcome: FlattenOutcome::default(),
    };
    walker.walk(NodeId::ROOT, document);
    walker.outcome
}

struct Walker<'a> {
    trie: &'a mut PathTrie,
    groups: &'a mut NestedGroups,
    handle: Handle,
    /// Dotted path of the node being walked.
    path: String,
    /// Snapshots of the occurrences enclosing the current position.
    open: Vec<InstanceSnapshot>,
    outcome: FlattenOutcome,
}

impl Walker<'_> {
    fn walk(&mut self, node: NodeId, value: &Value) {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    self.walk(node, item);
                }
            }
            Value::Map(fields) => self.walk_map(node, fields),
            scalar => self.emit(node, scalar),
        }
    }

    fn walk_map(&mut self, node: NodeId, fields: &[(String, Value)]) {
        let occurrence = node != NodeId::ROOT;
        if occurrence {
            self.open.push(InstanceSnapshot::new());
        }

        for (name, value) in fields {
            if value.is_null() {
                continue;
            }
            let mark = self.path.len();
            if mark > 0 {
                self.path.push(PATH_SEPARATOR);
            }
            self.path.push_str(name);

            if let Some(child) = self.trie.child_or_insert(node, name) {
                self.walk(child, value);
            }

            self.path.truncate(mark);
        }

        if occurrence {
            if let Some(snapshot) = self.open.pop() {
                if !snapshot.is_empty() {
                    self.groups.record_instance(&self.path, snapshot, self.handle);
                    self.outcome.instances += 1;
                }
            }
        }
    }

    fn emit(&mut self, node: NodeId, scalar: &Value) {
        // a bare scalar document has no path to live under
        if node == NodeId::ROOT {
            return;
        }
        let Some(text) = render_scalar(scalar) else {
            return;
        };

        self.trie.add_match(node, &text, self.handle);
        self.outcome.values += 1;
        for snapshot in &mut self.open {
            snapshot.insert(&self.path, &text);
        }
    }
}
