//! Brute-force reference evaluator.
//!
//! Scans every document for every query with no index at all. Slow and
//! obviously correct; used to cross-check the real evaluator.

use pathdex_codec::{render_scalar, to_document, Value};
use pathdex_core::{CompoundQuery, Query, SearchFilter};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

type Fields = BTreeMap<String, BTreeSet<String>>;

/// Everything one document says about itself.
#[derive(Debug, Clone, Default)]
struct Flat {
    /// Path to rendered values, across the whole document.
    fields: Fields,
    /// Every nested object occurrence with its path.
    occurrences: Vec<(String, Fields)>,
}

/// A linear-scan matcher over a list of documents.
///
/// Positions in the list play the role of handles.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    documents: Vec<Flat>,
}

impl ReferenceIndex {
    /// Creates an empty reference index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a reference index from serializable entities.
    ///
    /// # Panics
    ///
    /// Panics if an entity cannot be encoded.
    pub fn of<T: Serialize>(entities: &[T]) -> Self {
        let mut index = Self::new();
        for entity in entities {
            index.push(&to_document(entity).expect("Failed to encode entity"));
        }
        index
    }

    /// Appends a document.
    pub fn push(&mut self, document: &Value) {
        let mut flat = Flat::default();
        collect(document, "", false, &mut flat, &mut Vec::new());
        self.documents.push(flat);
    }

    /// Returns the number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if no document was added.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Returns the positions of every matching document, ascending.
    pub fn evaluate(&self, query: &Query) -> Vec<usize> {
        self.documents
            .iter()
            .enumerate()
            .filter(|(_, doc)| query.clauses.iter().any(|c| clause_matches(doc, c)))
            .map(|(i, _)| i)
            .collect()
    }
}

fn collect(value: &Value, path: &str, nested: bool, flat: &mut Flat, open: &mut Vec<Fields>) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for item in items {
                collect(item, path, nested, flat, open);
            }
        }
        Value::Map(pairs) => {
            if nested {
                open.push(Fields::new());
            }
            for (name, child) in pairs {
                let child_path = if path.is_empty() {
                    name.clone()
                } else {
                    format!("{path}.{name}")
                };
                collect(child, &child_path, true, flat, open);
            }
            if nested {
                if let Some(fields) = open.pop() {
                    if !fields.is_empty() {
                        flat.occurrences.push((path.to_string(), fields));
                    }
                }
            }
        }
        scalar => {
            if path.is_empty() {
                return;
            }
            if let Some(text) = render_scalar(scalar) {
                flat.fields
                    .entry(path.to_string())
                    .or_default()
                    .insert(text.clone());
                for fields in open.iter_mut() {
                    fields.entry(path.to_string()).or_default().insert(text.clone());
                }
            }
        }
    }
}

fn holds(fields: &Fields, filter: &SearchFilter) -> bool {
    fields
        .get(&filter.field)
        .is_some_and(|have| filter.values.iter().any(|v| have.contains(v)))
}

/// Whether the document satisfies every filter of one nested group.
fn group_holds(doc: &Flat, prefix: &str, filters: &[&SearchFilter]) -> bool {
    doc.occurrences
        .iter()
        .filter(|(path, _)| path == prefix)
        .any(|(_, fields)| filters.iter().all(|f| holds(fields, f)))
}

/// Splits filters into ungrouped ones and groups keyed by prefix.
fn partition(filters: &[SearchFilter]) -> (Vec<&SearchFilter>, BTreeMap<&str, Vec<&SearchFilter>>) {
    let mut plain = Vec::new();
    let mut grouped: BTreeMap<&str, Vec<&SearchFilter>> = BTreeMap::new();
    for filter in filters {
        match filter.nested_prefix.as_deref() {
            Some(prefix) => grouped.entry(prefix).or_default().push(filter),
            None => plain.push(filter),
        }
    }
    (plain, grouped)
}

fn clause_matches(doc: &Flat, clause: &CompoundQuery) -> bool {
    if clause.must.is_empty() {
        return false;
    }

    let (plain, grouped) = partition(&clause.must);
    let required = plain.iter().all(|f| holds(&doc.fields, f))
        && grouped
            .iter()
            .all(|(prefix, filters)| group_holds(doc, prefix, filters));
    if !required {
        return false;
    }

    let (plain, grouped) = partition(&clause.must_not);
    let excluded = plain.iter().any(|f| holds(&doc.fields, f))
        || grouped
            .iter()
            .any(|(prefix, filters)| group_holds(doc, prefix, filters));
    !excluded
}
