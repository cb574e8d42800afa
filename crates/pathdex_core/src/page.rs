//! Single-type index.

use crate::config::IndexConfig;
use crate::entity::{EntityArena, EntityKey, Handle, HandleSet, Indexable};
use crate::error::{CoreError, CoreResult};
use crate::index::{flatten, NestedGroups, PathTrie};
use crate::query::{Evaluator, Query, SetPool};
use crate::stats::IndexStats;
use parking_lot::Mutex;
use pathdex_codec::{DocumentEncoder, Value};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Resolved per-entity view: handle to path to sorted values.
pub type FieldRows = BTreeMap<Handle, BTreeMap<String, Vec<String>>>;

/// Index over entities of one type.
///
/// Indexing takes `&mut self`; searching takes `&self` and may run on
/// several threads at once once indexing is done. Callers that mix both
/// must serialize them, for instance through [`Database`](crate::Database).
///
/// Re-indexing an entity under a known key keeps its handle and replaces
/// the stored entity. Field values already recorded for it stay in the
/// index, so a changed entity can still match its old values.
///
/// # Example
///
/// ```
/// use pathdex_core::{CompoundQuery, EntityKey, Indexable, PageIndex, Query, SearchFilter};
///
/// #[derive(serde::Serialize)]
/// struct Item {
///     id: u32,
///     color: String,
/// }
///
/// impl Indexable for Item {
///     fn entity_key(&self) -> EntityKey {
///         self.id.into()
///     }
/// }
///
/// let mut index = PageIndex::new();
/// index.index(Item { id: 1, color: "red".into() }).unwrap();
/// index.index(Item { id: 2, color: "blue".into() }).unwrap();
///
/// let query = Query::from(CompoundQuery::new().must(SearchFilter::new("color", ["red"])));
/// let found = index.search(&query).unwrap();
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].id, 1);
/// ```
#[derive(Debug)]
pub struct PageIndex<T> {
    config: IndexConfig,
    arena: EntityArena<T>,
    trie: PathTrie,
    groups: NestedGroups,
    pool: Mutex<SetPool>,
    encoder: DocumentEncoder,
    stats: IndexStats,
}

impl<T> PageIndex<T> {
    /// Creates an empty index with default configuration.
    pub fn new() -> Self {
        Self::with_config(IndexConfig::default())
    }

    /// Creates an empty index.
    pub fn with_config(config: IndexConfig) -> Self {
        let encoder = DocumentEncoder::with_capacity(config.encode_buffer_capacity)
            .naming(config.field_naming);
        Self {
            pool: Mutex::new(SetPool::new(config.max_pooled_sets)),
            encoder,
            config,
            arena: EntityArena::new(),
            trie: PathTrie::new(),
            groups: NestedGroups::new(),
            stats: IndexStats::new(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Returns the statistics.
    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    /// Evaluates a query and returns matching handles.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] if any filter is malformed.
    pub fn search_handles(&self, query: &Query) -> CoreResult<HandleSet> {
        query.validate()?;

        let mut pool = self.pool.lock().detach();
        let handles =
            Evaluator::new(&self.trie, &self.groups, &mut pool, &self.stats).evaluate(query);
        self.pool.lock().reattach(pool);

        self.stats.record_search(query.clauses.len() as u64);
        debug!(
            clauses = query.clauses.len(),
            matches = handles.len(),
            "Search completed"
        );
        Ok(handles)
    }

    /// Evaluates a query and returns matching entities in handle order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] if any filter is malformed.
    pub fn search(&self, query: &Query) -> CoreResult<Vec<&T>> {
        let handles = self.search_handles(query)?;
        Ok(self.resolve_sorted(handles))
    }

    /// Returns entities holding `value` at `field`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] if `field` or `value` is empty.
    pub fn matches(&self, field: &str, value: &str) -> CoreResult<Vec<&T>> {
        if field.is_empty() {
            return Err(CoreError::invalid_input("field is empty"));
        }
        if value.is_empty() {
            return Err(CoreError::invalid_input(format!(
                "value for {field:?} is empty"
            )));
        }

        let holders = self
            .trie
            .lookup_path(field)
            .and_then(|node| self.trie.leaf(node, value))
            .cloned()
            .unwrap_or_default();
        Ok(self.resolve_sorted(holders))
    }

    fn resolve_sorted(&self, handles: HandleSet) -> Vec<&T> {
        let mut handles: Vec<Handle> = handles.into_iter().collect();
        handles.sort_unstable();
        handles
            .into_iter()
            .filter_map(|handle| self.arena.resolve(handle))
            .collect()
    }

    /// Returns the entity behind a handle.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.arena.resolve(handle)
    }

    /// Returns the handle assigned to an identity token.
    pub fn handle_of(&self, key: &EntityKey) -> Option<Handle> {
        self.arena.handle_of(key)
    }

    /// Returns the identity token of a handle.
    pub fn key_of(&self, handle: Handle) -> Option<&EntityKey> {
        self.arena.key_of(handle)
    }

    /// Returns the number of indexed entities.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns true if nothing was indexed.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Iterates entities in handle order.
    pub fn entities(&self) -> impl Iterator<Item = (Handle, &T)> + '_ {
        self.arena.iter()
    }

    /// Returns every path that holds at least one value, sorted.
    pub fn paths(&self) -> Vec<String> {
        self.trie
            .leaf_paths()
            .into_iter()
            .map(|(path, _)| path)
            .collect()
    }

    /// Builds the path to values view of every entity.
    ///
    /// Every entity has a row, possibly empty. Values are sorted.
    pub fn field_rows(&self) -> FieldRows {
        let mut rows: FieldRows = self
            .arena
            .iter()
            .map(|(handle, _)| (handle, BTreeMap::new()))
            .collect();

        for (path, node) in self.trie.leaf_paths() {
            for (value, holders) in self.trie.values(node) {
                for handle in holders {
                    rows.entry(*handle)
                        .or_default()
                        .entry(path.clone())
                        .or_default()
                        .push(value.to_string());
                }
            }
        }

        for fields in rows.values_mut() {
            for values in fields.values_mut() {
                values.sort_unstable();
            }
        }
        rows
    }

    /// Returns the path trie.
    pub fn trie(&self) -> &PathTrie {
        &self.trie
    }

    /// Returns the nested instance groups.
    pub fn groups(&self) -> &NestedGroups {
        &self.groups
    }
}

impl<T: Indexable> PageIndex<T> {
    /// Indexes an entity from a prebuilt document.
    ///
    /// The document is used as is; the configured field naming applies
    /// only to documents built by [`index`](Self::index).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::HandleOverflow`] when the index is full.
    pub fn index_document(&mut self, entity: T, document: &Value) -> CoreResult<Handle> {
        let registration = self.arena.register(entity.entity_key(), entity)?;
        let handle = registration.handle();

        let outcome = flatten(&mut self.trie, &mut self.groups, handle, document);
        self.stats
            .record_index(registration.is_new(), outcome.values, outcome.instances);

        debug!(
            handle = handle.as_u32(),
            new = registration.is_new(),
            values = outcome.values,
            instances = outcome.instances,
            "Indexed entity"
        );
        Ok(handle)
    }
}

impl<T: Indexable + Serialize> PageIndex<T> {
    /// Creates an index holding `entities`.
    ///
    /// # Errors
    ///
    /// Returns the first indexing error.
    pub fn from_entities<I: IntoIterator<Item = T>>(entities: I) -> CoreResult<Self> {
        let mut index = Self::new();
        index.index_all(entities)?;
        Ok(index)
    }

    /// Indexes an entity and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity cannot be encoded or the index is
    /// full.
    pub fn index(&mut self, entity: T) -> CoreResult<Handle> {
        let document = self.encoder.encode(&entity)?;
        self.index_document(entity, &document)
    }

    /// Indexes several entities.
    ///
    /// Stops at the first error; entities before it stay indexed.
    ///
    /// # Errors
    ///
    /// Returns the first indexing error.
    pub fn index_all<I: IntoIterator<Item = T>>(&mut self, entities: I) -> CoreResult<Vec<Handle>> {
        entities
            .into_iter()
            .map(|entity| self.index(entity))
            .collect()
    }
}

impl<T> Default for PageIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}
