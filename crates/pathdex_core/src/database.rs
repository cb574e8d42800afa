//! Multi-type index registry.

use crate::config::IndexConfig;
use crate::entity::{Handle, Indexable};
use crate::error::{CoreError, CoreResult};
use crate::page::PageIndex;
use crate::query::Query;
use parking_lot::RwLock;
use serde::Serialize;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use tracing::debug;

type AnyIndex = Box<dyn Any + Send + Sync>;

/// One [`PageIndex`] per entity type.
///
/// The lock is the single-writer gate: indexing takes it exclusively,
/// searches share it. Asking about a type that was never indexed is not
/// an error; it behaves like an empty index.
///
/// # Example
///
/// ```
/// use pathdex_core::{CompoundQuery, Database, EntityKey, Indexable, Query, SearchFilter};
///
/// #[derive(Clone, serde::Serialize)]
/// struct Note {
///     id: u32,
///     topic: String,
/// }
///
/// impl Indexable for Note {
///     fn entity_key(&self) -> EntityKey {
///         self.id.into()
///     }
/// }
///
/// let db = Database::new();
/// db.index(Note { id: 1, topic: "rust".into() }).unwrap();
///
/// let query = Query::from(CompoundQuery::new().must(SearchFilter::new("topic", ["rust"])));
/// assert_eq!(db.search::<Note>(&query).unwrap().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Database {
    config: IndexConfig,
    indexes: RwLock<HashMap<TypeId, AnyIndex>>,
}

impl Database {
    /// Creates an empty database with default index configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty database whose indexes use `config`.
    pub fn with_config(config: IndexConfig) -> Self {
        Self {
            config,
            indexes: RwLock::new(HashMap::new()),
        }
    }

    /// Indexes one entity, creating the index for its type if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity cannot be encoded or the index is full.
    pub fn index<T>(&self, entity: T) -> CoreResult<Handle>
    where
        T: Indexable + Serialize + Send + Sync + 'static,
    {
        let mut indexes = self.indexes.write();
        Self::index_mut::<T>(&mut indexes, &self.config)?.index(entity)
    }

    /// Indexes several entities under one write lock.
    ///
    /// # Errors
    ///
    /// Returns the first indexing error.
    pub fn index_all<T, I>(&self, entities: I) -> CoreResult<Vec<Handle>>
    where
        T: Indexable + Serialize + Send + Sync + 'static,
        I: IntoIterator<Item = T>,
    {
        let mut indexes = self.indexes.write();
        Self::index_mut::<T>(&mut indexes, &self.config)?.index_all(entities)
    }

    /// Searches the index of `T` and clones the matches out.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] if any filter is malformed.
    pub fn search<T>(&self, query: &Query) -> CoreResult<Vec<T>>
    where
        T: Clone + Send + Sync + 'static,
    {
        query.validate()?;
        let found = self
            .with_index::<T, _>(|index| {
                index
                    .search(query)
                    .map(|entities| entities.into_iter().cloned().collect::<Vec<T>>())
            })
            .transpose()?;
        Ok(found.unwrap_or_default())
    }

    /// Returns a copy of the entity behind `handle`.
    pub fn get<T>(&self, handle: Handle) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.with_index::<T, _>(|index| index.get(handle).cloned())
            .flatten()
    }

    /// Runs `f` against the index of `T` under a shared lock.
    ///
    /// Returns `None` if no entity of type `T` was ever indexed.
    pub fn with_index<T, R>(&self, f: impl FnOnce(&PageIndex<T>) -> R) -> Option<R>
    where
        T: Send + Sync + 'static,
    {
        let indexes = self.indexes.read();
        let index = indexes.get(&TypeId::of::<T>())?.downcast_ref::<PageIndex<T>>()?;
        Some(f(index))
    }

    /// Returns the number of entities indexed for `T`.
    pub fn len<T>(&self) -> usize
    where
        T: Send + Sync + 'static,
    {
        self.with_index::<T, _>(|index| index.len()).unwrap_or(0)
    }

    /// Returns the number of entity types with an index.
    pub fn type_count(&self) -> usize {
        self.indexes.read().len()
    }

    fn index_mut<'a, T>(
        indexes: &'a mut HashMap<TypeId, AnyIndex>,
        config: &IndexConfig,
    ) -> CoreResult<&'a mut PageIndex<T>>
    where
        T: Send + Sync + 'static,
    {
        let slot = indexes.entry(TypeId::of::<T>()).or_insert_with(|| {
            debug!(type_name = type_name::<T>(), "Creating index");
            Box::new(PageIndex::<T>::with_config(config.clone()))
        });
        slot.downcast_mut::<PageIndex<T>>()
            .ok_or_else(|| CoreError::type_mismatch(type_name::<T>()))
    }
}
