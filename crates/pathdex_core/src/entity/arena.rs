//! Entity arena.

use crate::entity::{EntityKey, Handle};
use crate::error::{CoreError, CoreResult};
use std::collections::HashMap;

/// Outcome of registering an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// First sight of this identity token.
    New(Handle),
    /// The token was already known; its handle is reused.
    Existing(Handle),
}

impl Registration {
    /// Returns the registered handle.
    pub fn handle(self) -> Handle {
        match self {
            Registration::New(h) | Registration::Existing(h) => h,
        }
    }

    /// Returns true for a first registration.
    pub fn is_new(self) -> bool {
        matches!(self, Registration::New(_))
    }
}

/// Owns indexed entities and assigns their handles.
///
/// Entities live in a dense list addressed by [`Handle`]. The arena is
/// append-only: there is no removal.
#[derive(Debug)]
pub struct EntityArena<T> {
    /// Entities in handle order.
    entities: Vec<T>,
    /// Identity token for each slot.
    keys: Vec<EntityKey>,
    /// Token to handle mapping.
    by_key: HashMap<EntityKey, Handle>,
}

impl<T> EntityArena<T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            keys: Vec::new(),
            by_key: HashMap::new(),
        }
    }

    /// Registers an entity under its identity token.
    ///
    /// A known token keeps its handle and the stored entity is replaced by
    /// `entity`. An unknown token is appended and receives the next handle.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::HandleOverflow`] once `u32` handle space is
    /// exhausted.
    pub fn register(&mut self, key: EntityKey, entity: T) -> CoreResult<Registration> {
        if let Some(&handle) = self.by_key.get(&key) {
            self.entities[handle.index()] = entity;
            return Ok(Registration::Existing(handle));
        }

        let raw = u32::try_from(self.entities.len()).map_err(|_| CoreError::HandleOverflow {
            max: u64::from(u32::MAX),
        })?;
        let handle = Handle::new(raw);
        self.entities.push(entity);
        self.keys.push(key.clone());
        self.by_key.insert(key, handle);
        Ok(Registration::New(handle))
    }

    /// Returns the entity for a handle, if assigned.
    pub fn resolve(&self, handle: Handle) -> Option<&T> {
        self.entities.get(handle.index())
    }

    /// Returns the identity token for a handle, if assigned.
    pub fn key_of(&self, handle: Handle) -> Option<&EntityKey> {
        self.keys.get(handle.index())
    }

    /// Returns the handle assigned to a token.
    pub fn handle_of(&self, key: &EntityKey) -> Option<Handle> {
        self.by_key.get(key).copied()
    }

    /// Returns the number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if no entity was registered.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterates entities in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> + '_ {
        // len() never exceeds u32::MAX + 1, enforced by register
        self.entities
            .iter()
            .enumerate()
            .map(|(i, e)| (Handle::new(i as u32), e))
    }
}

impl<T> Default for EntityArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
