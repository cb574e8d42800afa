//! Entity handles and identity tokens.

use std::collections::HashSet;
use std::fmt;

/// A set of entity handles.
pub type HandleSet = HashSet<Handle>;

/// Small integer identifying one indexed entity within one index.
///
/// Handles are:
/// - Assigned densely from 0 in order of first sight
/// - Stable for the lifetime of the index
/// - Reused only when the same identity token is indexed again
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(u32);

impl Handle {
    /// Creates a handle from its raw value.
    ///
    /// Resolving a handle that was never assigned yields nothing.
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw handle value.
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the handle as an arena slot.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.0)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<Handle> for u32 {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

/// Caller-supplied identity token.
///
/// Indexing two entities with equal keys treats them as the same entity:
/// the second call reuses the first call's handle.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityKey(String);

impl EntityKey {
    /// Creates a key from any string-like value.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityKey({:?})", self.0)
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for EntityKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<u64> for EntityKey {
    fn from(key: u64) -> Self {
        Self(key.to_string())
    }
}

impl From<u32> for EntityKey {
    fn from(key: u32) -> Self {
        Self(key.to_string())
    }
}

impl From<i64> for EntityKey {
    fn from(key: i64) -> Self {
        Self(key.to_string())
    }
}

/// Trait for types that can be stored in an index.
///
/// # Example
///
/// ```
/// use pathdex_core::{EntityKey, Indexable};
///
/// struct User {
///     id: u64,
///     name: String,
/// }
///
/// impl Indexable for User {
///     fn entity_key(&self) -> EntityKey {
///         self.id.into()
///     }
/// }
/// ```
pub trait Indexable {
    /// Returns the entity's identity token.
    ///
    /// Must not change over the entity's lifetime.
    fn entity_key(&self) -> EntityKey;
}
