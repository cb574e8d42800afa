//! Index configuration.

use pathdex_codec::{FieldNaming, DEFAULT_BUFFER_CAPACITY};

/// Configuration for a [`PageIndex`](crate::PageIndex).
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// How field names are written into paths.
    pub field_naming: FieldNaming,

    /// Initial capacity of the reusable encode buffer in bytes.
    pub encode_buffer_capacity: usize,

    /// Maximum number of idle working sets kept for reuse by queries.
    pub max_pooled_sets: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            field_naming: FieldNaming::Preserve,
            encode_buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            max_pooled_sets: 64,
        }
    }
}

impl IndexConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field naming policy.
    #[must_use]
    pub const fn field_naming(mut self, naming: FieldNaming) -> Self {
        self.field_naming = naming;
        self
    }

    /// Shorthand for camel-cased field names.
    #[must_use]
    pub const fn camel_case(self) -> Self {
        self.field_naming(FieldNaming::CamelCase)
    }

    /// Sets the initial encode buffer capacity.
    #[must_use]
    pub const fn encode_buffer_capacity(mut self, bytes: usize) -> Self {
        self.encode_buffer_capacity = bytes;
        self
    }

    /// Sets how many idle working sets are retained between queries.
    #[must_use]
    pub const fn max_pooled_sets(mut self, count: usize) -> Self {
        self.max_pooled_sets = count;
        self
    }
}
