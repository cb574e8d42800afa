//! # pathdex Core
//!
//! Schema-free object indexer and boolean query engine.
//!
//! Entities of any `serde::Serialize` type are reduced to a structural
//! document, flattened into dotted `path = value` pairs and indexed
//! without a schema. Queries are unions of AND clauses over exact
//! stringified values.
//!
//! This crate provides:
//! - [`EntityArena`]: stable handles keyed by caller-supplied identity
//! - [`PathTrie`]: path segments to value leaves to handle sets
//! - [`NestedGroups`]: per-occurrence snapshots of nested objects, so a
//!   query can require several values from the same list element
//! - Query evaluation with selectivity ordering and pooled working sets
//! - [`PageIndex`]: one index per entity type
//! - [`Database`]: a registry of indexes behind a single-writer lock
//!
//! ## Example
//!
//! ```
//! use pathdex_core::{CompoundQuery, EntityKey, Indexable, PageIndex, Query, SearchFilter};
//!
//! #[derive(serde::Serialize)]
//! struct Facility {
//!     facility: u32,
//!     region: String,
//! }
//!
//! #[derive(serde::Serialize)]
//! struct Site {
//!     id: String,
//!     facilities: Vec<Facility>,
//! }
//!
//! impl Indexable for Site {
//!     fn entity_key(&self) -> EntityKey {
//!         EntityKey::new(self.id.clone())
//!     }
//! }
//!
//! let mut index = PageIndex::new();
//! index
//!     .index(Site {
//!         id: "mixed".into(),
//!         facilities: vec![
//!             Facility { facility: 1234, region: "BURBON".into() },
//!             Facility { facility: 1233, region: "AMISH".into() },
//!         ],
//!     })
//!     .unwrap();
//! index
//!     .index(Site {
//!         id: "exact".into(),
//!         facilities: vec![Facility { facility: 1234, region: "AMISH".into() }],
//!     })
//!     .unwrap();
//!
//! let query = Query::from(
//!     CompoundQuery::new()
//!         .must(SearchFilter::new("facilities.facility", ["1234"]).nested("facilities"))
//!         .must(SearchFilter::new("facilities.region", ["AMISH"]).nested("facilities")),
//! );
//! let found = index.search(&query).unwrap();
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].id, "exact");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod database;
mod entity;
mod error;
mod index;
mod page;
mod query;
mod stats;

pub use config::IndexConfig;
pub use database::Database;
pub use entity::{EntityArena, EntityKey, Handle, HandleSet, Indexable, Registration};
pub use error::{CoreError, CoreResult};
pub use index::{split_path, InstanceSnapshot, NestedGroups, NodeId, PathTrie, PATH_SEPARATOR};
pub use page::{FieldRows, PageIndex};
pub use query::{CompoundQuery, Query, SearchFilter, SetPool};
pub use stats::{IndexStats, StatsSnapshot};

pub use pathdex_codec::{FieldNaming, Value};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
