//! # pathdex Testkit
//!
//! Test utilities for pathdex.
//!
//! This crate provides:
//! - Fixture entities and index helpers
//! - Property-based test generators using proptest
//! - A brute-force reference evaluator to check search results against
//!
//! ## Usage
//!
//! ```
//! use pathdex_testkit::prelude::*;
//!
//! let index = index_of([
//!     TestEntity::new("1").property1("foo"),
//!     TestEntity::new("2").property1("bar"),
//! ]);
//! let found = ids(index.search(&must([filter("property1", ["foo"])])).unwrap());
//! assert_eq!(found, vec!["1"]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod reference;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::reference::*;
}

pub use fixtures::*;
pub use generators::*;
pub use reference::*;
