//! CLI command implementations.

pub mod export;
pub mod load;
pub mod query;
pub mod stats;
