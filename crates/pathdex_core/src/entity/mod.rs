//! Entity identity and storage.

mod arena;
mod handle;

pub use arena::{EntityArena, Registration};
pub use handle::{EntityKey, Handle, HandleSet, Indexable};
