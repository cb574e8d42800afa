//! Boolean queries over the index.
//!
//! A [`Query`] is an OR of [`CompoundQuery`] clauses. Each clause ANDs its
//! `must` filters and removes entities matched by any `must_not` filter.
//! Each [`SearchFilter`] ORs its accepted values.
//!
//! Evaluation borrows its intermediate sets from a [`SetPool`].

mod evaluator;
mod filter;
mod pool;

pub(crate) use evaluator::Evaluator;
pub use filter::{CompoundQuery, Query, SearchFilter};
pub use pool::SetPool;
