//! Index statistics.
//!
//! Counters are relaxed atomics so that read-only searches running on
//! several threads can record into the same index.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Index statistics and metrics.
///
/// Values are monotonically increasing.
#[derive(Debug, Default)]
pub struct IndexStats {
    // Ingestion counters
    /// Entities seen for the first time.
    entities_indexed: AtomicU64,
    /// Indexing calls for an already known identity token.
    entities_reindexed: AtomicU64,
    /// Scalar values inserted into the trie.
    values_inserted: AtomicU64,
    /// Nested instance snapshots recorded.
    instances_recorded: AtomicU64,

    // Query counters
    /// Searches evaluated.
    searches: AtomicU64,
    /// Compound query clauses evaluated.
    clauses: AtomicU64,
    /// Filter groups that stopped early on an empty intersection.
    short_circuits: AtomicU64,

    // Pool counters
    /// Working sets served from the pool.
    pool_hits: AtomicU64,
    /// Working sets that had to be allocated.
    pool_misses: AtomicU64,
}

impl IndexStats {
    /// Creates a new stats instance.
    pub fn new() -> Self {
        Self::default()
    }

    // === Increment methods (internal use) ===

    /// Records one indexing call.
    pub(crate) fn record_index(&self, first_sight: bool, values: u64, instances: u64) {
        if first_sight {
            self.entities_indexed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.entities_reindexed.fetch_add(1, Ordering::Relaxed);
        }
        self.values_inserted.fetch_add(values, Ordering::Relaxed);
        self.instances_recorded.fetch_add(instances, Ordering::Relaxed);
    }

    /// Records a search.
    pub(crate) fn record_search(&self, clauses: u64) {
        self.searches.fetch_add(1, Ordering::Relaxed);
        self.clauses.fetch_add(clauses, Ordering::Relaxed);
    }

    /// Records an early exit from a filter group.
    pub(crate) fn record_short_circuit(&self) {
        self.short_circuits.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a working set acquisition.
    pub(crate) fn record_acquire(&self, reused: bool) {
        if reused {
            self.pool_hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.pool_misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    // === Getter methods (public API) ===

    /// Returns the number of distinct entities indexed.
    pub fn entities_indexed(&self) -> u64 {
        self.entities_indexed.load(Ordering::Relaxed)
    }

    /// Returns the number of repeat indexing calls.
    pub fn entities_reindexed(&self) -> u64 {
        self.entities_reindexed.load(Ordering::Relaxed)
    }

    /// Returns the number of scalar values inserted.
    ///
    /// Repeated inserts of the same path, value and handle are counted.
    pub fn values_inserted(&self) -> u64 {
        self.values_inserted.load(Ordering::Relaxed)
    }

    /// Returns the number of nested instance snapshots recorded.
    pub fn instances_recorded(&self) -> u64 {
        self.instances_recorded.load(Ordering::Relaxed)
    }

    /// Returns the number of searches evaluated.
    pub fn searches(&self) -> u64 {
        self.searches.load(Ordering::Relaxed)
    }

    /// Returns the number of clauses evaluated.
    pub fn clauses(&self) -> u64 {
        self.clauses.load(Ordering::Relaxed)
    }

    /// Returns the number of filter groups that exited early.
    pub fn short_circuits(&self) -> u64 {
        self.short_circuits.load(Ordering::Relaxed)
    }

    /// Returns the number of pooled working sets reused.
    pub fn pool_hits(&self) -> u64 {
        self.pool_hits.load(Ordering::Relaxed)
    }

    /// Returns the number of working sets freshly allocated.
    pub fn pool_misses(&self) -> u64 {
        self.pool_misses.load(Ordering::Relaxed)
    }

    /// Returns a snapshot of all stats.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            entities_indexed: self.entities_indexed(),
            entities_reindexed: self.entities_reindexed(),
            values_inserted: self.values_inserted(),
            instances_recorded: self.instances_recorded(),
            searches: self.searches(),
            clauses: self.clauses(),
            short_circuits: self.short_circuits(),
            pool_hits: self.pool_hits(),
            pool_misses: self.pool_misses(),
        }
    }
}

/// A point-in-time snapshot of index statistics.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StatsSnapshot {
    /// Distinct entities indexed.
    pub entities_indexed: u64,
    /// Repeat indexing calls.
    pub entities_reindexed: u64,
    /// Scalar values inserted.
    pub values_inserted: u64,
    /// Nested instance snapshots recorded.
    pub instances_recorded: u64,
    /// Searches evaluated.
    pub searches: u64,
    /// Clauses evaluated.
    pub clauses: u64,
    /// Filter groups that exited early.
    pub short_circuits: u64,
    /// Pooled working sets reused.
    pub pool_hits: u64,
    /// Working sets freshly allocated.
    pub pool_misses: u64,
}
