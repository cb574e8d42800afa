//! Working-set pool.

use crate::entity::HandleSet;

/// Freelist of reusable handle sets.
///
/// Sets are cleared when handed out, not when returned. The pool keeps at
/// most `max_idle` sets; extra releases are dropped.
#[derive(Debug)]
pub struct SetPool {
    free: Vec<HandleSet>,
    max_idle: usize,
}

impl SetPool {
    /// Creates an empty pool keeping at most `max_idle` idle sets.
    pub fn new(max_idle: usize) -> Self {
        Self {
            free: Vec::new(),
            max_idle,
        }
    }

    /// Returns an empty set, reusing an idle one if available.
    pub fn acquire(&mut self) -> HandleSet {
        match self.free.pop() {
            Some(mut set) => {
                set.clear();
                set
            }
            None => HandleSet::new(),
        }
    }

    /// Returns a set to the pool.
    pub fn release(&mut self, set: HandleSet) {
        if self.free.len() < self.max_idle {
            self.free.push(set);
        }
    }

    /// Returns the number of idle sets.
    pub fn idle(&self) -> usize {
        self.free.len()
    }

    /// Returns the idle cap.
    pub fn max_idle(&self) -> usize {
        self.max_idle
    }

    /// Moves every idle set into a new pool with the same cap.
    ///
    /// Lets a caller evaluate without holding the lock around the shared
    /// pool; hand the sets back with [`reattach`](Self::reattach).
    pub fn detach(&mut self) -> SetPool {
        SetPool {
            free: std::mem::take(&mut self.free),
            max_idle: self.max_idle,
        }
    }

    /// Takes back the idle sets of a detached pool, up to the cap.
    pub fn reattach(&mut self, other: SetPool) {
        for set in other.free {
            if self.free.len() >= self.max_idle {
                break;
            }
            self.free.push(set);
        }
    }
}
