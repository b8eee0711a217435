//! Verified-result cache
//!
//! Maps a block's content hash to the outcome of executing it. An entry is
//! created by assemble or by a successful validation, moved out by commit, and
//! the whole mapping is discarded after every successful commit because all
//! remaining candidates reference a parent that is no longer the head.
//!
//! There is no per-entry eviction. A caller that validates many distinct
//! candidates without committing grows the cache without bound; the
//! coordinator only warns once the size crosses its configured threshold.
//!
//! The cache is not synchronized on its own. The coordinator keeps it behind
//! the same lock that guards head reads, so a clear can never interleave with
//! an insert.

use super::entities::{Block, Hash, Receipt};
use std::collections::HashMap;
use std::time::Duration;

/// Outcome of executing a block, exclusively owned by its cache entry
pub struct ExecutionResult<S> {
    /// The executed block
    pub block: Block,
    /// Resulting state snapshot, handed to the store on commit
    pub state: S,
    /// Receipts in transaction order
    pub receipts: Vec<Receipt>,
    /// Wall-clock execution time
    pub proc_time: Duration,
}

/// Content hash -> execution outcome
pub struct VerifiedCache<S> {
    entries: HashMap<Hash, ExecutionResult<S>>,
}

impl<S> Default for VerifiedCache<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> VerifiedCache<S> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Store a result under its block's hash.
    ///
    /// Returns true if an entry for the same block was replaced.
    pub fn insert(&mut self, result: ExecutionResult<S>) -> bool {
        self.entries.insert(result.block.hash(), result).is_some()
    }

    /// Whether this block has already been executed in the current round
    pub fn contains(&self, hash: &Hash) -> bool {
        self.entries.contains_key(hash)
    }

    /// Move a result out for commit
    pub fn take(&mut self, hash: &Hash) -> Option<ExecutionResult<S>> {
        self.entries.remove(hash)
    }

    /// Discard every entry, returning how many were dropped
    pub fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }

    /// Number of cached results
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No cached results
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
