//! Metrics collection for the block coordinator subsystem

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector for the block coordinator
#[derive(Debug, Default)]
pub struct Metrics {
    /// Candidates assembled and cached
    pub blocks_assembled: AtomicU64,

    /// Assemble calls that produced an empty body
    pub empty_assemblies: AtomicU64,

    /// Validate calls answered `success: true`
    pub validations_accepted: AtomicU64,

    /// Validate calls answered `success: false`
    pub validations_rejected: AtomicU64,

    /// Validate/commit calls served from the cache
    pub cache_hits: AtomicU64,

    /// Blocks re-executed through the executor
    pub reexecutions: AtomicU64,

    /// Blocks committed as head
    pub blocks_committed: AtomicU64,

    /// Cache entries discarded by post-commit clears
    pub entries_discarded: AtomicU64,

    /// Total execution time of committed blocks (microseconds)
    pub commit_exec_time_us: AtomicU64,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cached candidate
    pub fn record_assembled(&self) {
        self.blocks_assembled.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an assemble that produced nothing
    pub fn record_empty_assembly(&self) {
        self.empty_assemblies.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a validation verdict
    pub fn record_validation(&self, valid: bool) {
        if valid {
            self.validations_accepted.fetch_add(1, Ordering::Relaxed);
        } else {
            self.validations_rejected.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a cache hit
    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a re-execution
    pub fn record_reexecution(&self) {
        self.reexecutions.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a head advance and the entries it invalidated
    pub fn record_commit(&self, exec_time_us: u64, discarded: usize) {
        self.blocks_committed.fetch_add(1, Ordering::Relaxed);
        self.commit_exec_time_us
            .fetch_add(exec_time_us, Ordering::Relaxed);
        self.entries_discarded
            .fetch_add(discarded as u64, Ordering::Relaxed);
    }

    /// Get blocks committed
    pub fn get_blocks_committed(&self) -> u64 {
        self.blocks_committed.load(Ordering::Relaxed)
    }

    /// Fraction of validate/commit calls served from the cache
    pub fn get_cache_hit_ratio(&self) -> f64 {
        let hits = self.cache_hits.load(Ordering::Relaxed);
        let total = hits + self.reexecutions.load(Ordering::Relaxed);
        if total == 0 {
            return 0.0;
        }
        hits as f64 / total as f64
    }

    /// Average execution time of committed blocks (microseconds)
    pub fn get_avg_commit_exec_time(&self) -> f64 {
        let blocks = self.blocks_committed.load(Ordering::Relaxed);
        if blocks == 0 {
            return 0.0;
        }
        let time = self.commit_exec_time_us.load(Ordering::Relaxed);
        time as f64 / blocks as f64
    }
}
