//! Outbound ports (driven side - SPI)
//!
//! Collaborators report failures as plain strings; the coordinator decides
//! whether a failure is a negative verdict or a propagated error.

use crate::domain::{Block, BlockHeader, Hash, Receipt, SignedTransaction};
use async_trait::async_trait;
use std::time::Duration;

/// Port: read access to the canonical chain
pub trait HeaderReader: Send + Sync {
    /// Header of the current head
    fn current_header(&self) -> BlockHeader;

    /// Header by hash, if known
    fn header_by_hash(&self, hash: &Hash) -> Option<BlockHeader>;
}

/// Port: consensus engine sealing rules
pub trait ConsensusEngine: Send + Sync {
    /// Fill engine-specific header fields (e.g. difficulty) before hashing
    fn prepare(&self, chain: &dyn HeaderReader, header: &mut BlockHeader);

    /// Check the header against the engine's structural and seal rules
    fn verify_header(
        &self,
        chain: &dyn HeaderReader,
        header: &BlockHeader,
        seal: bool,
    ) -> Result<(), String>;
}

/// Block produced by the executor together with its post-state
pub struct SealedBlock<S> {
    /// Sealing-ready block
    pub block: Block,
    /// Post-execution state snapshot
    pub state: S,
    /// Receipts in transaction order
    pub receipts: Vec<Receipt>,
}

/// Result of re-executing a given block
pub struct ProcessedBlock<S> {
    /// Post-execution state snapshot
    pub state: S,
    /// Root of `state`
    pub state_root: Hash,
    /// Receipts in transaction order
    pub receipts: Vec<Receipt>,
    /// Wall-clock execution time
    pub proc_time: Duration,
}

/// Port: state-transition executor
#[async_trait]
pub trait BlockExecutor: Send + Sync {
    /// Exclusively owned state snapshot
    type State: Send + 'static;

    /// Build and execute a block on `parent_hash` containing `transactions`
    async fn build_sealing_block(
        &self,
        parent_hash: Hash,
        timestamp: u64,
        transactions: Vec<SignedTransaction>,
    ) -> Result<SealedBlock<Self::State>, String>;

    /// Execute an externally assembled block against its parent's state
    async fn process_block(
        &self,
        block: &Block,
        parent: &BlockHeader,
    ) -> Result<ProcessedBlock<Self::State>, String>;
}

/// Port: structural body validation
pub trait BodyValidator: Send + Sync {
    /// Check the body against the header (roots, sizes, known block)
    fn validate_body(&self, block: &Block) -> Result<(), String>;
}

/// Port: persistent chain store
#[async_trait]
pub trait ChainStore<S: Send + 'static>: HeaderReader {
    /// Current head as a full block
    fn current_block(&self) -> Block;

    /// Persist `state` and `receipts` and make `block` the canonical head
    async fn write_state_and_set_head(
        &self,
        block: Block,
        receipts: Vec<Receipt>,
        state: S,
        proc_time: Duration,
    ) -> Result<(), String>;
}

/// Port: wall clock, replaceable in tests
pub trait TimeSource: Send + Sync {
    /// Current unix timestamp in seconds
    fn now(&self) -> u64;
}

/// Default time source using system time
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_time_source_is_recent() {
        // 2023-11-14, well before any plausible test run
        assert!(SystemTimeSource.now() > 1_700_000_000);
    }
}
