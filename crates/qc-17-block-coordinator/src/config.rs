//! Configuration types for the block coordinator

use crate::error::{BlockCoordinatorError, Result};
use primitive_types::U256;
use serde::Deserialize;

/// Runtime configuration for the block coordinator
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Chain parameters consulted during verification
    pub chain: ChainConfig,

    /// Cache size above which every insert logs a warning.
    ///
    /// Only observability: entries are still dropped solely on commit.
    pub cache_warn_threshold: usize,

    /// Compare the locally computed state root with the descriptor's claim
    /// after re-execution (default: trust the descriptor)
    pub verify_execution_roots: bool,

    /// Logging setup for hosting binaries
    pub logging: LoggingConfig,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            chain: ChainConfig::default(),
            cache_warn_threshold: crate::DEFAULT_CACHE_WARN_THRESHOLD,
            verify_execution_roots: false,
            logging: LoggingConfig::default(),
        }
    }
}

impl CoordinatorConfig {
    /// Reject settings the coordinator cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.chain.max_tx_per_block == Some(0) {
            return Err(BlockCoordinatorError::InvalidConfig(
                "max_tx_per_block must be greater than zero".to_string(),
            ));
        }
        if self.cache_warn_threshold == 0 {
            return Err(BlockCoordinatorError::InvalidConfig(
                "cache_warn_threshold must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Chain parameters
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Chain identifier
    pub chain_id: u64,

    /// Terminal total difficulty; the engine API refuses to register without it
    pub terminal_total_difficulty: Option<U256>,

    /// Upper bound on transactions per block (None = unbounded)
    pub max_tx_per_block: Option<u64>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: crate::DEFAULT_CHAIN_ID,
            terminal_total_difficulty: Some(U256::zero()),
            max_tx_per_block: Some(crate::DEFAULT_MAX_TX_PER_BLOCK),
        }
    }
}

impl ChainConfig {
    /// Transaction-count policy predicate
    pub fn is_valid_tx_count(&self, count: usize) -> bool {
        match self.max_tx_per_block {
            Some(max) => (count as u64) <= max,
            None => true,
        }
    }
}

/// Logging configuration
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}
