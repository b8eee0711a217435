//! Error types for the block coordinator subsystem

use primitive_types::H256;
use thiserror::Error;

/// Result type alias for block coordinator operations
pub type Result<T> = std::result::Result<T, BlockCoordinatorError>;

/// Errors that can occur while assembling, validating or committing L2 blocks
#[derive(Debug, Error)]
pub enum BlockCoordinatorError {
    /// Requested block does not extend the current head
    #[error("cannot assemble block with discontinuous block number {actual}, expected number is {expected}")]
    DiscontinuousBlockNumber {
        /// head.number + 1
        expected: u64,
        /// Number supplied by the caller
        actual: u64,
    },

    /// Parent hash does not match the current head
    #[error("wrong parent hash: {actual:?}, expected parent hash is {expected:?}")]
    WrongParentHash {
        /// Hash of the current head
        expected: H256,
        /// Parent hash supplied by the caller
        actual: H256,
    },

    /// Transaction at `index` could not be decoded from its envelope
    #[error("transaction {index} is not valid: {reason}")]
    InvalidTransaction {
        /// Position in the supplied transaction list
        index: usize,
        /// Decoder message
        reason: String,
    },

    /// Logs bloom longer than a bloom filter
    #[error("invalid logs bloom: {length} bytes exceeds {max}")]
    InvalidLogsBloom {
        /// Supplied length
        length: usize,
        /// Bloom size in bytes
        max: usize,
    },

    /// Consensus engine rejected the header
    #[error("header verification failed: {0}")]
    HeaderVerificationFailed(String),

    /// Transaction count violates the chain policy
    #[error("invalid tx count: {count}")]
    InvalidTxCount {
        /// Number of transactions in the block
        count: usize,
    },

    /// Locally computed state root differs from the claimed one
    #[error("state root mismatch: claimed {claimed:?}, computed {computed:?}")]
    StateRootMismatch {
        /// Root carried by the descriptor
        claimed: H256,
        /// Root produced by local execution
        computed: H256,
    },

    /// State transition failed
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// Writing state or advancing the head failed
    #[error("store write failed: {0}")]
    StoreWriteFailed(String),

    /// Control API method is not served by this namespace
    #[error("method not found: {0}")]
    UnknownMethod(String),

    /// Control API parameters have the wrong shape
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The L2 engine cannot be enabled on this chain
    #[error("l2 engine started without valid total difficulty")]
    MissingTerminalTotalDifficulty,
}

impl BlockCoordinatorError {
    /// Caller's view of the chain is stale or its input is malformed.
    ///
    /// The coordinator never retries these; the sequencer must resynchronize
    /// or fix its request.
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            Self::DiscontinuousBlockNumber { .. }
                | Self::WrongParentHash { .. }
                | Self::InvalidTransaction { .. }
                | Self::InvalidLogsBloom { .. }
                | Self::InvalidParams(_)
                | Self::UnknownMethod(_)
        )
    }

    /// Block was well-formed but failed engine or policy checks
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            Self::HeaderVerificationFailed(_)
                | Self::InvalidTxCount { .. }
                | Self::StateRootMismatch { .. }
        )
    }

    /// Executor or store fault
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::ExecutionFailed(_) | Self::StoreWriteFailed(_))
    }
}
