//! # Quantum Chain - L2 Block Coordinator (Subsystem 17)
//!
//! **Bounded Context:** L2 Block Lifecycle
//! **Architecture Compliance:** DDD + Hexagonal + TDD
//!
//! ## Purpose
//!
//! The sequencer drives block production on an L2 node through three calls:
//! - `assemble` builds and executes a candidate on top of the head
//! - `validate` checks a candidate proposed by any node
//! - `new` commits a candidate as the new head
//!
//! Execution results are cached by block content hash between these calls,
//! so a block that was assembled or validated locally is committed without
//! being executed a second time.
//!
//! ## Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Adapters (Outer)                                   │
//! │  - RPC: engine_assembleL2Block / validate / new     │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Service                                            │
//! │  - BlockCoordinator (lock + verified cache)         │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Ports (Middle)                                     │
//! │  - Inbound: L2EngineApi                             │
//! │  - Outbound: ConsensusEngine, BlockExecutor,        │
//! │    BodyValidator, ChainStore, TimeSource            │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (Inner - Pure Logic)                        │
//! │  - ExecutableL2Data, Block, BlockHeader             │
//! │  - VerifiedCache, transaction envelope, tx root     │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Critical Invariants
//!
//! 1. **Linearity**: every accepted block has number head + 1 and the head as parent
//! 2. **Content Identity**: cache keys are header hashes, BLS data included
//! 3. **Commit Invalidation**: a head advance empties the cache
//! 4. **Verdicts vs Errors**: invalid blocks are `success: false`; unusable requests are errors
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! let coordinator = BlockCoordinator::new(CoordinatorDependencies {
//!     engine, executor, body_validator, store,
//!     config: CoordinatorConfig::default(),
//! })?;
//! let rpc = EngineRpcHandler::register(Arc::new(coordinator), &config.chain)?;
//! let candidate = rpc.handle("engine_assembleL2Block", params).await?;
//! ```
//!
//! ## Module Structure
//!
//! - [`domain`]: Wire types, block identity, transaction envelope, cache
//! - [`ports`]: Hexagonal architecture interfaces (inbound/outbound)
//! - [`service`]: The coordinator itself
//! - [`adapters`]: JSON-RPC dispatch

#![warn(missing_docs)]
#![warn(clippy::all)]

/// RPC adapters for the sequencer
pub mod adapters;
/// Domain models and business logic
pub mod domain;
pub mod ports;
pub mod service;
pub mod utils;

mod config;
mod error;
mod logging;
mod metrics;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{ChainConfig, CoordinatorConfig, LoggingConfig};
pub use error::{BlockCoordinatorError, Result};
pub use logging::init_logging;
pub use metrics::Metrics;

// Re-export commonly used types
pub use domain::{
    AssembleL2BlockParams, AssembleOutcome, Block, BlockHeader, Bloom, BlsData, ExecutableL2Data,
    ExecutionResult, GenericResponse, Receipt, SignedTransaction, VerifiedCache,
};

pub use ports::{
    BlockExecutor, BodyValidator, ChainStore, ConsensusEngine, HeaderReader, L2EngineApi,
    ProcessedBlock, SealedBlock, SystemTimeSource, TimeSource,
};

pub use adapters::EngineRpcHandler;

pub use service::{BlockCoordinator, CoordinatorDependencies};

/// Subsystem identifier for IPC communication
pub const SUBSYSTEM_ID: u8 = 17;

/// Cached results above which inserts log a warning
pub const DEFAULT_CACHE_WARN_THRESHOLD: usize = 64;

/// Default L2 chain identifier
pub const DEFAULT_CHAIN_ID: u64 = 53_077;

/// Default upper bound on transactions per block
pub const DEFAULT_MAX_TX_PER_BLOCK: u64 = 10_000;
