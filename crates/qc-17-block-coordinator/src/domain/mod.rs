//! Domain layer - pure types and logic for L2 block coordination
//!
//! Nothing here performs I/O or awaits; collaborators are reached only through
//! [`crate::ports`].
//!
//! ## Entities
//!
//! - [`ExecutableL2Data`]: wire-level candidate block descriptor
//! - [`Block`] / [`BlockHeader`]: materialized block and its identity
//! - [`SignedTransaction`]: decoded transaction envelope
//! - [`ExecutionResult`]: state snapshot, receipts and timing of one execution
//!
//! ## Services
//!
//! - [`VerifiedCache`]: content hash -> execution result, cleared on commit
//! - [`derive_transactions_root`]: hash tree over the ordered body

pub mod cache;
mod entities;
pub mod transaction;
pub mod trie;

pub use cache::{ExecutionResult, VerifiedCache};
pub use entities::*;
pub use transaction::{
    decode_transactions, encode_transactions, SignedTransaction, MAX_ENCODED_TRANSACTION_SIZE,
};
pub use trie::{derive_transactions_root, EMPTY_TRANSACTIONS_ROOT};
