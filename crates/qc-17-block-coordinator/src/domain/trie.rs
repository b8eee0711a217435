//! Transaction root derivation
//!
//! Binary Keccak-256 hash tree over transaction hashes. Each non-leaf node is
//! H(left || right). Leaves are padded with the zero sentinel up to a power
//! of two (two leaves minimum), so the same ordered body always yields the
//! same root and a reordered body yields a different one.

use super::entities::Hash;
use super::transaction::SignedTransaction;
use primitive_types::H256;
use sha3::{Digest, Keccak256};

/// Root of an empty body
pub const EMPTY_TRANSACTIONS_ROOT: Hash = H256([0u8; 32]);

const SENTINEL: Hash = H256([0u8; 32]);

/// Derive the transaction root of an ordered body
pub fn derive_transactions_root(transactions: &[SignedTransaction]) -> Hash {
    let leaves: Vec<Hash> = transactions.iter().map(SignedTransaction::hash).collect();
    merkle_root(leaves)
}

/// Root over precomputed leaf hashes
pub fn merkle_root(mut level: Vec<Hash>) -> Hash {
    if level.is_empty() {
        return EMPTY_TRANSACTIONS_ROOT;
    }

    let padded = level.len().next_power_of_two().max(2);
    level.resize(padded, SENTINEL);

    while level.len() > 1 {
        level = level
            .chunks_exact(2)
            .map(|pair| hash_pair(&pair[0], &pair[1]))
            .collect();
    }
    level[0]
}

fn hash_pair(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    H256(hasher.finalize().into())
}
