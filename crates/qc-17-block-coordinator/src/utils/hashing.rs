//! Hashing utilities for the block coordinator
//!
//! Every identity this subsystem computes (block hash, transaction hash,
//! transaction-root nodes) is Keccak-256, matching the execution layer.

use primitive_types::{H256, U256};
use sha3::{Digest, Keccak256};

/// Compute Keccak-256 of data
#[inline]
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Compute Keccak-256 of data as H256
#[inline]
pub fn keccak_hash(data: &[u8]) -> H256 {
    H256(keccak256(data))
}

/// Big-endian 32-byte representation of a U256
#[inline]
pub fn u256_to_be_bytes(value: U256) -> [u8; 32] {
    let mut buf = [0u8; 32];
    value.to_big_endian(&mut buf);
    buf
}

/// Feed a variable-length field into a hasher, prefixed with its length.
///
/// The prefix keeps adjacent variable fields from aliasing each other
/// (`[1] ++ [2, 3]` vs `[1, 2] ++ [3]`).
#[inline]
pub fn update_with_len(hasher: &mut Keccak256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_be_bytes());
    hasher.update(bytes);
}
