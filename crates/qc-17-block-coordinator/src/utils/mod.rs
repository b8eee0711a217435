//! Utility modules for the block coordinator

pub mod hashing;
pub mod hex_serde;

pub use hashing::{keccak256, keccak_hash, u256_to_be_bytes, update_with_len};
