//! Transaction envelope
//!
//! Transactions cross the control API as opaque byte strings. This chain's
//! envelope is fixed-int little-endian `bincode`, size-capped, with trailing
//! bytes rejected so that every decoded transaction has exactly one encoding.

use super::entities::{Address, Hash};
use crate::error::{BlockCoordinatorError, Result};
use crate::utils::{u256_to_be_bytes, update_with_len};
use bincode::Options;
use primitive_types::{H256, U256};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

/// Maximum encoded size of a single transaction (128 KiB)
pub const MAX_ENCODED_TRANSACTION_SIZE: u64 = 128 * 1024;

fn envelope() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_limit(MAX_ENCODED_TRANSACTION_SIZE)
        .reject_trailing_bytes()
}

/// A signed L2 transaction
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    /// Sender nonce
    pub nonce: u64,
    /// Gas price offered
    pub gas_price: U256,
    /// Gas limit
    pub gas_limit: u64,
    /// Recipient (None = contract creation)
    pub to: Option<Address>,
    /// Value transferred
    pub value: U256,
    /// Call data
    pub data: Vec<u8>,
    /// Recoverable ECDSA signature (r || s || v)
    pub signature: Vec<u8>,
}

impl SignedTransaction {
    /// Encode into the binary envelope
    pub fn encode(&self) -> Result<Vec<u8>> {
        envelope()
            .serialize(self)
            .map_err(|e| BlockCoordinatorError::SerializationError(e.to_string()))
    }

    /// Decode from the binary envelope
    pub fn decode(bytes: &[u8]) -> std::result::Result<Self, bincode::Error> {
        envelope().deserialize(bytes)
    }

    /// Keccak-256 over the canonical transaction fields
    pub fn hash(&self) -> Hash {
        let mut hasher = Keccak256::new();
        hasher.update(self.nonce.to_be_bytes());
        hasher.update(u256_to_be_bytes(self.gas_price));
        hasher.update(self.gas_limit.to_be_bytes());
        match &self.to {
            Some(to) => {
                hasher.update([1u8]);
                hasher.update(to.as_bytes());
            }
            None => hasher.update([0u8]),
        }
        hasher.update(u256_to_be_bytes(self.value));
        update_with_len(&mut hasher, &self.data);
        update_with_len(&mut hasher, &self.signature);
        H256(hasher.finalize().into())
    }
}

/// Decode an ordered list of envelopes, reporting the first failing index
pub fn decode_transactions(encoded: &[Vec<u8>]) -> Result<Vec<SignedTransaction>> {
    encoded
        .iter()
        .enumerate()
        .map(|(index, bytes)| {
            SignedTransaction::decode(bytes).map_err(|e| BlockCoordinatorError::InvalidTransaction {
                index,
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Encode an ordered list of transactions
pub fn encode_transactions(transactions: &[SignedTransaction]) -> Result<Vec<Vec<u8>>> {
    transactions.iter().map(SignedTransaction::encode).collect()
}
