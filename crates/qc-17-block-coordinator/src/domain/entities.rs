//! Domain entities for L2 block coordination

use super::transaction::{encode_transactions, SignedTransaction};
use crate::error::{BlockCoordinatorError, Result};
use crate::utils::hex_serde::{hex_bytes, hex_bytes_list};
use crate::utils::{u256_to_be_bytes, update_with_len};
use primitive_types::{H160, H256, U256};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

/// 32-byte hash
pub type Hash = H256;

/// 20-byte account address
pub type Address = H160;

/// Bloom filter size in bytes
pub const BLOOM_BYTE_LENGTH: usize = 256;

/// 2048-bit logs bloom
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bloom([u8; BLOOM_BYTE_LENGTH]);

impl Default for Bloom {
    fn default() -> Self {
        Self([0u8; BLOOM_BYTE_LENGTH])
    }
}

impl Bloom {
    /// Build a bloom from wire bytes, right-aligned.
    ///
    /// Shorter input is left-padded with zeros; longer input is rejected.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() > BLOOM_BYTE_LENGTH {
            return Err(BlockCoordinatorError::InvalidLogsBloom {
                length: bytes.len(),
                max: BLOOM_BYTE_LENGTH,
            });
        }
        let mut bloom = [0u8; BLOOM_BYTE_LENGTH];
        bloom[BLOOM_BYTE_LENGTH - bytes.len()..].copy_from_slice(bytes);
        Ok(Self(bloom))
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Aggregate-signature data the sequencer attaches when committing a block
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlsData {
    /// Bitmap of validators that took part in the aggregate
    #[serde(with = "hex_bytes", default)]
    pub signers: Vec<u8>,

    /// Aggregate BLS signature
    #[serde(with = "hex_bytes", default)]
    pub signature: Vec<u8>,
}

impl BlsData {
    /// No aggregate attached
    pub fn is_empty(&self) -> bool {
        self.signers.is_empty() && self.signature.is_empty()
    }
}

/// L2 block header
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockHeader {
    /// Parent block hash
    pub parent_hash: Hash,
    /// Block number (height)
    pub number: u64,
    /// Fee recipient
    pub coinbase: Address,
    /// Unix timestamp
    pub timestamp: u64,
    /// Gas limit for this block
    pub gas_limit: u64,
    /// Gas used in this block
    pub gas_used: u64,
    /// Base fee per gas (absent before the fee-market fork)
    pub base_fee: Option<U256>,
    /// Extra data
    pub extra_data: Vec<u8>,
    /// Post-execution state root
    pub state_root: Hash,
    /// Receipts root
    pub receipts_root: Hash,
    /// Transaction root, derived from the body
    pub transactions_root: Hash,
    /// Logs bloom
    pub logs_bloom: Bloom,
    /// Difficulty, filled by the consensus engine
    pub difficulty: U256,
    /// Aggregate signature attached on commit
    pub bls_data: BlsData,
}

impl BlockHeader {
    /// Content hash: the block's identity.
    ///
    /// Covers every header field, including the aggregate signature data, so
    /// two headers that differ only in `bls_data` are different blocks.
    pub fn hash(&self) -> Hash {
        let mut hasher = Keccak256::new();
        hasher.update(self.parent_hash.as_bytes());
        hasher.update(self.number.to_be_bytes());
        hasher.update(self.coinbase.as_bytes());
        hasher.update(self.timestamp.to_be_bytes());
        hasher.update(self.gas_limit.to_be_bytes());
        hasher.update(self.gas_used.to_be_bytes());
        match self.base_fee {
            Some(fee) => {
                hasher.update([1u8]);
                hasher.update(u256_to_be_bytes(fee));
            }
            None => hasher.update([0u8]),
        }
        update_with_len(&mut hasher, &self.extra_data);
        hasher.update(self.state_root.as_bytes());
        hasher.update(self.receipts_root.as_bytes());
        hasher.update(self.transactions_root.as_bytes());
        hasher.update(self.logs_bloom.as_bytes());
        hasher.update(u256_to_be_bytes(self.difficulty));
        update_with_len(&mut hasher, &self.bls_data.signers);
        update_with_len(&mut hasher, &self.bls_data.signature);
        H256(hasher.finalize().into())
    }
}

/// A materialized block: header plus decoded body
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    header: BlockHeader,
    transactions: Vec<SignedTransaction>,
    hash: Hash,
}

impl Block {
    /// Seal a header and body together, fixing the block's identity
    pub fn new(header: BlockHeader, transactions: Vec<SignedTransaction>) -> Self {
        let hash = header.hash();
        Self {
            header,
            transactions,
            hash,
        }
    }

    /// Content hash
    pub fn hash(&self) -> Hash {
        self.hash
    }

    /// Header
    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    /// Decoded transactions in block order
    pub fn transactions(&self) -> &[SignedTransaction] {
        &self.transactions
    }

    /// Block number
    pub fn number(&self) -> u64 {
        self.header.number
    }

    /// Parent hash
    pub fn parent_hash(&self) -> Hash {
        self.header.parent_hash
    }

    /// Transaction root
    pub fn transactions_root(&self) -> Hash {
        self.header.transactions_root
    }
}

/// Receipt produced by executing one transaction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    /// Hash of the executed transaction
    pub tx_hash: Hash,
    /// Execution status
    pub success: bool,
    /// Gas consumed by this transaction
    pub gas_used: u64,
    /// Gas consumed up to and including this transaction
    pub cumulative_gas_used: u64,
}

/// Candidate block descriptor exchanged with the sequencer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutableL2Data {
    /// Parent block hash
    pub parent_hash: Hash,
    /// Block number
    pub number: u64,
    /// Fee recipient
    pub miner: Address,
    /// Unix timestamp
    pub timestamp: u64,
    /// Gas limit
    pub gas_limit: u64,
    /// Base fee per gas
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_fee: Option<U256>,
    /// Extra data
    #[serde(with = "hex_bytes", default)]
    pub extra_data: Vec<u8>,
    /// Encoded transactions in block order
    #[serde(with = "hex_bytes_list")]
    pub transactions: Vec<Vec<u8>>,

    /// Claimed post-execution state root (trusted until re-executed)
    pub state_root: Hash,
    /// Gas used
    pub gas_used: u64,
    /// Claimed receipts root (trusted until re-executed)
    pub receipts_root: Hash,
    /// Claimed logs bloom
    #[serde(with = "hex_bytes")]
    pub logs_bloom: Vec<u8>,
}

impl ExecutableL2Data {
    /// Describe a block for the wire
    pub fn from_block(block: &Block) -> Result<Self> {
        let header = block.header();
        Ok(Self {
            parent_hash: header.parent_hash,
            number: header.number,
            miner: header.coinbase,
            timestamp: header.timestamp,
            gas_limit: header.gas_limit,
            base_fee: header.base_fee,
            extra_data: header.extra_data.clone(),
            transactions: encode_transactions(block.transactions())?,
            state_root: header.state_root,
            gas_used: header.gas_used,
            receipts_root: header.receipts_root,
            logs_bloom: header.logs_bloom.as_bytes().to_vec(),
        })
    }
}

/// Parameters of an assemble request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssembleL2BlockParams {
    /// Block number to build (must be head + 1)
    pub number: u64,
    /// Encoded transactions to include
    #[serde(with = "hex_bytes_list")]
    pub transactions: Vec<Vec<u8>>,
}

/// Validation verdict
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericResponse {
    /// Whether the block is valid
    pub success: bool,
}

impl GenericResponse {
    /// Block accepted
    pub fn valid() -> Self {
        Self { success: true }
    }

    /// Block rejected
    pub fn invalid() -> Self {
        Self { success: false }
    }
}

/// Outcome of an assemble request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssembleOutcome {
    /// A candidate was built and cached
    Assembled(ExecutableL2Data),

    /// The executor produced an empty body; nothing was cached
    NoCandidate,
}

impl AssembleOutcome {
    /// The descriptor, if a candidate was built
    pub fn into_candidate(self) -> Option<ExecutableL2Data> {
        match self {
            Self::Assembled(data) => Some(data),
            Self::NoCandidate => None,
        }
    }
}
