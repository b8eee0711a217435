//! Deterministic fakes for the coordinator's outbound ports

use crate::config::CoordinatorConfig;
use crate::domain::{
    decode_transactions, derive_transactions_root, Address, Block, BlockHeader, ExecutableL2Data,
    Hash, Receipt, SignedTransaction,
};
use crate::ports::{
    BlockExecutor, BodyValidator, ChainStore, ConsensusEngine, HeaderReader, ProcessedBlock,
    SealedBlock, TimeSource,
};
use crate::service::{BlockCoordinator, CoordinatorDependencies};
use crate::utils::keccak_hash;
use async_trait::async_trait;
use primitive_types::{H256, U256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const FAKE_DIFFICULTY: U256 = U256([1, 0, 0, 0]);
pub const GENESIS_TIMESTAMP: u64 = 1_700_000_000;
pub const NOW: u64 = GENESIS_TIMESTAMP + 120;
pub const GAS_PER_TX: u64 = 21_000;

pub fn coinbase() -> Address {
    Address::repeat_byte(0xC0)
}

pub fn sample_transaction(nonce: u64) -> SignedTransaction {
    SignedTransaction {
        nonce,
        gas_price: U256::from(1_000_000_000u64),
        gas_limit: GAS_PER_TX,
        to: Some(Address::repeat_byte(0x42)),
        value: U256::from(nonce + 1),
        data: vec![],
        signature: vec![0xAB; 65],
    }
}

/// Encoded transactions with nonces `start..start + count`
pub fn encoded_transactions_from(start: u64, count: u64) -> Vec<Vec<u8>> {
    (start..start + count)
        .map(|nonce| sample_transaction(nonce).encode().unwrap())
        .collect()
}

pub fn encoded_transactions(count: u64) -> Vec<Vec<u8>> {
    encoded_transactions_from(0, count)
}

pub fn fake_state_root(parent_root: Hash, transactions_root: Hash) -> Hash {
    let mut bytes = parent_root.as_bytes().to_vec();
    bytes.extend_from_slice(transactions_root.as_bytes());
    keccak_hash(&bytes)
}

pub fn fake_receipts(transactions: &[SignedTransaction]) -> Vec<Receipt> {
    transactions
        .iter()
        .enumerate()
        .map(|(i, tx)| Receipt {
            tx_hash: tx.hash(),
            success: true,
            gas_used: GAS_PER_TX,
            cumulative_gas_used: GAS_PER_TX * (i as u64 + 1),
        })
        .collect()
}

pub fn fake_receipts_root(receipts: &[Receipt]) -> Hash {
    let bytes: Vec<u8> = receipts
        .iter()
        .flat_map(|r| r.tx_hash.as_bytes().to_vec())
        .collect();
    keccak_hash(&bytes)
}

/// What the fake executor would seal on top of `parent`
pub fn build_child_block(
    parent: &BlockHeader,
    timestamp: u64,
    transactions: Vec<SignedTransaction>,
    engine: &FakeEngine,
    chain: &dyn HeaderReader,
) -> Block {
    let receipts = fake_receipts(&transactions);
    let mut header = BlockHeader {
        parent_hash: parent.hash(),
        number: parent.number + 1,
        coinbase: coinbase(),
        timestamp,
        gas_limit: 30_000_000,
        gas_used: GAS_PER_TX * transactions.len() as u64,
        base_fee: Some(U256::from(1_000_000_000u64)),
        ..BlockHeader::default()
    };
    engine.prepare(chain, &mut header);
    header.transactions_root = derive_transactions_root(&transactions);
    header.state_root = fake_state_root(parent.state_root, header.transactions_root);
    header.receipts_root = fake_receipts_root(&receipts);
    Block::new(header, transactions)
}

pub fn genesis_block() -> Block {
    let header = BlockHeader {
        number: 0,
        timestamp: GENESIS_TIMESTAMP,
        gas_limit: 30_000_000,
        state_root: keccak_hash(b"genesis"),
        difficulty: FAKE_DIFFICULTY,
        ..BlockHeader::default()
    };
    Block::new(header, vec![])
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FakeState {
    pub root: Hash,
    pub block_number: u64,
}

pub struct FakeStore {
    blocks: Mutex<HashMap<Hash, Block>>,
    head: Mutex<Block>,
    committed: Mutex<Vec<(FakeState, Duration)>>,
    pub writes: AtomicU64,
    pub fail_writes: AtomicBool,
}

impl FakeStore {
    pub fn with_genesis() -> Self {
        let genesis = genesis_block();
        let mut blocks = HashMap::new();
        blocks.insert(genesis.hash(), genesis.clone());
        Self {
            blocks: Mutex::new(blocks),
            head: Mutex::new(genesis),
            committed: Mutex::new(Vec::new()),
            writes: AtomicU64::new(0),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn head(&self) -> Block {
        self.head.lock().unwrap().clone()
    }

    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn committed(&self) -> Vec<(FakeState, Duration)> {
        self.committed.lock().unwrap().clone()
    }
}

impl HeaderReader for FakeStore {
    fn current_header(&self) -> BlockHeader {
        self.head.lock().unwrap().header().clone()
    }

    fn header_by_hash(&self, hash: &Hash) -> Option<BlockHeader> {
        self.blocks
            .lock()
            .unwrap()
            .get(hash)
            .map(|b| b.header().clone())
    }
}

#[async_trait]
impl ChainStore<FakeState> for FakeStore {
    fn current_block(&self) -> Block {
        self.head()
    }

    async fn write_state_and_set_head(
        &self,
        block: Block,
        _receipts: Vec<Receipt>,
        state: FakeState,
        proc_time: Duration,
    ) -> Result<(), String> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err("disk full".to_string());
        }
        let mut head = self.head.lock().unwrap();
        if block.parent_hash() != head.hash() {
            return Err("block does not extend head".to_string());
        }
        self.blocks.lock().unwrap().insert(block.hash(), block.clone());
        self.committed.lock().unwrap().push((state, proc_time));
        *head = block;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeEngine {
    reject_reason: Mutex<Option<String>>,
}

impl FakeEngine {
    pub fn reject_with(&self, reason: &str) {
        *self.reject_reason.lock().unwrap() = Some(reason.to_string());
    }
}

impl ConsensusEngine for FakeEngine {
    fn prepare(&self, _chain: &dyn HeaderReader, header: &mut BlockHeader) {
        header.difficulty = FAKE_DIFFICULTY;
    }

    fn verify_header(
        &self,
        chain: &dyn HeaderReader,
        header: &BlockHeader,
        _seal: bool,
    ) -> Result<(), String> {
        if let Some(reason) = self.reject_reason.lock().unwrap().clone() {
            return Err(reason);
        }
        let parent = chain
            .header_by_hash(&header.parent_hash)
            .ok_or_else(|| "unknown ancestor".to_string())?;
        if header.timestamp < parent.timestamp {
            return Err("timestamp older than parent".to_string());
        }
        if header.difficulty != FAKE_DIFFICULTY {
            return Err("invalid difficulty".to_string());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Executor
// ---------------------------------------------------------------------------

pub struct FakeExecutor {
    store: Arc<FakeStore>,
    engine: Arc<FakeEngine>,
    pub sealing_builds: AtomicU64,
    pub reexecutions: AtomicU64,
    pub fail: AtomicBool,
    /// Seal only the first N transactions (simulates a full block)
    pub seal_limit: Mutex<Option<usize>>,
}

impl FakeExecutor {
    pub fn new(store: Arc<FakeStore>, engine: Arc<FakeEngine>) -> Self {
        Self {
            store,
            engine,
            sealing_builds: AtomicU64::new(0),
            reexecutions: AtomicU64::new(0),
            fail: AtomicBool::new(false),
            seal_limit: Mutex::new(None),
        }
    }

    pub fn sealing_builds(&self) -> u64 {
        self.sealing_builds.load(Ordering::SeqCst)
    }

    pub fn reexecutions(&self) -> u64 {
        self.reexecutions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlockExecutor for FakeExecutor {
    type State = FakeState;

    async fn build_sealing_block(
        &self,
        parent_hash: Hash,
        timestamp: u64,
        mut transactions: Vec<SignedTransaction>,
    ) -> Result<SealedBlock<FakeState>, String> {
        self.sealing_builds.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err("out of gas".to_string());
        }
        let parent = self
            .store
            .header_by_hash(&parent_hash)
            .ok_or_else(|| "unknown parent".to_string())?;
        if let Some(limit) = *self.seal_limit.lock().unwrap() {
            transactions.truncate(limit);
        }

        let block = build_child_block(
            &parent,
            timestamp,
            transactions,
            &self.engine,
            self.store.as_ref(),
        );
        let receipts = fake_receipts(block.transactions());
        let state = FakeState {
            root: block.header().state_root,
            block_number: block.number(),
        };
        Ok(SealedBlock {
            block,
            state,
            receipts,
        })
    }

    async fn process_block(
        &self,
        block: &Block,
        parent: &BlockHeader,
    ) -> Result<ProcessedBlock<FakeState>, String> {
        self.reexecutions.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err("invalid nonce".to_string());
        }
        let root = fake_state_root(parent.state_root, block.transactions_root());
        Ok(ProcessedBlock {
            state: FakeState {
                root,
                block_number: block.number(),
            },
            state_root: root,
            receipts: fake_receipts(block.transactions()),
            proc_time: Duration::from_millis(5),
        })
    }
}

// ---------------------------------------------------------------------------
// Body validator / clock
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeBodyValidator {
    pub reject: AtomicBool,
}

impl BodyValidator for FakeBodyValidator {
    fn validate_body(&self, block: &Block) -> Result<(), String> {
        if self.reject.load(Ordering::SeqCst) {
            return Err("uncles not allowed".to_string());
        }
        if derive_transactions_root(block.transactions()) != block.transactions_root() {
            return Err("transaction root hash mismatch".to_string());
        }
        Ok(())
    }
}

pub struct FixedTimeSource(pub u64);

impl TimeSource for FixedTimeSource {
    fn now(&self) -> u64 {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub type TestCoordinator = BlockCoordinator<FakeEngine, FakeExecutor, FakeBodyValidator, FakeStore>;

pub struct Harness {
    pub engine: Arc<FakeEngine>,
    pub executor: Arc<FakeExecutor>,
    pub body_validator: Arc<FakeBodyValidator>,
    pub store: Arc<FakeStore>,
    pub coordinator: Arc<TestCoordinator>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(CoordinatorConfig::default())
    }

    pub fn with_config(config: CoordinatorConfig) -> Self {
        let engine = Arc::new(FakeEngine::default());
        let store = Arc::new(FakeStore::with_genesis());
        let executor = Arc::new(FakeExecutor::new(Arc::clone(&store), Arc::clone(&engine)));
        let body_validator = Arc::new(FakeBodyValidator::default());

        let coordinator = BlockCoordinator::new(CoordinatorDependencies {
            engine: Arc::clone(&engine),
            executor: Arc::clone(&executor),
            body_validator: Arc::clone(&body_validator),
            store: Arc::clone(&store),
            config,
        })
        .unwrap()
        .with_time_source(Box::new(FixedTimeSource(NOW)));

        Self {
            engine,
            executor,
            body_validator,
            store,
            coordinator: Arc::new(coordinator),
        }
    }

    /// Block the fake executor would build on the current head
    pub fn build_child(&self, encoded: &[Vec<u8>]) -> Block {
        let transactions = decode_transactions(encoded).unwrap();
        build_child_block(
            &self.store.current_header(),
            NOW,
            transactions,
            &self.engine,
            self.store.as_ref(),
        )
    }

    /// Descriptor of [`Harness::build_child`], as another node would propose it
    pub fn child_descriptor(&self, encoded: &[Vec<u8>]) -> ExecutableL2Data {
        ExecutableL2Data::from_block(&self.build_child(encoded)).unwrap()
    }

    pub fn head_hash(&self) -> H256 {
        self.store.head().hash()
    }
}
