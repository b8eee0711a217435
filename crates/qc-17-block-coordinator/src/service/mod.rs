//! Block Coordinator - concrete implementation of the L2 engine API
//!
//! Three calls from the sequencer drive this service:
//!
//! ```text
//!   assemble ──► executor.build_sealing_block ──► cache[hash] = result
//!   validate ──► cache hit? ─yes─► valid
//!                   │no
//!                   └─► engine + policy + body checks ──► executor.process_block
//!                                                         └─► cache[hash] = result
//!   commit   ──► cache hit? ─yes─► store.write_state_and_set_head(cached) ──► clear cache
//!                   │no
//!                   └─► engine + policy checks ──► process_block ──► write ──► clear cache
//! ```
//!
//! Every call holds the coordinator lock from its head read to its last
//! mutation, so the head cannot move under a call and a post-commit clear is
//! atomic with respect to inserts.

mod materialize;


pub use materialize::materialize_block;

use crate::{
    config::CoordinatorConfig,
    domain::{
        decode_transactions, AssembleL2BlockParams, AssembleOutcome, Block, BlockHeader,
        BlsData, ExecutableL2Data, ExecutionResult, GenericResponse, Hash, VerifiedCache,
        EMPTY_TRANSACTIONS_ROOT,
    },
    error::{BlockCoordinatorError, Result},
    metrics::Metrics,
    ports::{
        BlockExecutor, BodyValidator, ChainStore, ConsensusEngine, HeaderReader, L2EngineApi,
        SystemTimeSource, TimeSource,
    },
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Dependencies for BlockCoordinator
pub struct CoordinatorDependencies<E, X, V, S> {
    /// Consensus engine (prepare / verify header)
    pub engine: Arc<E>,
    /// State-transition executor
    pub executor: Arc<X>,
    /// Structural body validator
    pub body_validator: Arc<V>,
    /// Chain store (head access, write-and-advance)
    pub store: Arc<S>,
    /// Runtime configuration
    pub config: CoordinatorConfig,
}

/// Concrete implementation of [`L2EngineApi`]
///
/// Owns the verified-result cache; the mapping itself is never handed out.
pub struct BlockCoordinator<E, X, V, S>
where
    E: ConsensusEngine,
    X: BlockExecutor,
    V: BodyValidator,
    S: ChainStore<X::State>,
{
    engine: Arc<E>,
    executor: Arc<X>,
    body_validator: Arc<V>,
    store: Arc<S>,
    config: CoordinatorConfig,
    /// Coordinator-wide lock: guards the cache and every head read/compare/advance
    verified: Mutex<VerifiedCache<X::State>>,
    metrics: Metrics,
    time_source: Box<dyn TimeSource>,
}

impl<E, X, V, S> BlockCoordinator<E, X, V, S>
where
    E: ConsensusEngine,
    X: BlockExecutor,
    V: BodyValidator,
    S: ChainStore<X::State>,
{
    /// Create a new coordinator
    pub fn new(deps: CoordinatorDependencies<E, X, V, S>) -> Result<Self> {
        deps.config.validate()?;

        info!("[qc-17] Initializing L2 Block Coordinator");
        info!("  Chain ID: {}", deps.config.chain.chain_id);
        info!("  Max Txs Per Block: {:?}", deps.config.chain.max_tx_per_block);
        info!("  Verify Execution Roots: {}", deps.config.verify_execution_roots);

        Ok(Self {
            engine: deps.engine,
            executor: deps.executor,
            body_validator: deps.body_validator,
            store: deps.store,
            config: deps.config,
            verified: Mutex::new(VerifiedCache::new()),
            metrics: Metrics::new(),
            time_source: Box::new(SystemTimeSource),
        })
    }

    /// Set custom time source (for testing)
    pub fn with_time_source(mut self, time_source: Box<dyn TimeSource>) -> Self {
        self.time_source = time_source;
        self
    }

    /// Activity counters
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Number of execution results awaiting commit
    pub async fn cached_results(&self) -> usize {
        self.verified.lock().await.len()
    }

    fn chain(&self) -> &dyn HeaderReader {
        self.store.as_ref()
    }

    /// Number must be head + 1 and, when given, parent must be the head
    fn ensure_extends_head(
        head: &BlockHeader,
        head_hash: Hash,
        number: u64,
        parent_hash: Option<Hash>,
    ) -> Result<()> {
        let expected = head.number + 1;
        if number != expected {
            warn!(
                "[qc-17] Cannot process block with discontinuous block number: expected {}, actual {}",
                expected, number
            );
            return Err(BlockCoordinatorError::DiscontinuousBlockNumber {
                expected,
                actual: number,
            });
        }
        if let Some(parent_hash) = parent_hash {
            if parent_hash != head_hash {
                warn!(
                    "[qc-17] Wrong parent hash: expected {:?}, actual {:?}",
                    head_hash, parent_hash
                );
                return Err(BlockCoordinatorError::WrongParentHash {
                    expected: head_hash,
                    actual: parent_hash,
                });
            }
        }
        Ok(())
    }

    /// Engine rules plus the chain's transaction-count policy
    fn verify_block(&self, block: &Block) -> Result<()> {
        self.engine
            .verify_header(self.chain(), block.header(), false)
            .map_err(BlockCoordinatorError::HeaderVerificationFailed)?;

        let count = block.transactions().len();
        if !self.config.chain.is_valid_tx_count(count) {
            return Err(BlockCoordinatorError::InvalidTxCount { count });
        }
        Ok(())
    }

    fn check_state_root(&self, block: &Block, computed: Hash) -> Result<()> {
        let claimed = block.header().state_root;
        if self.config.verify_execution_roots && claimed != computed {
            return Err(BlockCoordinatorError::StateRootMismatch { claimed, computed });
        }
        Ok(())
    }

    fn note_cache_size(&self, size: usize) {
        if size > self.config.cache_warn_threshold {
            warn!(
                "[qc-17] {} execution results cached without a commit (threshold {})",
                size, self.config.cache_warn_threshold
            );
        }
    }

    fn reject(&self, reason: impl std::fmt::Display) -> GenericResponse {
        warn!("[qc-17] Block rejected: {}", reason);
        self.metrics.record_validation(false);
        GenericResponse::invalid()
    }
}

#[async_trait]
impl<E, X, V, S> L2EngineApi for BlockCoordinator<E, X, V, S>
where
    E: ConsensusEngine + 'static,
    X: BlockExecutor + 'static,
    V: BodyValidator + 'static,
    S: ChainStore<X::State> + 'static,
{
    async fn assemble_l2_block(&self, params: AssembleL2BlockParams) -> Result<AssembleOutcome> {
        info!("[qc-17] Producing block #{}", params.number);

        let mut verified = self.verified.lock().await;

        let parent = self.store.current_header();
        let parent_hash = parent.hash();
        Self::ensure_extends_head(&parent, parent_hash, params.number, None)?;

        let transactions = decode_transactions(&params.transactions)?;

        let start = Instant::now();
        let sealed = self
            .executor
            .build_sealing_block(parent_hash, self.time_source.now(), transactions)
            .await
            .map_err(BlockCoordinatorError::ExecutionFailed)?;
        let proc_time = start.elapsed();

        if sealed.block.transactions_root() == EMPTY_TRANSACTIONS_ROOT {
            debug!(
                "[qc-17] Block #{} has no transactions, nothing to produce",
                params.number
            );
            self.metrics.record_empty_assembly();
            return Ok(AssembleOutcome::NoCandidate);
        }

        let data = ExecutableL2Data::from_block(&sealed.block)?;
        let hash = sealed.block.hash();
        let tx_count = sealed.block.transactions().len();

        verified.insert(ExecutionResult {
            block: sealed.block,
            state: sealed.state,
            receipts: sealed.receipts,
            proc_time,
        });
        self.metrics.record_assembled();
        self.note_cache_size(verified.len());

        info!(
            "[qc-17] Assembled block #{} {:?} ({} txs, {:?})",
            data.number, hash, tx_count, proc_time
        );
        Ok(AssembleOutcome::Assembled(data))
    }

    async fn validate_l2_block(&self, data: ExecutableL2Data) -> Result<GenericResponse> {
        let mut verified = self.verified.lock().await;

        let parent = self.store.current_block();
        Self::ensure_extends_head(
            parent.header(),
            parent.hash(),
            data.number,
            Some(data.parent_hash),
        )?;

        let block = materialize_block(&data, BlsData::default(), self.engine.as_ref(), self.chain())?;
        let hash = block.hash();

        if verified.contains(&hash) {
            debug!("[qc-17] Block #{} {:?} already verified", block.number(), hash);
            self.metrics.record_cache_hit();
            self.metrics.record_validation(true);
            return Ok(GenericResponse::valid());
        }

        if let Err(e) = self.verify_block(&block) {
            return Ok(self.reject(e));
        }

        if let Err(e) = self.body_validator.validate_body(&block) {
            error!("[qc-17] Error validating body of block #{}: {}", block.number(), e);
            return Ok(self.reject(e));
        }

        self.metrics.record_reexecution();
        let processed = match self.executor.process_block(&block, parent.header()).await {
            Ok(processed) => processed,
            Err(e) => {
                error!("[qc-17] Error processing block #{}: {}", block.number(), e);
                return Ok(self.reject(e));
            }
        };

        if let Err(e) = self.check_state_root(&block, processed.state_root) {
            return Ok(self.reject(e));
        }

        debug!(
            "[qc-17] Validated block #{} {:?} in {:?}",
            block.number(),
            hash,
            processed.proc_time
        );
        verified.insert(ExecutionResult {
            block,
            state: processed.state,
            receipts: processed.receipts,
            proc_time: processed.proc_time,
        });
        self.metrics.record_validation(true);
        self.note_cache_size(verified.len());

        Ok(GenericResponse::valid())
    }

    async fn new_l2_block(&self, data: ExecutableL2Data, bls: BlsData) -> Result<()> {
        let mut verified = self.verified.lock().await;

        let parent = self.store.current_block();
        Self::ensure_extends_head(
            parent.header(),
            parent.hash(),
            data.number,
            Some(data.parent_hash),
        )?;

        let block = materialize_block(&data, bls, self.engine.as_ref(), self.chain())?;
        let hash = block.hash();

        if let Some(cached) = verified.take(&hash) {
            self.metrics.record_cache_hit();
            let number = cached.block.number();
            let proc_time = cached.proc_time;

            self.store
                .write_state_and_set_head(cached.block, cached.receipts, cached.state, proc_time)
                .await
                .map_err(|e| {
                    error!("[qc-17] Failed to write block #{}: {}", number, e);
                    BlockCoordinatorError::StoreWriteFailed(e)
                })?;

            let discarded = verified.clear();
            self.metrics
                .record_commit(proc_time.as_micros() as u64, discarded);
            info!(
                "[qc-17] New head #{} {:?} (cached execution reused)",
                number, hash
            );
            debug!("[qc-17] Discarded {} stale candidates", discarded);
            return Ok(());
        }

        if let Err(e) = self.verify_block(&block) {
            error!("[qc-17] Failed to verify block #{}: {}", block.number(), e);
            return Err(e);
        }

        self.metrics.record_reexecution();
        let processed = self
            .executor
            .process_block(&block, parent.header())
            .await
            .map_err(|e| {
                error!("[qc-17] Error processing block #{}: {}", block.number(), e);
                BlockCoordinatorError::ExecutionFailed(e)
            })?;

        if let Err(e) = self.check_state_root(&block, processed.state_root) {
            error!("[qc-17] Refusing to commit block #{}: {}", block.number(), e);
            return Err(e);
        }

        let number = block.number();
        let proc_time = processed.proc_time;
        self.store
            .write_state_and_set_head(block, processed.receipts, processed.state, proc_time)
            .await
            .map_err(|e| {
                error!("[qc-17] Failed to write block #{}: {}", number, e);
                BlockCoordinatorError::StoreWriteFailed(e)
            })?;

        let discarded = verified.clear();
        self.metrics
            .record_commit(proc_time.as_micros() as u64, discarded);
        info!("[qc-17] New head #{} {:?} (re-executed)", number, hash);
        if discarded > 0 {
            debug!("[qc-17] Discarded {} stale candidates", discarded);
        }
        Ok(())
    }
}
