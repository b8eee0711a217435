//! Inbound ports (driving side - control API)

use crate::domain::{
    AssembleL2BlockParams, AssembleOutcome, BlsData, ExecutableL2Data, GenericResponse,
};
use crate::error::Result;
use async_trait::async_trait;

/// Primary port: the L2 engine API driven by the sequencer
///
/// All three calls read the live chain head. Implementations must serialize
/// them so that a head read, the comparison against it, and any resulting
/// head advance happen without another call interleaving.
#[async_trait]
pub trait L2EngineApi: Send + Sync {
    /// Build and execute a candidate block on top of the current head.
    ///
    /// Returns [`AssembleOutcome::NoCandidate`] when execution yields an
    /// empty body. Nothing is committed either way.
    async fn assemble_l2_block(&self, params: AssembleL2BlockParams) -> Result<AssembleOutcome>;

    /// Check a candidate block.
    ///
    /// An invalid block is a `success: false` response, not an error. Errors
    /// are reserved for requests that cannot be evaluated at all
    /// (discontinuous number, wrong parent, undecodable transactions).
    async fn validate_l2_block(&self, data: ExecutableL2Data) -> Result<GenericResponse>;

    /// Make a block the new canonical head.
    ///
    /// `bls` is attached to the header before hashing. Any failure, including
    /// a verification failure, is an error.
    async fn new_l2_block(&self, data: ExecutableL2Data, bls: BlsData) -> Result<()>;
}
