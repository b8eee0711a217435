//! JSON-RPC adapter for the L2 engine API
//!
//! Exposes the coordinator under the authenticated `engine` namespace.
//! Parameters are positional arrays, as sent by the sequencer.
//!
//! **Architecture:** Hexagonal - primary adapter in front of [`L2EngineApi`]

use crate::config::ChainConfig;
use crate::domain::{AssembleL2BlockParams, AssembleOutcome, BlsData, ExecutableL2Data};
use crate::error::{BlockCoordinatorError, Result};
use crate::ports::L2EngineApi;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// RPC namespace the API is registered under
pub const ENGINE_NAMESPACE: &str = "engine";

/// Version string advertised at registration
pub const ENGINE_API_VERSION: &str = "1.0";

/// Build a candidate on top of the head
pub const METHOD_ASSEMBLE_L2_BLOCK: &str = "engine_assembleL2Block";

/// Verify a candidate and cache its execution
pub const METHOD_VALIDATE_L2_BLOCK: &str = "engine_validateL2Block";

/// Commit a candidate as the new head
pub const METHOD_NEW_L2_BLOCK: &str = "engine_newL2Block";

/// JSON-RPC "method not found"
pub const CODE_METHOD_NOT_FOUND: i64 = -32601;

/// JSON-RPC "invalid params"
pub const CODE_INVALID_PARAMS: i64 = -32602;

/// Generic server error for everything the API itself rejects
pub const CODE_SERVER_ERROR: i64 = -32000;

/// Dispatches `engine_*` calls onto an [`L2EngineApi`]
pub struct EngineRpcHandler<A: L2EngineApi> {
    api: Arc<A>,
}

impl<A: L2EngineApi> EngineRpcHandler<A> {
    /// Register the API for a chain.
    ///
    /// Chains without a terminal total difficulty never reach the merged
    /// phase the API depends on, so registration fails for them.
    pub fn register(api: Arc<A>, chain: &ChainConfig) -> Result<Self> {
        if chain.terminal_total_difficulty.is_none() {
            warn!(
                "[qc-17] Chain {} has no terminal total difficulty, engine API not registered",
                chain.chain_id
            );
            return Err(BlockCoordinatorError::MissingTerminalTotalDifficulty);
        }

        info!(
            "[qc-17] Registered {} API v{} for chain {}",
            ENGINE_NAMESPACE, ENGINE_API_VERSION, chain.chain_id
        );
        Ok(Self { api })
    }

    /// Method names served by this handler
    pub fn methods(&self) -> [&'static str; 3] {
        [
            METHOD_ASSEMBLE_L2_BLOCK,
            METHOD_VALIDATE_L2_BLOCK,
            METHOD_NEW_L2_BLOCK,
        ]
    }

    /// Handle one call. `params` is the request's positional array.
    pub async fn handle(&self, method: &str, params: Value) -> Result<Value> {
        debug!("[qc-17] RPC {}", method);

        match method {
            METHOD_ASSEMBLE_L2_BLOCK => {
                let request: AssembleL2BlockParams = parse_param(&params, 0)?;
                match self.api.assemble_l2_block(request).await? {
                    AssembleOutcome::Assembled(data) => to_value(&data),
                    AssembleOutcome::NoCandidate => Ok(Value::Null),
                }
            }
            METHOD_VALIDATE_L2_BLOCK => {
                let data: ExecutableL2Data = parse_param(&params, 0)?;
                let response = self.api.validate_l2_block(data).await?;
                to_value(&response)
            }
            METHOD_NEW_L2_BLOCK => {
                let data: ExecutableL2Data = parse_param(&params, 0)?;
                let bls: BlsData = parse_param(&params, 1)?;
                self.api.new_l2_block(data, bls).await?;
                Ok(Value::Null)
            }
            other => Err(BlockCoordinatorError::UnknownMethod(other.to_string())),
        }
    }
}

/// JSON-RPC error code for a failed call
pub fn error_code(err: &BlockCoordinatorError) -> i64 {
    match err {
        BlockCoordinatorError::UnknownMethod(_) => CODE_METHOD_NOT_FOUND,
        BlockCoordinatorError::InvalidParams(_) => CODE_INVALID_PARAMS,
        _ => CODE_SERVER_ERROR,
    }
}

fn parse_param<T: DeserializeOwned>(params: &Value, index: usize) -> Result<T> {
    let param = params
        .as_array()
        .and_then(|p| p.get(index))
        .ok_or_else(|| {
            BlockCoordinatorError::InvalidParams(format!("missing parameter at index {}", index))
        })?;

    serde_json::from_value(param.clone()).map_err(|e| {
        BlockCoordinatorError::InvalidParams(format!("invalid parameter at index {}: {}", index, e))
    })
}

fn to_value<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| BlockCoordinatorError::SerializationError(e.to_string()))
}
