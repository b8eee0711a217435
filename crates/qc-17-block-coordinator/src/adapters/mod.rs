//! Primary adapters exposing the coordinator to the sequencer

pub mod rpc;

pub use rpc::{
    error_code, EngineRpcHandler, ENGINE_API_VERSION, ENGINE_NAMESPACE, METHOD_ASSEMBLE_L2_BLOCK,
    METHOD_NEW_L2_BLOCK, METHOD_VALIDATE_L2_BLOCK,
};
