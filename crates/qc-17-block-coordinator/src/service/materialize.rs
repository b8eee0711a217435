//! Descriptor -> block materialization
//!
//! The state root, receipts root and logs bloom are copied from the
//! descriptor as given. They are the proposer's claims and stay unverified
//! until local execution recomputes state (see
//! `CoordinatorConfig::verify_execution_roots`).

use crate::domain::{
    decode_transactions, derive_transactions_root, Block, BlockHeader, Bloom, BlsData,
    ExecutableL2Data,
};
use crate::error::Result;
use crate::ports::{ConsensusEngine, HeaderReader};

/// Rebuild a block from its wire descriptor.
///
/// The engine's prepare hook runs before any root is filled in, so
/// engine-specific header fields are part of the identity.
pub fn materialize_block(
    data: &ExecutableL2Data,
    bls_data: BlsData,
    engine: &dyn ConsensusEngine,
    chain: &dyn HeaderReader,
) -> Result<Block> {
    let mut header = BlockHeader {
        parent_hash: data.parent_hash,
        number: data.number,
        coinbase: data.miner,
        timestamp: data.timestamp,
        gas_limit: data.gas_limit,
        gas_used: data.gas_used,
        base_fee: data.base_fee,
        extra_data: data.extra_data.clone(),
        bls_data,
        ..BlockHeader::default()
    };
    engine.prepare(chain, &mut header);

    let transactions = decode_transactions(&data.transactions)?;
    header.transactions_root = derive_transactions_root(&transactions);
    header.receipts_root = data.receipts_root;
    header.state_root = data.state_root;
    header.logs_bloom = Bloom::from_slice(&data.logs_bloom)?;

    Ok(Block::new(header, transactions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BlockCoordinatorError;
    use crate::test_utils::*;

    #[test]
    fn test_roundtrip_identity_with_assembled_block() {
        let harness = Harness::new();
        let block = harness.build_child(&encoded_transactions(3));
        let data = ExecutableL2Data::from_block(&block).unwrap();

        let rebuilt = materialize_block(
            &data,
            BlsData::default(),
            harness.engine.as_ref(),
            harness.store.as_ref(),
        )
        .unwrap();

        assert_eq!(rebuilt.hash(), block.hash());
        assert_eq!(rebuilt.transactions().len(), 3);
    }

    #[test]
    fn test_prepare_hook_applied_before_hashing() {
        let harness = Harness::new();
        let data = ExecutableL2Data::from_block(&harness.build_child(&encoded_transactions(1)))
            .unwrap();

        let block = materialize_block(
            &data,
            BlsData::default(),
            harness.engine.as_ref(),
            harness.store.as_ref(),
        )
        .unwrap();

        assert_eq!(block.header().difficulty, FAKE_DIFFICULTY);
    }

    #[test]
    fn test_claimed_roots_copied_verbatim() {
        let harness = Harness::new();
        let mut data =
            ExecutableL2Data::from_block(&harness.build_child(&encoded_transactions(2))).unwrap();
        data.state_root = primitive_types::H256::repeat_byte(0xEE);

        let block = materialize_block(
            &data,
            BlsData::default(),
            harness.engine.as_ref(),
            harness.store.as_ref(),
        )
        .unwrap();

        assert_eq!(block.header().state_root, data.state_root);
        assert_eq!(block.header().receipts_root, data.receipts_root);
    }

    #[test]
    fn test_bad_transaction_reports_index() {
        let harness = Harness::new();
        let mut data =
            ExecutableL2Data::from_block(&harness.build_child(&encoded_transactions(4))).unwrap();
        data.transactions[3] = vec![0x00];

        let err = materialize_block(
            &data,
            BlsData::default(),
            harness.engine.as_ref(),
            harness.store.as_ref(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            BlockCoordinatorError::InvalidTransaction { index: 3, .. }
        ));
    }
}
