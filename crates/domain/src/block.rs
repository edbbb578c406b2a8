//! Block types.

use alloy_primitives::{keccak256, B256};

use crate::TxRecord;

/// A sealed block in the simulated chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    /// Block number, 0 for genesis.
    pub number: u64,
    /// Seal timestamp in seconds since the Unix epoch.
    pub timestamp: u64,
    /// Hash of the parent block, zero for genesis.
    pub parent_hash: B256,
    /// Commitment over the account state after this block.
    pub state_root: B256,
    /// Block hash.
    pub hash: B256,
    /// Transactions included in the block.
    pub transactions: Vec<TxRecord>,
}

impl Block {
    /// Seal a block, computing its hash from number, parent, state root, and
    /// the included transaction hashes. The timestamp is excluded so replays
    /// from the same genesis produce identical hashes.
    pub fn seal(
        number: u64,
        timestamp: u64,
        parent_hash: B256,
        state_root: B256,
        transactions: Vec<TxRecord>,
    ) -> Self {
        let mut buf = Vec::with_capacity(72 + transactions.len() * 32);
        buf.extend_from_slice(&number.to_be_bytes());
        buf.extend_from_slice(parent_hash.as_slice());
        buf.extend_from_slice(state_root.as_slice());
        for tx in &transactions {
            buf.extend_from_slice(tx.hash.as_slice());
        }
        let hash = keccak256(&buf);
        Self { number, timestamp, parent_hash, state_root, hash, transactions }
    }

    /// Seal the genesis block: number 0, no parent, no transactions.
    pub fn genesis(timestamp: u64, state_root: B256) -> Self {
        Self::seal(0, timestamp, B256::ZERO, state_root, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_has_no_transactions() {
        let block = Block::genesis(0, B256::repeat_byte(0xcd));
        assert_eq!(block.number, 0);
        assert_eq!(block.parent_hash, B256::ZERO);
        assert!(block.transactions.is_empty());
    }

    #[test]
    fn hash_is_deterministic_across_timestamps() {
        let root = B256::repeat_byte(0xcd);
        let a = Block::seal(1, 100, B256::ZERO, root, Vec::new());
        let b = Block::seal(1, 999, B256::ZERO, root, Vec::new());
        assert_eq!(a.hash, b.hash);
    }

    #[test]
    fn hash_differs_by_number() {
        let root = B256::repeat_byte(0xcd);
        let a = Block::seal(1, 0, B256::ZERO, root, Vec::new());
        let b = Block::seal(2, 0, B256::ZERO, root, Vec::new());
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn hash_differs_by_parent() {
        let root = B256::repeat_byte(0xcd);
        let a = Block::seal(1, 0, B256::ZERO, root, Vec::new());
        let b = Block::seal(1, 0, B256::repeat_byte(0x01), root, Vec::new());
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn hash_differs_by_state_root() {
        let a = Block::seal(1, 0, B256::ZERO, B256::repeat_byte(0x01), Vec::new());
        let b = Block::seal(1, 0, B256::ZERO, B256::repeat_byte(0x02), Vec::new());
        assert_ne!(a.hash, b.hash);
    }
}
