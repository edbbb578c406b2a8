//! Transaction intents and sealed records.

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};

/// A transaction or call as submitted by a client, before validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxIntent {
    /// Sender address.
    pub from: Address,
    /// Recipient address, `None` for contract creation.
    pub to: Option<Address>,
    /// Value to transfer.
    pub value: U256,
    /// Gas limit.
    pub gas: u64,
    /// Gas price.
    pub gas_price: U256,
    /// Nonce, `None` to use the sender's current nonce.
    pub nonce: Option<u64>,
    /// Input data.
    pub input: Bytes,
}

impl TxIntent {
    /// Default gas limit when a request omits one.
    pub const DEFAULT_GAS: u64 = 90_000;

    /// Create a plain value transfer intent.
    pub fn transfer(from: Address, to: Address, value: U256) -> Self {
        Self {
            from,
            to: Some(to),
            value,
            gas: Self::DEFAULT_GAS,
            gas_price: U256::ZERO,
            nonce: None,
            input: Bytes::new(),
        }
    }

    /// Set an explicit nonce.
    #[must_use]
    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Compute the transaction hash for this intent.
    ///
    /// Derived from the intent fields, the resolved nonce, and the ledger's
    /// application sequence, so replaying the same intents from the same
    /// genesis always reproduces the same hashes.
    pub fn hash_with(&self, nonce: u64, sequence: u64) -> B256 {
        let mut buf = Vec::with_capacity(128 + self.input.len());
        buf.extend_from_slice(self.from.as_slice());
        match self.to {
            Some(to) => buf.extend_from_slice(to.as_slice()),
            None => buf.push(0xff),
        }
        buf.extend_from_slice(&self.value.to_be_bytes::<32>());
        buf.extend_from_slice(&nonce.to_be_bytes());
        buf.extend_from_slice(self.input.as_ref());
        buf.extend_from_slice(&sequence.to_be_bytes());
        keccak256(&buf)
    }
}

/// Lifecycle status of a transaction record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxStatus {
    /// Accepted but not yet sealed into a block.
    Pending,
    /// Applied successfully.
    Success,
    /// Rejected during application.
    Failed,
}

/// A transaction as sealed into a block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxRecord {
    /// Deterministic transaction hash.
    pub hash: B256,
    /// Sender address.
    pub from: Address,
    /// Recipient address, `None` for contract creation.
    pub to: Option<Address>,
    /// Value transferred.
    pub value: U256,
    /// Gas limit.
    pub gas: u64,
    /// Gas price.
    pub gas_price: U256,
    /// Nonce consumed by this transaction.
    pub nonce: u64,
    /// Input data.
    pub input: Bytes,
    /// Final status.
    pub status: TxStatus,
    /// Gas metered for this transaction.
    pub gas_used: u64,
    /// Created contract address, if this was a creation.
    pub contract_address: Option<Address>,
    /// Number of the block that sealed this record.
    pub block_number: u64,
    /// Index within the sealing block.
    pub index: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent() -> TxIntent {
        TxIntent::transfer(Address::repeat_byte(0x01), Address::repeat_byte(0x02), U256::from(30))
    }

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(intent().hash_with(0, 0), intent().hash_with(0, 0));
    }

    #[test]
    fn hash_differs_by_sequence() {
        assert_ne!(intent().hash_with(0, 0), intent().hash_with(0, 1));
    }

    #[test]
    fn hash_differs_by_nonce() {
        assert_ne!(intent().hash_with(0, 0), intent().hash_with(1, 0));
    }

    #[test]
    fn hash_differs_by_recipient() {
        let mut other = intent();
        other.to = None;
        assert_ne!(intent().hash_with(0, 0), other.hash_with(0, 0));
    }

    #[test]
    fn with_nonce_sets_explicit_nonce() {
        let tx = intent().with_nonce(7);
        assert_eq!(tx.nonce, Some(7));
    }
}
