//! RPC types for JSON-RPC requests and responses.

use alloy_primitives::{Address, Bytes, B256, U256, U64};
use lumen_domain::{Block, TxIntent, TxRecord, TxStatus};
use lumen_executor::CallIntent;
use serde::{Deserialize, Serialize};

/// Gas limit reported for simulated blocks.
pub(crate) const BLOCK_GAS_LIMIT: u64 = 30_000_000;

/// Block number or tag for RPC queries.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum BlockNumberOrTag {
    /// Block number.
    Number(U64),
    /// Block tag.
    Tag(BlockTag),
    /// Default to latest.
    #[default]
    #[serde(skip)]
    Latest,
}

/// Block tags for RPC queries.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BlockTag {
    /// Earliest block (genesis).
    Earliest,
    /// Latest block.
    #[default]
    Latest,
    /// Pending block.
    Pending,
}

impl BlockNumberOrTag {
    /// Returns true if this is the latest block reference.
    pub const fn is_latest(&self) -> bool {
        matches!(self, Self::Tag(BlockTag::Latest) | Self::Latest)
    }
}

/// Transaction parameters for `eth_sendTransaction`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    /// Sender address.
    pub from: Address,
    /// Recipient address, absent for contract creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    /// Gas limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<U64>,
    /// Gas price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<U256>,
    /// Value to transfer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    /// Nonce, absent to use the sender's current nonce.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<U64>,
    /// Input data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
    /// Input data, alternative field name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Bytes>,
}

impl TransactionRequest {
    /// Convert to a transaction intent, filling defaults.
    pub fn into_intent(self) -> TxIntent {
        TxIntent {
            from: self.from,
            to: self.to,
            value: self.value.unwrap_or(U256::ZERO),
            gas: self.gas.map_or(TxIntent::DEFAULT_GAS, |g| g.to::<u64>()),
            gas_price: self.gas_price.unwrap_or(U256::ZERO),
            nonce: self.nonce.map(|n| n.to::<u64>()),
            input: self.input.or(self.data).unwrap_or_default(),
        }
    }
}

/// Call parameters for `eth_call` and `eth_estimateGas`.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    /// Caller address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    /// Recipient address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    /// Gas limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<U64>,
    /// Gas price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<U256>,
    /// Value the call would transfer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    /// Input data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
    /// Input data, alternative field name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Bytes>,
}

impl CallRequest {
    /// Convert to a call intent, filling defaults.
    pub fn into_call(self) -> CallIntent {
        CallIntent {
            from: self.from,
            to: self.to,
            value: self.value.unwrap_or(U256::ZERO),
            gas: self.gas.map(|g| g.to::<u64>()),
            gas_price: self.gas_price,
            input: self.input.or(self.data).unwrap_or_default(),
        }
    }
}

/// Block representation for JSON-RPC responses.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcBlock {
    /// Block hash.
    pub hash: B256,
    /// Parent block hash.
    pub parent_hash: B256,
    /// Block number.
    pub number: U64,
    /// State root.
    pub state_root: B256,
    /// Block timestamp.
    pub timestamp: U64,
    /// Gas limit.
    pub gas_limit: U64,
    /// Gas used.
    pub gas_used: U64,
    /// Transactions (hashes or full objects).
    pub transactions: BlockTransactions,
}

impl RpcBlock {
    /// Build a response block from a sealed domain block.
    pub fn from_block(block: &Block, full_transactions: bool) -> Self {
        let gas_used: u64 = block.transactions.iter().map(|tx| tx.gas_used).sum();
        let transactions = if full_transactions {
            BlockTransactions::Full(
                block
                    .transactions
                    .iter()
                    .map(|tx| RpcTransaction::from_record(tx, block.hash))
                    .collect(),
            )
        } else {
            BlockTransactions::Hashes(block.transactions.iter().map(|tx| tx.hash).collect())
        };
        Self {
            hash: block.hash,
            parent_hash: block.parent_hash,
            number: U64::from(block.number),
            state_root: block.state_root,
            timestamp: U64::from(block.timestamp),
            gas_limit: U64::from(BLOCK_GAS_LIMIT),
            gas_used: U64::from(gas_used),
            transactions,
        }
    }
}

/// Transactions in a block response.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockTransactions {
    /// Only transaction hashes.
    Hashes(Vec<B256>),
    /// Full transaction objects.
    Full(Vec<RpcTransaction>),
}

impl Default for BlockTransactions {
    fn default() -> Self {
        Self::Hashes(Vec::new())
    }
}

/// Transaction object for JSON-RPC responses.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTransaction {
    /// Transaction hash.
    pub hash: B256,
    /// Nonce.
    pub nonce: U64,
    /// Hash of the sealing block.
    pub block_hash: B256,
    /// Number of the sealing block.
    pub block_number: U64,
    /// Index within the sealing block.
    pub transaction_index: U64,
    /// Sender address.
    pub from: Address,
    /// Recipient address (absent for contract creation).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    /// Value transferred.
    pub value: U256,
    /// Gas limit.
    pub gas: U64,
    /// Gas price.
    pub gas_price: U256,
    /// Input data.
    pub input: Bytes,
}

impl RpcTransaction {
    /// Build a response transaction from a sealed record.
    pub fn from_record(record: &TxRecord, block_hash: B256) -> Self {
        Self {
            hash: record.hash,
            nonce: U64::from(record.nonce),
            block_hash,
            block_number: U64::from(record.block_number),
            transaction_index: U64::from(record.index),
            from: record.from,
            to: record.to,
            value: record.value,
            gas: U64::from(record.gas),
            gas_price: record.gas_price,
            input: record.input.clone(),
        }
    }
}

/// Transaction receipt for JSON-RPC responses.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTransactionReceipt {
    /// Transaction hash.
    pub transaction_hash: B256,
    /// Index within the sealing block.
    pub transaction_index: U64,
    /// Hash of the sealing block.
    pub block_hash: B256,
    /// Number of the sealing block.
    pub block_number: U64,
    /// Sender address.
    pub from: Address,
    /// Recipient address (absent for contract creation).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    /// Gas used by this transaction.
    pub gas_used: U64,
    /// Cumulative gas used in the sealing block.
    pub cumulative_gas_used: U64,
    /// Created contract address, if this was a creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<Address>,
    /// Execution status: 1 success, 0 failure.
    pub status: U64,
    /// Emitted logs (always empty without a VM).
    pub logs: Vec<serde_json::Value>,
}

impl RpcTransactionReceipt {
    /// Build a receipt from a sealed record.
    pub fn from_record(record: &TxRecord, block_hash: B256) -> Self {
        let status = match record.status {
            TxStatus::Success => 1u64,
            TxStatus::Pending | TxStatus::Failed => 0,
        };
        Self {
            transaction_hash: record.hash,
            transaction_index: U64::from(record.index),
            block_hash,
            block_number: U64::from(record.block_number),
            from: record.from,
            to: record.to,
            gas_used: U64::from(record.gas_used),
            cumulative_gas_used: U64::from(record.gas_used),
            contract_address: record.contract_address,
            status: U64::from(status),
            logs: Vec::new(),
        }
    }
}
