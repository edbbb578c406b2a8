//! Ledger services for lumen nodes.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/lumen-node/lumen/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::{SystemTime, UNIX_EPOCH},
};

use alloy_primitives::{Address, Bytes, B256, U256};
use lumen_domain::{AccountSet, Block, TxIntent, TxRecord};
use lumen_executor::{CallIntent, Engine, ExecutionError};
use lumen_genesis::GenesisState;
use thiserror::Error;

/// Errors surfaced by ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Transaction validation or application failed.
    #[error(transparent)]
    Execution(#[from] ExecutionError),
    /// The state lock was poisoned by a panicking writer.
    #[error("ledger lock poisoned")]
    LockPoisoned,
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// The authoritative in-memory chain state.
///
/// All access funnels through the [`Ledger`]'s lock: reads share it,
/// `submit_transaction` takes it exclusively, so no reader ever observes a
/// partially applied transaction.
struct LedgerState {
    /// Current account states.
    accounts: AccountSet,
    /// Sealed blocks, indexed by number.
    blocks: Vec<Block>,
    /// Transaction hash to (block number, index within block).
    tx_index: HashMap<B256, (u64, usize)>,
    /// Count of applied transactions, feeds deterministic tx hashes.
    sequence: u64,
}

/// Handle to the ledger state machine.
#[derive(Clone)]
pub struct Ledger {
    inner: Arc<RwLock<LedgerState>>,
    engine: Engine,
    chain_id: u64,
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger").field("chain_id", &self.chain_id).finish_non_exhaustive()
    }
}

fn now_secs() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs())
}

impl Ledger {
    /// Seed a ledger from a genesis snapshot and commit block 0.
    pub fn init(genesis: &GenesisState, engine: Engine) -> Self {
        let accounts = AccountSet::from_alloc(genesis.alloc.iter().copied());
        let genesis_block = Block::genesis(genesis.timestamp, accounts.state_digest());
        Self {
            inner: Arc::new(RwLock::new(LedgerState {
                accounts,
                blocks: vec![genesis_block],
                tx_index: HashMap::new(),
                sequence: 0,
            })),
            engine,
            chain_id: genesis.chain_id,
        }
    }

    /// Chain id this ledger reports.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn read(&self) -> LedgerResult<RwLockReadGuard<'_, LedgerState>> {
        self.inner.read().map_err(|_| LedgerError::LockPoisoned)
    }

    fn write(&self) -> LedgerResult<RwLockWriteGuard<'_, LedgerState>> {
        self.inner.write().map_err(|_| LedgerError::LockPoisoned)
    }

    /// Balance of an address; unknown addresses read as zero.
    pub fn balance(&self, address: &Address) -> LedgerResult<U256> {
        Ok(self.read()?.accounts.balance(address))
    }

    /// Nonce of an address; unknown addresses read as zero.
    pub fn nonce(&self, address: &Address) -> LedgerResult<u64> {
        Ok(self.read()?.accounts.nonce(address))
    }

    /// Code at an address; unknown addresses read as empty.
    pub fn code(&self, address: &Address) -> LedgerResult<Bytes> {
        Ok(self.read()?.accounts.code(address))
    }

    /// Storage slot value for an address; unset slots read as zero.
    pub fn storage_at(&self, address: &Address, slot: &U256) -> LedgerResult<U256> {
        Ok(self.read()?.accounts.storage(address, slot))
    }

    /// Number of the most recently sealed block.
    pub fn latest_block_number(&self) -> LedgerResult<u64> {
        Ok(self.read()?.blocks.len() as u64 - 1)
    }

    /// The genesis block.
    pub fn genesis_block(&self) -> LedgerResult<Block> {
        self.block_by_number(0).map(|b| b.unwrap_or_else(|| Block::genesis(0, B256::ZERO)))
    }

    /// Fetch a block by number.
    pub fn block_by_number(&self, number: u64) -> LedgerResult<Option<Block>> {
        Ok(self.read()?.blocks.get(number as usize).cloned())
    }

    /// Fetch a block by hash.
    pub fn block_by_hash(&self, hash: &B256) -> LedgerResult<Option<Block>> {
        Ok(self.read()?.blocks.iter().find(|b| b.hash == *hash).cloned())
    }

    /// Fetch a sealed transaction record by hash.
    pub fn transaction_by_hash(&self, hash: &B256) -> LedgerResult<Option<TxRecord>> {
        let state = self.read()?;
        let record = state.tx_index.get(hash).and_then(|(block, index)| {
            state.blocks.get(*block as usize).and_then(|b| b.transactions.get(*index)).cloned()
        });
        Ok(record)
    }

    /// Hash of the block that sealed a transaction, if any.
    pub fn sealing_block_hash(&self, tx_hash: &B256) -> LedgerResult<Option<B256>> {
        let state = self.read()?;
        let hash = state
            .tx_index
            .get(tx_hash)
            .and_then(|(block, _)| state.blocks.get(*block as usize).map(|b| b.hash));
        Ok(hash)
    }

    /// Apply a send: validate, transition state, and seal a new block.
    ///
    /// The single mutation entry point. Holds the write lock for the whole
    /// of validation, transition, and sealing, so application is atomic from
    /// the perspective of any concurrent reader. A validation failure leaves
    /// state untouched and does not advance the block sequence.
    pub fn submit_transaction(&self, intent: TxIntent) -> LedgerResult<TxRecord> {
        let mut state = self.write()?;

        let sequence = state.sequence;
        let mut record = self.engine.apply(&mut state.accounts, &intent, sequence)?;
        state.sequence += 1;

        let number = state.blocks.len() as u64;
        record.block_number = number;
        record.index = 0;

        let parent_hash = state.blocks.last().map_or(B256::ZERO, |b| b.hash);
        let state_root = state.accounts.state_digest();
        let block = Block::seal(number, now_secs(), parent_hash, state_root, vec![record.clone()]);

        state.tx_index.insert(record.hash, (number, 0));
        state.blocks.push(block);

        Ok(record)
    }

    /// Execute a read-only call against current state.
    ///
    /// Never mutates state, creates no record, and advances no block.
    pub fn call(&self, call: &CallIntent) -> LedgerResult<Bytes> {
        let state = self.read()?;
        Ok(self.engine.call(&state.accounts, call)?)
    }

    /// Estimate the gas a request would consume.
    pub fn estimate_gas(&self, call: &CallIntent) -> u64 {
        self.engine.estimate_gas(call)
    }
}
