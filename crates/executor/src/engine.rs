//! The execution engine.

use std::{fmt, sync::Arc};

use alloy_primitives::Bytes;
use lumen_domain::{AccountSet, TxIntent, TxRecord, TxStatus};

use crate::{
    call::{CallHandler, CallIntent, NoopCallHandler},
    validation::{self, intrinsic_gas},
    ExecutionError,
};

/// Applies transactions and calls against an account set.
///
/// Pure over the state it is handed: the ledger holds the lock and passes
/// exclusive or shared references in. All validation happens before any
/// mutation, so a failed send leaves the set untouched.
#[derive(Clone)]
pub struct Engine {
    call_handler: Arc<dyn CallHandler>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an engine with the default (no-op) call handler.
    pub fn new() -> Self {
        Self { call_handler: Arc::new(NoopCallHandler) }
    }

    /// Set a custom call handler.
    #[must_use]
    pub fn with_call_handler(mut self, handler: Arc<dyn CallHandler>) -> Self {
        self.call_handler = handler;
        self
    }

    /// Validate and apply a send against `accounts`.
    ///
    /// `sequence` is the ledger's count of previously applied transactions;
    /// it feeds the deterministic transaction hash. On success the sender is
    /// debited, the recipient credited (materialized on first credit), and
    /// the sender nonce incremented by exactly one. The returned record has
    /// its block fields zeroed; the ledger fills them when it seals.
    pub fn apply(
        &self,
        accounts: &mut AccountSet,
        intent: &TxIntent,
        sequence: u64,
    ) -> Result<TxRecord, ExecutionError> {
        let nonce = validation::validate(accounts, intent)?;

        let is_create = intent.to.is_none();
        let contract_address = is_create.then(|| intent.from.create(nonce));
        let recipient = intent.to.or(contract_address).unwrap_or_default();

        if !accounts.debit(&intent.from, intent.value) {
            return Err(ExecutionError::InsufficientFunds {
                balance: accounts.balance(&intent.from),
                required: intent.value,
            });
        }
        accounts.credit(recipient, intent.value);
        if is_create && !intent.input.is_empty() {
            accounts.set_code(recipient, intent.input.clone());
        }
        accounts.bump_nonce(intent.from);

        Ok(TxRecord {
            hash: intent.hash_with(nonce, sequence),
            from: intent.from,
            to: intent.to,
            value: intent.value,
            gas: intent.gas,
            gas_price: intent.gas_price,
            nonce,
            input: intent.input.clone(),
            status: TxStatus::Success,
            gas_used: intrinsic_gas(&intent.input, is_create),
            contract_address,
            block_number: 0,
            index: 0,
        })
    }

    /// Execute a read-only call against `accounts`.
    pub fn call(&self, accounts: &AccountSet, call: &CallIntent) -> Result<Bytes, ExecutionError> {
        self.call_handler.execute(accounts, call)
    }

    /// Estimate the gas a request would consume: its intrinsic gas.
    pub fn estimate_gas(&self, call: &CallIntent) -> u64 {
        intrinsic_gas(&call.input, call.to.is_none())
    }
}
