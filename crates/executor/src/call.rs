//! Read-only call execution.

use alloy_primitives::{Address, Bytes, U256};
use lumen_domain::AccountSet;

use crate::ExecutionError;

/// A read-only call as submitted by a client.
///
/// Unlike a send, every field is optional on the wire except the recipient
/// side of the resolution: a call with no recipient estimates a creation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallIntent {
    /// Caller address, if given.
    pub from: Option<Address>,
    /// Recipient address, `None` for a creation-style call.
    pub to: Option<Address>,
    /// Value the call would transfer.
    pub value: U256,
    /// Gas limit, if given.
    pub gas: Option<u64>,
    /// Gas price, if given.
    pub gas_price: Option<U256>,
    /// Input data.
    pub input: Bytes,
}

/// Extension point for call execution.
///
/// The engine resolves addresses against current state and hands the call
/// here; implementations can interpret contract code however they like. The
/// default handler does not run code and returns empty output.
pub trait CallHandler: Send + Sync {
    /// Execute a call against a read-only view of the accounts.
    fn execute(&self, accounts: &AccountSet, call: &CallIntent) -> Result<Bytes, ExecutionError>;
}

/// Default call handler: resolves the target and returns empty output.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopCallHandler;

impl CallHandler for NoopCallHandler {
    fn execute(&self, _accounts: &AccountSet, _call: &CallIntent) -> Result<Bytes, ExecutionError> {
        Ok(Bytes::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_handler_returns_empty_output() {
        let accounts = AccountSet::new();
        let call = CallIntent { to: Some(Address::repeat_byte(0x02)), ..CallIntent::default() };
        let output = NoopCallHandler.execute(&accounts, &call).unwrap();
        assert!(output.is_empty());
    }
}
