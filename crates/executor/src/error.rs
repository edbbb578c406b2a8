//! Execution error types.

use alloy_primitives::U256;
use thiserror::Error;

/// Errors that can occur while validating or applying a transaction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExecutionError {
    /// The provided nonce is below the sender's current nonce.
    #[error("nonce too low: expected {expected}, got {got}")]
    NonceTooLow {
        /// The sender's current nonce.
        expected: u64,
        /// The nonce the transaction carried.
        got: u64,
    },

    /// The provided nonce is above the sender's current nonce.
    #[error("nonce too high: expected {expected}, got {got}")]
    NonceGap {
        /// The sender's current nonce.
        expected: u64,
        /// The nonce the transaction carried.
        got: u64,
    },

    /// The sender's balance does not cover the transfer.
    #[error("insufficient funds: balance {balance}, required {required}")]
    InsufficientFunds {
        /// The sender's current balance.
        balance: U256,
        /// The balance the transfer requires.
        required: U256,
    },

    /// The call handler rejected or failed the call.
    #[error("call failed: {0}")]
    CallFailed(String),
}
