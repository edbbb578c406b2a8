//! JSON-RPC error types following Ethereum error code conventions.

use alloy_primitives::{Address, U256};
use lumen_executor::ExecutionError;
use lumen_ledger::LedgerError;
use thiserror::Error;

/// JSON-RPC error codes following Ethereum conventions.
pub mod codes {
    /// Invalid JSON was received.
    pub const PARSE_ERROR: i32 = -32700;
    /// The JSON sent is not a valid Request object.
    pub const INVALID_REQUEST: i32 = -32600;
    /// The method does not exist / is not available.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid method parameter(s).
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal JSON-RPC error.
    pub const INTERNAL_ERROR: i32 = -32603;

    /// Server error (reserved range: -32000 to -32099).
    pub const SERVER_ERROR: i32 = -32000;
    /// Transaction rejected.
    pub const TRANSACTION_REJECTED: i32 = -32003;
    /// Execution error.
    pub const EXECUTION_ERROR: i32 = -32015;
}

/// Errors surfaced to JSON-RPC callers.
///
/// The full taxonomy the dispatcher can emit. Validation errors carry
/// stable messages so clients can tell a replayed nonce from a gapped one.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The request body is not well-formed JSON.
    #[error("parse error: {0}")]
    Parse(String),

    /// The body parsed but is not a valid request envelope.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The method is not part of the dispatch table.
    #[error("method not found: {0}")]
    MethodNotFound(String),

    /// Parameter count or shape mismatch.
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// The named sender's key is not held by the account registry.
    #[error("unknown signer: {0}")]
    UnknownSigner(Address),

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

    /// Call execution failed.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// Unexpected internal failure, caught at the request boundary.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RpcError {
    /// Stable JSON-RPC error code for this error.
    pub const fn code(&self) -> i32 {
        match self {
            Self::Parse(_) => codes::PARSE_ERROR,
            Self::InvalidRequest(_) => codes::INVALID_REQUEST,
            Self::MethodNotFound(_) => codes::METHOD_NOT_FOUND,
            Self::InvalidParams(_) => codes::INVALID_PARAMS,
            Self::UnknownSigner(_) => codes::SERVER_ERROR,
            Self::NonceTooLow { .. } | Self::NonceGap { .. } | Self::InsufficientFunds { .. } => {
                codes::TRANSACTION_REJECTED
            }
            Self::ExecutionFailed(_) => codes::EXECUTION_ERROR,
            Self::Internal(_) => codes::INTERNAL_ERROR,
        }
    }
}

impl From<ExecutionError> for RpcError {
    fn from(err: ExecutionError) -> Self {
        match err {
            ExecutionError::NonceTooLow { expected, got } => Self::NonceTooLow { expected, got },
            ExecutionError::NonceGap { expected, got } => Self::NonceGap { expected, got },
            ExecutionError::InsufficientFunds { balance, required } => {
                Self::InsufficientFunds { balance, required }
            }
            ExecutionError::CallFailed(reason) => Self::ExecutionFailed(reason),
        }
    }
}

impl From<LedgerError> for RpcError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Execution(inner) => inner.into(),
            LedgerError::LockPoisoned => Self::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_jsonrpc_conventions() {
        assert_eq!(RpcError::Parse("bad".into()).code(), codes::PARSE_ERROR);
        assert_eq!(RpcError::MethodNotFound("x".into()).code(), codes::METHOD_NOT_FOUND);
        assert_eq!(RpcError::InvalidParams("x".into()).code(), codes::INVALID_PARAMS);
        assert_eq!(RpcError::UnknownSigner(Address::ZERO).code(), codes::SERVER_ERROR);
        assert_eq!(
            RpcError::NonceTooLow { expected: 1, got: 0 }.code(),
            codes::TRANSACTION_REJECTED
        );
        assert_eq!(RpcError::NonceGap { expected: 0, got: 2 }.code(), codes::TRANSACTION_REJECTED);
    }

    #[test]
    fn nonce_errors_have_distinguishable_messages() {
        let low = RpcError::from(ExecutionError::NonceTooLow { expected: 1, got: 0 });
        let gap = RpcError::from(ExecutionError::NonceGap { expected: 1, got: 3 });
        assert!(low.to_string().starts_with("nonce too low"));
        assert!(gap.to_string().starts_with("nonce too high"));
    }

    #[test]
    fn ledger_execution_errors_convert_transparently() {
        let err = LedgerError::Execution(ExecutionError::InsufficientFunds {
            balance: U256::from(1),
            required: U256::from(2),
        });
        let rpc: RpcError = err.into();
        assert_eq!(rpc.code(), codes::TRANSACTION_REJECTED);
        assert!(rpc.to_string().starts_with("insufficient funds"));
    }
}
