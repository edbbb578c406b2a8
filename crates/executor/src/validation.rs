//! Transaction pre-validation.

use alloy_primitives::Bytes;
use lumen_domain::{AccountSet, TxIntent};

use crate::ExecutionError;

/// Base gas cost for a transaction.
pub const TX_BASE_GAS: u64 = 21_000;

/// Gas cost per byte of calldata (zero byte).
pub const TX_DATA_ZERO_GAS: u64 = 4;

/// Gas cost per byte of calldata (non-zero byte).
pub const TX_DATA_NON_ZERO_GAS: u64 = 16;

/// Gas surcharge for contract creation.
pub const TX_CREATE_GAS: u64 = 32_000;

/// Calculate the intrinsic gas of a transaction.
pub fn intrinsic_gas(input: &Bytes, is_create: bool) -> u64 {
    let mut gas = TX_BASE_GAS;

    if is_create {
        gas = gas.saturating_add(TX_CREATE_GAS);
    }

    for byte in input.iter() {
        if *byte == 0 {
            gas = gas.saturating_add(TX_DATA_ZERO_GAS);
        } else {
            gas = gas.saturating_add(TX_DATA_NON_ZERO_GAS);
        }
    }

    gas
}

/// Validate a send against current state, before any mutation.
///
/// Returns the resolved nonce. An intent without an explicit nonce uses the
/// sender's current nonce; an explicit nonce must match it exactly.
pub(crate) fn validate(
    accounts: &AccountSet,
    intent: &TxIntent,
) -> Result<u64, ExecutionError> {
    let expected = accounts.nonce(&intent.from);
    let nonce = intent.nonce.unwrap_or(expected);
    if nonce < expected {
        return Err(ExecutionError::NonceTooLow { expected, got: nonce });
    }
    if nonce > expected {
        return Err(ExecutionError::NonceGap { expected, got: nonce });
    }

    // Gas is metered but never charged, so value alone bounds the debit.
    let balance = accounts.balance(&intent.from);
    if balance < intent.value {
        return Err(ExecutionError::InsufficientFunds { balance, required: intent.value });
    }

    Ok(nonce)
}
