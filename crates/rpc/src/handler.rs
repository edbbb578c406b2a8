//! Request dispatch: method table, ledger wiring, and response envelopes.

use std::{fmt, panic::AssertUnwindSafe, sync::Arc};

use alloy_primitives::{keccak256, U256, U64};
use lumen_accounts::AccountRegistry;
use lumen_ledger::Ledger;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::{
    request::{MethodCall, RequestId, RpcRequest},
    types::{BlockNumberOrTag, BlockTag, RpcBlock, RpcTransaction, RpcTransactionReceipt},
    RpcError,
};

/// Gas price reported by `eth_gasPrice`. Gas is metered, never charged.
const GAS_PRICE_WEI: u64 = 1_000_000_000;

/// Dispatches decoded JSON-RPC requests onto the ledger and registry.
///
/// Stateless per request. The sole entry point for transports is
/// [`process_request`](Self::process_request): raw body in, response body
/// out, every outcome a valid JSON-RPC envelope.
#[derive(Clone)]
pub struct RequestHandler {
    ledger: Ledger,
    registry: Arc<AccountRegistry>,
}

impl fmt::Debug for RequestHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestHandler")
            .field("chain_id", &self.ledger.chain_id())
            .field("accounts", &self.registry.len())
            .finish()
    }
}

impl RequestHandler {
    /// Create a handler over a ledger and the registry holding signer keys.
    pub fn new(ledger: Ledger, registry: Arc<AccountRegistry>) -> Self {
        Self { ledger, registry }
    }

    /// Process one raw JSON-RPC request body into a response body.
    ///
    /// Never fails at the transport level: malformed bodies become a
    /// `ParseError` envelope with a null id, and a panic during dispatch is
    /// caught and reported as an internal error for this request only.
    pub fn process_request(&self, raw: &str) -> String {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => return failure(&RequestId::Null, &RpcError::Parse(e.to_string())),
        };

        // Salvage the id before envelope validation so even a broken
        // envelope correlates with its request.
        let id = value
            .get("id")
            .cloned()
            .and_then(|v| serde_json::from_value::<RequestId>(v).ok())
            .unwrap_or(RequestId::Null);

        let request: RpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => return failure(&id, &RpcError::InvalidRequest(e.to_string())),
        };

        debug!(method = %request.method, "dispatching request");

        let call = match MethodCall::decode(&request.method, &request.params) {
            Ok(call) => call,
            Err(e) => return failure(&id, &e),
        };

        let result = std::panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(call)))
            .unwrap_or_else(|_| {
                warn!(method = %request.method, "dispatch panicked");
                Err(RpcError::Internal("unexpected failure during dispatch".to_string()))
            });

        match result {
            Ok(value) => success(&id, &value),
            Err(e) => failure(&id, &e),
        }
    }

    /// Route a typed call to the matching ledger or engine operation.
    fn dispatch(&self, call: MethodCall) -> Result<Value, RpcError> {
        match call {
            MethodCall::Accounts => to_value(self.registry.addresses()),
            MethodCall::BlockNumber => {
                to_value(U64::from(self.ledger.latest_block_number()?))
            }
            MethodCall::ChainId => to_value(U64::from(self.ledger.chain_id())),
            MethodCall::GasPrice => to_value(U256::from(GAS_PRICE_WEI)),
            MethodCall::NetVersion => to_value(self.ledger.chain_id().to_string()),
            MethodCall::NetListening => to_value(true),
            MethodCall::ClientVersion => {
                to_value(format!("lumen/{}", env!("CARGO_PKG_VERSION")))
            }
            MethodCall::Sha3(data) => to_value(keccak256(&data)),
            MethodCall::GetBalance(address) => to_value(self.ledger.balance(&address)?),
            MethodCall::GetTransactionCount(address) => {
                to_value(U64::from(self.ledger.nonce(&address)?))
            }
            MethodCall::GetCode(address) => to_value(self.ledger.code(&address)?),
            MethodCall::GetStorageAt(address, slot) => {
                to_value(self.ledger.storage_at(&address, &slot)?)
            }
            MethodCall::Call(call) => to_value(self.ledger.call(&call)?),
            MethodCall::EstimateGas(call) => {
                to_value(U64::from(self.ledger.estimate_gas(&call)))
            }
            MethodCall::SendTransaction(intent) => {
                if !self.registry.contains(&intent.from) {
                    return Err(RpcError::UnknownSigner(intent.from));
                }
                let record = self.ledger.submit_transaction(intent)?;
                to_value(record.hash)
            }
            MethodCall::GetBlockByNumber(tag, full) => {
                let number = self.resolve_block_number(&tag)?;
                match self.ledger.block_by_number(number)? {
                    Some(block) => to_value(RpcBlock::from_block(&block, full)),
                    None => Ok(Value::Null),
                }
            }
            MethodCall::GetBlockByHash(hash, full) => {
                match self.ledger.block_by_hash(&hash)? {
                    Some(block) => to_value(RpcBlock::from_block(&block, full)),
                    None => Ok(Value::Null),
                }
            }
            MethodCall::GetTransactionByHash(hash) => {
                match self.lookup_sealed(&hash)? {
                    Some((record, block_hash)) => {
                        to_value(RpcTransaction::from_record(&record, block_hash))
                    }
                    None => Ok(Value::Null),
                }
            }
            MethodCall::GetTransactionReceipt(hash) => {
                match self.lookup_sealed(&hash)? {
                    Some((record, block_hash)) => {
                        to_value(RpcTransactionReceipt::from_record(&record, block_hash))
                    }
                    None => Ok(Value::Null),
                }
            }
        }
    }

    fn resolve_block_number(&self, tag: &BlockNumberOrTag) -> Result<u64, RpcError> {
        match tag {
            BlockNumberOrTag::Number(n) => Ok(n.to::<u64>()),
            BlockNumberOrTag::Tag(BlockTag::Earliest) => Ok(0),
            BlockNumberOrTag::Tag(BlockTag::Latest | BlockTag::Pending)
            | BlockNumberOrTag::Latest => Ok(self.ledger.latest_block_number()?),
        }
    }

    fn lookup_sealed(
        &self,
        hash: &alloy_primitives::B256,
    ) -> Result<Option<(lumen_domain::TxRecord, alloy_primitives::B256)>, RpcError> {
        let record = match self.ledger.transaction_by_hash(hash)? {
            Some(record) => record,
            None => return Ok(None),
        };
        let block_hash = self
            .ledger
            .sealing_block_hash(hash)?
            .unwrap_or_default();
        Ok(Some((record, block_hash)))
    }
}

fn to_value<T: serde::Serialize>(value: T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|e| RpcError::Internal(e.to_string()))
}

fn success(id: &RequestId, result: &Value) -> String {
    json!({ "jsonrpc": "2.0", "result": result, "id": id }).to_string()
}

fn failure(id: &RequestId, error: &RpcError) -> String {
    json!({
        "jsonrpc": "2.0",
        "error": { "code": error.code(), "message": error.to_string() },
        "id": id,
    })
    .to_string()
}
