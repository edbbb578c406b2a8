//! Typed request model and the decoding step.
//!
//! Every method in the dispatch table decodes into a [`MethodCall`] variant
//! with fully validated parameters before any ledger logic runs; parameter
//! shape problems surface here as `InvalidParams` and never reach the state
//! machine.

use alloy_primitives::{Address, Bytes, B256, U256};
use lumen_domain::TxIntent;
use lumen_executor::CallIntent;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{
    types::{BlockNumberOrTag, CallRequest, TransactionRequest},
    RpcError,
};

/// JSON-RPC request id, echoed back unchanged in every response.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RequestId {
    /// Numeric id.
    Number(i64),
    /// String id.
    String(String),
    /// Null id.
    Null,
}

/// A decoded JSON-RPC request envelope.
#[derive(Clone, Debug, Deserialize)]
pub struct RpcRequest {
    /// Protocol version, not enforced.
    #[serde(default)]
    pub jsonrpc: Option<String>,
    /// Method name.
    pub method: String,
    /// Raw parameter list.
    #[serde(default)]
    pub params: Value,
    /// Request id, absent ids echo as null.
    #[serde(default)]
    pub id: Option<RequestId>,
}

/// The closed set of dispatchable methods, with typed parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MethodCall {
    /// `eth_accounts`
    Accounts,
    /// `eth_blockNumber`
    BlockNumber,
    /// `eth_chainId`
    ChainId,
    /// `eth_gasPrice`
    GasPrice,
    /// `net_version`
    NetVersion,
    /// `net_listening`
    NetListening,
    /// `web3_clientVersion`
    ClientVersion,
    /// `web3_sha3`
    Sha3(Bytes),
    /// `eth_getBalance`
    GetBalance(Address),
    /// `eth_getTransactionCount`
    GetTransactionCount(Address),
    /// `eth_getCode`
    GetCode(Address),
    /// `eth_getStorageAt`
    GetStorageAt(Address, U256),
    /// `eth_call`
    Call(CallIntent),
    /// `eth_estimateGas`
    EstimateGas(CallIntent),
    /// `eth_sendTransaction`
    SendTransaction(TxIntent),
    /// `eth_getBlockByNumber`
    GetBlockByNumber(BlockNumberOrTag, bool),
    /// `eth_getBlockByHash`
    GetBlockByHash(B256, bool),
    /// `eth_getTransactionByHash`
    GetTransactionByHash(B256),
    /// `eth_getTransactionReceipt`
    GetTransactionReceipt(B256),
}

impl MethodCall {
    /// Decode a method name and raw parameters into a typed call.
    pub fn decode(method: &str, params: &Value) -> Result<Self, RpcError> {
        let params = params_list(params)?;
        match method {
            "eth_accounts" => {
                expect_arity(params, 0, 0)?;
                Ok(Self::Accounts)
            }
            "eth_blockNumber" => {
                expect_arity(params, 0, 0)?;
                Ok(Self::BlockNumber)
            }
            "eth_chainId" => {
                expect_arity(params, 0, 0)?;
                Ok(Self::ChainId)
            }
            "eth_gasPrice" => {
                expect_arity(params, 0, 0)?;
                Ok(Self::GasPrice)
            }
            "net_version" => {
                expect_arity(params, 0, 0)?;
                Ok(Self::NetVersion)
            }
            "net_listening" => {
                expect_arity(params, 0, 0)?;
                Ok(Self::NetListening)
            }
            "web3_clientVersion" => {
                expect_arity(params, 0, 0)?;
                Ok(Self::ClientVersion)
            }
            "web3_sha3" => {
                expect_arity(params, 1, 1)?;
                Ok(Self::Sha3(parse(&params[0], "data")?))
            }
            "eth_getBalance" => {
                expect_arity(params, 1, 2)?;
                let address = parse(&params[0], "address")?;
                parse_optional_tag(params.get(1))?;
                Ok(Self::GetBalance(address))
            }
            "eth_getTransactionCount" => {
                expect_arity(params, 1, 2)?;
                let address = parse(&params[0], "address")?;
                parse_optional_tag(params.get(1))?;
                Ok(Self::GetTransactionCount(address))
            }
            "eth_getCode" => {
                expect_arity(params, 1, 2)?;
                let address = parse(&params[0], "address")?;
                parse_optional_tag(params.get(1))?;
                Ok(Self::GetCode(address))
            }
            "eth_getStorageAt" => {
                expect_arity(params, 2, 3)?;
                let address = parse(&params[0], "address")?;
                let slot = parse(&params[1], "storage slot")?;
                parse_optional_tag(params.get(2))?;
                Ok(Self::GetStorageAt(address, slot))
            }
            "eth_call" => {
                expect_arity(params, 1, 2)?;
                let request: CallRequest = parse(&params[0], "call request")?;
                parse_optional_tag(params.get(1))?;
                Ok(Self::Call(request.into_call()))
            }
            "eth_estimateGas" => {
                expect_arity(params, 1, 2)?;
                let request: CallRequest = parse(&params[0], "call request")?;
                parse_optional_tag(params.get(1))?;
                Ok(Self::EstimateGas(request.into_call()))
            }
            "eth_sendTransaction" => {
                expect_arity(params, 1, 1)?;
                let request: TransactionRequest = parse(&params[0], "transaction request")?;
                Ok(Self::SendTransaction(request.into_intent()))
            }
            "eth_getBlockByNumber" => {
                expect_arity(params, 1, 2)?;
                let tag = parse(&params[0], "block number")?;
                let full = parse_optional_bool(params.get(1), "full transactions flag")?;
                Ok(Self::GetBlockByNumber(tag, full))
            }
            "eth_getBlockByHash" => {
                expect_arity(params, 1, 2)?;
                let hash = parse(&params[0], "block hash")?;
                let full = parse_optional_bool(params.get(1), "full transactions flag")?;
                Ok(Self::GetBlockByHash(hash, full))
            }
            "eth_getTransactionByHash" => {
                expect_arity(params, 1, 1)?;
                Ok(Self::GetTransactionByHash(parse(&params[0], "transaction hash")?))
            }
            "eth_getTransactionReceipt" => {
                expect_arity(params, 1, 1)?;
                Ok(Self::GetTransactionReceipt(parse(&params[0], "transaction hash")?))
            }
            other => Err(RpcError::MethodNotFound(other.to_string())),
        }
    }
}

fn params_list(params: &Value) -> Result<&[Value], RpcError> {
    match params {
        Value::Null => Ok(&[]),
        Value::Array(list) => Ok(list),
        _ => Err(RpcError::InvalidParams("params must be an array".to_string())),
    }
}

fn expect_arity(params: &[Value], min: usize, max: usize) -> Result<(), RpcError> {
    if params.len() < min || params.len() > max {
        return Err(RpcError::InvalidParams(format!(
            "expected {} to {} params, got {}",
            min,
            max,
            params.len()
        )));
    }
    Ok(())
}

fn parse<T: DeserializeOwned>(value: &Value, what: &str) -> Result<T, RpcError> {
    serde_json::from_value(value.clone())
        .map_err(|e| RpcError::InvalidParams(format!("invalid {}: {}", what, e)))
}

/// Validate an optional trailing block tag for shape.
///
/// State queries always serve latest state, so the tag is checked and then
/// discarded.
fn parse_optional_tag(value: Option<&Value>) -> Result<BlockNumberOrTag, RpcError> {
    value.map_or(Ok(BlockNumberOrTag::Latest), |v| parse(v, "block tag"))
}

fn parse_optional_bool(value: Option<&Value>, what: &str) -> Result<bool, RpcError> {
    value.map_or(Ok(false), |v| parse(v, what))
}
