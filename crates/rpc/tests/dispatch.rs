//! Full request/response round trips through the dispatcher.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use lumen_accounts::AccountRegistry;
use lumen_executor::Engine;
use lumen_genesis::GenesisState;
use lumen_ledger::Ledger;
use lumen_rpc::{error_codes, RequestHandler};
use serde_json::{json, Value};

const FUNDS: u64 = 100;

struct Setup {
    handler: RequestHandler,
    sender: Address,
}

fn setup() -> Setup {
    let registry = Arc::new(AccountRegistry::generate(2, U256::from(FUNDS)).unwrap());
    let sender = registry.addresses()[0];
    let genesis = GenesisState::new(1, registry.alloc());
    let ledger = Ledger::init(&genesis, Engine::new());
    Setup { handler: RequestHandler::new(ledger, registry), sender }
}

fn rpc(setup: &Setup, method: &str, params: Value, id: Value) -> Value {
    let body = json!({ "jsonrpc": "2.0", "method": method, "params": params, "id": id });
    serde_json::from_str(&setup.handler.process_request(&body.to_string())).unwrap()
}

fn send(setup: &Setup, to: &str, value: &str, nonce: Option<&str>) -> Value {
    let mut tx = json!({
        "from": setup.sender,
        "to": to,
        "value": value,
    });
    if let Some(nonce) = nonce {
        tx["nonce"] = json!(nonce);
    }
    rpc(setup, "eth_sendTransaction", json!([tx]), json!(1))
}

const UNKNOWN_B: &str = "0xd46e8dd67c5d32be8058bb8eb970870f07244567";

#[test]
fn transfer_to_unknown_address_updates_all_observables() {
    let setup = setup();

    let response = send(&setup, UNKNOWN_B, "0x1e", Some("0x0"));
    assert!(response.get("error").is_none(), "send failed: {}", response);

    let sender_balance =
        rpc(&setup, "eth_getBalance", json!([setup.sender, "latest"]), json!(2));
    assert_eq!(sender_balance["result"], json!("0x46"));

    let recipient_balance = rpc(&setup, "eth_getBalance", json!([UNKNOWN_B]), json!(3));
    assert_eq!(recipient_balance["result"], json!("0x1e"));

    let nonce = rpc(&setup, "eth_getTransactionCount", json!([setup.sender]), json!(4));
    assert_eq!(nonce["result"], json!("0x1"));

    let block_number = rpc(&setup, "eth_blockNumber", json!([]), json!(5));
    assert_eq!(block_number["result"], json!("0x1"));
}

#[test]
fn replayed_nonce_fails_and_preserves_state() {
    let setup = setup();
    send(&setup, UNKNOWN_B, "0x1e", Some("0x0"));

    let replay = send(&setup, UNKNOWN_B, "0x1e", Some("0x0"));
    assert_eq!(replay["error"]["code"], json!(error_codes::TRANSACTION_REJECTED));
    assert!(replay["error"]["message"].as_str().unwrap().starts_with("nonce too low"));

    let sender_balance = rpc(&setup, "eth_getBalance", json!([setup.sender]), json!(2));
    assert_eq!(sender_balance["result"], json!("0x46"));
    let block_number = rpc(&setup, "eth_blockNumber", json!([]), json!(3));
    assert_eq!(block_number["result"], json!("0x1"));
}

#[test]
fn gapped_nonce_fails_distinguishably() {
    let setup = setup();

    let gapped = send(&setup, UNKNOWN_B, "0x1", Some("0x5"));
    assert_eq!(gapped["error"]["code"], json!(error_codes::TRANSACTION_REJECTED));
    assert!(gapped["error"]["message"].as_str().unwrap().starts_with("nonce too high"));

    let block_number = rpc(&setup, "eth_blockNumber", json!([]), json!(2));
    assert_eq!(block_number["result"], json!("0x0"));
}

#[test]
fn overdraft_fails_with_insufficient_funds() {
    let setup = setup();

    let overdraft = send(&setup, UNKNOWN_B, "0x65", None);
    assert_eq!(overdraft["error"]["code"], json!(error_codes::TRANSACTION_REJECTED));
    assert!(overdraft["error"]["message"].as_str().unwrap().starts_with("insufficient funds"));

    let sender_balance = rpc(&setup, "eth_getBalance", json!([setup.sender]), json!(2));
    assert_eq!(sender_balance["result"], json!("0x64"));
}

#[test]
fn call_returns_output_without_touching_state() {
    let setup = setup();

    let call = rpc(
        &setup,
        "eth_call",
        json!([{ "from": setup.sender, "to": UNKNOWN_B, "value": "0x1e" }, "latest"]),
        json!(1),
    );
    assert_eq!(call["result"], json!("0x"));

    let block_number = rpc(&setup, "eth_blockNumber", json!([]), json!(2));
    assert_eq!(block_number["result"], json!("0x0"));
    let sender_balance = rpc(&setup, "eth_getBalance", json!([setup.sender]), json!(3));
    assert_eq!(sender_balance["result"], json!("0x64"));
}

#[test]
fn estimate_gas_reports_intrinsic_gas() {
    let setup = setup();
    let estimate = rpc(
        &setup,
        "eth_estimateGas",
        json!([{ "from": setup.sender, "to": UNKNOWN_B }]),
        json!(1),
    );
    assert_eq!(estimate["result"], json!("0x5208"));
}

#[test]
fn sealed_transaction_is_queryable_by_hash() {
    let setup = setup();
    let response = send(&setup, UNKNOWN_B, "0x1e", Some("0x0"));
    let tx_hash = response["result"].as_str().unwrap().to_string();

    let tx = rpc(&setup, "eth_getTransactionByHash", json!([tx_hash]), json!(2));
    assert_eq!(tx["result"]["hash"], json!(tx_hash));
    assert_eq!(tx["result"]["blockNumber"], json!("0x1"));
    assert_eq!(tx["result"]["value"], json!("0x1e"));

    let receipt = rpc(&setup, "eth_getTransactionReceipt", json!([tx_hash]), json!(3));
    assert_eq!(receipt["result"]["status"], json!("0x1"));
    assert_eq!(receipt["result"]["gasUsed"], json!("0x5208"));
    assert_eq!(receipt["result"]["blockNumber"], json!("0x1"));

    let block = rpc(&setup, "eth_getBlockByNumber", json!(["0x1", true]), json!(4));
    assert_eq!(block["result"]["number"], json!("0x1"));
    assert_eq!(block["result"]["transactions"][0]["hash"], json!(tx_hash));

    let block_hash = block["result"]["hash"].as_str().unwrap().to_string();
    let by_hash = rpc(&setup, "eth_getBlockByHash", json!([block_hash, false]), json!(5));
    assert_eq!(by_hash["result"]["transactions"][0], json!(tx_hash));
}

#[test]
fn missing_blocks_and_transactions_are_null() {
    let setup = setup();

    let block = rpc(&setup, "eth_getBlockByNumber", json!(["0x99"]), json!(1));
    assert_eq!(block["result"], json!(null));

    let tx = rpc(
        &setup,
        "eth_getTransactionByHash",
        json!(["0x0000000000000000000000000000000000000000000000000000000000000000"]),
        json!(2),
    );
    assert_eq!(tx["result"], json!(null));
}

#[test]
fn contract_creation_installs_code() {
    let setup = setup();

    let creation = rpc(
        &setup,
        "eth_sendTransaction",
        json!([{ "from": setup.sender, "data": "0x6080", "value": "0x0" }]),
        json!(1),
    );
    let tx_hash = creation["result"].as_str().unwrap().to_string();

    let receipt = rpc(&setup, "eth_getTransactionReceipt", json!([tx_hash]), json!(2));
    let created = receipt["result"]["contractAddress"].as_str().unwrap().to_string();
    assert_eq!(created.parse::<Address>().unwrap(), setup.sender.create(0));

    let code = rpc(&setup, "eth_getCode", json!([created, "latest"]), json!(3));
    assert_eq!(code["result"], json!("0x6080"));
}

#[test]
fn web3_sha3_hashes_payload() {
    let setup = setup();
    let response = rpc(&setup, "web3_sha3", json!(["0x68656c6c6f"]), json!(1));
    let digest: alloy_primitives::B256 =
        response["result"].as_str().unwrap().parse().unwrap();
    assert_eq!(digest, alloy_primitives::keccak256(b"hello"));
}

#[test]
fn invalid_params_never_reach_the_ledger() {
    let setup = setup();

    let bad_address = rpc(&setup, "eth_getBalance", json!(["garbage"]), json!(1));
    assert_eq!(bad_address["error"]["code"], json!(error_codes::INVALID_PARAMS));

    let bad_shape = rpc(&setup, "eth_sendTransaction", json!(["not-an-object"]), json!(2));
    assert_eq!(bad_shape["error"]["code"], json!(error_codes::INVALID_PARAMS));

    let block_number = rpc(&setup, "eth_blockNumber", json!([]), json!(3));
    assert_eq!(block_number["result"], json!("0x0"));
}

#[test]
fn two_fresh_ledgers_replay_identically() {
    let registry = Arc::new(AccountRegistry::generate(2, U256::from(FUNDS)).unwrap());
    let sender = registry.addresses()[0];
    let genesis = GenesisState::new(1, registry.alloc());

    let mut hashes = Vec::new();
    for _ in 0..2 {
        let ledger = Ledger::init(&genesis, Engine::new());
        let handler = RequestHandler::new(ledger, registry.clone());
        let setup = Setup { handler, sender };
        let mut run = Vec::new();
        for value in ["0x5", "0x7", "0xb"] {
            let response = send(&setup, UNKNOWN_B, value, None);
            run.push(response["result"].as_str().unwrap().to_string());
        }
        let balance = rpc(&setup, "eth_getBalance", json!([sender]), json!(9));
        run.push(balance["result"].as_str().unwrap().to_string());
        hashes.push(run);
    }

    assert_eq!(hashes[0], hashes[1]);
}
