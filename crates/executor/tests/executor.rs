//! End-to-end engine tests over a fresh account set.

use alloy_primitives::{Address, U256};
use lumen_domain::{AccountSet, TxIntent};
use lumen_executor::Engine;

fn alloc() -> Vec<(Address, U256)> {
    vec![
        (Address::repeat_byte(0x01), U256::from(1_000)),
        (Address::repeat_byte(0x02), U256::from(500)),
    ]
}

fn workload() -> Vec<TxIntent> {
    let a = Address::repeat_byte(0x01);
    let b = Address::repeat_byte(0x02);
    let c = Address::repeat_byte(0x03);
    vec![
        TxIntent::transfer(a, b, U256::from(100)),
        TxIntent::transfer(b, c, U256::from(250)),
        TxIntent::transfer(a, c, U256::from(1)),
        TxIntent::transfer(c, a, U256::from(200)),
    ]
}

#[test]
fn replay_from_same_genesis_is_bit_identical() {
    let engine = Engine::new();

    let mut first = AccountSet::from_alloc(alloc());
    let mut second = AccountSet::from_alloc(alloc());

    let mut first_hashes = Vec::new();
    let mut second_hashes = Vec::new();

    for (sequence, intent) in workload().iter().enumerate() {
        first_hashes.push(engine.apply(&mut first, intent, sequence as u64).unwrap().hash);
    }
    for (sequence, intent) in workload().iter().enumerate() {
        second_hashes.push(engine.apply(&mut second, intent, sequence as u64).unwrap().hash);
    }

    assert_eq!(first, second);
    assert_eq!(first.state_digest(), second.state_digest());
    assert_eq!(first_hashes, second_hashes);
}

#[test]
fn workload_conserves_total_balance() {
    let engine = Engine::new();
    let mut accounts = AccountSet::from_alloc(alloc());
    let total_before: U256 =
        accounts.iter().fold(U256::ZERO, |acc, (_, account)| acc + account.balance);

    for (sequence, intent) in workload().iter().enumerate() {
        engine.apply(&mut accounts, intent, sequence as u64).unwrap();
    }

    let total_after: U256 =
        accounts.iter().fold(U256::ZERO, |acc, (_, account)| acc + account.balance);
    assert_eq!(total_before, total_after);
}
