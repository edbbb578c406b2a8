//! Generated dev accounts for lumen nodes.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/lumen-node/lumen/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

use std::collections::HashSet;

use alloy_primitives::{keccak256, Address, U256};
use k256::ecdsa::SigningKey;
use rand::rngs::OsRng;
use thiserror::Error;

/// Number of accounts generated when the operator does not ask otherwise.
pub const DEFAULT_ACCOUNT_COUNT: usize = 10;

/// Errors surfaced by the account registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Two generated keys derived the same address.
    ///
    /// Vanishingly unlikely with random keys; treated as a fault in the key
    /// source rather than something to silently merge.
    #[error("duplicate generated address: {0}")]
    DuplicateAddress(Address),
}

/// A generated address together with its signing key.
#[derive(Clone, Debug)]
pub struct KeyPair {
    /// Derived account address.
    pub address: Address,
    /// secp256k1 signing key.
    pub secret: SigningKey,
}

impl KeyPair {
    /// Generate a fresh random keypair.
    pub fn generate() -> Self {
        let secret = SigningKey::random(&mut OsRng);
        let address = address_from_key(&secret);
        Self { address, secret }
    }

    /// Hex-encoded private key, 0x-prefixed, for operator output.
    pub fn secret_hex(&self) -> String {
        format!("0x{}", hex::encode(self.secret.to_bytes()))
    }
}

/// Derive an Ethereum address from a secp256k1 signing key.
pub fn address_from_key(key: &SigningKey) -> Address {
    let encoded = key.verifying_key().to_encoded_point(false);
    let pubkey = encoded.as_bytes();
    let hash = keccak256(&pubkey[1..]);
    Address::from_slice(&hash[12..])
}

/// Default genesis funding per account: 100 native-currency units in wei.
pub fn default_balance() -> U256 {
    U256::from(100u64) * U256::from(10u64).pow(U256::from(18u64))
}

/// The fixed set of generated accounts, with their keys.
#[derive(Clone, Debug)]
pub struct AccountRegistry {
    keypairs: Vec<KeyPair>,
    initial_balance: U256,
}

impl AccountRegistry {
    /// Generate `count` fresh accounts, each funded with `initial_balance`.
    pub fn generate(count: usize, initial_balance: U256) -> Result<Self, RegistryError> {
        let mut keypairs = Vec::with_capacity(count);
        let mut seen = HashSet::with_capacity(count);
        for _ in 0..count {
            let keypair = KeyPair::generate();
            if !seen.insert(keypair.address) {
                return Err(RegistryError::DuplicateAddress(keypair.address));
            }
            keypairs.push(keypair);
        }
        Ok(Self { keypairs, initial_balance })
    }

    /// Addresses of all registered accounts, in generation order.
    pub fn addresses(&self) -> Vec<Address> {
        self.keypairs.iter().map(|k| k.address).collect()
    }

    /// Returns true if the registry holds the key for `address`.
    pub fn contains(&self, address: &Address) -> bool {
        self.keypairs.iter().any(|k| k.address == *address)
    }

    /// Look up the keypair for an address.
    pub fn keypair(&self, address: &Address) -> Option<&KeyPair> {
        self.keypairs.iter().find(|k| k.address == *address)
    }

    /// Genesis funding list: every account paired with its initial balance.
    pub fn alloc(&self) -> Vec<(Address, U256)> {
        self.keypairs.iter().map(|k| (k.address, self.initial_balance)).collect()
    }

    /// Balance each account is funded with.
    pub fn initial_balance(&self) -> U256 {
        self.initial_balance
    }

    /// Number of registered accounts.
    pub fn len(&self) -> usize {
        self.keypairs.len()
    }

    /// Returns true if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.keypairs.is_empty()
    }

    /// Iterate the registered keypairs.
    pub fn iter(&self) -> impl Iterator<Item = &KeyPair> {
        self.keypairs.iter()
    }
}
