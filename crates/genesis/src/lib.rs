//! Genesis snapshot for lumen nodes.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/lumen-node/lumen/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

use std::{
    path::{Path, PathBuf},
    str::FromStr,
    time::{SystemTime, UNIX_EPOCH},
};

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name of the persisted genesis record.
pub const GENESIS_FILE: &str = "genesis.json";

/// Errors that can occur while persisting or loading the genesis snapshot.
#[derive(Debug, Error)]
pub enum GenesisError {
    /// The genesis location could not be written.
    #[error("failed to write genesis file: {0}")]
    Write(#[from] std::io::Error),
    /// JSON serialization or parsing error.
    #[error("genesis json error: {0}")]
    Json(#[from] serde_json::Error),
    /// Error parsing address or balance values.
    #[error("genesis parse error: {0}")]
    Parse(String),
}

#[derive(Serialize, Deserialize)]
struct GenesisJson {
    chain_id: u64,
    timestamp: u64,
    allocations: Vec<AllocationJson>,
}

#[derive(Serialize, Deserialize)]
struct AllocationJson {
    address: String,
    balance: String,
}

/// The immutable starting state of the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenesisState {
    /// Chain id the node reports.
    pub chain_id: u64,
    /// Creation timestamp in seconds since the Unix epoch.
    pub timestamp: u64,
    /// Initial (address, balance) allocations.
    pub alloc: Vec<(Address, U256)>,
}

impl GenesisState {
    /// Build a genesis snapshot from an allocation list, stamped now.
    pub fn new(chain_id: u64, alloc: Vec<(Address, U256)>) -> Self {
        let timestamp =
            SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs());
        Self { chain_id, timestamp, alloc }
    }

    /// Persist the snapshot as `genesis.json` under `directory`.
    ///
    /// Returns the path of the written file. Failure here is non-fatal to
    /// request serving; callers keep the in-memory snapshot either way.
    pub fn write_to(&self, directory: &Path) -> Result<PathBuf, GenesisError> {
        let json = GenesisJson {
            chain_id: self.chain_id,
            timestamp: self.timestamp,
            allocations: self
                .alloc
                .iter()
                .map(|(address, balance)| AllocationJson {
                    address: address.to_string(),
                    balance: balance.to_string(),
                })
                .collect(),
        };
        let path = directory.join(GENESIS_FILE);
        std::fs::write(&path, serde_json::to_string_pretty(&json)?)?;
        Ok(path)
    }

    /// Load a previously written genesis snapshot.
    pub fn load(path: &Path) -> Result<Self, GenesisError> {
        let content = std::fs::read_to_string(path)?;
        let genesis: GenesisJson = serde_json::from_str(&content)?;

        let mut alloc = Vec::with_capacity(genesis.allocations.len());
        for entry in genesis.allocations {
            let address = Address::from_str(&entry.address)
                .map_err(|e| GenesisError::Parse(format!("invalid address: {}", e)))?;
            let balance = U256::from_str(&entry.balance)
                .map_err(|e| GenesisError::Parse(format!("invalid balance: {}", e)))?;
            alloc.push((address, balance));
        }

        Ok(Self { chain_id: genesis.chain_id, timestamp: genesis.timestamp, alloc })
    }
}
