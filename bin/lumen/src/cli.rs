use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use alloy_primitives::U256;
use clap::Parser;
use lumen_accounts::{AccountRegistry, DEFAULT_ACCOUNT_COUNT};
use lumen_executor::Engine;
use lumen_genesis::GenesisState;
use lumen_ledger::Ledger;
use lumen_rpc::{CorsConfig, RequestHandler, RpcServer};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "lumen")]
#[command(about = "A local Ethereum-compatible devnet node over JSON-RPC")]
pub(crate) struct Cli {
    /// Directory the genesis record is written to.
    #[arg(short, long, default_value = ".")]
    pub directory: PathBuf,

    /// Port to listen on.
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    /// Host to listen on.
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Chain id reported to clients.
    #[arg(long, default_value_t = 1)]
    pub chain_id: u64,

    /// Number of accounts to generate and fund.
    #[arg(long, default_value_t = DEFAULT_ACCOUNT_COUNT)]
    pub accounts: usize,

    /// Initial balance per account, in whole native-currency units.
    #[arg(long, default_value_t = 100)]
    pub balance: u64,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub(crate) async fn run(self) -> eyre::Result<()> {
        let balance_wei = U256::from(self.balance) * U256::from(10u64).pow(U256::from(18u64));
        let registry = Arc::new(AccountRegistry::generate(self.accounts, balance_wei)?);

        let genesis = GenesisState::new(self.chain_id, registry.alloc());
        // Persistence is a convenience; an unwritable directory must not
        // stop the node from serving out of memory.
        match genesis.write_to(&self.directory) {
            Ok(path) => {
                println!("-> Starting client with generated genesis record: {}", path.display());
            }
            Err(e) => warn!(error = %e, "Genesis persistence failed, serving from memory"),
        }
        println!("-> chainID = {}", self.chain_id);
        println!("-> Port = {}", self.port);
        println!("-> Host = {}", self.host);

        report_accounts(&registry, self.balance);

        let ledger = Ledger::init(&genesis, Engine::new());
        let handler = RequestHandler::new(ledger, registry);

        let addr: SocketAddr = format!("{}:{}", self.host, self.port).parse()?;
        let server = RpcServer::new(handler, addr).with_cors(CorsConfig::permissive());
        let handle = server.start().await?;

        info!(addr = %handle.addr(), chain_id = self.chain_id, "Node ready");
        handle.stopped().await;
        Ok(())
    }
}

/// Side-channel account report for operators and tests: funded addresses
/// with their private keys. Diagnostic output, not part of the protocol.
fn report_accounts(registry: &AccountRegistry, balance: u64) {
    for keypair in registry.iter() {
        println!("[*] {} : {} eth", keypair.address, balance);
        println!("\tPrivate key: {}", keypair.secret_hex());
    }
}
