//! JSON-RPC server for lumen nodes.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/lumen-node/lumen/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod config;
pub use config::{CorsConfig, RpcServerConfig};

mod error;
pub use error::{codes as error_codes, RpcError};

mod handler;
pub use handler::RequestHandler;

mod request;
pub use request::{MethodCall, RequestId, RpcRequest};

mod server;
pub use server::{RpcServer, RpcServerHandle, ServerError};

mod types;
pub use types::{
    BlockNumberOrTag, BlockTag, BlockTransactions, CallRequest, RpcBlock, RpcTransaction,
    RpcTransactionReceipt, TransactionRequest,
};
