//! Domain types for lumen nodes.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/lumen-node/lumen/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod account;
pub use account::{Account, AccountSet};

mod block;
pub use block::Block;

mod tx;
pub use tx::{TxIntent, TxRecord, TxStatus};
