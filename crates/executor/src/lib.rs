//! Execution engine for lumen nodes.

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/lumen-node/lumen/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod call;
pub use call::{CallHandler, CallIntent, NoopCallHandler};

mod engine;
pub use engine::Engine;

mod error;
pub use error::ExecutionError;

mod validation;
pub use validation::{
    intrinsic_gas, TX_BASE_GAS, TX_CREATE_GAS, TX_DATA_NON_ZERO_GAS, TX_DATA_ZERO_GAS,
};
