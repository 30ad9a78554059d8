//! Chain Adapters - EVM Blockchain Interaction Layer
//!
//! Provides on-chain access via alloy-rs 0.9 for:
//! - RPC provider management and chain ID verification
//! - ERC-20 reads, gas estimates, signing and broadcast (`ChainService`)
//! - Startup validation of the token contract and its ABI

pub mod provider;
pub mod token;
pub mod validator;

pub use provider::RpcProvider;
pub use token::{BroadcastOptions, Erc20Chain};
pub use validator::ContractValidator;
