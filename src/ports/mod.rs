//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the use cases require from the
//! outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `ChainService`: ERC-20 reads, gas estimation, signing and broadcast

pub mod chain_service;

pub use chain_service::{
  CallContext, ChainService, SignedTransaction, TokenCall, TransactionEnvelope,
};
