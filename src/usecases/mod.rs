//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain types with the ChainService port to implement
//! the service's three operations. Each use case is stateless between
//! calls.
//!
//! Use cases:
//! - `WalletGenerator`: New custodial key pairs
//! - `BalanceReader`: Token + native balance lookup
//! - `TransferOrchestrator`: Guarded sign-and-broadcast token transfers

pub mod balance_reader;
pub mod transfer_orchestrator;
pub mod wallet_generator;

pub use balance_reader::BalanceReader;
pub use transfer_orchestrator::TransferOrchestrator;
pub use wallet_generator::WalletGenerator;
