//! Domain layer - Core custody types.
//!
//! Pure value types for the custodial token wallet: fixed-point amounts,
//! accounts and keys, transfer requests/outcomes and balance reports.
//! Nothing here performs I/O (hexagonal architecture inner ring).

pub mod account;
pub mod amount;
pub mod balance;
pub mod transfer;

// Re-export core types for convenience
pub use account::{Account, KeyError, PrivateKey};
pub use amount::{Amount, AmountError, DECIMALS};
pub use balance::{BalanceReadError, BalanceReport, Balances};
pub use transfer::{
    TransferError, TransferErrorKind, TransferOutcome, TransferRequest,
};
