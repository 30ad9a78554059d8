//! Balance read results.

use serde::Serialize;
use thiserror::Error;

use super::amount::Amount;

/// Token and native-currency balances of one address.
///
/// Both fields are always populated together; a failed read produces a
/// `BalanceReadError` instead of a partially filled value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Balances {
    /// Balance of the configured token contract.
    pub token: Amount,
    /// Balance of the chain's native coin (gas currency).
    pub native: Amount,
}

/// A balance read failed; carries the underlying failure description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BalanceReadError {
    pub message: String,
}

impl BalanceReadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result of a single balance read.
pub type BalanceReport = Result<Balances, BalanceReadError>;
