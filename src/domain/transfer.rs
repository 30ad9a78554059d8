//! Token transfer requests and outcomes.
//!
//! A transfer either yields the broadcast transaction hash or exactly one
//! `TransferError`. The outcome is an ordinary `Result`, built once by the
//! orchestrator and never mutated afterwards.

use alloy::primitives::TxHash;
use serde::Serialize;
use thiserror::Error;

use super::account::PrivateKey;

/// Caller-supplied transfer parameters. Validated, never mutated.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    /// Key of the sending account; the sender address is derived from it.
    pub sender_key: PrivateKey,
    /// Recipient address as supplied by the caller.
    pub recipient: String,
    /// Amount in whole-token units as decimal text (e.g. `"10.5"`).
    ///
    /// Kept as text until the orchestrator converts it to base units, so
    /// no float or fixed-width decimal ever rounds it.
    pub amount: String,
    /// Gas ceiling for the transaction, also used as its gas limit.
    pub gas_limit: u64,
}

/// Why a transfer was not submitted (or failed while submitting).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// The estimate for the transfer call exceeds the caller's gas limit.
    #[error("Gas too low. You have to set minimum gas to: {required}")]
    GasInsufficient { required: u64 },
    /// The sender holds fewer tokens than requested.
    #[error("Your token balance is too low.")]
    BalanceInsufficient,
    /// The approval precondition returned false.
    #[error("Transaction is not approved")]
    NotApproved,
    /// Signing the envelope failed; nothing was broadcast.
    #[error("{0}")]
    SignFailed(String),
    /// Broadcasting the signed envelope failed.
    #[error("{0}")]
    SendFailed(String),
    /// Any other fault along the way.
    #[error("{0}")]
    Unexpected(String),
}

/// Stable, machine-readable name of a `TransferError` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferErrorKind {
    GasInsufficient,
    BalanceInsufficient,
    NotApproved,
    SignFailed,
    SendFailed,
    Unexpected,
}

impl TransferErrorKind {
    /// Label used in responses, logs and metrics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GasInsufficient => "gas_insufficient",
            Self::BalanceInsufficient => "balance_insufficient",
            Self::NotApproved => "not_approved",
            Self::SignFailed => "sign_failed",
            Self::SendFailed => "send_failed",
            Self::Unexpected => "unexpected",
        }
    }
}

impl std::fmt::Display for TransferErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TransferError {
    /// Which failure this is, without the payload.
    pub const fn kind(&self) -> TransferErrorKind {
        match self {
            Self::GasInsufficient { .. } => TransferErrorKind::GasInsufficient,
            Self::BalanceInsufficient => TransferErrorKind::BalanceInsufficient,
            Self::NotApproved => TransferErrorKind::NotApproved,
            Self::SignFailed(_) => TransferErrorKind::SignFailed,
            Self::SendFailed(_) => TransferErrorKind::SendFailed,
            Self::Unexpected(_) => TransferErrorKind::Unexpected,
        }
    }

    /// Minimum gas the caller must supply, for `GasInsufficient` only.
    pub const fn minimum_gas(&self) -> Option<u64> {
        match self {
            Self::GasInsufficient { required } => Some(*required),
            _ => None,
        }
    }
}

/// Result of a single transfer attempt.
pub type TransferOutcome = Result<TxHash, TransferError>;
