//! HTTP API request/response type definitions.
//!
//! Wire shapes for the custody endpoints. All bodies are camelCase JSON.
//! Outcomes are always well-formed: callers branch on whether `error` is
//! `null`, never on the HTTP status.

use std::fmt;

use alloy::primitives::TxHash;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::domain::account::{Account, KeyError, PrivateKey};
use crate::domain::amount::Amount;
use crate::domain::balance::BalanceReport;
use crate::domain::transfer::{
    TransferError, TransferErrorKind, TransferOutcome, TransferRequest,
};

/// `POST /wallets` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletResponse {
    pub address: String,
    pub private_key: String,
}

impl From<Account> for WalletResponse {
    fn from(account: Account) -> Self {
        Self {
            address: account.address.to_checksum(None),
            private_key: account.private_key.to_hex(),
        }
    }
}

/// `GET /balances/:address` response.
///
/// Either both balances are set and `error` is null, or both are null
/// and `error` carries the failure message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub balance_token: Option<Amount>,
    pub balance_native: Option<Amount>,
    pub error: Option<String>,
}

impl From<BalanceReport> for BalanceResponse {
    fn from(report: BalanceReport) -> Self {
        match report {
            Ok(balances) => Self {
                balance_token: Some(balances.token),
                balance_native: Some(balances.native),
                error: None,
            },
            Err(e) => Self {
                balance_token: None,
                balance_native: None,
                error: Some(e.message),
            },
        }
    }
}

/// `POST /transfers` request body.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferBody {
    /// Sender private key (hex, optional `0x`).
    pub private_key: String,
    /// Recipient address.
    pub to: String,
    /// Amount in whole-token units: a decimal string, or a JSON integer.
    #[serde(deserialize_with = "amount_text")]
    pub amount: String,
    /// Gas limit.
    pub gas: u64,
}

impl std::fmt::Debug for TransferBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferBody")
            .field("private_key", &"[REDACTED]")
            .field("to", &self.to)
            .field("amount", &self.amount)
            .field("gas", &self.gas)
            .finish()
    }
}

impl TransferBody {
    /// Validate the body into a domain request.
    ///
    /// An unparseable key is reported like any other unexpected fault.
    pub fn into_request(self) -> Result<TransferRequest, TransferError> {
        let sender_key: PrivateKey = self
            .private_key
            .parse()
            .map_err(|e: KeyError| TransferError::Unexpected(e.to_string()))?;

        Ok(TransferRequest {
            sender_key,
            recipient: self.to,
            amount: self.amount,
            gas_limit: self.gas,
        })
    }
}

/// Keep the amount as text so it reaches base-unit conversion unrounded.
///
/// Fractional JSON numbers are refused: serde_json has already rounded
/// them through `f64` by the time a visitor sees them.
fn amount_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    struct AmountText;

    impl Visitor<'_> for AmountText {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a decimal amount as a string")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, _: f64) -> Result<String, E> {
            Err(E::custom(
                "fractional or oversized amounts must be sent as a string",
            ))
        }
    }

    deserializer.deserialize_any(AmountText)
}

/// Error object of a failed transfer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferErrorBody {
    pub kind: TransferErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_gas: Option<u64>,
}

/// `POST /transfers` response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    pub transaction_hash: Option<TxHash>,
    pub error: Option<TransferErrorBody>,
}

impl From<TransferOutcome> for TransferResponse {
    fn from(outcome: TransferOutcome) -> Self {
        match outcome {
            Ok(tx_hash) => Self {
                transaction_hash: Some(tx_hash),
                error: None,
            },
            Err(e) => Self {
                transaction_hash: None,
                error: Some(TransferErrorBody {
                    kind: e.kind(),
                    minimum_gas: e.minimum_gas(),
                    message: e.to_string(),
                }),
            },
        }
    }
}
