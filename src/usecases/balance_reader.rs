//! Balance Reader Use Case - Token and Native Balances
//!
//! Reads an address's token balance and native-coin balance through the
//! ChainService port and converts both to decimal amounts. Nothing is
//! cached: every call re-reads current chain state.

use std::sync::Arc;

use alloy::primitives::Address;
use anyhow::{Context, Result};
use tracing::{debug, instrument, warn};

use crate::domain::amount::Amount;
use crate::domain::balance::{BalanceReadError, BalanceReport, Balances};
use crate::ports::chain_service::ChainService;

/// Reads balances for arbitrary addresses.
pub struct BalanceReader<C: ChainService> {
  chain: Arc<C>,
}

impl<C: ChainService> BalanceReader<C> {
  /// Create a new balance reader.
  pub fn new(chain: Arc<C>) -> Self {
    Self { chain }
  }

  /// Read both balances of `address`.
  ///
  /// Either both balances are returned or a single `BalanceReadError`
  /// describing the first failure.
  #[instrument(skip(self))]
  pub async fn read(&self, address: &str) -> BalanceReport {
    match self.read_both(address).await {
      Ok(balances) => {
        debug!(token = %balances.token, native = %balances.native, "Balances read");
        Ok(balances)
      }
      Err(e) => {
        warn!(error = %e, "Balance read failed");
        Err(BalanceReadError::new(format!("{e:#}")))
      }
    }
  }

  async fn read_both(&self, address: &str) -> Result<Balances> {
    let owner: Address = address.parse().context("Invalid address")?;

    let token = self
      .chain
      .token_balance(owner)
      .await
      .context("Failed to read token balance")?;

    let native = self
      .chain
      .native_balance(owner)
      .await
      .context("Failed to read native balance")?;

    Ok(Balances {
      token: Amount::from_base_units(token),
      native: Amount::from_base_units(native),
    })
  }
}
