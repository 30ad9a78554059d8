//! Wallet Generator Use Case - Fresh Custodial Accounts
//!
//! Generates a random secp256k1 key locally. No network access; the
//! generated key is handed to the caller and not retained.

use alloy::signers::local::PrivateKeySigner;
use tracing::info;

use crate::domain::account::{Account, PrivateKey};

/// Creates new accounts.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalletGenerator;

impl WalletGenerator {
  pub const fn new() -> Self {
    Self
  }

  /// Generate a new account from the OS random number generator.
  pub fn generate(&self) -> Account {
    let signer = PrivateKeySigner::random();
    let account = Account {
      address: signer.address(),
      private_key: PrivateKey::from_bytes(signer.to_bytes()),
    };

    info!(address = %account.address, "Wallet generated");
    account
  }
}
