//! Custodial accounts and private keys.
//!
//! A private key only lives for the duration of a single call. It is never
//! logged: `Debug` is redacted and there is no `Serialize` impl. Callers that
//! need to hand the key out (wallet creation) do so explicitly via `to_hex`.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::{Address, B256, hex};
use thiserror::Error;

/// Errors raised while parsing a private key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// Not 32 bytes of hex.
    #[error("invalid private key: expected 32 hex-encoded bytes")]
    InvalidHex,
}

/// A raw secp256k1 private key.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(B256);

impl PrivateKey {
    /// Wrap 32 raw key bytes.
    pub const fn from_bytes(bytes: B256) -> Self {
        Self(bytes)
    }

    /// Raw key bytes, for signer construction.
    pub const fn as_bytes(&self) -> &B256 {
        &self.0
    }

    /// `0x`-prefixed lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode_prefixed(self.0)
    }
}

impl FromStr for PrivateKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix("0x").unwrap_or(s);
        if s.len() != 64 {
            return Err(KeyError::InvalidHex);
        }
        B256::from_str(s).map(Self).map_err(|_| KeyError::InvalidHex)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

/// A freshly generated wallet. Ownership passes entirely to the caller.
#[derive(Debug, Clone)]
pub struct Account {
    /// Checksummed public address.
    pub address: Address,
    /// Secret key controlling `address`.
    pub private_key: PrivateKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_parse_with_and_without_prefix() {
        let bare: PrivateKey = KEY.parse().unwrap();
        let prefixed: PrivateKey = format!("0x{KEY}").parse().unwrap();
        assert_eq!(bare, prefixed);
        assert_eq!(bare.to_hex(), format!("0x{KEY}"));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!("0x1234".parse::<PrivateKey>(), Err(KeyError::InvalidHex));
        assert_eq!("zz".repeat(32).parse::<PrivateKey>(), Err(KeyError::InvalidHex));
        assert_eq!("".parse::<PrivateKey>(), Err(KeyError::InvalidHex));
    }

    #[test]
    fn test_debug_is_redacted() {
        let key: PrivateKey = KEY.parse().unwrap();
        let rendered = format!("{key:?}");
        assert!(!rendered.contains("ac0974"));
        assert!(rendered.contains("REDACTED"));
    }
}
