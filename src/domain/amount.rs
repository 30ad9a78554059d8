//! Fixed-point token amounts.
//!
//! Every on-chain quantity (token balance, native balance, transfer amount)
//! is an integer count of base units with 18 fractional digits. `Amount`
//! wraps that integer so comparisons never touch floating point. Decimal
//! text only appears at the human-facing edge: request parsing and
//! response rendering.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::U256;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Number of fractional digits in the chain's base unit (wei-style).
pub const DECIMALS: u32 = 18;

/// Errors raised while converting between decimal and fixed-point form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Amounts are unsigned on-chain.
    #[error("amount must not be negative")]
    Negative,
    /// More fractional digits than the base unit can represent.
    #[error("amount has {scale} fractional digits, at most {DECIMALS} are supported")]
    TooPrecise { scale: u32 },
    /// Not a plain decimal number.
    #[error("invalid decimal amount: {0:?}")]
    Invalid(String),
    /// Does not fit in 256 bits of base units.
    #[error("amount out of range")]
    Overflow,
}

/// An 18-decimal fixed-point amount stored as base units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(U256);

impl Amount {
    /// Zero base units.
    pub const ZERO: Self = Self(U256::ZERO);

    /// Wrap a raw base-unit integer as read from the chain.
    pub const fn from_base_units(units: U256) -> Self {
        Self(units)
    }

    /// Raw base-unit integer as sent to the chain.
    pub const fn base_units(self) -> U256 {
        self.0
    }

    /// Parse a decimal string of arbitrary magnitude into base units, exactly.
    ///
    /// Trailing zeros are ignored when counting fractional digits, so
    /// `1.500000000000000000000` is accepted while `0.0000000000000000001`
    /// is rejected. Exponents and signs are not accepted.
    pub fn parse_decimal(text: &str) -> Result<Self, AmountError> {
        let text = text.trim();
        if text.starts_with('-') {
            return Err(AmountError::Negative);
        }

        let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
        let well_formed = !(whole.is_empty() && fraction.is_empty())
            && whole.bytes().all(|b| b.is_ascii_digit())
            && fraction.bytes().all(|b| b.is_ascii_digit());
        if !well_formed {
            return Err(AmountError::Invalid(text.to_string()));
        }

        let fraction = fraction.trim_end_matches('0');
        let scale = u32::try_from(fraction.len()).map_err(|_| AmountError::Overflow)?;
        if scale > DECIMALS {
            return Err(AmountError::TooPrecise { scale });
        }

        let digits = format!(
            "{}{fraction}{}",
            if whole.is_empty() { "0" } else { whole },
            "0".repeat((DECIMALS - scale) as usize)
        );
        U256::from_str_radix(&digits, 10)
            .map(Self)
            .map_err(|_| AmountError::Overflow)
    }

    /// Render as a decimal string without trailing zeros (`"5"`, `"1.25"`).
    pub fn to_decimal_string(&self) -> String {
        let digits = self.0.to_string();
        let width = DECIMALS as usize + 1;
        let padded = format!("{digits:0>width$}");
        let (whole, fraction) = padded.split_at(padded.len() - DECIMALS as usize);
        let fraction = fraction.trim_end_matches('0');

        if fraction.is_empty() {
            whole.to_string()
        } else {
            format!("{whole}.{fraction}")
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_decimal(s)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ether(n: u64) -> U256 {
        U256::from(n) * U256::from(10u64).pow(U256::from(DECIMALS))
    }

    #[test]
    fn test_whole_amount_to_base_units() {
        let amount = Amount::parse_decimal("10").unwrap();
        assert_eq!(amount.base_units(), ether(10));
    }

    #[test]
    fn test_fractional_amount_to_base_units() {
        let amount = Amount::parse_decimal("0.5").unwrap();
        assert_eq!(amount.base_units(), U256::from(500_000_000_000_000_000u64));

        let smallest = Amount::parse_decimal("0.000000000000000001").unwrap();
        assert_eq!(smallest.base_units(), U256::from(1u64));

        let just_over = Amount::parse_decimal("10.000000000000000001").unwrap();
        assert_eq!(just_over.base_units(), ether(10) + U256::from(1u64));
    }

    #[test]
    fn test_trailing_zeros_do_not_count_as_precision() {
        let amount = Amount::parse_decimal("1.5000000000000000000000").unwrap();
        assert_eq!(amount, Amount::parse_decimal("1.5").unwrap());
    }

    #[test]
    fn test_too_precise_rejected() {
        let err = Amount::parse_decimal("0.0000000000000000001").unwrap_err();
        assert_eq!(err, AmountError::TooPrecise { scale: 19 });
    }

    #[test]
    fn test_negative_rejected() {
        assert_eq!(Amount::parse_decimal("-1"), Err(AmountError::Negative));
        assert_eq!(Amount::parse_decimal("-0.1"), Err(AmountError::Negative));
    }

    #[test]
    fn test_render_drops_trailing_zeros() {
        assert_eq!(Amount::from_base_units(ether(5)).to_string(), "5");
        assert_eq!(
            Amount::from_base_units(U256::from(1_250_000_000_000_000_000u64)).to_string(),
            "1.25"
        );
        assert_eq!(Amount::from_base_units(U256::from(1u64)).to_string(), "0.000000000000000001");
        assert_eq!(Amount::ZERO.to_string(), "0");
    }

    #[test]
    fn test_parse_decimal_forms() {
        assert_eq!(Amount::parse_decimal("5").unwrap().base_units(), ether(5));
        assert_eq!("0.25".parse::<Amount>().unwrap().to_string(), "0.25");
        assert_eq!(".5".parse::<Amount>().unwrap().to_string(), "0.5");
        assert_eq!("7.".parse::<Amount>().unwrap().to_string(), "7");
        assert!(matches!(Amount::parse_decimal(""), Err(AmountError::Invalid(_))));
        assert!(matches!(Amount::parse_decimal("."), Err(AmountError::Invalid(_))));
        assert!(matches!(Amount::parse_decimal("1e18"), Err(AmountError::Invalid(_))));
        assert!(matches!(Amount::parse_decimal("1.2.3"), Err(AmountError::Invalid(_))));
    }

    #[test]
    fn test_parse_beyond_decimal_range() {
        // 10^40 tokens: beyond any float or 96-bit decimal, well within U256.
        let text = format!("1{}", "0".repeat(40));
        let amount = Amount::parse_decimal(&text).unwrap();
        assert_eq!(amount.to_string(), text);
    }

    #[test]
    fn test_parse_overflow() {
        let text = "9".repeat(80);
        assert_eq!(Amount::parse_decimal(&text), Err(AmountError::Overflow));
    }

    #[test]
    fn test_comparison_is_on_base_units() {
        let five = Amount::parse_decimal("5").unwrap();
        let ten = Amount::parse_decimal("10").unwrap();
        let dust = Amount::from_base_units(ether(10) - U256::from(1u64));
        assert!(five < ten);
        assert!(dust < ten);
    }

    #[test]
    fn test_serializes_as_decimal_string() {
        let amount = Amount::parse_decimal("2.5").unwrap();
        assert_eq!(serde_json::to_string(&amount).unwrap(), "\"2.5\"");
    }
}
