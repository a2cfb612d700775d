//! Token amount type for the 18-decimal governance token.
//!
//! Amounts are fixed-point integers (u128 of 10^-18 units) to avoid
//! floating-point errors. Monetary values enter the system only through
//! [`TokenAmount::from_decimal_str`], which parses decimal strings exactly —
//! a payout of `"3433.2799"` tokens is 3_433_279_900_000_000_000_000 units,
//! with no rounding anywhere on the way.

use serde::{Deserialize, Serialize};
use std::fmt;

use thiserror::Error;

/// Number of decimals of the governance token.
pub const DECIMALS: u32 = 18;

/// 10^18 — one whole token in smallest units.
pub const UNIT: u128 = 1_000_000_000_000_000_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("malformed amount {0:?}")]
    Malformed(String),

    #[error("amount {0:?} has more than {DECIMALS} decimal places")]
    TooManyDecimals(String),

    #[error("amount {0:?} overflows u128")]
    Overflow(String),
}

/// An amount of governance tokens in smallest (10^-18) units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenAmount(u128);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    /// Create from raw smallest units.
    pub fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    /// Create from a whole number of tokens.
    pub fn from_units(units: u64) -> Self {
        Self(units as u128 * UNIT)
    }

    /// Parse a decimal token string exactly, e.g. `"3433.2799"` or `"1950"`.
    ///
    /// At most 18 fractional digits are accepted; the fraction is
    /// right-padded with zeros, never rounded.
    pub fn from_decimal_str(s: &str) -> Result<Self, AmountError> {
        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(AmountError::Malformed(s.to_string()));
        }
        if !int_part.chars().all(|c| c.is_ascii_digit())
            || !frac_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(AmountError::Malformed(s.to_string()));
        }
        if frac_part.len() > DECIMALS as usize {
            return Err(AmountError::TooManyDecimals(s.to_string()));
        }

        let int_units: u128 = if int_part.is_empty() {
            0
        } else {
            int_part
                .parse()
                .map_err(|_| AmountError::Overflow(s.to_string()))?
        };
        let mut frac_units: u128 = if frac_part.is_empty() {
            0
        } else {
            frac_part
                .parse()
                .map_err(|_| AmountError::Overflow(s.to_string()))?
        };
        for _ in frac_part.len()..DECIMALS as usize {
            frac_units *= 10;
        }

        int_units
            .checked_mul(UNIT)
            .and_then(|v| v.checked_add(frac_units))
            .map(Self)
            .ok_or_else(|| AmountError::Overflow(s.to_string()))
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let int = self.0 / UNIT;
        let frac = self.0 % UNIT;
        if frac == 0 {
            write!(f, "{int}")
        } else {
            let frac = format!("{frac:018}");
            write!(f, "{}.{}", int, frac.trim_end_matches('0'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_decimal_str_is_exact() {
        let a = TokenAmount::from_decimal_str("3433.2799").unwrap();
        assert_eq!(a.raw(), 3_433_279_900_000_000_000_000);

        let b = TokenAmount::from_decimal_str("140246.2696").unwrap();
        assert_eq!(b.raw(), 140_246_269_600_000_000_000_000);
    }

    #[test]
    fn test_from_decimal_str_whole_and_fraction_only() {
        assert_eq!(TokenAmount::from_decimal_str("1950").unwrap().raw(), 1950 * UNIT);
        assert_eq!(TokenAmount::from_decimal_str("0.5").unwrap().raw(), UNIT / 2);
        assert_eq!(TokenAmount::from_decimal_str(".5").unwrap().raw(), UNIT / 2);
        assert_eq!(TokenAmount::from_decimal_str("7.").unwrap().raw(), 7 * UNIT);
    }

    #[test]
    fn test_from_decimal_str_max_precision() {
        let a = TokenAmount::from_decimal_str("0.000000000000000001").unwrap();
        assert_eq!(a.raw(), 1);
    }

    #[test]
    fn test_from_decimal_str_rejects_garbage() {
        assert!(matches!(
            TokenAmount::from_decimal_str("12,5"),
            Err(AmountError::Malformed(_))
        ));
        assert!(matches!(
            TokenAmount::from_decimal_str("-3"),
            Err(AmountError::Malformed(_))
        ));
        assert!(matches!(
            TokenAmount::from_decimal_str(""),
            Err(AmountError::Malformed(_))
        ));
        assert!(matches!(
            TokenAmount::from_decimal_str("."),
            Err(AmountError::Malformed(_))
        ));
        assert!(matches!(
            TokenAmount::from_decimal_str("1.0000000000000000001"),
            Err(AmountError::TooManyDecimals(_))
        ));
    }

    #[test]
    fn test_display_trims_trailing_zeros() {
        let a = TokenAmount::from_decimal_str("3433.2799").unwrap();
        assert_eq!(a.to_string(), "3433.2799");
        assert_eq!(TokenAmount::from_units(12).to_string(), "12");
    }
}
