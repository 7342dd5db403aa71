//! Exact monetary amounts stored as integer minor units.
//!
//! Balances and transaction amounts are kept as `i64` minor units (cents for
//! two-decimal currencies) so that arithmetic in Rust and in SQL stays exact.
//! The type maps to a BIGINT column, which keeps the atomic
//! `balance = balance + delta` update free of floating-point drift.

use std::fmt;
use std::str::FromStr;

use sea_orm::DeriveValueType;
use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// A monetary amount in minor units of its account's currency.
///
/// Parsing and display use plain decimal strings with up to two fractional
/// digits ("125.50", "-3.07", "40"). Amounts round-trip exactly; inputs with
/// more than two fractional digits are rejected rather than rounded.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    DeriveValueType,
    Serialize,
    Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Money(i64);

impl Money {
    /// Creates an amount from minor units (e.g. cents).
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the amount in minor units.
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// The zero amount.
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Returns `true` if the amount is exactly zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the amount is strictly positive.
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is strictly negative.
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the magnitude of the amount.
    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }
}

impl FromStr for Money {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidAmount {
            amount: s.to_string(),
        };

        let trimmed = s.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (whole, frac) = match unsigned.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (unsigned, ""),
        };

        if whole.is_empty()
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || frac.len() > 2
            || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole: i64 = whole.parse().map_err(|_| invalid())?;
        let frac_minor: i64 = if frac.is_empty() {
            0
        } else {
            let digits: i64 = frac.parse().map_err(|_| invalid())?;
            if frac.len() == 1 { digits * 10 } else { digits }
        };

        let minor = whole
            .checked_mul(100)
            .and_then(|m| m.checked_add(frac_minor))
            .ok_or_else(invalid)?;

        Ok(Self(if negative { -minor } else { minor }))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{sign}{}.{:02}", (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

impl TryFrom<String> for Money {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Money> for String {
    fn from(value: Money) -> Self {
        value.to_string()
    }
}

impl std::ops::Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl std::ops::Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl std::ops::SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl std::ops::Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_decimal_forms() {
        assert_eq!("125.50".parse::<Money>().unwrap().minor(), 12550);
        assert_eq!("0.05".parse::<Money>().unwrap().minor(), 5);
        assert_eq!("40".parse::<Money>().unwrap().minor(), 4000);
        assert_eq!("10.5".parse::<Money>().unwrap().minor(), 1050);
        assert_eq!("-3.07".parse::<Money>().unwrap().minor(), -307);
        assert_eq!("  12.00 ".parse::<Money>().unwrap().minor(), 1200);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        for input in ["", "-", "abc", "1.234", "1.2.3", ".50", "1,50", "1e2"] {
            let result = input.parse::<Money>();
            assert!(result.is_err(), "expected {input:?} to be rejected");
            assert!(matches!(
                result.unwrap_err(),
                Error::InvalidAmount { amount: _ }
            ));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_minor(12550).to_string(), "125.50");
        assert_eq!(Money::from_minor(5).to_string(), "0.05");
        assert_eq!(Money::from_minor(-307).to_string(), "-3.07");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_display_parse_round_trip() {
        for minor in [0, 1, 99, 100, 12550, -1, -99, -12550] {
            let amount = Money::from_minor(minor);
            let reparsed: Money = amount.to_string().parse().unwrap();
            assert_eq!(reparsed, amount);
        }
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(250);

        assert_eq!((a + b).minor(), 1250);
        assert_eq!((a - b).minor(), 750);
        assert_eq!((-a).minor(), -1000);
        assert_eq!(Money::from_minor(-40).abs().minor(), 40);

        let mut acc = Money::zero();
        acc += a;
        acc -= b;
        assert_eq!(acc.minor(), 750);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 200, 300].map(Money::from_minor).into_iter().sum();
        assert_eq!(total.minor(), 600);
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_minor(1).is_positive());
        assert!(Money::from_minor(-1).is_negative());
        assert!(!Money::from_minor(-1).is_positive());
        assert!(!Money::zero().is_positive());
    }
}
