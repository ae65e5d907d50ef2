//! Money type for representing currency amounts
//!
//! Amounts are stored as signed minor units (cents) in an i64, so sums are
//! exact. The sign is a convention only: negative for expenses, positive for
//! income.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub};

/// A signed monetary amount in cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Largest magnitude accepted from user input: 10 trillion in major units
    pub const MAX_INPUT: Money = Money(1_000_000_000_000_000);

    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use pocket_ledger::models::Money;
    /// let amount = Money::from_cents(-5000); // -50.00
    /// assert_eq!(amount.to_string(), "-50.00");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn cents(&self) -> i64 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Absolute value, or `None` for the one amount with no positive twin
    pub const fn checked_abs(&self) -> Option<Self> {
        match self.0.checked_abs() {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    /// Sum, or `None` if it leaves the representable range
    pub const fn checked_add(&self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    /// Sum clamped to the representable range
    pub const fn saturating_add(&self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// The amount in major units as a float (for percentages and charts)
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Parse a money amount from user input
    ///
    /// Accepts `10`, `10.5`, `-10.50`, `+3`, and a leading currency symbol
    /// (`$10.50`, `-¥50`). More than two decimal places is rejected, as is
    /// any magnitude above [`Money::MAX_INPUT`].
    pub fn parse(input: &str) -> Result<Self, MoneyParseError> {
        let invalid = || MoneyParseError::InvalidFormat(input.trim().to_string());
        let s = input.trim();

        let (negative, s) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        // Anything before the first digit is treated as a currency symbol
        let s = s.trim_start_matches(|c: char| !c.is_ascii_digit() && c != '.');
        if s.is_empty() {
            return Err(invalid());
        }

        let (whole, fraction) = match s.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (s, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if fraction.len() > 2 || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let fraction: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction))
            .filter(|c| *c <= Self::MAX_INPUT.0)
            .ok_or_else(invalid)?;

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Format with a currency symbol, e.g. `-$50.00`
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{}{}{}.{:02}", sign, symbol, abs / 100, abs % 100)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.format_with_symbol("");
        f.pad(&text)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid amount: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1050).to_string(), "10.50");
        assert_eq!(Money::from_cents(-5000).to_string(), "-50.00");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
        assert_eq!(format!("{:>8}", Money::from_cents(100)), "    1.00");
    }

    #[test]
    fn test_format_with_symbol() {
        assert_eq!(Money::from_cents(-5000).format_with_symbol("$"), "-$50.00");
        assert_eq!(Money::from_cents(20000).format_with_symbol("¥"), "¥200.00");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("$10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("-10.50").unwrap().cents(), -1050);
        assert_eq!(Money::parse("-¥50").unwrap().cents(), -5000);
        assert_eq!(Money::parse("+3").unwrap().cents(), 300);
        assert_eq!(Money::parse("10.5").unwrap().cents(), 1050);
        assert_eq!(Money::parse(".25").unwrap().cents(), 25);
        assert_eq!(Money::parse(" 200 ").unwrap().cents(), 20000);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Money::parse("").is_err());
        assert!(Money::parse("-").is_err());
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("1.234").is_err());
        assert!(Money::parse("1.2.3").is_err());
        assert!(Money::parse(".").is_err());
        assert!(Money::parse("99999999999999999999").is_err());
    }

    #[test]
    fn test_parse_caps_magnitude() {
        assert_eq!(Money::parse("10000000000000").unwrap(), Money::MAX_INPUT);
        assert_eq!(Money::parse("-10000000000000").unwrap(), -Money::MAX_INPUT);
        assert!(Money::parse("10000000000000.01").is_err());
        assert!(Money::parse("90000000000000000").is_err());
    }

    #[test]
    fn test_checked_and_saturating_arithmetic() {
        let max = Money::from_cents(i64::MAX);
        assert_eq!(max.checked_add(Money::from_cents(1)), None);
        assert_eq!(
            Money::from_cents(1).checked_add(Money::from_cents(2)),
            Some(Money::from_cents(3))
        );
        assert_eq!(Money::from_cents(i64::MIN).checked_abs(), None);
        assert_eq!(Money::from_cents(-5).checked_abs(), Some(Money::from_cents(5)));
        assert_eq!(max.saturating_add(max), max);
    }

    #[test]
    fn test_abs_and_sum() {
        let amounts = [
            Money::from_cents(-5000),
            Money::from_cents(-3000),
            Money::from_cents(20000),
        ];
        let net: Money = amounts.iter().copied().sum();
        let gross: Money = amounts.iter().map(Money::abs).sum();
        assert_eq!(net.cents(), 12000);
        assert_eq!(gross.cents(), 28000);
        assert_eq!(gross.as_f64(), 280.0);
    }
}
