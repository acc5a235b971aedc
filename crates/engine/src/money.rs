use std::{
    fmt,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use thiserror::Error;

/// Signed money amount represented as **integer cents**.
///
/// Use this type for **all** monetary values in the engine (record
/// amounts, totals, the net balance) to avoid floating-point drift.
///
/// # Examples
///
/// ```rust
/// use engine::Amount;
///
/// let amount = Amount::from_cents(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input (strips `,` thousands separators; truncates
/// anything past two decimals):
///
/// ```rust
/// use engine::Amount;
///
/// assert_eq!("10".parse::<Amount>().unwrap().cents(), 1000);
/// assert_eq!("1,234.5".parse::<Amount>().unwrap().cents(), 123_450);
/// assert_eq!("10.999".parse::<Amount>().unwrap().cents(), 1099);
/// assert!("ten".parse::<Amount>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Amount(i64);

/// Error produced when parsing an [`Amount`] from a decimal string.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseAmountError {
    #[error("amount is empty")]
    Empty,
    #[error("amount must be a numeric value")]
    NonNumeric,
    #[error("amount is too large")]
    Overflow,
}

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }
}

impl fmt::Display for Amount {
    /// Renders the amount with exactly two fraction digits and, when
    /// negative, a leading minus sign and no other formatting.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Amount> for i64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.0;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Self::Output {
        Amount(self.0 - rhs.0)
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, rhs: Amount) {
        self.0 -= rhs.0;
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Self::Output {
        Amount(-self.0)
    }
}

impl FromStr for Amount {
    type Err = ParseAmountError;

    /// Parses a decimal string into cents.
    ///
    /// Rules:
    /// - `,` is treated as a thousands separator and stripped
    /// - fraction digits past the second are **truncated**, not rounded
    /// - optional leading `+`/`-`
    /// - rejects empty or non-numeric input
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseAmountError::Empty);
        }

        let (sign, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (-1i64, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (1i64, stripped)
        } else {
            (1i64, trimmed)
        };

        let rest = rest.replace(',', "");
        if rest.is_empty() {
            return Err(ParseAmountError::Empty);
        }

        let mut parts = rest.split('.');
        let units_str = parts.next().unwrap_or_default();
        let frac_str = parts.next().unwrap_or_default();
        if parts.next().is_some() {
            return Err(ParseAmountError::NonNumeric);
        }

        if units_str.is_empty() && frac_str.is_empty() {
            return Err(ParseAmountError::NonNumeric);
        }
        if !units_str.chars().all(|c| c.is_ascii_digit())
            || !frac_str.chars().all(|c| c.is_ascii_digit())
        {
            return Err(ParseAmountError::NonNumeric);
        }

        let units: i64 = if units_str.is_empty() {
            0
        } else {
            units_str
                .parse()
                .map_err(|_| ParseAmountError::Overflow)?
        };

        // Truncation: only the first two fraction digits count.
        let cents: i64 = match frac_str.len() {
            0 => 0,
            1 => frac_str
                .parse::<i64>()
                .map_err(|_| ParseAmountError::NonNumeric)?
                * 10,
            _ => frac_str[..2]
                .parse::<i64>()
                .map_err(|_| ParseAmountError::NonNumeric)?,
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or(ParseAmountError::Overflow)?;

        let signed = if sign < 0 {
            total.checked_neg().ok_or(ParseAmountError::Overflow)?
        } else {
            total
        };

        Ok(Amount(signed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_two_fraction_digits() {
        assert_eq!(Amount::from_cents(0).to_string(), "0.00");
        assert_eq!(Amount::from_cents(1).to_string(), "0.01");
        assert_eq!(Amount::from_cents(10).to_string(), "0.10");
        assert_eq!(Amount::from_cents(1575).to_string(), "15.75");
        assert_eq!(Amount::from_cents(-1050).to_string(), "-10.50");
    }

    #[test]
    fn parse_strips_thousands_separators() {
        assert_eq!("1,234.56".parse::<Amount>().unwrap().cents(), 123_456);
        assert_eq!("12,345".parse::<Amount>().unwrap().cents(), 1_234_500);
    }

    #[test]
    fn parse_truncates_past_two_decimals() {
        assert_eq!("10.999".parse::<Amount>().unwrap().cents(), 1099);
        assert_eq!("0.019".parse::<Amount>().unwrap().cents(), 1);
        assert_eq!("10.5".parse::<Amount>().unwrap().cents(), 1050);
    }

    #[test]
    fn parse_rejects_non_numeric() {
        assert!("".parse::<Amount>().is_err());
        assert!("  ".parse::<Amount>().is_err());
        assert!("ten".parse::<Amount>().is_err());
        assert!("1.2.3".parse::<Amount>().is_err());
        assert!(".".parse::<Amount>().is_err());
    }

    #[test]
    fn parse_keeps_sign() {
        assert_eq!("-5.00".parse::<Amount>().unwrap().cents(), -500);
        assert_eq!("+2.30".parse::<Amount>().unwrap().cents(), 230);
    }
}
