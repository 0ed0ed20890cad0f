//! Overdue fine amount.
//!
//! Uses `rust_decimal` internally so that fines read from and written to the
//! patron file survive a round trip exactly, without floating-point drift.

use crate::error::ValidationError;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Largest fine a patron may owe, in whole currency units.
pub const MAX_FINE: i64 = 250;

/// An overdue fine, always within `0..=250`.
///
/// The amount is kept exactly as given; only trailing zeros are dropped.
/// Display pads to at least two decimal places but never rounds.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use patron_roster::Fine;
///
/// let fine = Fine::from_str("12.5").unwrap();
/// assert_eq!(fine.to_string(), "12.50");
/// assert_eq!(Fine::from_str("3.14159").unwrap().to_string(), "3.14159");
/// assert!(Fine::from_str("250.01").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Fine(Decimal);

impl Fine {
    /// Minimum number of decimal places shown.
    pub const DISPLAY_SCALE: u32 = 2;

    /// No fine owed.
    pub const ZERO: Self = Fine(Decimal::ZERO);

    /// Creates a fine from a decimal amount, rejecting anything outside
    /// `0..=250`.
    pub fn new(amount: Decimal) -> Result<Self, ValidationError> {
        if (amount.is_sign_negative() && !amount.is_zero()) || amount > Decimal::from(MAX_FINE) {
            return Err(ValidationError::FineOutOfRange(amount.to_string()));
        }
        if amount.is_zero() {
            return Ok(Fine::ZERO);
        }

        Ok(Fine(amount.normalize()))
    }

    /// Returns the underlying decimal amount.
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns `true` if nothing is owed.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

/// Parses an amount in plain (`12.5`) or scientific (`1.25e1`) notation
/// without range checking. Digit separators (`1_0`) are not numbers here.
pub fn parse_amount(s: &str) -> Result<Decimal, ValidationError> {
    let trimmed = s.trim();
    if trimmed.contains('_') {
        return Err(ValidationError::InvalidFine(trimmed.to_string()));
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| ValidationError::InvalidFine(trimmed.to_string()))
}

impl FromStr for Fine {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Fine::new(parse_amount(s)?)
    }
}

impl fmt::Display for Fine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut shown = self.0;
        if shown.scale() < Self::DISPLAY_SCALE {
            shown.rescale(Self::DISPLAY_SCALE);
        }
        write!(f, "{}", shown)
    }
}

impl Serialize for Fine {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
