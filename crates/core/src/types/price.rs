//! Non-negative product price using decimal arithmetic.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
}

/// A product price.
///
/// Always non-negative and rounded to two fractional digits. Stored in an
/// unbounded `NUMERIC` column, so every `Decimal` in range round-trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Number of fractional digits kept.
    pub const SCALE: u32 = 2;

    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount, rounding to two places.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount.round_dp(Self::SCALE)))
    }

    /// Parse a price from free-form form input.
    ///
    /// Admin forms are lenient: a missing, blank, unparseable or negative
    /// value becomes zero instead of an error. A comma is accepted as the
    /// decimal separator.
    #[must_use]
    pub fn parse_lenient(input: Option<&str>) -> Self {
        let Some(raw) = input.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::ZERO;
        };

        let normalized = raw.replace(',', ".");
        Decimal::from_str(&normalized)
            .ok()
            .and_then(|amount| Self::new(amount).ok())
            .unwrap_or(Self::ZERO)
    }

    /// The underlying amount.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}
