//! Price and stock quantities parsed from form input.
//!
//! Both types reject negative values at construction, so a [`Price`] or a
//! [`StockQuantity`] held anywhere in the system is known to be valid.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("price must be a number")]
    NotANumber,
    /// The input is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// Errors that can occur when parsing a [`StockQuantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// The input is empty.
    #[error("stock quantity cannot be empty")]
    Empty,
    /// The input is not a whole number.
    #[error("stock quantity must be a whole number")]
    NotAnInteger,
    /// The input is below zero.
    #[error("stock quantity cannot be negative")]
    Negative,
    /// The input does not fit the stock counter.
    #[error("stock quantity is too large")]
    TooLarge,
}

/// A non-negative product price in the storefront's currency.
///
/// ```
/// use itiza_core::Price;
///
/// assert_eq!(Price::parse("19.99").unwrap().to_string(), "19.99");
/// assert!(Price::parse("abc").is_err());
/// assert!(Price::parse("-1").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount.normalize()))
    }

    /// Parse a price from form input.
    ///
    /// # Errors
    ///
    /// Returns a [`PriceError`] if the input is empty, not a number, or negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PriceError::Empty);
        }
        let amount = Decimal::from_str(s).map_err(|_| PriceError::NotANumber)?;
        Self::new(amount)
    }

    /// The amount in the storefront's standard unit.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

/// Units of a product available for gifting.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct StockQuantity(u32);

impl StockQuantity {
    /// Create a stock quantity.
    #[must_use]
    pub const fn new(units: u32) -> Self {
        Self(units)
    }

    /// Parse a stock quantity from form input.
    ///
    /// # Errors
    ///
    /// Returns a [`QuantityError`] if the input is empty, not an integer,
    /// negative, or larger than `u32::MAX`.
    pub fn parse(s: &str) -> Result<Self, QuantityError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(QuantityError::Empty);
        }
        let value: i64 = s.parse().map_err(|_| QuantityError::NotAnInteger)?;
        if value < 0 {
            return Err(QuantityError::Negative);
        }
        u32::try_from(value)
            .map(Self)
            .map_err(|_| QuantityError::TooLarge)
    }

    /// Number of units.
    #[must_use]
    pub const fn units(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for StockQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StockQuantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
