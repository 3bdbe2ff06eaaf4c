//! Type-safe price and exchange-rate representation using decimal arithmetic.
//!
//! Catalog prices are in the source currency (US dollars). Cart totals are
//! converted into the local currency (bolívares) with an [`ExchangeRate`].
//! Both serialize as decimal strings (`"15.00"`), which preserves the scale
//! the user entered.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when parsing a [`Price`] or [`ExchangeRate`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty (after trimming).
    #[error("amount cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("'{0}' is not a number")]
    NotANumber(String),
    /// Prices cannot be negative.
    #[error("amount cannot be negative")]
    Negative,
    /// Exchange rates must be strictly positive.
    #[error("exchange rate must be greater than zero")]
    NotPositive,
}

fn parse_decimal(s: &str) -> Result<Decimal, PriceError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(PriceError::Empty);
    }
    Decimal::from_str(s).map_err(|_| PriceError::NotANumber(s.to_owned()))
}

/// A non-negative amount in the source currency.
///
/// ```
/// use petshop_core::Price;
///
/// assert_eq!(Price::parse("15.00").unwrap().to_string(), "15.00");
/// assert!(Price::parse("-1").is_err());
/// assert!(Price::parse("abc").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero in the source currency.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Parse a price from user input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not a number, or negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        Self::try_from(parse_decimal(s)?)
    }

    /// Build a price from a whole number of cents (`1500` is `15.00`).
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self(amount))
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::try_from(amount).map_err(serde::de::Error::custom)
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

/// Conversion factor from the source currency to the local currency.
///
/// Defaults to `1` when the user never set one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ExchangeRate(Decimal);

impl ExchangeRate {
    /// Parse a rate from user input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not a number, or not positive.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        Self::try_from(parse_decimal(s)?)
    }

    /// The decimal factor.
    #[must_use]
    pub const fn factor(&self) -> Decimal {
        self.0
    }

    /// Convert a source-currency amount into the local currency.
    ///
    /// Returns `None` if the result does not fit in a `Decimal`.
    #[must_use]
    pub fn convert(&self, amount: Decimal) -> Option<Decimal> {
        amount.checked_mul(self.0)
    }
}

impl Default for ExchangeRate {
    fn default() -> Self {
        Self(Decimal::ONE)
    }
}

impl TryFrom<Decimal> for ExchangeRate {
    type Error = PriceError;

    fn try_from(factor: Decimal) -> Result<Self, Self::Error> {
        if factor <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }
        Ok(Self(factor))
    }
}

impl<'de> Deserialize<'de> for ExchangeRate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let factor = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::try_from(factor).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Currencies the app displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    /// Source currency of catalog prices.
    #[default]
    USD,
    /// Local currency cart totals are converted into.
    VES,
}

impl CurrencyCode {
    /// ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::VES => "VES",
        }
    }

    /// Format an amount for display, rounded to two decimals
    /// (`$20.00`, `730.00 Bs.`).
    #[must_use]
    pub fn format(&self, amount: Decimal) -> String {
        let rounded = amount.round_dp(2);
        match self {
            Self::USD => format!("${rounded:.2}"),
            Self::VES => format!("{rounded:.2} Bs."),
        }
    }
}
