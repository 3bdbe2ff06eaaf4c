//! Cart pricing engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use petshop_core::{CurrencyCode, ExchangeRate};

use crate::models::CartLine;

/// Order totals in both currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    /// Sum of line prices in the source currency.
    pub subtotal: Decimal,
    /// `subtotal` converted with the exchange rate.
    pub total: Decimal,
}

impl CartTotals {
    /// Subtotal formatted in the source currency, e.g. `$20.00`.
    #[must_use]
    pub fn subtotal_display(&self) -> String {
        CurrencyCode::USD.format(self.subtotal)
    }

    /// Total formatted in the local currency, e.g. `730.00 Bs.`.
    #[must_use]
    pub fn total_display(&self) -> String {
        CurrencyCode::VES.format(self.total)
    }
}

/// Errors from pricing a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PricingError {
    /// The subtotal or the converted total exceeds what a `Decimal` holds.
    #[error("cart total is too large to compute")]
    Overflow,
}

/// Sum the lines and convert with `rate`.
///
/// Prices are validated when products are written, so every line
/// contributes a real amount. An empty cart totals zero.
///
/// # Errors
///
/// Returns `PricingError::Overflow` if the sum or the conversion does not
/// fit in a `Decimal`.
pub fn compute_totals(lines: &[CartLine], rate: ExchangeRate) -> Result<CartTotals, PricingError> {
    let subtotal = lines
        .iter()
        .try_fold(Decimal::ZERO, |sum, line| sum.checked_add(line.price.amount()))
        .ok_or(PricingError::Overflow)?;
    let total = rate.convert(subtotal).ok_or(PricingError::Overflow)?;
    Ok(CartTotals { subtotal, total })
}
