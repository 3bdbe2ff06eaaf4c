//! Core types for Petshop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod email;
pub mod id;
pub mod price;

pub use category::{Category, CategoryError, CategoryFilter};
pub use email::{Email, EmailError};
pub use id::ProductId;
pub use price::{CurrencyCode, ExchangeRate, Price, PriceError};
