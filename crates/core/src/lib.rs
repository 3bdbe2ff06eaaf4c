//! Petshop Core - Shared domain types.
//!
//! This crate provides the value types used across all Petshop components:
//! - `state` - Local persisted state layer (repositories, session, pricing)
//! - `cli` - Command-line front end driving the state layer
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no storage
//! access, no async runtime. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, exchange rates,
//!   emails, and categories

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
