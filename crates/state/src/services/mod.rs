//! Business logic services over the repositories.
//!
//! # Services
//!
//! - `session` - Who is logged in, with change notification
//! - `auth` - Registration and email/password sign-in
//! - `catalog` - Product maintenance and the exchange rate
//! - `cart` - Cart lines and totals

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod session;

pub use auth::{AuthError, AuthService};
pub use cart::{CartError, CartService, CartSummary};
pub use catalog::{CatalogError, CatalogService};
pub use session::{Screen, SessionError, SessionManager, SessionState};
