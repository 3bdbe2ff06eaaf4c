//! Domain models persisted by the state layer.
//!
//! Every type here round-trips through JSON under one store key; see
//! [`crate::db::keys`] for the layout.

pub mod cart;
pub mod product;
pub mod user;

pub use cart::CartLine;
pub use product::{Product, ProductDraft, ProductFields, ProductValidationError, seed_catalog};
pub use user::User;
