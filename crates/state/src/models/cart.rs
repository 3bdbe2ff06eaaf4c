//! Cart line type.

use serde::{Deserialize, Serialize};

use petshop_core::{Price, ProductId};

use super::product::Product;

/// A snapshot of a product taken when it was added to the cart.
///
/// Lines are not deduplicated and carry no identity of their own; the cart
/// addresses them by position. Later edits to the product do not reach an
/// existing line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Copied from the product; repeated when the product is added twice.
    pub id: ProductId,
    /// Product name at the time it was added.
    pub name: String,
    /// Unit price in dollars at the time it was added.
    pub price: Price,
    /// Image file name.
    pub image: String,
}

impl From<&Product> for CartLine {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
        }
    }
}
