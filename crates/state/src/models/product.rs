//! Catalog product types and form validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use petshop_core::{Category, CategoryError, Price, PriceError, ProductId};

/// A catalog entry, stored in the `products` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Assigned at creation, never changed.
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    /// Source-currency price, persisted as a decimal string.
    pub price: Price,
    /// Image reference, derived from the category.
    pub image: String,
}

impl Product {
    /// Build a new product from validated fields.
    #[must_use]
    pub fn new(id: ProductId, fields: ProductFields) -> Self {
        Self {
            id,
            name: fields.name,
            category: fields.category,
            price: fields.price,
            image: fields.category.default_image().to_owned(),
        }
    }

    /// Overwrite every editable field, keeping the ID.
    ///
    /// The image follows the (possibly new) category.
    pub fn apply(&mut self, fields: ProductFields) {
        self.name = fields.name;
        self.category = fields.category;
        self.price = fields.price;
        self.image = fields.category.default_image().to_owned();
    }
}

/// Catalog written on first run.
#[must_use]
pub fn seed_catalog() -> Vec<Product> {
    vec![
        Product::new(
            ProductId::new("1"),
            ProductFields {
                name: "Dog Chow - 3Kg".to_owned(),
                category: Category::Dog,
                price: Price::from_cents(1500),
            },
        ),
        Product::new(
            ProductId::new("2"),
            ProductFields {
                name: "Cat Toy".to_owned(),
                category: Category::Cat,
                price: Price::from_cents(500),
            },
        ),
    ]
}

/// Validation failures for a product form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductValidationError {
    /// A required field was left blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error(transparent)]
    InvalidCategory(#[from] CategoryError),

    #[error("invalid price: {0}")]
    InvalidPrice(#[from] PriceError),
}

/// Raw product form input as the user typed it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub category: String,
    pub price: String,
}

/// Product fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    pub name: String,
    pub category: Category,
    pub price: Price,
}

impl ProductDraft {
    /// Create a draft from raw input.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            price: price.into(),
        }
    }

    /// Check the form. The draft itself is left untouched so the caller can
    /// show it again for correction.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule: blank field, category outside
    /// {dog, cat}, or a price that is not a non-negative number.
    pub fn validate(&self) -> Result<ProductFields, ProductValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ProductValidationError::MissingField("name"));
        }
        if self.category.trim().is_empty() {
            return Err(ProductValidationError::MissingField("category"));
        }
        if self.price.trim().is_empty() {
            return Err(ProductValidationError::MissingField("price"));
        }

        Ok(ProductFields {
            name: name.to_owned(),
            category: self.category.parse()?,
            price: Price::parse(&self.price)?,
        })
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category.to_string(),
            price: product.price.to_string(),
        }
    }
}
