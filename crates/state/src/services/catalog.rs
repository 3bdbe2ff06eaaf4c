//! Catalog maintenance: product CRUD and the exchange rate.
//!
//! Every mutation validates the form first and only then runs a repository
//! transform, so a rejected form never touches the store.

use thiserror::Error;

use petshop_core::{ExchangeRate, PriceError, ProductId};

use crate::db::{DollarRate, Products, Recovered, Repository, RepositoryError};
use crate::models::{Product, ProductDraft, ProductValidationError};

/// Errors from catalog maintenance.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The product form is invalid.
    #[error("invalid product: {0}")]
    Validation(#[from] ProductValidationError),

    /// The exchange rate input is invalid.
    #[error("invalid exchange rate: {0}")]
    InvalidRate(#[source] PriceError),

    /// No product with this ID.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// Storage error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Product and exchange-rate maintenance.
pub struct CatalogService<'a> {
    products: &'a Repository<Products>,
    rate: &'a Repository<DollarRate>,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(products: &'a Repository<Products>, rate: &'a Repository<DollarRate>) -> Self {
        Self { products, rate }
    }

    /// All products, seeding the catalog on first run.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the catalog cannot be read.
    pub async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.load().await?)
    }

    /// Products for the catalog screen. An unreadable store shows an empty
    /// catalog with an advisory instead of failing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the stored catalog does
    /// not decode.
    pub async fn browse(&self) -> Result<Recovered<Vec<Product>>, CatalogError> {
        Ok(self.products.load_or_default().await?)
    }

    /// Look up one product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if no product has this ID.
    pub async fn product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        self.products
            .load()
            .await?
            .into_iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| CatalogError::ProductNotFound(id.clone()))
    }

    /// Add a product with a freshly generated ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if the draft is invalid.
    pub async fn create(&self, draft: &ProductDraft) -> Result<Product, CatalogError> {
        let fields = draft.validate()?;
        let product = self
            .products
            .transform(|products| {
                let id = ProductId::generate(products.iter().map(|p| &p.id));
                let product = Product::new(id, fields);
                products.push(product.clone());
                Ok::<_, CatalogError>(product)
            })
            .await?;

        tracing::info!(id = %product.id, name = %product.name, "Created product");
        Ok(product)
    }

    /// Replace the editable fields of product `id`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if the draft is invalid and
    /// `CatalogError::ProductNotFound` if no product has this ID.
    pub async fn update(&self, id: &ProductId, draft: &ProductDraft) -> Result<Product, CatalogError> {
        let fields = draft.validate()?;
        let product = self
            .products
            .transform(|products| {
                let product = products
                    .iter_mut()
                    .find(|p| &p.id == id)
                    .ok_or_else(|| CatalogError::ProductNotFound(id.clone()))?;
                product.apply(fields);
                Ok::<_, CatalogError>(product.clone())
            })
            .await?;

        tracing::info!(id = %product.id, "Updated product");
        Ok(product)
    }

    /// Remove product `id` from the catalog. Existing cart lines keep their
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if no product has this ID.
    pub async fn delete(&self, id: &ProductId) -> Result<Product, CatalogError> {
        let removed = self
            .products
            .transform(|products| {
                let index = products
                    .iter()
                    .position(|p| &p.id == id)
                    .ok_or_else(|| CatalogError::ProductNotFound(id.clone()))?;
                Ok::<_, CatalogError>(products.remove(index))
            })
            .await?;

        tracing::info!(id = %removed.id, "Deleted product");
        Ok(removed)
    }

    /// Current exchange rate (`1` if never set).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the rate cannot be read.
    pub async fn exchange_rate(&self) -> Result<ExchangeRate, CatalogError> {
        Ok(self.rate.load().await?)
    }

    /// Current exchange rate, or `1` with an advisory if it cannot be read.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the stored rate does not
    /// decode.
    pub async fn exchange_rate_or_default(&self) -> Result<Recovered<ExchangeRate>, CatalogError> {
        Ok(self.rate.load_or_default().await?)
    }

    /// Parse and store a new exchange rate.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidRate` if `input` is not a positive number.
    pub async fn set_exchange_rate(&self, input: &str) -> Result<ExchangeRate, CatalogError> {
        let rate = ExchangeRate::parse(input).map_err(CatalogError::InvalidRate)?;
        self.rate.replace(&rate).await?;
        tracing::info!(%rate, "Updated exchange rate");
        Ok(rate)
    }
}
