//! Shopping cart.

use thiserror::Error;

use petshop_core::ExchangeRate;

use crate::db::{Cart, DollarRate, Recovered, Repository, RepositoryError};
use crate::models::{CartLine, Product};
use crate::pricing::{CartTotals, PricingError, compute_totals};

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// No line at this position.
    #[error("no cart line at position {index} (cart has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// The totals cannot be computed.
    #[error("pricing error: {0}")]
    Pricing(#[from] PricingError),

    /// Storage error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Everything the cart screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    /// Lines in insertion order.
    pub lines: Vec<CartLine>,
    /// Rate the totals were converted with.
    pub rate: ExchangeRate,
    /// Subtotal and converted total.
    pub totals: CartTotals,
    /// Set when the cart or the rate could not be read and a default was
    /// used instead.
    pub advisory: Option<String>,
}

/// Cart service.
///
/// Lines are product snapshots taken when added; adding the same product
/// twice yields two lines. Removal is by position, never by product ID.
pub struct CartService<'a> {
    cart: &'a Repository<Cart>,
    rate: &'a Repository<DollarRate>,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub const fn new(cart: &'a Repository<Cart>, rate: &'a Repository<DollarRate>) -> Self {
        Self { cart, rate }
    }

    /// Current lines in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the cart cannot be read.
    pub async fn lines(&self) -> Result<Vec<CartLine>, CartError> {
        Ok(self.cart.load().await?)
    }

    /// Append a snapshot of `product`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the cart cannot be read or written.
    pub async fn add(&self, product: &Product) -> Result<CartLine, CartError> {
        let line = CartLine::from(product);
        let len = self
            .cart
            .transform(|lines| {
                lines.push(line.clone());
                Ok::<_, CartError>(lines.len())
            })
            .await?;

        tracing::info!(id = %line.id, lines = len, "Added to cart");
        Ok(line)
    }

    /// Remove the line at `index`. Other lines with the same product ID stay.
    ///
    /// # Errors
    ///
    /// Returns `CartError::IndexOutOfRange` if there is no such line; the cart
    /// is left unchanged.
    pub async fn remove_at(&self, index: usize) -> Result<CartLine, CartError> {
        let removed = self
            .cart
            .transform(|lines| {
                if index >= lines.len() {
                    return Err(CartError::IndexOutOfRange {
                        index,
                        len: lines.len(),
                    });
                }
                Ok(lines.remove(index))
            })
            .await?;

        tracing::info!(id = %removed.id, index, "Removed from cart");
        Ok(removed)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the cart cannot be written.
    pub async fn clear(&self) -> Result<(), CartError> {
        self.cart.replace(&Vec::new()).await?;
        tracing::info!("Cleared cart");
        Ok(())
    }

    /// Totals for the current cart at the stored exchange rate.
    ///
    /// # Errors
    ///
    /// See [`summary`](Self::summary).
    pub async fn totals(&self) -> Result<CartTotals, CartError> {
        Ok(self.summary().await?.totals)
    }

    /// Lines, rate and totals read together.
    ///
    /// An unreadable cart shows as empty and an unreadable rate as `1`; the
    /// summary then carries an advisory for the user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if a stored value does not
    /// decode and `CartError::Pricing` if the totals overflow.
    pub async fn summary(&self) -> Result<CartSummary, CartError> {
        let Recovered {
            value: lines,
            advisory: cart_advisory,
        } = self.cart.load_or_default().await?;
        let Recovered {
            value: rate,
            advisory: rate_advisory,
        } = self.rate.load_or_default().await?;
        let totals = compute_totals(&lines, rate)?;

        let advisory = match (cart_advisory, rate_advisory) {
            (Some(cart), Some(rate)) => Some(format!("{cart} {rate}")),
            (cart, rate) => cart.or(rate),
        };
        Ok(CartSummary {
            lines,
            rate,
            totals,
            advisory,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use petshop_core::{Price, ProductId};

    use super::*;
    use crate::db::keys;
    use crate::kv::testing::{BrokenKeyStore, FailingStore};
    use crate::kv::{KeyValueStore, MemoryStore};
    use crate::models::seed_catalog;

    fn repos() -> (Repository<Cart>, Repository<DollarRate>) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        (Repository::new(Arc::clone(&store)), Repository::new(store))
    }

    fn ids(lines: &[CartLine]) -> Vec<&str> {
        lines.iter().map(|l| l.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_empty_cart() {
        let (cart, rate) = repos();
        let service = CartService::new(&cart, &rate);
        assert!(service.lines().await.unwrap().is_empty());
        assert_eq!(service.totals().await.unwrap().total, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_same_product_twice_is_two_lines() {
        let (cart, rate) = repos();
        let service = CartService::new(&cart, &rate);
        let [dog, _cat] = <[Product; 2]>::try_from(seed_catalog()).unwrap();

        service.add(&dog).await.unwrap();
        service.add(&dog).await.unwrap();
        assert_eq!(ids(&service.lines().await.unwrap()), ["1", "1"]);
    }

    #[tokio::test]
    async fn test_remove_is_positional() {
        let (cart, rate) = repos();
        let service = CartService::new(&cart, &rate);
        let [dog, cat] = <[Product; 2]>::try_from(seed_catalog()).unwrap();

        service.add(&dog).await.unwrap();
        service.add(&cat).await.unwrap();
        service.add(&cat).await.unwrap();

        let removed = service.remove_at(1).await.unwrap();
        assert_eq!(removed.id.as_str(), "2");
        assert_eq!(ids(&service.lines().await.unwrap()), ["1", "2"]);
    }

    #[tokio::test]
    async fn test_remove_out_of_range_leaves_cart() {
        let (cart, rate) = repos();
        let service = CartService::new(&cart, &rate);
        service.add(&seed_catalog()[0]).await.unwrap();

        assert!(matches!(
            service.remove_at(1).await,
            Err(CartError::IndexOutOfRange { index: 1, len: 1 })
        ));
        assert_eq!(service.lines().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_summary_uses_stored_rate() {
        let (cart, rate) = repos();
        rate.replace(&ExchangeRate::parse("36.5").unwrap())
            .await
            .unwrap();
        let service = CartService::new(&cart, &rate);
        for product in seed_catalog() {
            service.add(&product).await.unwrap();
        }

        let summary = service.summary().await.unwrap();
        assert_eq!(summary.lines.len(), 2);
        assert_eq!(summary.totals.subtotal_display(), "$20.00");
        assert_eq!(summary.totals.total_display(), "730.00 Bs.");
        assert_eq!(summary.advisory, None);
    }

    #[tokio::test]
    async fn test_unreadable_rate_prices_at_one() {
        let store: Arc<dyn KeyValueStore> = Arc::new(BrokenKeyStore::new(keys::DOLLAR_RATE));
        let cart = Repository::<Cart>::new(Arc::clone(&store));
        let rate = Repository::<DollarRate>::new(store);
        let service = CartService::new(&cart, &rate);
        for product in seed_catalog() {
            service.add(&product).await.unwrap();
        }

        let summary = service.summary().await.unwrap();
        assert_eq!(summary.rate, ExchangeRate::default());
        assert_eq!(summary.totals.total_display(), "20.00 Bs.");
        assert_eq!(
            summary.advisory.as_deref(),
            Some("Could not load saved exchange rate.")
        );
    }

    #[tokio::test]
    async fn test_unreadable_store_shows_empty_cart() {
        let cart = Repository::<Cart>::new(Arc::new(FailingStore));
        let rate = Repository::<DollarRate>::new(Arc::new(FailingStore));
        let service = CartService::new(&cart, &rate);

        let summary = service.summary().await.unwrap();
        assert!(summary.lines.is_empty());
        assert_eq!(summary.totals.total, Decimal::ZERO);
        let advisory = summary.advisory.unwrap();
        assert!(advisory.contains("cart"));
        assert!(advisory.contains("exchange rate"));
        // Writes still fail loudly
        assert!(matches!(
            service.add(&seed_catalog()[0]).await,
            Err(CartError::Repository(RepositoryError::Store(_)))
        ));
    }

    #[tokio::test]
    async fn test_overflowing_cart_is_an_error() {
        let (cart, rate) = repos();
        let huge = CartLine {
            id: ProductId::new("9"),
            name: "Gold Bone".to_owned(),
            price: Price::parse("50000000000000000000000000000").unwrap(),
            image: "dog-food.png".to_owned(),
        };
        cart.replace(&vec![huge.clone(), huge]).await.unwrap();
        let service = CartService::new(&cart, &rate);

        assert!(matches!(
            service.summary().await,
            Err(CartError::Pricing(PricingError::Overflow))
        ));
        // The lines are still readable so the user can remove one
        assert_eq!(service.lines().await.unwrap().len(), 2);
        service.remove_at(0).await.unwrap();
        assert!(service.totals().await.is_ok());
    }

    #[tokio::test]
    async fn test_clear() {
        let (cart, rate) = repos();
        let service = CartService::new(&cart, &rate);
        service.add(&seed_catalog()[1]).await.unwrap();
        service.clear().await.unwrap();
        assert!(service.lines().await.unwrap().is_empty());
    }
}
