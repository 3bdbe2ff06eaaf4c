//! Catalog query engine.
//!
//! Derives the product list shown on the catalog screen from the full
//! catalog, the selected category and the search box. Pure functions only;
//! the caller owns the product list and decides when to reload it.

use serde::{Deserialize, Serialize};

use petshop_core::{Category, CategoryFilter};

use crate::models::Product;

/// Filter `all` by category, then by a case-insensitive name search.
///
/// The search narrows the category result; it never widens it. A blank
/// (or whitespace-only) search matches everything. The input is not
/// modified and the relative order of products is kept.
#[must_use]
pub fn filter_products(all: &[Product], category: CategoryFilter, search: &str) -> Vec<Product> {
    let needle = search.trim().to_lowercase();
    all.iter()
        .filter(|p| category.admits(p.category))
        .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Catalog screen query state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    category: CategoryFilter,
    search: String,
}

impl CatalogQuery {
    /// Start with every category and an empty search.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Active category filter.
    #[must_use]
    pub const fn category(&self) -> CategoryFilter {
        self.category
    }

    /// Current search text, as typed.
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Press a category button: selects it, or returns to all categories if
    /// it was already selected.
    pub fn select_category(&mut self, category: Category) -> CategoryFilter {
        self.category = self.category.toggle(category);
        self.category
    }

    /// Replace the search text.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Clear both filters, as when the catalog screen is re-entered.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Apply this query to `all`.
    #[must_use]
    pub fn apply(&self, all: &[Product]) -> Vec<Product> {
        filter_products(all, self.category, &self.search)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use petshop_core::ProductId;

    use super::*;
    use crate::models::ProductDraft;

    fn product(id: &str, name: &str, category: &str) -> Product {
        Product::new(
            ProductId::new(id),
            ProductDraft::new(name, category, "1.00").validate().unwrap(),
        )
    }

    fn catalog() -> Vec<Product> {
        vec![
            product("1", "Dog Chow", "dog"),
            product("2", "Cat Toy", "cat"),
            product("3", "Dog Treats", "dog"),
        ]
    }

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_no_filters_returns_everything() {
        let all = catalog();
        assert_eq!(filter_products(&all, CategoryFilter::All, ""), all);
        assert_eq!(filter_products(&all, CategoryFilter::All, "   "), all);
    }

    #[test]
    fn test_category_only() {
        let all = catalog();
        let dogs = filter_products(&all, CategoryFilter::Only(Category::Dog), "");
        assert_eq!(names(&dogs), ["Dog Chow", "Dog Treats"]);
    }

    #[test]
    fn test_search_narrows_within_category() {
        let all = catalog();
        let result = filter_products(&all, CategoryFilter::Only(Category::Dog), "chow");
        assert_eq!(names(&result), ["Dog Chow"]);

        // "toy" exists, but not among dogs
        let result = filter_products(&all, CategoryFilter::Only(Category::Dog), "toy");
        assert!(result.is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_and_trimmed() {
        let all = catalog();
        let result = filter_products(&all, CategoryFilter::All, "  DOG ");
        assert_eq!(names(&result), ["Dog Chow", "Dog Treats"]);
    }

    #[test]
    fn test_input_is_not_modified() {
        let all = catalog();
        let before = all.clone();
        let _ = filter_products(&all, CategoryFilter::Only(Category::Cat), "toy");
        assert_eq!(all, before);
    }

    #[test]
    fn test_select_same_category_twice_resets() {
        let all = catalog();
        let mut query = CatalogQuery::new();
        assert_eq!(
            query.select_category(Category::Dog),
            CategoryFilter::Only(Category::Dog)
        );
        assert_eq!(query.select_category(Category::Dog), CategoryFilter::All);
        assert_eq!(query.apply(&all), all);
        // A third press selects it again
        assert_eq!(
            query.select_category(Category::Dog),
            CategoryFilter::Only(Category::Dog)
        );
    }

    #[test]
    fn test_reset_clears_query() {
        let mut query = CatalogQuery::new();
        query.select_category(Category::Cat);
        query.set_search("toy");
        assert_eq!(names(&query.apply(&catalog())), ["Cat Toy"]);
        query.reset();
        assert_eq!(query, CatalogQuery::new());
        assert_eq!(query.search(), "");
    }
}
