//! Product categories and the catalog's category filter.

use serde::{Deserialize, Serialize};

/// Error returned when a category string is neither `dog` nor `cat`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("category must be 'dog' or 'cat', got '{0}'")]
pub struct CategoryError(pub String);

/// The two product categories the shop sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Food, treats and gear for dogs.
    Dog,
    /// Toys and supplies for cats.
    Cat,
}

impl Category {
    /// Image shown for products of this category.
    #[must_use]
    pub const fn default_image(&self) -> &'static str {
        match self {
            Self::Dog => "dog-food.png",
            Self::Cat => "cat-toy.png",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dog => write!(f, "dog"),
            Self::Cat => write!(f, "cat"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dog" => Ok(Self::Dog),
            "cat" => Ok(Self::Cat),
            _ => Err(CategoryError(s.to_owned())),
        }
    }
}

/// Category selection on the catalog screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    /// Every category is shown.
    #[default]
    All,
    /// Only products of the given category are shown.
    Only(Category),
}

impl CategoryFilter {
    /// Select `category`, or go back to [`CategoryFilter::All`] when it is
    /// already the active one.
    #[must_use]
    pub fn toggle(self, category: Category) -> Self {
        if self == Self::Only(category) {
            Self::All
        } else {
            Self::Only(category)
        }
    }

    /// Whether a product of `category` passes this filter.
    #[must_use]
    pub fn admits(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(active) => *active == category,
        }
    }
}

impl std::str::FromStr for CategoryFilter {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}
