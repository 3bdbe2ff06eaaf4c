//! Product identifiers.
//!
//! Product IDs are strings so that records created by earlier app versions
//! (seed entries use `"1"`, `"2"`) keep loading. New IDs are derived from the
//! creation timestamp in milliseconds.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Identifier of a catalog product.
///
/// Assigned once at creation and never changed afterwards. Cart lines copy
/// it, so within a cart it is *not* unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wrap an existing identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh ID from the current time.
    ///
    /// See [`ProductId::next_after`] for how collisions are avoided.
    #[must_use]
    pub fn generate<'a>(existing: impl IntoIterator<Item = &'a Self>) -> Self {
        Self::next_after(Utc::now().timestamp_millis(), existing)
    }

    /// Build an ID from `now_millis`, bumped past every numeric ID in
    /// `existing` that is not smaller. Two products created within the same
    /// millisecond therefore still get distinct IDs.
    #[must_use]
    pub fn next_after<'a>(now_millis: i64, existing: impl IntoIterator<Item = &'a Self>) -> Self {
        let candidate = existing
            .into_iter()
            .filter_map(|id| id.0.parse::<i64>().ok())
            .filter(|&n| n >= now_millis)
            .max()
            .map_or(now_millis, |n| n.saturating_add(1));
        Self(candidate.to_string())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ::core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
