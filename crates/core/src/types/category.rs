//! Product categories and the category filter.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Category`] or [`CategoryFilter`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// The closed set of catalog categories.
///
/// Serialized with its display label, which is also the shape stored in
/// persisted cart snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Mochilas")]
    Backpacks,
    #[serde(rename = "Juguetes")]
    Toys,
    #[serde(rename = "Accesorios")]
    Accessories,
    #[serde(rename = "Mini electrónicos")]
    MiniElectronics,
    #[serde(rename = "Regalos")]
    Gifts,
    #[serde(rename = "Librería y Hogar")]
    StationeryAndHome,
}

impl Category {
    /// All categories, in the order the storefront lists them.
    pub const ALL: [Self; 6] = [
        Self::Backpacks,
        Self::Toys,
        Self::Accessories,
        Self::MiniElectronics,
        Self::Gifts,
        Self::StationeryAndHome,
    ];

    /// Display label shown to customers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Backpacks => "Mochilas",
            Self::Toys => "Juguetes",
            Self::Accessories => "Accesorios",
            Self::MiniElectronics => "Mini electrónicos",
            Self::Gifts => "Regalos",
            Self::StationeryAndHome => "Librería y Hogar",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    /// Parses a category label, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.label().to_lowercase() == wanted)
            .ok_or_else(|| CategoryError(s.to_string()))
    }
}

/// Active category selection in the catalog view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    /// Every category ("Todos" in the storefront).
    #[default]
    All,
    /// A single category.
    Only(Category),
}

impl CategoryFilter {
    /// Whether a product in `category` passes this filter.
    #[must_use]
    pub fn admits(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(active) => active == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") || trimmed.eq_ignore_ascii_case("todos") {
            return Ok(Self::All);
        }
        trimmed.parse().map(Self::Only)
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        Self::Only(category)
    }
}
