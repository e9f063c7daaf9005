//! Product identifiers.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a catalog product.
///
/// Catalog ids are short strings (`"1"`, `"2"`, ...) that never change once a
/// product is published. Two cart lines with the same `ProductId` refer to the
/// same product.
///
/// ```
/// use bazar_core::ProductId;
///
/// let id = ProductId::new("7");
/// assert_eq!(id.as_str(), "7");
/// assert_eq!(id, ProductId::from("7"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
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

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
