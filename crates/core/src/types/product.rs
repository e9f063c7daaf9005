//! Catalog product records.

use serde::{Deserialize, Serialize};

use super::{Category, Price, ProductId};

/// A product as listed in the catalog.
///
/// Products are immutable once defined. Cart lines hold their own snapshot,
/// so the serialized shape here is also the shape of persisted cart entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    pub price: Price,
    /// Image URL.
    pub image: String,
    pub description: String,
}
