//! Cart session: the in-memory cart plus its persisted snapshot.
//!
//! Every mutation rewrites the snapshot. A write failure is reported to the
//! caller but the in-memory change stands, so the session keeps working even
//! when storage is read-only.

use bazar_core::{Cart, CartLine, Price, Product, ProductId};
use tracing::{debug, instrument, warn};

use crate::error::add_breadcrumb;
use crate::storage::{CartStore, StorageError};

/// A customer's cart bound to a [`CartStore`].
#[derive(Debug)]
pub struct CartSession<S> {
    cart: Cart,
    store: S,
}

impl<S: CartStore> CartSession<S> {
    /// Open a session, rehydrating the cart from `store`.
    ///
    /// A missing, unreadable or malformed snapshot yields an empty cart.
    #[instrument(skip(store))]
    pub fn open(store: S) -> Self {
        let cart = match store.load() {
            Ok(Some(snapshot)) => match serde_json::from_str::<Vec<CartLine>>(&snapshot) {
                Ok(lines) => {
                    let cart = Cart::from_lines(lines);
                    debug!(lines = cart.lines().len(), "Cart rehydrated");
                    cart
                }
                Err(e) => {
                    warn!(error = %e, "Stored cart is malformed, starting empty");
                    Cart::new()
                }
            },
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(error = %e, "Could not read stored cart, starting empty");
                Cart::new()
            }
        };

        Self { cart, store }
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    #[must_use]
    pub fn total(&self) -> Price {
        self.cart.total()
    }

    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Add one unit of `product`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot could not be written.
    pub fn add(&mut self, product: &Product) -> Result<(), StorageError> {
        self.cart.add(product);
        add_breadcrumb("cart", "Added product", Some(&[("product_id", product.id.as_str())]));
        self.persist()
    }

    /// Shift the quantity of `id` by `delta`, never below one.
    ///
    /// Returns `Ok(false)` when the product is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot could not be written.
    pub fn set_quantity(&mut self, id: &ProductId, delta: i64) -> Result<bool, StorageError> {
        let found = self.cart.set_quantity(id, delta);
        self.persist()?;
        Ok(found)
    }

    /// Remove `id` from the cart.
    ///
    /// Returns `Ok(false)` when the product was not in the cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot could not be written.
    pub fn remove(&mut self, id: &ProductId) -> Result<bool, StorageError> {
        let found = self.cart.remove(id);
        if found {
            add_breadcrumb("cart", "Removed product", Some(&[("product_id", id.as_str())]));
        }
        self.persist()?;
        Ok(found)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot could not be written.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.cart.clear();
        self.persist()
    }

    fn persist(&self) -> Result<(), StorageError> {
        let snapshot = serde_json::to_string(self.cart.lines())?;
        self.store.save(&snapshot).inspect_err(|e| {
            warn!(error = %e, "Could not save cart");
        })
    }
}
