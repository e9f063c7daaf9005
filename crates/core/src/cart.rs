//! Cart lines and the cart mutation rules.
//!
//! A [`Cart`] holds at most one [`CartLine`] per product, in the order the
//! products were first added, and never lets a quantity drop below one.
//! Leaving the cart is always an explicit [`Cart::remove`].

use serde::{Deserialize, Serialize};

use crate::types::{Price, Product, ProductId};

/// One product and its requested quantity.
///
/// Serialized flat (product fields plus `quantity`), which is the shape kept
/// in persisted cart snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// A new line with quantity 1.
    #[must_use]
    pub const fn new(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
        }
    }

    /// The product id this line is keyed by.
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.product.id
    }

    /// Unit price × quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// An insertion-ordered collection of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Rebuild a cart from stored lines, restoring the invariants.
    ///
    /// Lines with a repeated id are merged into the first occurrence and a
    /// quantity of zero is raised to one.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut cart = Self::new();
        for mut line in lines {
            line.quantity = line.quantity.max(1);
            match cart.line_mut(line.id()) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => cart.lines.push(line),
            }
        }
        cart
    }

    /// Add one unit of `product`, appending a new line on first add.
    pub fn add(&mut self, product: &Product) {
        match self.line_mut(&product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine::new(product.clone())),
        }
    }

    /// Shift the quantity of line `id` by `delta`, flooring at one.
    ///
    /// Returns `false` (and changes nothing) when no such line exists.
    pub fn set_quantity(&mut self, id: &ProductId, delta: i64) -> bool {
        let Some(line) = self.line_mut(id) else {
            return false;
        };
        let next = i64::from(line.quantity).saturating_add(delta).max(1);
        line.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        true
    }

    /// Remove line `id`. Returns `false` when it was not in the cart.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.id() != id);
        self.lines.len() != before
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for `id`, if present.
    #[must_use]
    pub fn line(&self, id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id() == id)
    }

    fn line_mut(&mut self, id: &ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.id() == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of every line's subtotal.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::subtotal).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::types::Category;

    fn product(id: &str, price: u64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Producto {id}"),
            category: Category::Gifts,
            price: Price::new(price),
            image: String::new(),
            description: String::new(),
        }
    }

    #[test]
    fn test_add_twice_increments_single_line() {
        let mut cart = Cart::new();
        let p = product("1", 100);
        cart.add(&p);
        cart.add(&p);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn test_add_preserves_first_insertion_order() {
        let mut cart = Cart::new();
        cart.add(&product("2", 10));
        cart.add(&product("1", 10));
        cart.add(&product("2", 10));
        let ids: Vec<_> = cart.lines().iter().map(|l| l.id().as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[test]
    fn test_set_quantity_floors_at_one() {
        let mut cart = Cart::new();
        let p = product("1", 100);
        for _ in 0..3 {
            cart.add(&p);
        }
        assert!(cart.set_quantity(&p.id, -100));
        assert_eq!(cart.line(&p.id).unwrap().quantity, 1);
    }

    #[test]
    fn test_set_quantity_increments() {
        let mut cart = Cart::new();
        let p = product("1", 100);
        cart.add(&p);
        cart.set_quantity(&p.id, 4);
        assert_eq!(cart.line(&p.id).unwrap().quantity, 5);
    }

    #[test]
    fn test_set_quantity_missing_is_noop() {
        let mut cart = Cart::new();
        cart.add(&product("1", 100));
        let before = cart.clone();
        assert!(!cart.set_quantity(&ProductId::new("9"), 1));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove() {
        let mut cart = Cart::new();
        cart.add(&product("1", 100));
        cart.add(&product("2", 100));
        assert!(cart.remove(&ProductId::new("1")));
        assert!(!cart.remove(&ProductId::new("1")));
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        let a = product("1", 1000);
        let b = product("2", 250);
        cart.add(&a);
        cart.add(&a);
        cart.add(&b);
        assert_eq!(cart.total(), Price::new(2250));
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_from_lines_merges_and_clamps() {
        let lines = vec![
            CartLine {
                product: product("1", 10),
                quantity: 0,
            },
            CartLine {
                product: product("2", 10),
                quantity: 2,
            },
            CartLine {
                product: product("1", 10),
                quantity: 3,
            },
        ];
        let cart = Cart::from_lines(lines);
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.line(&ProductId::new("1")).unwrap().quantity, 4);
        assert_eq!(cart.lines()[0].id().as_str(), "1");
    }

    #[test]
    fn test_line_serializes_flat() {
        let line = CartLine {
            product: product("1", 10),
            quantity: 2,
        };
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["category"], "Regalos");
        assert_eq!(json["price"], 10);
        assert_eq!(json["quantity"], 2);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(u8),
        SetQuantity(u8, i64),
        Remove(u8),
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..5).prop_map(Op::Add),
            (0u8..5, -50i64..50).prop_map(|(id, delta)| Op::SetQuantity(id, delta)),
            (0u8..5).prop_map(Op::Remove),
        ]
    }

    proptest! {
        /// No sequence of mutations can duplicate a line or zero a quantity.
        #[test]
        fn cart_invariants_hold(ops in prop::collection::vec(arb_op(), 0..64)) {
            let mut cart = Cart::new();
            for op in ops {
                match op {
                    Op::Add(id) => cart.add(&product(&id.to_string(), 100)),
                    Op::SetQuantity(id, delta) => {
                        cart.set_quantity(&ProductId::new(id.to_string()), delta);
                    }
                    Op::Remove(id) => {
                        cart.remove(&ProductId::new(id.to_string()));
                    }
                }

                let mut ids: Vec<_> = cart.lines().iter().map(|l| l.id().clone()).collect();
                let len = ids.len();
                ids.sort();
                ids.dedup();
                prop_assert_eq!(ids.len(), len);
                prop_assert!(cart.lines().iter().all(|l| l.quantity >= 1));
            }
        }
    }
}
