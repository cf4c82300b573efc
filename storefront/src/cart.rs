//! Cart engine
//!
//! The cart is a mapping from product id to a line carrying a product snapshot
//! and a quantity. A line never holds quantity 0: decrementing the last unit
//! removes it. Totals are computed on every read.

use luxelane_catalog::{Money, Product};
use std::collections::HashMap;

/// One product's entry in the cart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    /// Snapshot of the product at the time it was first added
    pub product: Product,
    /// Always at least 1
    pub quantity: u32,
}

impl CartLine {
    /// `price x quantity`
    #[must_use]
    pub fn total(&self) -> Money {
        self.product.price * self.quantity
    }
}

/// Shopping cart keyed by product id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: HashMap<u64, CartLine>,
}

impl Cart {
    /// Add one unit, creating the line if needed
    pub fn add(&mut self, product: Product) {
        self.lines
            .entry(product.id)
            .and_modify(|line| line.quantity = line.quantity.saturating_add(1))
            .or_insert(CartLine {
                product,
                quantity: 1,
            });
    }

    /// Add one unit to an existing line; no-op if absent
    pub fn increment(&mut self, product_id: u64) {
        if let Some(line) = self.lines.get_mut(&product_id) {
            line.quantity = line.quantity.saturating_add(1);
        }
    }

    /// Remove one unit; the line is deleted when its last unit goes
    pub fn decrement(&mut self, product_id: u64) {
        match self.lines.get_mut(&product_id) {
            Some(line) if line.quantity > 1 => line.quantity -= 1,
            Some(_) => {
                self.lines.remove(&product_id);
            },
            None => {},
        }
    }

    /// Delete the line if present
    pub fn remove(&mut self, product_id: u64) {
        self.lines.remove(&product_id);
    }

    /// Empty the cart
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Quantity held for a product, 0 when absent
    #[must_use]
    pub fn quantity(&self, product_id: u64) -> u32 {
        self.lines.get(&product_id).map_or(0, |line| line.quantity)
    }

    /// Line for a product
    #[must_use]
    pub fn line(&self, product_id: u64) -> Option<&CartLine> {
        self.lines.get(&product_id)
    }

    /// All lines, in no particular order
    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.values()
    }

    /// Sum of `price x quantity` over all lines
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.lines.values().map(CartLine::total).sum()
    }

    /// Sum of quantities, capped at `u32::MAX`
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .values()
            .fold(0u32, |count, line| count.saturating_add(line.quantity))
    }

    /// Number of distinct products
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart holds no lines
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
