//! The cart slice.
//!
//! The cart lives only in the visitor's session; losing the session loses
//! the cart. All operations are pure state transitions so the slice can be
//! tested without a session or a router.

use serde::{Deserialize, Serialize};

use meridian_core::{Money, ProductId};

/// One line in the cart.
///
/// `price` and `stock` are snapshots taken when the item was added. The
/// price snapshot is honored through checkout; stock is re-validated when
/// the order is confirmed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Money,
    pub quantity: u32,
    pub image: Option<String>,
    pub stock: u32,
}

impl CartItem {
    /// Price for the full line (unit price x quantity).
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.price * self.quantity
    }
}

/// The session-held cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Add an item, merging with an existing line for the same product.
    ///
    /// Quantities for the same product sum; the merged quantity is capped at
    /// the stock snapshot, and never below 1.
    pub fn add(&mut self, item: CartItem) {
        match self
            .items
            .iter_mut()
            .find(|line| line.product_id == item.product_id)
        {
            Some(line) => {
                line.quantity = clamp_quantity(line.quantity.saturating_add(item.quantity), item.stock);
                // Refresh the snapshots: the newest fetch wins.
                line.price = item.price;
                line.stock = item.stock;
                line.image = item.image;
            }
            None => {
                let mut item = item;
                item.quantity = clamp_quantity(item.quantity, item.stock);
                self.items.push(item);
            }
        }
    }

    /// Set the quantity of an existing line, clamped to `1..=stock`.
    ///
    /// Unknown product ids are ignored.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.product_id == product_id)
        {
            line.quantity = clamp_quantity(quantity, line.stock);
        }
    }

    /// Remove a line entirely.
    pub fn remove(&mut self, product_id: ProductId) {
        self.items.retain(|line| line.product_id != product_id);
    }

    /// Empty the cart (order completed).
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of all line totals, unrounded.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Quantities are always at least 1 and never above the stock snapshot.
fn clamp_quantity(quantity: u32, stock: u32) -> u32 {
    quantity.clamp(1, stock.max(1))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn item(id: i64, price: i64, quantity: u32, stock: u32) -> CartItem {
        CartItem {
            product_id: ProductId::new(id),
            name: format!("product-{id}"),
            price: Money::from_major(price),
            quantity,
            image: None,
            stock,
        }
    }

    #[test]
    fn test_add_merges_by_product_id() {
        let mut cart = Cart::default();
        cart.add(item(1, 100, 2, 10));
        cart.add(item(1, 100, 3, 10));

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items.first().unwrap().quantity, 5);
    }

    #[test]
    fn test_add_caps_at_stock() {
        let mut cart = Cart::default();
        cart.add(item(1, 100, 3, 4));
        cart.add(item(1, 100, 3, 4));

        assert_eq!(cart.items.first().unwrap().quantity, 4);
    }

    #[test]
    fn test_add_distinct_products() {
        let mut cart = Cart::default();
        cart.add(item(1, 100, 1, 10));
        cart.add(item(2, 150, 1, 10));

        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_update_quantity_clamps() {
        let mut cart = Cart::default();
        cart.add(item(1, 100, 1, 5));

        cart.update_quantity(ProductId::new(1), 9);
        assert_eq!(cart.items.first().unwrap().quantity, 5);

        cart.update_quantity(ProductId::new(1), 0);
        assert_eq!(cart.items.first().unwrap().quantity, 1);
    }

    #[test]
    fn test_update_quantity_unknown_product_is_noop() {
        let mut cart = Cart::default();
        cart.add(item(1, 100, 2, 5));
        cart.update_quantity(ProductId::new(99), 4);
        assert_eq!(cart.items.first().unwrap().quantity, 2);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::default();
        cart.add(item(1, 100, 1, 10));
        cart.add(item(2, 150, 1, 10));

        cart.remove(ProductId::new(1));
        assert_eq!(cart.items.len(), 1);

        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_subtotal() {
        let mut cart = Cart::default();
        cart.add(item(1, 100, 1, 10));
        cart.add(item(2, 150, 1, 10));

        assert_eq!(cart.subtotal(), Money::from_major(250));
    }

    #[test]
    fn test_subtotal_with_fractional_prices() {
        let mut cart = Cart::default();
        let mut line = item(1, 0, 3, 10);
        line.price = Money::new(Decimal::new(1999, 2)); // 19.99
        cart.add(line);

        assert_eq!(cart.subtotal().to_string(), "59.97");
    }
}
