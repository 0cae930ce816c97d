//! Shopping cart aggregation.
//!
//! A cart holds at most one line per product identity. Adding the same
//! product again bumps that line's quantity; removing a product drops its
//! line entirely. Lines stay in first-added order for display.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Yen;
use super::product::Product;

/// A product snapshot plus the quantity being purchased.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Copy of the product at the time it was first added.
    #[serde(flatten)]
    pub product: Product,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartLineItem {
    /// `price * quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Yen {
        self.product.price.times(self.quantity)
    }
}

/// A visitor's cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add one unit of a product.
    pub fn add(&mut self, product: &Product) {
        if let Some(line) = self.items.iter_mut().find(|l| l.product.id == product.id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.items.push(CartLineItem {
                product: product.clone(),
                quantity: 1,
            });
        }
    }

    /// Remove the line for a product. Absent ids are ignored.
    pub fn remove(&mut self, product_id: &ProductId) {
        self.items.retain(|line| line.product.id != *product_id);
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total number of units, used for the navigation badge.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Sum of `price * quantity` over every line.
    #[must_use]
    pub fn total(&self) -> Yen {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Lines in first-added order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|line| line.product.id == *product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    fn product(id: &str, price: u64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Yen::new(price),
            category: Category::Cosmetics,
            description: String::new(),
            image: "https://example.com/p.jpg".to_string(),
            color: "クリア".to_string(),
            rating: 4.8,
        }
    }

    #[test]
    fn test_repeated_add_accumulates_one_line() {
        let p = product("2", 18_500);
        let mut cart = Cart::new();
        for _ in 0..5 {
            cart.add(&p);
        }

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.line(&p.id).map(|l| l.quantity), Some(5));
    }

    #[test]
    fn test_count_and_total() {
        let a = product("1", 32_000);
        let b = product("3", 12_000);
        let mut cart = Cart::new();
        cart.add(&a);
        cart.add(&b);
        cart.add(&b);

        assert_eq!(cart.count(), 3);
        assert_eq!(cart.total(), Yen::new(32_000 + 2 * 12_000));
    }

    #[test]
    fn test_empty_cart() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.count(), 0);
        assert_eq!(cart.total(), Yen::ZERO);
    }

    #[test]
    fn test_lines_keep_first_added_order() {
        let mut cart = Cart::new();
        cart.add(&product("4", 45_000));
        cart.add(&product("1", 32_000));
        cart.add(&product("4", 45_000));

        let ids: Vec<&str> = cart.items().iter().map(|l| l.product.id.as_str()).collect();
        assert_eq!(ids, vec!["4", "1"]);
    }

    #[test]
    fn test_remove_deletes_whole_line_and_is_idempotent() {
        let a = product("1", 32_000);
        let b = product("2", 18_500);
        let mut cart = Cart::new();
        cart.add(&a);
        cart.add(&a);
        cart.add(&b);

        cart.remove(&a.id);
        let after_first = cart.clone();
        assert!(cart.line(&a.id).is_none());
        assert_eq!(cart.count(), 1);

        cart.remove(&a.id);
        assert_eq!(cart, after_first);
    }

    #[test]
    fn test_remove_absent_id_is_noop() {
        let mut cart = Cart::new();
        cart.add(&product("1", 100));
        let before = cart.clone();
        cart.remove(&ProductId::new("missing"));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_cart_holds_copies() {
        let mut p = product("5", 26_000);
        let mut cart = Cart::new();
        cart.add(&p);
        p.price = Yen::new(1);

        assert_eq!(cart.total(), Yen::new(26_000));
    }

    #[test]
    fn test_line_item_serializes_flat() {
        let mut cart = Cart::new();
        cart.add(&product("6", 28_000));
        let json = serde_json::to_value(cart.items().first().expect("line")).expect("serialize");
        assert_eq!(json["id"], "6");
        assert_eq!(json["price"], 28_000);
        assert_eq!(json["quantity"], 1);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(&product("1", 100));
        cart.clear();
        assert!(cart.is_empty());
    }
}
