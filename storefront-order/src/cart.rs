use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use storefront_catalog::{Catalog, ProductId};
use storefront_shared::Dong;
use crate::calculator::{self, CartSummary, CheckoutRules};
use crate::models::{clamp_quantity, LineItem, Order, ShippingInfo};
use crate::manager::OrderError;

/// A customer's shopping cart. One line per product code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines, as shown on the cart badge.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    pub fn item_count(&self) -> u64 {
        calculator::item_count(&self.items)
    }

    /// Add one unit, bumping the quantity when the product is already in the cart.
    pub fn add(&mut self, product_id: &str, now: DateTime<Utc>) {
        match self.items.iter_mut().find(|item| item.product_id == product_id) {
            Some(item) => item.quantity = clamp_quantity(i64::from(item.quantity) + 1),
            None => self.items.push(LineItem {
                product_id: product_id.to_string(),
                quantity: 1,
                added_at: Some(now),
            }),
        }
    }

    /// Returns whether a line was removed.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.product_id != product_id);
        self.items.len() != before
    }

    /// Set a line's quantity from raw input, clamped to the allowed range.
    /// Returns the stored quantity, or `None` when the product is not in the cart.
    pub fn update_quantity(&mut self, product_id: &str, raw_quantity: i64) -> Option<u32> {
        let item = self.items.iter_mut().find(|item| item.product_id == product_id)?;
        item.quantity = clamp_quantity(raw_quantity);
        Some(item.quantity)
    }

    pub fn total(&self, catalog: &Catalog<'_>) -> Dong {
        calculator::compute_cart_total(&self.items, catalog)
    }

    pub fn summary(&self, catalog: &Catalog<'_>, rules: &CheckoutRules) -> CartSummary {
        CartSummary::compute(&self.items, catalog, rules)
    }

    /// Turn the cart into a pending order and empty it.
    pub fn checkout(
        &mut self,
        customer: &str,
        shipping: Option<ShippingInfo>,
        now: DateTime<Utc>,
    ) -> Result<Order, OrderError> {
        if self.items.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let mut order = Order::new(customer, std::mem::take(&mut self.items), now);
        order.shipping = shipping;
        Ok(order)
    }

    pub fn product_ids(&self) -> impl Iterator<Item = &ProductId> {
        self.items.iter().map(|item| &item.product_id)
    }
}

impl From<Vec<LineItem>> for Cart {
    fn from(items: Vec<LineItem>) -> Self {
        Self { items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderStatus, MAX_QUANTITY};
    use storefront_catalog::Product;

    #[test]
    fn test_add_merges_same_product() {
        let mut cart = Cart::new();
        let now = Utc::now();
        cart.add("A", now);
        cart.add("B", now);
        cart.add("A", now);

        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.items()[0].added_at, Some(now));
    }

    #[test]
    fn test_update_quantity_is_clamped() {
        let mut cart = Cart::from(vec![LineItem::new("A", 1)]);

        assert_eq!(cart.update_quantity("A", 0), Some(1));
        assert_eq!(cart.update_quantity("A", 10_000), Some(MAX_QUANTITY));
        assert_eq!(cart.update_quantity("Z", 3), None);
    }

    #[test]
    fn test_remove() {
        let mut cart = Cart::from(vec![LineItem::new("A", 1), LineItem::new("B", 2)]);
        assert!(cart.remove("A"));
        assert!(!cart.remove("A"));
        assert_eq!(cart.product_ids().collect::<Vec<_>>(), vec!["B"]);
    }

    #[test]
    fn test_total_and_summary() {
        let products = vec![Product::new("A", "Phone", "Oppo", 1_000_000)];
        let catalog = Catalog::new(&products);
        let cart = Cart::from(vec![LineItem::new("A", 2), LineItem::new("gone", 1)]);

        assert_eq!(cart.total(&catalog), 2_000_000);
        let summary = cart.summary(&catalog, &CheckoutRules::default());
        assert_eq!(summary.total, 2_000_000 + 30_000 + 160_000);
    }

    #[test]
    fn test_checkout_moves_items_into_pending_order() {
        let mut cart = Cart::from(vec![LineItem::new("A", 2)]);
        let now = Utc::now();
        let order = cart.checkout("user1", None, now).unwrap();

        assert!(cart.is_empty());
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.customer, "user1");
        assert_eq!(order.items, vec![LineItem::new("A", 2)]);
        assert_eq!(order.id(), now.timestamp_millis().to_string());

        assert_eq!(cart.checkout("user1", None, now), Err(OrderError::EmptyCart));
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let cart = Cart::from(vec![LineItem::new("A", 2)]);
        assert_eq!(
            serde_json::to_value(&cart).unwrap(),
            serde_json::json!([{ "ma": "A", "soluong": 2 }])
        );
    }
}
