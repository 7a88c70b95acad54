//! Totals for carts and orders.
//!
//! Prices are always looked up in the catalog snapshot passed in, so a line
//! whose product has been deleted contributes nothing instead of failing.
//! Historical orders are priced the same way: an order placed last month shows
//! today's catalog price.

use serde::{Deserialize, Serialize};
use storefront_catalog::{resolve_unit_price, Catalog};
use storefront_shared::Dong;
use crate::models::{LineItem, Order};

/// Unit price × quantity, or 0 when the product is no longer in the catalog.
/// Saturates at `Dong::MAX`.
pub fn compute_line_total(item: &LineItem, catalog: &Catalog<'_>) -> Dong {
    catalog
        .get(&item.product_id)
        .map(|product| resolve_unit_price(product).saturating_mul(Dong::from(item.quantity)))
        .unwrap_or(0)
}

/// Sum of line totals. Repeated product codes are summed line by line.
pub fn compute_cart_total(items: &[LineItem], catalog: &Catalog<'_>) -> Dong {
    items
        .iter()
        .fold(0, |total: Dong, item| total.saturating_add(compute_line_total(item, catalog)))
}

pub fn compute_order_total(order: &Order, catalog: &Catalog<'_>) -> Dong {
    compute_cart_total(&order.items, catalog)
}

/// Total number of units across the lines.
pub fn item_count(items: &[LineItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity)).sum()
}

/// Fees applied on top of the cart subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckoutRules {
    /// Flat fee, charged only for a non-empty subtotal
    pub shipping_fee: Dong,
    pub tax_rate: f64,
}

impl Default for CheckoutRules {
    fn default() -> Self {
        Self {
            shipping_fee: 30_000,
            tax_rate: 0.08,
        }
    }
}

/// Figures shown in the cart summary box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSummary {
    pub subtotal: Dong,
    pub shipping: Dong,
    pub tax: Dong,
    pub total: Dong,
}

impl CartSummary {
    pub fn compute(items: &[LineItem], catalog: &Catalog<'_>, rules: &CheckoutRules) -> Self {
        let subtotal = compute_cart_total(items, catalog);
        let shipping = if subtotal > 0 { rules.shipping_fee } else { 0 };
        let tax = (subtotal as f64 * rules.tax_rate).floor() as Dong;

        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal.saturating_add(shipping).saturating_add(tax),
        }
    }
}
