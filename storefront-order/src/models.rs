use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::fmt;
use storefront_catalog::ProductId;

/// Order identifier: the order time in epoch milliseconds, as text.
pub type OrderId = String;

/// Largest quantity a single cart line may hold.
pub const MAX_QUANTITY: u32 = 999;

/// Clamp raw quantity input (which may be zero or negative) into `1..=MAX_QUANTITY`.
pub fn clamp_quantity(raw: i64) -> u32 {
    raw.clamp(1, MAX_QUANTITY as i64) as u32
}

/// Order status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    #[serde(rename = "Đang chờ xử lý", alias = "pending")]
    Pending,
    #[serde(rename = "Đã giao hàng", alias = "fulfilled")]
    Fulfilled,
    #[serde(rename = "Đã hủy", alias = "cancelled")]
    Cancelled,
}

impl OrderStatus {
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Đang chờ xử lý",
            OrderStatus::Fulfilled => "Đã giao hàng",
            OrderStatus::Cancelled => "Đã hủy",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One product reference with a quantity. The product may since have been
/// removed from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineItem {
    #[serde(rename = "ma")]
    pub product_id: ProductId,
    #[serde(rename = "soluong")]
    pub quantity: u32,
    #[serde(
        default,
        rename = "addedAt",
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub added_at: Option<DateTime<Utc>>,
}

impl LineItem {
    /// Quantities below one are raised to one.
    pub fn new(product_id: impl Into<ProductId>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity: quantity.max(1),
            added_at: None,
        }
    }
}

/// Delivery details captured at checkout.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShippingInfo {
    pub recipient: String,
    pub phone: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A placed order. Items are fixed at checkout; only the status changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    #[serde(rename = "ngaymua", with = "chrono::serde::ts_milliseconds")]
    pub ordered_at: DateTime<Utc>,
    #[serde(default, rename = "khach")]
    pub customer: String,
    #[serde(rename = "sp")]
    pub items: Vec<LineItem>,
    #[serde(rename = "tinhTrang")]
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping: Option<ShippingInfo>,
}

impl Order {
    pub fn new(customer: impl Into<String>, items: Vec<LineItem>, ordered_at: DateTime<Utc>) -> Self {
        Self {
            ordered_at,
            customer: customer.into(),
            items,
            status: OrderStatus::Pending,
            shipping: None,
        }
    }

    pub fn with_shipping(mut self, shipping: ShippingInfo) -> Self {
        self.shipping = Some(shipping);
        self
    }

    /// Unique only as long as no two orders share a millisecond.
    pub fn id(&self) -> OrderId {
        self.ordered_at.timestamp_millis().to_string()
    }

    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}
