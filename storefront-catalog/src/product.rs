use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::fmt;
use storefront_shared::money::{self, Dong};

/// Unique product code, e.g. `Sam0`.
pub type ProductId = String;

/// Promotion attached to a product.
///
/// Persisted as the legacy `{"name": ..., "value": ...}` pair; only
/// `DiscountedPrice` changes what the customer pays.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "PromotionRecord", into = "PromotionRecord")]
pub enum Promotion {
    #[default]
    None,
    /// Installment plan at the given interest percentage.
    Installment(u32),
    /// Fixed amount off, shown as a label only.
    Discount(Dong),
    /// Online price that replaces the base price.
    DiscountedPrice(Dong),
    NewArrival,
}

/// Payload-free promotion discriminant, used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromotionKind {
    Installment,
    Discount,
    DiscountedPrice,
    NewArrival,
}

impl Promotion {
    pub fn kind(&self) -> Option<PromotionKind> {
        match self {
            Promotion::None => None,
            Promotion::Installment(_) => Some(PromotionKind::Installment),
            Promotion::Discount(_) => Some(PromotionKind::Discount),
            Promotion::DiscountedPrice(_) => Some(PromotionKind::DiscountedPrice),
            Promotion::NewArrival => Some(PromotionKind::NewArrival),
        }
    }
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Promotion::None | Promotion::NewArrival => Ok(()),
            Promotion::Installment(percent) => write!(f, "Góp {}%", percent),
            Promotion::Discount(amount) => write!(f, "Giảm {}", money::format_dong(*amount)),
            Promotion::DiscountedPrice(price) => write!(f, "Online ({})", money::format_dong(*price)),
        }
    }
}

/// Wire form of a promotion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PromotionRecord {
    #[serde(default)]
    name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    value: String,
}

impl From<PromotionRecord> for Promotion {
    fn from(record: PromotionRecord) -> Self {
        match record.name.as_str() {
            "tragop" => {
                Promotion::Installment(u32::try_from(money::parse_dong(&record.value)).unwrap_or(0))
            }
            "giamgia" => Promotion::Discount(money::parse_dong(&record.value)),
            "giareonline" => Promotion::DiscountedPrice(money::parse_dong(&record.value)),
            "moiramat" => Promotion::NewArrival,
            _ => Promotion::None,
        }
    }
}

impl From<Promotion> for PromotionRecord {
    fn from(promo: Promotion) -> Self {
        let (name, value) = match promo {
            Promotion::None => ("", String::new()),
            Promotion::Installment(percent) => ("tragop", percent.to_string()),
            Promotion::Discount(amount) => ("giamgia", money::format_dong(amount)),
            Promotion::DiscountedPrice(price) => ("giareonline", money::format_dong(price)),
            Promotion::NewArrival => ("moiramat", String::new()),
        };
        PromotionRecord { name: name.to_string(), value }
    }
}

// Older records store promotion values as bare numbers.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

// A null or otherwise malformed promotion reads as no promotion.
fn lenient_promotion<'de, D>(deserializer: D) -> Result<Promotion, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).unwrap_or_default())
}

/// Technical specification block. Every field is optional since older
/// records only carry a subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechSpecs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(default, rename = "camara", skip_serializing_if = "Option::is_none")]
    pub camera: Option<String>,
    #[serde(default, rename = "camaraFront", skip_serializing_if = "Option::is_none")]
    pub front_camera: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rom: Option<String>,
    #[serde(default, rename = "microUSB", skip_serializing_if = "Option::is_none")]
    pub micro_usb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery: Option<String>,
}

/// Core product structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "masp")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub img: String,
    #[serde(rename = "price", with = "money::dong_string")]
    pub base_price: Dong,
    #[serde(default)]
    pub star: u8,
    #[serde(default, rename = "rateCount")]
    pub rate_count: u32,
    #[serde(default, deserialize_with = "lenient_promotion")]
    pub promo: Promotion,
    #[serde(default)]
    pub detail: TechSpecs,
    #[serde(
        default,
        rename = "createdAt",
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, company: impl Into<String>, base_price: Dong) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            company: company.into(),
            img: String::new(),
            base_price,
            star: 0,
            rate_count: 0,
            promo: Promotion::None,
            detail: TechSpecs::default(),
            created_at: None,
        }
    }

    pub fn with_promotion(mut self, promo: Promotion) -> Self {
        self.promo = promo;
        self
    }

    /// Effective price per unit after promotions.
    pub fn unit_price(&self) -> Dong {
        crate::pricing::resolve_unit_price(self)
    }
}

/// Brands offered in the admin product form.
pub const COMPANIES: [&str; 15] = [
    "Apple", "Samsung", "Oppo", "Nokia", "Huawei", "Xiaomi", "Realme", "Vivo",
    "Philips", "Mobell", "Mobiistar", "Itel", "Coolpad", "HTC", "Motorola",
];

/// Product code for the next product of `company`: the first three
/// characters of the company followed by how many products it already has.
pub fn next_product_code(products: &[Product], company: &str) -> ProductId {
    let count = products.iter().filter(|p| p.company == company).count();
    let prefix: String = company.chars().take(3).collect();
    format!("{}{}", prefix, count)
}

/// Product-related errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Duplicate product code: {0}")]
    DuplicateId(String),

    #[error("Duplicate product name: {0}")]
    DuplicateName(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_legacy_record() {
        let json = r#"
            {
                "name": "Samsung Galaxy J4+",
                "company": "Samsung",
                "img": "img/products/samsung-galaxy-j4-plus.jpg",
                "price": "3.490.000",
                "star": 3,
                "rateCount": 26,
                "promo": { "name": "tragop", "value": "0" },
                "detail": { "screen": "IPS LCD, 6.0\", HD+", "os": "Android 8.1", "camara": "13 MP" },
                "masp": "Sam0"
            }
        "#;
        let product: Product = serde_json::from_str(json).expect("Failed to deserialize");

        assert_eq!(product.id, "Sam0");
        assert_eq!(product.base_price, 3490000);
        assert_eq!(product.promo, Promotion::Installment(0));
        assert_eq!(product.detail.camera.as_deref(), Some("13 MP"));
        assert_eq!(product.detail.battery, None);
        assert_eq!(product.created_at, None);
    }

    #[test]
    fn test_promotion_wire_names() {
        let promo: Promotion = serde_json::from_str(r#"{"name":"giareonline","value":"2.990.000"}"#).unwrap();
        assert_eq!(promo, Promotion::DiscountedPrice(2990000));

        let promo: Promotion = serde_json::from_str(r#"{"name":"moiramat","value":""}"#).unwrap();
        assert_eq!(promo, Promotion::NewArrival);

        let promo: Promotion = serde_json::from_str(r#"{"name":"giamgia","value":500000}"#).unwrap();
        assert_eq!(promo, Promotion::Discount(500000));

        // Unknown names fall back to no promotion
        let promo: Promotion = serde_json::from_str(r#"{"name":"thetienhan","value":"x"}"#).unwrap();
        assert_eq!(promo, Promotion::None);

        let product: Product = serde_json::from_str(r#"{"masp":"X","name":"X","price":"1","promo":null}"#).unwrap();
        assert_eq!(product.promo, Promotion::None);

        let written = serde_json::to_value(Promotion::DiscountedPrice(800000)).unwrap();
        assert_eq!(written, serde_json::json!({"name": "giareonline", "value": "800.000"}));
    }

    #[test]
    fn test_promotion_labels() {
        assert_eq!(Promotion::Installment(0).to_string(), "Góp 0%");
        assert_eq!(Promotion::Discount(500000).to_string(), "Giảm 500.000");
        assert_eq!(Promotion::DiscountedPrice(800000).to_string(), "Online (800.000)");
        assert_eq!(Promotion::None.to_string(), "");
    }

    #[test]
    fn test_next_product_code() {
        let products = vec![
            Product::new("Sam0", "Galaxy A", "Samsung", 1),
            Product::new("Sam1", "Galaxy B", "Samsung", 1),
            Product::new("App0", "iPhone", "Apple", 1),
        ];
        assert_eq!(next_product_code(&products, "Samsung"), "Sam2");
        assert_eq!(next_product_code(&products, "Nokia"), "Nok0");
        assert_eq!(next_product_code(&products, "LG"), "LG0");
    }
}
