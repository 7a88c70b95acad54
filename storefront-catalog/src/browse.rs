use serde::{Deserialize, Serialize};
use crate::product::{Product, PromotionKind};
use storefront_shared::Dong;

/// Inclusive price range on the base price. `max == 0` means no upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBand {
    pub min: Dong,
    pub max: Dong,
}

impl PriceBand {
    pub const fn new(min: Dong, max: Dong) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: Dong) -> bool {
        price >= self.min && (self.max == 0 || price <= self.max)
    }
}

/// Bands shown in the storefront price filter.
pub const PRICE_BANDS: [PriceBand; 5] = [
    PriceBand::new(0, 2_000_000),
    PriceBand::new(2_000_000, 4_000_000),
    PriceBand::new(4_000_000, 7_000_000),
    PriceBand::new(7_000_000, 13_000_000),
    PriceBand::new(13_000_000, 0),
];

/// Active storefront filters. Unset fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub company: Option<String>,
    pub price: Option<PriceBand>,
    pub promotion: Option<PromotionKind>,
    pub min_rating: Option<u8>,
}

impl FilterCriteria {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(company) = &self.company {
            if &product.company != company {
                return false;
            }
        }
        if let Some(band) = &self.price {
            if !band.contains(product.base_price) {
                return false;
            }
        }
        if let Some(kind) = self.promotion {
            if product.promo.kind() != Some(kind) {
                return false;
            }
        }
        if let Some(rating) = self.min_rating {
            if product.star < rating {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
    RatingDesc,
    Newest,
}

/// Case-insensitive substring search on name and company.
/// An empty keyword returns every product.
pub fn search<'a>(products: &'a [Product], keyword: &str) -> Vec<&'a Product> {
    let needle = keyword.trim().to_lowercase();
    if needle.is_empty() {
        return products.iter().collect();
    }

    products
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle) || p.company.to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn filter<'a>(products: &'a [Product], criteria: &FilterCriteria) -> Vec<&'a Product> {
    products.iter().filter(|p| criteria.matches(p)).collect()
}

/// Stable sort of a result list. Products without a creation time sort last
/// under `Newest`.
pub fn sort(products: &mut [&Product], order: SortOrder) {
    match order {
        SortOrder::PriceAsc => products.sort_by_key(|p| p.base_price),
        SortOrder::PriceDesc => products.sort_by(|a, b| b.base_price.cmp(&a.base_price)),
        SortOrder::NameAsc => products.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
        SortOrder::NameDesc => products.sort_by(|a, b| b.name.to_lowercase().cmp(&a.name.to_lowercase())),
        SortOrder::RatingDesc => products.sort_by(|a, b| b.star.cmp(&a.star)),
        SortOrder::Newest => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}

/// Distinct companies in first-seen order.
pub fn companies(products: &[Product]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for product in products {
        if !seen.contains(&product.company.as_str()) {
            seen.push(product.company.as_str());
        }
    }
    seen
}
