use serde::{Deserialize, Serialize};
use crate::product::{Product, ProductError, PromotionKind, Promotion, TechSpecs};
use storefront_shared::money;

/// Raw field values from the admin product form.
///
/// Everything is kept as text exactly as typed; `parse` validates the numeric
/// fields and builds a `Product` without touching the catalog. The creation
/// time is left unset for the caller to stamp.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductForm {
    pub id: String,
    pub name: String,
    pub company: String,
    pub img: String,
    pub price: String,
    pub star: String,
    pub rate_count: String,
    pub promotion: Option<PromotionKind>,
    pub promotion_value: String,
    pub detail: TechSpecs,
}

impl ProductForm {
    pub fn parse(&self) -> Result<Product, ProductError> {
        let id = required("id", &self.id)?;
        let name = required("name", &self.name)?;
        let base_price = whole_number("price", &self.price)?;
        let star = whole_number("star", &self.star)?;
        let rate_count = whole_number("rate_count", &self.rate_count)?;

        let star = u8::try_from(star)
            .ok()
            .filter(|s| *s <= 5)
            .ok_or_else(|| ProductError::InvalidInput {
                field: "star",
                reason: "must be between 0 and 5".to_string(),
            })?;
        let rate_count = u32::try_from(rate_count).map_err(|_| ProductError::InvalidInput {
            field: "rate_count",
            reason: "too large".to_string(),
        })?;

        let value = self.promotion_value.trim();
        let promo = match self.promotion {
            None => Promotion::None,
            Some(PromotionKind::Installment) => {
                Promotion::Installment(u32::try_from(money::parse_dong(value)).unwrap_or(0))
            }
            Some(PromotionKind::Discount) => Promotion::Discount(money::parse_dong(value)),
            Some(PromotionKind::DiscountedPrice) => {
                if money::parse_whole_number(&value.replace('.', "")).is_none() {
                    return Err(ProductError::InvalidInput {
                        field: "promotion_value",
                        reason: format!("'{}' is not a price", value),
                    });
                }
                Promotion::DiscountedPrice(money::parse_dong(value))
            }
            Some(PromotionKind::NewArrival) => Promotion::NewArrival,
        };

        Ok(Product {
            id,
            name,
            company: self.company.trim().to_string(),
            img: self.img.clone(),
            base_price,
            star,
            rate_count,
            promo,
            detail: self.detail.clone(),
            created_at: None,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ProductError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ProductError::InvalidInput {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(value.to_string())
}

fn whole_number(field: &'static str, value: &str) -> Result<u64, ProductError> {
    money::parse_whole_number(value).ok_or_else(|| ProductError::InvalidInput {
        field,
        reason: format!("'{}' is not a whole number", value.trim()),
    })
}
