use crate::product::{Product, Promotion};
use storefront_shared::Dong;

/// Effective unit price of a product.
///
/// An online price (`DiscountedPrice`) replaces the base price outright; every
/// other promotion is a label and leaves the base price in effect.
pub fn resolve_unit_price(product: &Product) -> Dong {
    match product.promo {
        Promotion::DiscountedPrice(price) => price,
        Promotion::None
        | Promotion::Installment(_)
        | Promotion::Discount(_)
        | Promotion::NewArrival => product.base_price,
    }
}

/// Percentage saved by the online price, rounded to the nearest integer.
///
/// Zero when there is no online price, the base price is zero, or the online
/// price is not actually lower.
pub fn discount_percentage(product: &Product) -> u32 {
    let Promotion::DiscountedPrice(price) = product.promo else {
        return 0;
    };
    if product.base_price == 0 || price >= product.base_price {
        return 0;
    }

    let saved = (product.base_price - price) as f64;
    ((saved / product.base_price as f64) * 100.0).round() as u32
}
