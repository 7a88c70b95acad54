use serde::{Deserialize, Serialize};
use storefront_catalog::browse::{self, FilterCriteria, SortOrder};
use storefront_catalog::{discount_percentage, resolve_unit_price, Catalog, Product, ProductError};
use storefront_core::{AccountError, Notice};
use storefront_order::{compute_line_total, compute_order_total, CartSummary, ShippingInfo};
use storefront_shared::Dong;
use storefront_store::update_users;
use tracing::info;

use crate::auth::{active_user_mut, require_session};
use crate::error::AppResult;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowseQuery {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub criteria: FilterCriteria,
    pub sort: Option<SortOrder>,
    /// 1-based
    #[serde(default)]
    pub page: usize,
    #[serde(default)]
    pub page_size: usize,
}

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    pub company: String,
    pub img: String,
    pub base_price: Dong,
    pub unit_price: Dong,
    pub star: u8,
    pub rate_count: u32,
    pub promotion: String,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            company: product.company.clone(),
            img: product.img.clone(),
            base_price: product.base_price,
            unit_price: resolve_unit_price(product),
            star: product.star,
            rate_count: product.rate_count,
            promotion: product.promo.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub items: Vec<ProductCard>,
    pub page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    pub product: Product,
    pub unit_price: Dong,
    pub discount_percentage: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    pub product_id: String,
    /// `None` once the product has been removed from the catalog
    pub product: Option<ProductCard>,
    pub quantity: u32,
    pub line_total: Dong,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub summary: CartSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderHistoryEntry {
    pub id: String,
    pub ordered_at: chrono::DateTime<chrono::Utc>,
    pub status: String,
    pub item_count: u64,
    pub total: Dong,
}

// ============================================================================
// Catalog
// ============================================================================

/// Search, filter, sort and paginate the catalog.
pub fn browse(state: &AppState, query: &BrowseQuery) -> AppResult<Page> {
    let products = state.catalog.products()?;

    let mut matches: Vec<&Product> = browse::search(&products, &query.keyword)
        .into_iter()
        .filter(|p| query.criteria.matches(p))
        .collect();
    if let Some(order) = query.sort {
        browse::sort(&mut matches, order);
    }

    let page_size = if query.page_size == 0 { DEFAULT_PAGE_SIZE } else { query.page_size };
    let total_matches = matches.len();
    let total_pages = total_matches.div_ceil(page_size).max(1);
    let page = query.page.clamp(1, total_pages);

    let items = matches
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .map(ProductCard::from)
        .collect();

    Ok(Page {
        items,
        page,
        total_pages,
        total_matches,
    })
}

/// Brands present in the catalog, for the company filter.
pub fn companies(state: &AppState) -> AppResult<Vec<String>> {
    let products = state.catalog.products()?;
    Ok(browse::companies(&products).into_iter().map(str::to_string).collect())
}

pub fn product_detail(state: &AppState, product_id: &str) -> AppResult<ProductDetail> {
    let products = state.catalog.products()?;
    let product = Catalog::new(&products)
        .get(product_id)
        .cloned()
        .ok_or_else(|| ProductError::NotFound(product_id.to_string()))?;

    Ok(ProductDetail {
        unit_price: resolve_unit_price(&product),
        discount_percentage: discount_percentage(&product),
        product,
    })
}

// ============================================================================
// Cart
// ============================================================================

pub fn add_to_cart(state: &AppState, product_id: &str) -> AppResult<Notice> {
    let username = require_session(state)?;
    let products = state.catalog.products()?;
    let product = Catalog::new(&products)
        .get(product_id)
        .ok_or_else(|| ProductError::NotFound(product_id.to_string()))?;

    let now = state.now();
    update_users(&*state.users, |users| -> AppResult<()> {
        active_user_mut(users, &username)?.cart.add(product_id, now);
        Ok(())
    })?;

    info!("User {} added {} to cart", username, product_id);
    Ok(Notice::success(format!("Added {} to cart", product.name)))
}

pub fn remove_from_cart(state: &AppState, product_id: &str) -> AppResult<Notice> {
    let username = require_session(state)?;

    let removed = update_users(&*state.users, |users| -> AppResult<bool> {
        Ok(active_user_mut(users, &username)?.cart.remove(product_id))
    })?;

    if removed {
        Ok(Notice::success("Removed from cart"))
    } else {
        Ok(Notice::info("Product was not in the cart"))
    }
}

/// Set a quantity from raw form input. Values are clamped to 1..=999.
pub fn update_cart_quantity(state: &AppState, product_id: &str, raw_quantity: i64) -> AppResult<Notice> {
    let username = require_session(state)?;

    let stored = update_users(&*state.users, |users| -> AppResult<Option<u32>> {
        Ok(active_user_mut(users, &username)?.cart.update_quantity(product_id, raw_quantity))
    })?;

    match stored {
        Some(quantity) => Ok(Notice::success(format!("Quantity set to {}", quantity))),
        None => Ok(Notice::info("Product was not in the cart")),
    }
}

pub fn cart_view(state: &AppState) -> AppResult<CartView> {
    let username = require_session(state)?;
    let users = state.users.users()?;
    let user = users
        .iter()
        .find(|u| u.username == username)
        .ok_or(AccountError::NotSignedIn)?;

    let products = state.catalog.products()?;
    let catalog = Catalog::new(&products);

    let lines = user
        .cart
        .items()
        .iter()
        .map(|item| CartLine {
            product_id: item.product_id.clone(),
            product: catalog.get(&item.product_id).map(ProductCard::from),
            quantity: item.quantity,
            line_total: compute_line_total(item, &catalog),
        })
        .collect();

    Ok(CartView {
        lines,
        summary: user.cart.summary(&catalog, &state.business_rules.checkout_rules()),
    })
}

/// Place an order from the signed-in user's cart.
pub fn checkout(state: &AppState, shipping: Option<ShippingInfo>) -> AppResult<Notice> {
    let username = require_session(state)?;
    let now = state.now();

    let order_id = update_users(&*state.users, |users| -> AppResult<String> {
        let user = active_user_mut(users, &username)?;
        let order = user.cart.checkout(&username, shipping, now)?;
        let id = order.id();
        user.orders.push(order);
        Ok(id)
    })?;

    info!("Order {} placed by {}", order_id, username);
    Ok(Notice::success(format!("Order {} placed", order_id)))
}

/// The signed-in user's orders, newest first.
pub fn order_history(state: &AppState) -> AppResult<Vec<OrderHistoryEntry>> {
    let username = require_session(state)?;
    let users = state.users.users()?;
    let user = users
        .iter()
        .find(|u| u.username == username)
        .ok_or(AccountError::NotSignedIn)?;

    let products = state.catalog.products()?;
    let catalog = Catalog::new(&products);

    let mut history: Vec<OrderHistoryEntry> = user
        .orders
        .iter()
        .map(|order| OrderHistoryEntry {
            id: order.id(),
            ordered_at: order.ordered_at,
            status: order.status.to_string(),
            item_count: order.item_count(),
            total: compute_order_total(order, &catalog),
        })
        .collect();
    history.sort_by(|a, b| b.ordered_at.cmp(&a.ordered_at));
    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::login;
    use chrono::{TimeZone, Utc};
    use storefront_catalog::Promotion;
    use storefront_core::NoticeLevel;
    use storefront_order::OrderError;

    fn seed() -> Vec<Product> {
        vec![
            Product::new("A", "Galaxy A", "Samsung", 1_000_000),
            Product::new("B", "iPhone", "Apple", 2_000_000).with_promotion(Promotion::DiscountedPrice(1_600_000)),
            Product::new("C", "Nokia 3", "Nokia", 500_000),
        ]
    }

    fn signed_in() -> AppState {
        let state = AppState::in_memory(seed())
            .unwrap()
            .with_clock(|| Utc.timestamp_millis_opt(1_700_000_000_000).unwrap());
        login(&state, "user1", "123456").unwrap();
        state
    }

    #[test]
    fn test_browse_paginates() {
        let state = signed_in();
        let page = browse(
            &state,
            &BrowseQuery {
                sort: Some(SortOrder::PriceAsc),
                page: 2,
                page_size: 2,
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(page.total_matches, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, "B");
        assert_eq!(page.items[0].unit_price, 1_600_000);
    }

    #[test]
    fn test_browse_page_out_of_range_is_clamped() {
        let state = signed_in();
        let page = browse(
            &state,
            &BrowseQuery {
                keyword: "nokia".to_string(),
                page: 9,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 1);
        assert_eq!(companies(&state).unwrap(), vec!["Samsung", "Apple", "Nokia"]);
    }

    #[test]
    fn test_product_detail() {
        let state = signed_in();
        let detail = product_detail(&state, "B").unwrap();
        assert_eq!(detail.unit_price, 1_600_000);
        assert_eq!(detail.discount_percentage, 20);

        let notice = product_detail(&state, "Z").unwrap_err().into_notice();
        assert_eq!(notice.level, NoticeLevel::Warning);
    }

    #[test]
    fn test_cart_requires_sign_in() {
        let state = AppState::in_memory(seed()).unwrap();
        let notice = add_to_cart(&state, "A").unwrap_err().into_notice();
        assert_eq!(notice.level, NoticeLevel::Warning);
    }

    #[test]
    fn test_cart_and_checkout() {
        let state = signed_in();
        add_to_cart(&state, "A").unwrap();
        add_to_cart(&state, "A").unwrap();
        add_to_cart(&state, "B").unwrap();

        let view = cart_view(&state).unwrap();
        assert_eq!(view.lines.len(), 2);
        assert_eq!(view.summary.subtotal, 3_600_000);
        assert_eq!(view.summary.shipping, 30_000);
        assert_eq!(view.summary.tax, 288_000);

        update_cart_quantity(&state, "A", 5000).unwrap();
        assert_eq!(cart_view(&state).unwrap().lines[0].quantity, 999);

        checkout(&state, None).unwrap();
        assert!(cart_view(&state).unwrap().lines.is_empty());

        let history = order_history(&state).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, "1700000000000");
        assert_eq!(history[0].total, 999 * 1_000_000 + 1_600_000);
    }

    #[test]
    fn test_checkout_empty_cart_fails() {
        let state = signed_in();
        let err = checkout(&state, None).unwrap_err();
        assert!(matches!(
            err,
            crate::error::AppError::Core(storefront_core::CoreError::Order(OrderError::EmptyCart))
        ));
    }

    #[test]
    fn test_add_unknown_product() {
        let state = signed_in();
        assert!(add_to_cart(&state, "Z").is_err());
        assert!(cart_view(&state).unwrap().lines.is_empty());
    }
}
