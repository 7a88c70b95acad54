use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use storefront_catalog::Catalog;
use storefront_core::Notice;
use storefront_order::{compute_line_total, compute_order_total, find_order_mut, OrderStatus, TransitionOutcome};
use storefront_shared::{format_dong, Dong};
use storefront_store::update_users;
use tracing::info;

use crate::error::AppResult;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct OrderLine {
    pub product_id: String,
    /// `None` when the product has been deleted
    pub product_name: Option<String>,
    pub quantity: u32,
    pub line_total: Dong,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderRow {
    pub id: String,
    pub customer: String,
    pub items: Vec<OrderLine>,
    pub total: Dong,
    pub ordered_at: DateTime<Utc>,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderListing {
    pub rows: Vec<OrderRow>,
    /// Sum of the listed order totals, whatever their status
    pub listed_total: Dong,
}

impl OrderListing {
    fn from_rows(rows: Vec<OrderRow>) -> Self {
        let listed_total = rows.iter().map(|row| row.total).sum();
        Self { rows, listed_total }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSearchField {
    Id,
    Customer,
    Status,
}

// ============================================================================
// Queries
// ============================================================================

/// Every order of every customer, oldest first.
pub fn list_orders(state: &AppState) -> AppResult<OrderListing> {
    let users = state.users.users()?;
    let products = state.catalog.products()?;
    let catalog = Catalog::new(&products);

    let mut rows: Vec<OrderRow> = users
        .iter()
        .flat_map(|user| user.orders.iter().map(move |order| (user, order)))
        .map(|(user, order)| OrderRow {
            id: order.id(),
            customer: if order.customer.is_empty() {
                user.username.clone()
            } else {
                order.customer.clone()
            },
            items: order
                .items
                .iter()
                .map(|item| OrderLine {
                    product_id: item.product_id.clone(),
                    product_name: catalog.get(&item.product_id).map(|p| p.name.clone()),
                    quantity: item.quantity,
                    line_total: compute_line_total(item, &catalog),
                })
                .collect(),
            total: compute_order_total(order, &catalog),
            ordered_at: order.ordered_at,
            status: order.status,
        })
        .collect();
    rows.sort_by_key(|row| row.ordered_at);

    Ok(OrderListing::from_rows(rows))
}

/// Orders placed between `from` and `to` (UTC dates, both inclusive).
/// A missing bound leaves that side open.
pub fn filter_by_date(listing: &OrderListing, from: Option<NaiveDate>, to: Option<NaiveDate>) -> OrderListing {
    let rows = listing
        .rows
        .iter()
        .filter(|row| {
            let day = row.ordered_at.date_naive();
            from.map_or(true, |from| day >= from) && to.map_or(true, |to| day <= to)
        })
        .cloned()
        .collect();
    OrderListing::from_rows(rows)
}

/// Case-insensitive substring match on one column.
pub fn search_orders(listing: &OrderListing, keyword: &str, field: OrderSearchField) -> OrderListing {
    let needle = keyword.trim().to_lowercase();
    let rows = listing
        .rows
        .iter()
        .filter(|row| {
            let haystack = match field {
                OrderSearchField::Id => row.id.clone(),
                OrderSearchField::Customer => row.customer.to_lowercase(),
                OrderSearchField::Status => row.status.label().to_lowercase(),
            };
            haystack.contains(&needle)
        })
        .cloned()
        .collect();
    OrderListing::from_rows(rows)
}

// ============================================================================
// Status changes
// ============================================================================

/// Pending → Fulfilled.
pub fn approve_order(state: &AppState, order_id: &str) -> AppResult<Notice> {
    update_users(&*state.users, |users| -> AppResult<TransitionOutcome> {
        let orders = users.iter_mut().flat_map(|u| u.orders.iter_mut());
        Ok(find_order_mut(orders, order_id)?.approve()?)
    })?;

    info!("Order {} approved", order_id);
    Ok(Notice::success(format!("Order {} marked {}", order_id, OrderStatus::Fulfilled)))
}

/// Pending → Cancelled, once `confirm` agrees.
pub fn reject_order<F>(state: &AppState, order_id: &str, confirm: F) -> AppResult<Notice>
where
    F: FnOnce(&str) -> bool,
{
    let products = state.catalog.products()?;
    let catalog = Catalog::new(&products);

    let outcome = update_users(&*state.users, |users| -> AppResult<TransitionOutcome> {
        let orders = users.iter_mut().flat_map(|u| u.orders.iter_mut());
        let order = find_order_mut(orders, order_id)?;
        Ok(order.reject(|order| {
            confirm(&format!(
                "Cancel order {} ({} ₫)?",
                order.id(),
                format_dong(compute_order_total(order, &catalog))
            ))
        })?)
    })?;

    match outcome {
        TransitionOutcome::Applied(status) => {
            info!("Order {} rejected", order_id);
            Ok(Notice::success(format!("Order {} marked {}", order_id, status)))
        }
        TransitionOutcome::Declined => Ok(Notice::info("Order left unchanged")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::login;
    use crate::shop::{add_to_cart, checkout};
    use chrono::TimeZone;
    use std::cell::Cell;
    use std::rc::Rc;
    use storefront_catalog::Product;
    use storefront_core::NoticeLevel;

    /// Two orders by user1, one day apart.
    fn state_with_orders() -> AppState {
        let tick = Rc::new(Cell::new(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()));
        let clock = tick.clone();
        let state = AppState::in_memory(vec![Product::new("A", "Galaxy A", "Samsung", 1_000_000)])
            .unwrap()
            .with_clock(move || clock.get());

        login(&state, "user1", "123456").unwrap();
        add_to_cart(&state, "A").unwrap();
        checkout(&state, None).unwrap();

        tick.set(Utc.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap());
        add_to_cart(&state, "A").unwrap();
        add_to_cart(&state, "A").unwrap();
        checkout(&state, None).unwrap();
        state
    }

    #[test]
    fn test_list_orders() {
        let state = state_with_orders();
        let listing = list_orders(&state).unwrap();
        assert_eq!(listing.rows.len(), 2);
        assert_eq!(listing.rows[0].customer, "user1");
        assert_eq!(listing.rows[1].items[0].quantity, 2);
        assert_eq!(listing.rows[1].items[0].product_name.as_deref(), Some("Galaxy A"));
        assert_eq!(listing.listed_total, 3_000_000);
    }

    #[test]
    fn test_filter_by_date_is_inclusive() {
        let state = state_with_orders();
        let listing = list_orders(&state).unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();

        assert_eq!(filter_by_date(&listing, Some(day), Some(day)).rows.len(), 1);
        assert_eq!(filter_by_date(&listing, None, Some(day)).rows.len(), 2);
        assert_eq!(filter_by_date(&listing, Some(day.succ_opt().unwrap()), None).rows.len(), 0);
    }

    #[test]
    fn test_approve_then_reject_is_invalid() {
        let state = state_with_orders();
        let id = list_orders(&state).unwrap().rows[0].id.clone();

        approve_order(&state, &id).unwrap();
        let asked = Cell::new(false);
        let notice = reject_order(&state, &id, |_| {
            asked.set(true);
            true
        })
        .unwrap_err()
        .into_notice();

        assert_eq!(notice.level, NoticeLevel::Warning);
        assert!(!asked.get());
        assert_eq!(list_orders(&state).unwrap().rows[0].status, OrderStatus::Fulfilled);
    }

    #[test]
    fn test_reject_declined_and_confirmed() {
        let state = state_with_orders();
        let id = list_orders(&state).unwrap().rows[1].id.clone();

        let notice = reject_order(&state, &id, |_| false).unwrap();
        assert_eq!(notice.level, NoticeLevel::Info);
        assert_eq!(list_orders(&state).unwrap().rows[1].status, OrderStatus::Pending);

        reject_order(&state, &id, |prompt| prompt.contains("2.000.000")).unwrap();
        let listing = list_orders(&state).unwrap();
        assert_eq!(listing.rows[1].status, OrderStatus::Cancelled);

        let found = search_orders(&listing, "đã hủy", OrderSearchField::Status);
        assert_eq!(found.rows.len(), 1);
        assert!(approve_order(&state, "nope").is_err());
    }
}
