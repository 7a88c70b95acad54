use serde::Serialize;
use storefront_catalog::{next_product_code, Product, ProductError, ProductForm, ProductId};
use storefront_core::identity::{self, UserAccount};
use storefront_core::Notice;
use storefront_store::{update_products, update_users};
use tracing::{info, warn};

use crate::error::AppResult;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Customer row in the admin table. The password is never included.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerRow {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub locked: bool,
    pub order_count: usize,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<&UserAccount> for CustomerRow {
    fn from(user: &UserAccount) -> Self {
        Self {
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            locked: user.locked,
            order_count: user.orders.len(),
            created_at: user.created_at,
        }
    }
}

// ============================================================================
// Products
// ============================================================================

pub fn list_products(state: &AppState) -> AppResult<Vec<Product>> {
    Ok(state.catalog.products()?)
}

/// Suggested code for a new product of `company`.
pub fn next_code(state: &AppState, company: &str) -> AppResult<ProductId> {
    let products = state.catalog.products()?;
    Ok(next_product_code(&products, company))
}

pub fn add_product(state: &AppState, form: &ProductForm) -> AppResult<Notice> {
    let mut product = form.parse()?;
    product.created_at = Some(state.now());

    update_products(&*state.catalog, |products| -> AppResult<()> {
        if products.iter().any(|p| p.id == product.id) {
            return Err(ProductError::DuplicateId(product.id.clone()).into());
        }
        if products.iter().any(|p| p.name == product.name) {
            return Err(ProductError::DuplicateName(product.name.clone()).into());
        }
        products.push(product.clone());
        Ok(())
    })?;

    info!("Product {} added", product.id);
    Ok(Notice::success(format!("Added {}", product.name)))
}

/// Replace product `id` with the form contents. The code may change as long
/// as it does not collide with another product.
pub fn update_product(state: &AppState, id: &str, form: &ProductForm) -> AppResult<Notice> {
    let mut updated = form.parse()?;

    update_products(&*state.catalog, |products| -> AppResult<()> {
        let index = products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ProductError::NotFound(id.to_string()))?;

        let others = products.iter().enumerate().filter(|(i, _)| *i != index);
        for (_, other) in others {
            if other.id == updated.id {
                return Err(ProductError::DuplicateId(updated.id.clone()).into());
            }
            if other.name == updated.name {
                return Err(ProductError::DuplicateName(updated.name.clone()).into());
            }
        }

        updated.created_at = products[index].created_at;
        products[index] = updated.clone();
        Ok(())
    })?;

    info!("Product {} updated", id);
    Ok(Notice::success(format!("Updated {}", updated.name)))
}

/// Delete a product once `confirm` agrees. Existing carts and orders keep
/// their lines; they simply price to zero from now on.
pub fn delete_product<F>(state: &AppState, id: &str, confirm: F) -> AppResult<Notice>
where
    F: FnOnce(&str) -> bool,
{
    let products = state.catalog.products()?;
    let product = products
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| ProductError::NotFound(id.to_string()))?;

    if !confirm(&format!("Delete product {}?", product.name)) {
        return Ok(Notice::info("Nothing was deleted"));
    }

    update_products(&*state.catalog, |products| -> AppResult<()> {
        products.retain(|p| p.id != id);
        Ok(())
    })?;

    warn!("Product {} deleted", id);
    Ok(Notice::success(format!("Deleted {}", product.name)))
}

// ============================================================================
// Customers
// ============================================================================

/// Every account except the administrator.
pub fn list_customers(state: &AppState) -> AppResult<Vec<CustomerRow>> {
    let users = state.users.users()?;
    Ok(users.iter().filter(|u| !u.is_admin()).map(CustomerRow::from).collect())
}

/// Case-insensitive match on username, full name or email.
pub fn search_customers(rows: &[CustomerRow], keyword: &str) -> Vec<CustomerRow> {
    let needle = keyword.trim().to_lowercase();
    rows.iter()
        .filter(|row| {
            needle.is_empty()
                || row.username.to_lowercase().contains(&needle)
                || row.full_name.to_lowercase().contains(&needle)
                || row.email.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

pub fn set_locked(state: &AppState, username: &str, locked: bool) -> AppResult<Notice> {
    update_users(&*state.users, |users| -> AppResult<()> {
        identity::find_user_mut(users, username)?.locked = locked;
        Ok(())
    })?;

    if locked {
        warn!("Account {} locked", username);
        Ok(Notice::success(format!("Locked {}", username)))
    } else {
        info!("Account {} unlocked", username);
        Ok(Notice::success(format!("Unlocked {}", username)))
    }
}

/// Delete a customer with their cart and orders. A session belonging to the
/// deleted account is ended.
pub fn delete_customer<F>(state: &AppState, username: &str, confirm: F) -> AppResult<Notice>
where
    F: FnOnce(&str) -> bool,
{
    let users = state.users.users()?;
    if !users.iter().any(|u| u.username == username) {
        return Err(identity::AccountError::NotFound(username.to_string()).into());
    }

    if !confirm(&format!("Delete account {}?", username)) {
        return Ok(Notice::info("Nothing was deleted"));
    }

    update_users(&*state.users, |users| -> AppResult<UserAccount> {
        Ok(identity::remove_user(users, username)?)
    })?;

    if state.session.current_user()?.as_deref() == Some(username) {
        state.session.sign_out()?;
    }

    warn!("Account {} deleted", username);
    Ok(Notice::success(format!("Deleted {}", username)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::login;
    use chrono::{TimeZone, Utc};
    use storefront_core::NoticeLevel;

    fn form(id: &str, name: &str) -> ProductForm {
        ProductForm {
            id: id.to_string(),
            name: name.to_string(),
            company: "Oppo".to_string(),
            price: "3490000".to_string(),
            star: "4".to_string(),
            rate_count: "12".to_string(),
            ..Default::default()
        }
    }

    fn state() -> AppState {
        AppState::in_memory(vec![Product::new("Opp0", "Oppo A5", "Oppo", 3_000_000)])
            .unwrap()
            .with_clock(|| Utc.timestamp_millis_opt(1_700_000_000_000).unwrap())
    }

    #[test]
    fn test_add_product_rejects_duplicates() {
        let state = state();
        assert_eq!(next_code(&state, "Oppo").unwrap(), "Opp1");

        add_product(&state, &form("Opp1", "Oppo A7")).unwrap();
        let products = list_products(&state).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].created_at, Some(state.now()));

        let notice = add_product(&state, &form("Opp1", "Other")).unwrap_err().into_notice();
        assert_eq!(notice.level, NoticeLevel::Danger);
        assert!(add_product(&state, &form("Opp9", "Oppo A5")).is_err());
        assert_eq!(list_products(&state).unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_form_changes_nothing() {
        let state = state();
        let mut bad = form("Opp1", "Oppo A7");
        bad.price = "abc".to_string();
        assert!(add_product(&state, &bad).is_err());
        assert_eq!(list_products(&state).unwrap().len(), 1);
    }

    #[test]
    fn test_update_product() {
        let state = state();
        update_product(&state, "Opp0", &form("Opp0", "Oppo A5s")).unwrap();

        let products = list_products(&state).unwrap();
        assert_eq!(products[0].name, "Oppo A5s");
        assert_eq!(products[0].base_price, 3_490_000);
        assert_eq!(products[0].created_at, None);

        assert!(update_product(&state, "Missing", &form("X", "Y")).is_err());
    }

    #[test]
    fn test_delete_product_needs_confirmation() {
        let state = state();
        let notice = delete_product(&state, "Opp0", |_| false).unwrap();
        assert_eq!(notice.level, NoticeLevel::Info);
        assert_eq!(list_products(&state).unwrap().len(), 1);

        delete_product(&state, "Opp0", |prompt| prompt.contains("Oppo A5")).unwrap();
        assert!(list_products(&state).unwrap().is_empty());
    }

    #[test]
    fn test_customer_admin() {
        let state = state();
        let rows = list_customers(&state).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(search_customers(&rows, "USER2").len(), 1);

        set_locked(&state, "user1", true).unwrap();
        assert!(login(&state, "user1", "123456").is_err());
        set_locked(&state, "user1", false).unwrap();
        login(&state, "user1", "123456").unwrap();

        delete_customer(&state, "user1", |_| true).unwrap();
        assert_eq!(list_customers(&state).unwrap().len(), 1);
        assert!(state.session.current_user().unwrap().is_none());

        assert!(delete_customer(&state, "ghost", |_| true).is_err());
    }
}
