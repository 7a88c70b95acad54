use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use storefront_order::{Cart, Order};
use storefront_shared::Masked;

/// Username of the built-in administrator.
pub const ADMIN_USERNAME: &str = "admin";

/// A customer (or the administrator) with their cart and order history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub username: String,
    #[serde(rename = "pass", default)]
    pub password: Masked<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default, rename = "fullName")]
    pub full_name: String,
    #[serde(default, rename = "off")]
    pub locked: bool,
    #[serde(default, rename = "products")]
    pub cart: Cart,
    #[serde(default, rename = "donhang")]
    pub orders: Vec<Order>,
    #[serde(
        default,
        rename = "createdAt",
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    /// Fields this version does not read (e.g. an older `orders` list),
    /// carried along so rewriting the user list does not drop them.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserAccount {
    pub fn new(username: &str, password: &str, email: &str, full_name: &str) -> Self {
        Self {
            username: username.to_string(),
            password: Masked::new(password.to_string()),
            email: email.to_string(),
            full_name: full_name.to_string(),
            locked: false,
            cart: Cart::new(),
            orders: Vec::new(),
            created_at: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.username == ADMIN_USERNAME
    }
}

/// Sign-up form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registration {
    pub username: String,
    pub password: Masked<String>,
    pub email: String,
    pub full_name: String,
}

/// Accounts present on first start.
pub fn default_users(admin_password: &str) -> Vec<UserAccount> {
    vec![
        UserAccount::new("user1", "123456", "user1@email.com", "Người dùng 1"),
        UserAccount::new("user2", "123456", "user2@email.com", "Người dùng 2"),
        UserAccount::new(ADMIN_USERNAME, admin_password, "admin@email.com", "Admin"),
    ]
}

/// Make sure an `admin` account exists and has a password.
/// Returns whether the list changed.
pub fn ensure_admin(users: &mut Vec<UserAccount>, admin_password: &str) -> bool {
    match users.iter_mut().find(|u| u.is_admin()) {
        Some(admin) if admin.password.is_empty() => {
            admin.password = Masked::new(admin_password.to_string());
            tracing::info!("Restored missing admin password");
            true
        }
        Some(_) => false,
        None => {
            users.push(UserAccount::new(ADMIN_USERNAME, admin_password, "admin@email.com", "Admin"));
            tracing::info!("Created missing admin account");
            true
        }
    }
}

/// Check credentials. Locked accounts cannot sign in.
pub fn authenticate<'a>(users: &'a [UserAccount], username: &str, password: &str) -> Result<&'a UserAccount, AccountError> {
    let user = users
        .iter()
        .find(|u| u.username == username && u.password.matches(password))
        .ok_or(AccountError::InvalidCredentials)?;

    if user.locked {
        return Err(AccountError::Locked(user.username.clone()));
    }

    Ok(user)
}

/// Append a new account after validating the form.
pub fn register(users: &mut Vec<UserAccount>, form: Registration, now: DateTime<Utc>) -> Result<(), AccountError> {
    let username = form.username.trim();
    if username.is_empty() {
        return Err(AccountError::MissingField("username"));
    }
    if form.password.is_empty() {
        return Err(AccountError::MissingField("password"));
    }
    if form.email.trim().is_empty() {
        return Err(AccountError::MissingField("email"));
    }
    if users.iter().any(|u| u.username == username) {
        return Err(AccountError::DuplicateUsername(username.to_string()));
    }

    let mut account = UserAccount::new(username, form.password.expose(), form.email.trim(), form.full_name.trim());
    account.created_at = Some(now);
    users.push(account);
    Ok(())
}

pub fn find_user_mut<'a>(users: &'a mut [UserAccount], username: &str) -> Result<&'a mut UserAccount, AccountError> {
    users
        .iter_mut()
        .find(|u| u.username == username)
        .ok_or_else(|| AccountError::NotFound(username.to_string()))
}

/// Remove an account together with its cart and orders.
pub fn remove_user(users: &mut Vec<UserAccount>, username: &str) -> Result<UserAccount, AccountError> {
    let index = users
        .iter()
        .position(|u| u.username == username)
        .ok_or_else(|| AccountError::NotFound(username.to_string()))?;
    Ok(users.remove(index))
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Wrong username or password")]
    InvalidCredentials,

    #[error("Account {0} is locked")]
    Locked(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Username already taken: {0}")]
    DuplicateUsername(String),

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Please sign in first")]
    NotSignedIn,
}
