use storefront_core::identity::{self, UserAccount};
use storefront_core::{StoreError, UserProvider};
use tracing::{error, info};
use crate::kv::{self, KeyValueStore};

/// User list (with carts and orders) kept under a single key.
///
/// Reads always include an `admin` account: a missing one is recreated with
/// the configured password and written back immediately.
pub struct StoreUserRepository<S> {
    store: S,
    key: String,
    admin_password: String,
}

impl<S: KeyValueStore> StoreUserRepository<S> {
    pub fn new(store: S, key: impl Into<String>, admin_password: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            admin_password: admin_password.into(),
        }
    }

    /// Persist the default accounts when nothing is stored yet.
    pub fn initialize(&self) -> Result<(), StoreError> {
        if self.store.get(&self.key)?.is_none() {
            let users = identity::default_users(&self.admin_password);
            kv::set_json(&self.store, &self.key, &users)?;
            info!("Seeded {} default accounts under {}", users.len(), self.key);
        }
        Ok(())
    }
}

impl<S: KeyValueStore> UserProvider for StoreUserRepository<S> {
    fn users(&self) -> Result<Vec<UserAccount>, StoreError> {
        let stored: Option<Vec<UserAccount>> = match kv::get_json(&self.store, &self.key) {
            Ok(users) => users,
            Err(err @ StoreError::Corrupt { .. }) => {
                error!("Falling back to default accounts: {}", err);
                None
            }
            Err(err) => return Err(err),
        };

        let Some(mut users) = stored else {
            return Ok(identity::default_users(&self.admin_password));
        };

        if identity::ensure_admin(&mut users, &self.admin_password) {
            kv::set_json(&self.store, &self.key, &users)?;
        }
        Ok(users)
    }

    fn stored_users(&self) -> Result<Vec<UserAccount>, StoreError> {
        let mut users = kv::get_json(&self.store, &self.key)?
            .unwrap_or_else(|| identity::default_users(&self.admin_password));
        identity::ensure_admin(&mut users, &self.admin_password);
        Ok(users)
    }

    fn set_users(&self, users: &[UserAccount]) -> Result<(), StoreError> {
        kv::set_json(&self.store, &self.key, users)
    }
}
