use serde::{Deserialize, Serialize};
use storefront_core::StoreError;
use crate::kv::{self, KeyValueStore};

#[derive(Debug, Serialize, Deserialize)]
struct SessionRecord {
    username: String,
}

/// Remembers who is signed in between runs. Only the username is stored;
/// the account itself is always read from the user list.
pub struct SessionRepository<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> SessionRepository<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    pub fn current_user(&self) -> Result<Option<String>, StoreError> {
        // A corrupt session is the same as being signed out
        match kv::get_json::<SessionRecord, _>(&self.store, &self.key) {
            Ok(record) => Ok(record.map(|r| r.username)),
            Err(StoreError::Corrupt { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub fn sign_in(&self, username: &str) -> Result<(), StoreError> {
        kv::set_json(
            &self.store,
            &self.key,
            &SessionRecord {
                username: username.to_string(),
            },
        )
    }

    pub fn sign_out(&self) -> Result<(), StoreError> {
        self.store.remove(&self.key)
    }
}
