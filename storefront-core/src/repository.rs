use storefront_catalog::Product;
use crate::identity::UserAccount;

/// Access to the persisted product list.
///
/// The list is stored as one document under a fixed key: reads return the
/// whole list and writes replace it.
pub trait CatalogProvider {
    /// Read for display. Implementations may substitute a fallback list
    /// when the stored document cannot be read.
    fn products(&self) -> Result<Vec<Product>, StoreError>;

    /// Read for a read-modify-write. Never substitutes a fallback for an
    /// unreadable document: that is reported as `StoreError::Corrupt`.
    fn stored_products(&self) -> Result<Vec<Product>, StoreError>;

    fn set_products(&self, products: &[Product]) -> Result<(), StoreError>;
}

/// Access to the persisted user list, which also carries every cart and order.
pub trait UserProvider {
    fn users(&self) -> Result<Vec<UserAccount>, StoreError>;

    /// Strict counterpart of `users`, see `CatalogProvider::stored_products`.
    fn stored_users(&self) -> Result<Vec<UserAccount>, StoreError>;

    fn set_users(&self, users: &[UserAccount]) -> Result<(), StoreError>;
}

impl<T: CatalogProvider + ?Sized> CatalogProvider for &T {
    fn products(&self) -> Result<Vec<Product>, StoreError> {
        (**self).products()
    }

    fn stored_products(&self) -> Result<Vec<Product>, StoreError> {
        (**self).stored_products()
    }

    fn set_products(&self, products: &[Product]) -> Result<(), StoreError> {
        (**self).set_products(products)
    }
}

impl<T: UserProvider + ?Sized> UserProvider for &T {
    fn users(&self) -> Result<Vec<UserAccount>, StoreError> {
        (**self).users()
    }

    fn stored_users(&self) -> Result<Vec<UserAccount>, StoreError> {
        (**self).stored_users()
    }

    fn set_users(&self, users: &[UserAccount]) -> Result<(), StoreError> {
        (**self).set_users(users)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O failed for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Stored value for key {key} is not valid JSON: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not encode value for key {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
