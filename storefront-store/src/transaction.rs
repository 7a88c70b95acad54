//! Read-modify-write helpers.
//!
//! Each helper reads the whole list, hands it to a closure and writes it back
//! only if the closure succeeds, so a rejected change never reaches storage.
//! The read is strict: an unreadable document fails the update instead of
//! being replaced by a fallback list.
//! Two writers in different processes can still overwrite each other; the
//! window is one read plus one write.

use storefront_catalog::Product;
use storefront_core::{CatalogProvider, StoreError, UserAccount, UserProvider};

pub fn update_products<P, T, E, F>(provider: &P, apply: F) -> Result<T, E>
where
    P: CatalogProvider + ?Sized,
    F: FnOnce(&mut Vec<Product>) -> Result<T, E>,
    E: From<StoreError>,
{
    let mut products = provider.stored_products()?;
    let outcome = apply(&mut products)?;
    provider.set_products(&products)?;
    Ok(outcome)
}

pub fn update_users<P, T, E, F>(provider: &P, apply: F) -> Result<T, E>
where
    P: UserProvider + ?Sized,
    F: FnOnce(&mut Vec<UserAccount>) -> Result<T, E>,
    E: From<StoreError>,
{
    let mut users = provider.stored_users()?;
    let outcome = apply(&mut users)?;
    provider.set_users(&users)?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog_repo::StoreProductRepository;
    use crate::kv::{FileStore, KeyValueStore, MemoryStore};
    use crate::user_repo::StoreUserRepository;
    use storefront_core::CoreError;
    use storefront_catalog::ProductError;

    #[test]
    fn test_failed_change_is_not_written() {
        let store = MemoryStore::new();
        let repo = StoreProductRepository::new(&store, "ListProducts", Vec::new());
        repo.set_products(&[Product::new("A", "Phone", "Oppo", 1)]).unwrap();

        let result: Result<(), CoreError> = update_products(&repo, |products| {
            products.clear();
            Err(ProductError::NotFound("B".to_string()).into())
        });

        assert!(result.is_err());
        assert_eq!(repo.products().unwrap().len(), 1);
    }

    #[test]
    fn test_successful_change_is_written() {
        let store = MemoryStore::new();
        let repo = StoreProductRepository::new(&store, "ListProducts", Vec::new());

        let count: Result<usize, CoreError> = update_products(&repo, |products| {
            products.push(Product::new("A", "Phone", "Oppo", 1));
            Ok(products.len())
        });

        assert_eq!(count.unwrap(), 1);
        assert_eq!(repo.products().unwrap()[0].id, "A");
    }

    #[test]
    fn test_unreadable_user_list_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let raw = r#"[{"username":"minh","pass":"pw","donhang":[{"id":1}]}]"#;
        store.set("ListUser", raw).unwrap();
        let repo = StoreUserRepository::new(store.clone(), "ListUser", "admin123");

        // Reads for display still get the default accounts
        assert_eq!(repo.users().unwrap().len(), 3);

        let result: Result<(), CoreError> = update_users(&repo, |users| {
            users[0].locked = true;
            Ok(())
        });

        assert!(matches!(result, Err(CoreError::Store(StoreError::Corrupt { .. }))));
        assert_eq!(store.get("ListUser").unwrap().as_deref(), Some(raw));
    }

    #[test]
    fn test_unreadable_catalog_is_not_overwritten() {
        let store = MemoryStore::new();
        store.set("ListProducts", "[{").unwrap();
        let repo = StoreProductRepository::new(&store, "ListProducts", vec![Product::new("A", "Phone", "Oppo", 1)]);

        let result: Result<(), CoreError> = update_products(&repo, |products| {
            products.clear();
            Ok(())
        });

        assert!(result.is_err());
        assert_eq!(store.get("ListProducts").unwrap().as_deref(), Some("[{"));
    }
}
