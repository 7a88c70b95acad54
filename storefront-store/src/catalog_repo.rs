use storefront_catalog::Product;
use storefront_core::{CatalogProvider, StoreError};
use tracing::{error, info};
use crate::kv::{self, KeyValueStore};

/// Product list kept under a single key.
///
/// Until the first write the list reads as `seed`, the catalog shipped with
/// the storefront.
pub struct StoreProductRepository<S> {
    store: S,
    key: String,
    seed: Vec<Product>,
}

impl<S: KeyValueStore> StoreProductRepository<S> {
    pub fn new(store: S, key: impl Into<String>, seed: Vec<Product>) -> Self {
        Self {
            store,
            key: key.into(),
            seed,
        }
    }

    /// Persist the seed catalog when nothing is stored yet.
    pub fn initialize(&self) -> Result<(), StoreError> {
        if self.store.get(&self.key)?.is_none() && !self.seed.is_empty() {
            kv::set_json(&self.store, &self.key, &self.seed)?;
            info!("Seeded {} products under {}", self.seed.len(), self.key);
        }
        Ok(())
    }
}

impl<S: KeyValueStore> CatalogProvider for StoreProductRepository<S> {
    fn products(&self) -> Result<Vec<Product>, StoreError> {
        match kv::get_json(&self.store, &self.key) {
            Ok(Some(products)) => Ok(products),
            Ok(None) => Ok(self.seed.clone()),
            // An unreadable document is treated like a missing one
            Err(err @ StoreError::Corrupt { .. }) => {
                error!("Falling back to seed catalog: {}", err);
                Ok(self.seed.clone())
            }
            Err(err) => Err(err),
        }
    }

    fn stored_products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(kv::get_json(&self.store, &self.key)?.unwrap_or_else(|| self.seed.clone()))
    }

    fn set_products(&self, products: &[Product]) -> Result<(), StoreError> {
        kv::set_json(&self.store, &self.key, products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;

    fn seed() -> Vec<Product> {
        vec![Product::new("Sam0", "Galaxy J4+", "Samsung", 3_490_000)]
    }

    #[test]
    fn test_reads_seed_until_written() {
        let store = MemoryStore::new();
        let repo = StoreProductRepository::new(&store, "ListProducts", seed());

        assert_eq!(repo.products().unwrap(), seed());
        assert_eq!(store.get("ListProducts").unwrap(), None);

        repo.set_products(&[]).unwrap();
        assert!(repo.products().unwrap().is_empty());
    }

    #[test]
    fn test_initialize_writes_seed_once() {
        let store = MemoryStore::new();
        let repo = StoreProductRepository::new(&store, "ListProducts", seed());

        repo.initialize().unwrap();
        let raw = store.get("ListProducts").unwrap().unwrap();
        assert!(raw.contains("\"masp\":\"Sam0\""));
        assert!(raw.contains("\"price\":\"3.490.000\""));

        repo.set_products(&[]).unwrap();
        repo.initialize().unwrap();
        assert!(repo.products().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_document_falls_back_to_seed() {
        let store = MemoryStore::new();
        store.set("ListProducts", "[{").unwrap();
        let repo = StoreProductRepository::new(&store, "ListProducts", seed());

        assert_eq!(repo.products().unwrap(), seed());
        assert!(matches!(repo.stored_products(), Err(StoreError::Corrupt { .. })));
    }
}
