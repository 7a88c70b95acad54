use anyhow::Context;
use chrono::{DateTime, Utc};
use std::rc::Rc;
use storefront_catalog::Product;
use storefront_core::{CatalogProvider, UserProvider};
use storefront_store::{
    BusinessRules, Config, FileStore, KeyValueStore, MemoryStore, SessionRepository, StorageBackend,
    StoreProductRepository, StoreUserRepository,
};

type Clock = Box<dyn Fn() -> DateTime<Utc>>;

/// Everything a storefront or admin operation needs: the two persisted lists,
/// the sign-in session and the business rules.
pub struct AppState {
    pub catalog: Box<dyn CatalogProvider>,
    pub users: Box<dyn UserProvider>,
    pub session: SessionRepository<Rc<dyn KeyValueStore>>,
    pub business_rules: BusinessRules,
    clock: Clock,
}

impl AppState {
    /// Open the configured store and seed it on first use.
    pub fn from_config(config: &Config, seed: Vec<Product>) -> anyhow::Result<Self> {
        let store: Rc<dyn KeyValueStore> = match config.storage.backend {
            StorageBackend::Memory => Rc::new(MemoryStore::new()),
            StorageBackend::File => Rc::new(
                FileStore::open(&config.storage.data_dir)
                    .with_context(|| format!("opening data directory {}", config.storage.data_dir.display()))?,
            ),
        };

        let catalog = StoreProductRepository::new(store.clone(), config.storage.products_key.clone(), seed);
        catalog.initialize().context("seeding product catalog")?;

        let users = StoreUserRepository::new(
            store.clone(),
            config.storage.users_key.clone(),
            config.business_rules.admin_password.clone(),
        );
        users.initialize().context("seeding user accounts")?;

        tracing::info!("Storefront state ready ({:?} backend)", config.storage.backend);

        Ok(Self {
            catalog: Box::new(catalog),
            users: Box::new(users),
            session: SessionRepository::new(store, config.storage.session_key.clone()),
            business_rules: config.business_rules.clone(),
            clock: Box::new(Utc::now),
        })
    }

    /// Memory-backed state with default settings.
    pub fn in_memory(seed: Vec<Product>) -> anyhow::Result<Self> {
        let mut config = Config::default();
        config.storage.backend = StorageBackend::Memory;
        Self::from_config(&config, seed)
    }

    /// Replace the time source used for order ids and timestamps.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + 'static,
    {
        self.clock = Box::new(clock);
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}
