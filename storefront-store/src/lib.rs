pub mod app_config;
pub mod kv;
pub mod catalog_repo;
pub mod user_repo;
pub mod session_repo;
pub mod transaction;

pub use app_config::{BusinessRules, Config, StorageBackend, StorageConfig};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use catalog_repo::StoreProductRepository;
pub use user_repo::StoreUserRepository;
pub use session_repo::SessionRepository;
pub use transaction::{update_products, update_users};
