use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use storefront_order::CheckoutRules;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub storage: StorageConfig,
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory holding one JSON document per key (file backend only)
    pub data_dir: PathBuf,
    pub products_key: String,
    pub users_key: String,
    pub session_key: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BusinessRules {
    pub shipping_fee: u64,
    pub tax_rate: f64,
    /// Password given to the admin account when it has to be recreated
    pub admin_password: String,
}

impl BusinessRules {
    pub fn checkout_rules(&self) -> CheckoutRules {
        CheckoutRules {
            shipping_fee: self.shipping_fee,
            tax_rate: self.tax_rate,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                backend: StorageBackend::File,
                data_dir: PathBuf::from("data"),
                products_key: "ListProducts".to_string(),
                users_key: "ListUser".to_string(),
                session_key: "CurrentUser".to_string(),
            },
            business_rules: BusinessRules {
                shipping_fee: 30_000,
                tax_rate: 0.08,
                admin_password: "admin123".to_string(),
            },
        }
    }
}

impl Config {
    /// Load from `./config`.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(Path::new("config"))
    }

    pub fn load_from(dir: &Path) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let defaults = Config::default();

        let s = config::Config::builder()
            .set_default("storage.backend", "file")?
            .set_default("storage.data_dir", defaults.storage.data_dir.to_string_lossy().into_owned())?
            .set_default("storage.products_key", defaults.storage.products_key)?
            .set_default("storage.users_key", defaults.storage.users_key)?
            .set_default("storage.session_key", defaults.storage.session_key)?
            .set_default("business_rules.shipping_fee", defaults.business_rules.shipping_fee as i64)?
            .set_default("business_rules.tax_rate", defaults.business_rules.tax_rate)?
            .set_default("business_rules.admin_password", defaults.business_rules.admin_password)?
            // Shared settings, then the per-mode file, then an untracked local override
            .add_source(config::File::from(dir.join("default")).required(false))
            .add_source(config::File::from(dir.join(&run_mode)).required(false))
            .add_source(config::File::from(dir.join("local")).required(false))
            // Eg.. `STOREFRONT__STORAGE__BACKEND=memory`
            .add_source(config::Environment::with_prefix("STOREFRONT").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_without_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path()).unwrap();

        assert_eq!(config.storage.products_key, "ListProducts");
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.business_rules.checkout_rules(), CheckoutRules::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[storage]\nbackend = \"memory\"\n\n[business_rules]\nshipping_fee = 0\ntax_rate = 0.1\n",
        )
        .unwrap();

        let config = Config::load_from(dir.path()).unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.users_key, "ListUser");
        assert_eq!(config.business_rules.shipping_fee, 0);
        assert_eq!(config.business_rules.tax_rate, 0.1);
    }
}
