//! Configuration management.

use crate::store::{FilterStore, MemoryStore, RestStore, SqliteStore};
use crate::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Filter store selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// In-process store (tests, embedding).
    Memory,
    /// Local `SQLite` database.
    Sqlite {
        /// Path to the database file.
        db_path: PathBuf,
    },
    /// PostgREST store (the hosted product).
    Rest {
        /// Base URL of the store service.
        base_url: String,
        /// API key; when `None`, read from `PURLI_STORE_KEY` at build
        /// time.
        api_key: Option<String>,
    },
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::Sqlite {
            db_path: PathBuf::from("./purli-filters.db"),
        }
    }
}

/// Main configuration for the filter engine.
#[derive(Debug, Clone, Default)]
pub struct PurliConfig {
    /// Which filter store backend to use.
    pub store: StoreConfig,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Store section.
    pub store: Option<ConfigFileStore>,
}

/// Store section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileStore {
    /// Backend name: "memory", "sqlite", "rest".
    pub backend: Option<String>,
    /// `SQLite` database path.
    pub db_path: Option<String>,
    /// REST base URL.
    pub base_url: Option<String>,
    /// REST API key (prefer the `PURLI_STORE_KEY` environment variable).
    pub api_key: Option<String>,
}

impl PurliConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::operation("read_config_file", e))?;

        let file: ConfigFile =
            toml::from_str(&contents).map_err(|e| Error::operation("parse_config_file", e))?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/purli/` on macOS)
    /// 2. XDG config dir (`~/.config/purli/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found. Loads
    /// `.env` first so store credentials referenced from the config are
    /// available.
    #[must_use]
    pub fn load_default() -> Self {
        dotenvy::dotenv().ok();

        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let platform_config = base_dirs.config_dir().join("purli").join("config.toml");
        if platform_config.exists() {
            if let Ok(config) = Self::load_from_file(&platform_config) {
                return config;
            }
        }

        let xdg_config = base_dirs
            .home_dir()
            .join(".config")
            .join("purli")
            .join("config.toml");
        if xdg_config.exists() {
            if let Ok(config) = Self::load_from_file(&xdg_config) {
                return config;
            }
        }

        Self::default()
    }

    /// Converts a `ConfigFile` to `PurliConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        let Some(store) = file.store else {
            return config;
        };

        match store.backend.as_deref() {
            Some("memory") => config.store = StoreConfig::Memory,
            Some("rest") => {
                config.store = StoreConfig::Rest {
                    base_url: store.base_url.unwrap_or_default(),
                    api_key: store.api_key,
                };
            },
            // "sqlite" and anything unrecognized fall back to SQLite
            _ => {
                if let Some(db_path) = store.db_path {
                    config.store = StoreConfig::Sqlite {
                        db_path: PathBuf::from(db_path),
                    };
                }
            },
        }

        config
    }

    /// Sets the store backend.
    #[must_use]
    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    /// Builds the configured filter store.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be initialized (database
    /// unopenable, REST credentials missing).
    pub fn build_store(&self) -> Result<Arc<dyn FilterStore>> {
        match &self.store {
            StoreConfig::Memory => Ok(Arc::new(MemoryStore::new())),
            StoreConfig::Sqlite { db_path } => Ok(Arc::new(SqliteStore::new(db_path)?)),
            StoreConfig::Rest { base_url, api_key } => {
                if base_url.is_empty() {
                    return Err(Error::operation("build_store", "REST base_url is empty"));
                }
                let api_key = match api_key {
                    Some(key) => key.clone(),
                    None => std::env::var(crate::store::ENV_STORE_KEY).map_err(|_| {
                        Error::operation(
                            "build_store",
                            format!("{} is not set", crate::store::ENV_STORE_KEY),
                        )
                    })?,
                };
                Ok(Arc::new(RestStore::new(base_url.clone(), api_key)))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_default_is_sqlite() {
        let config = PurliConfig::default();
        assert!(matches!(config.store, StoreConfig::Sqlite { .. }));
    }

    #[test]
    fn test_parse_memory_backend() {
        let file: ConfigFile = toml::from_str(
            r#"
            [store]
            backend = "memory"
            "#,
        )
        .unwrap();
        let config = PurliConfig::from_config_file(file);
        assert_eq!(config.store, StoreConfig::Memory);
    }

    #[test]
    fn test_parse_sqlite_backend_with_path() {
        let file: ConfigFile = toml::from_str(
            r#"
            [store]
            backend = "sqlite"
            db_path = "/tmp/filters.db"
            "#,
        )
        .unwrap();
        let config = PurliConfig::from_config_file(file);
        assert_eq!(
            config.store,
            StoreConfig::Sqlite {
                db_path: PathBuf::from("/tmp/filters.db")
            }
        );
    }

    #[test]
    fn test_parse_rest_backend() {
        let file: ConfigFile = toml::from_str(
            r#"
            [store]
            backend = "rest"
            base_url = "https://example.supabase.co"
            "#,
        )
        .unwrap();
        let config = PurliConfig::from_config_file(file);
        assert_eq!(
            config.store,
            StoreConfig::Rest {
                base_url: "https://example.supabase.co".to_string(),
                api_key: None,
            }
        );
    }

    #[test]
    fn test_empty_file_keeps_defaults() {
        let file: ConfigFile = toml::from_str("").unwrap();
        let config = PurliConfig::from_config_file(file);
        assert_eq!(config.store, StoreConfig::default());
    }

    #[test]
    fn test_build_memory_store() {
        let config = PurliConfig::new().with_store(StoreConfig::Memory);
        assert!(config.build_store().is_ok());
    }

    #[test]
    fn test_build_rest_store_requires_base_url() {
        let config = PurliConfig::new().with_store(StoreConfig::Rest {
            base_url: String::new(),
            api_key: Some("key".to_string()),
        });
        assert!(config.build_store().is_err());
    }
}
