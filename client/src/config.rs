//! Configuration management for the Babynap client
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: BABYNAP__)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub cache: CacheConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// Day API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Offline cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Version tag; bumping it replaces the cache store wholesale
    pub version: String,
}

impl CacheConfig {
    /// Versioned store name, e.g. `babynap-v1`
    pub fn store_name(&self) -> String {
        babynap_shared::offline::cache_name(&self.version)
    }
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionConfig {
    /// Raw Cookie header to present to the API, if any
    pub cookie: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://127.0.0.1:8080".to_string(),
                timeout_secs: 30,
            },
            cache: CacheConfig {
                version: "v1".to_string(),
            },
            session: SessionConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with BABYNAP__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Load from environment-specific config file
            .add_source(config::File::with_name(&config_file).required(false))
            // Override with environment variables (BABYNAP__ prefix)
            // e.g., BABYNAP__API__BASE_URL=https://naps.example sets api.base_url
            .add_source(config::Environment::with_prefix("BABYNAP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.cache.version, "v1");
        assert!(config.session.cookie.is_none());
    }

    #[test]
    fn test_store_name_carries_version() {
        let config = AppConfig::default();
        assert_eq!(config.cache.store_name(), "babynap-v1");
    }
}
