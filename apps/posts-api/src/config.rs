//! Application configuration loaded from environment variables.

use std::env;

#[cfg(feature = "redis")]
use posts_infra::RedisConfig;

/// Which document store backs the post records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Redis,
}

impl StoreBackend {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "redis" => StoreBackend::Redis,
            _ => StoreBackend::Memory,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreBackend,
    #[cfg(feature = "redis")]
    pub redis: RedisConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            store: env::var("STORE_BACKEND")
                .map(|v| StoreBackend::parse(&v))
                .unwrap_or(StoreBackend::Memory),
            #[cfg(feature = "redis")]
            redis: RedisConfig::from_env(),
        }
    }
}
