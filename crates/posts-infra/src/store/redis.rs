//! Redis document store - one hash per object.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use posts_core::ports::{DocumentStore, StoreError};
use posts_core::{Document, FieldValue};

/// Redis connection configuration.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis URL (e.g., redis://localhost:6379)
    pub url: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Whether to fallback to the in-memory store if Redis is unavailable
    pub fallback_to_memory: bool,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
            fallback_to_memory: true,
        }
    }
}

impl RedisConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            connect_timeout: Duration::from_secs(
                std::env::var("REDIS_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
            fallback_to_memory: std::env::var("REDIS_FALLBACK_TO_MEMORY")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
        }
    }
}

/// Redis-backed document store.
///
/// Every value is written as its string form and read back as `Text`; the
/// post normalizer restores integer fields.
pub struct RedisDocumentStore {
    conn: ConnectionManager,
}

impl RedisDocumentStore {
    pub async fn new(config: RedisConfig) -> Result<Self, StoreError> {
        let client =
            Client::open(config.url.as_str()).map_err(|e| StoreError::Connection(e.to_string()))?;

        // Bound the connect so an unreachable server fails fast
        let conn_manager_fut = ConnectionManager::new(client);
        let conn = tokio::time::timeout(config.connect_timeout, conn_manager_fut)
            .await
            .map_err(|_| StoreError::Connection("Connection timed out".to_string()))?
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        tracing::info!(url = %config.url, "Connected to Redis document store");

        Ok(Self { conn })
    }

    /// Create from environment configuration.
    pub async fn from_env() -> Result<Self, StoreError> {
        Self::new(RedisConfig::from_env()).await
    }

    async fn get_all(&self, keys: &[String]) -> Result<Vec<Option<Document>>, StoreError> {
        let mut conn = self.conn.clone();
        let mut pipe = redis::pipe();
        for key in keys {
            pipe.hgetall(key);
        }

        let rows: Vec<HashMap<String, String>> = pipe
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| {
                // HGETALL on a missing key is an empty hash
                if row.is_empty() {
                    return None;
                }
                Some(
                    row.into_iter()
                        .map(|(field, value)| (field, FieldValue::Text(value)))
                        .collect(),
                )
            })
            .collect())
    }

    async fn get_projected(
        &self,
        keys: &[String],
        fields: &[String],
    ) -> Result<Vec<Option<Document>>, StoreError> {
        let mut conn = self.conn.clone();

        // EXISTS and HMGET per key in one MULTI so a concurrent write cannot
        // split them.
        let mut pipe = redis::pipe();
        pipe.atomic();
        for key in keys {
            pipe.exists(key).cmd("HMGET").arg(key).arg(fields);
        }

        let replies: Vec<redis::Value> = pipe
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))?;

        replies
            .chunks(2)
            .map(|pair| {
                let [exists, values] = pair else {
                    return Err(StoreError::Operation(
                        "unpaired EXISTS/HMGET reply".to_string(),
                    ));
                };
                let exists: bool = redis::from_redis_value(exists)
                    .map_err(|e| StoreError::Operation(e.to_string()))?;
                if !exists {
                    return Ok(None);
                }
                let values: Vec<Option<String>> = redis::from_redis_value(values)
                    .map_err(|e| StoreError::Operation(e.to_string()))?;
                Ok(Some(
                    fields
                        .iter()
                        .zip(values)
                        .filter_map(|(field, value)| {
                            value.map(|v| (field.clone(), FieldValue::Text(v)))
                        })
                        .collect(),
                ))
            })
            .collect()
    }
}

#[async_trait]
impl DocumentStore for RedisDocumentStore {
    async fn get_objects(
        &self,
        keys: &[String],
        fields: &[String],
    ) -> Result<Vec<Option<Document>>, StoreError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        if fields.is_empty() {
            self.get_all(keys).await
        } else {
            self.get_projected(keys, fields).await
        }
    }

    async fn set_object(&self, key: &str, data: &Document) -> Result<(), StoreError> {
        // HSET with no pairs is a Redis error
        if data.is_empty() {
            return Ok(());
        }

        let items: Vec<(&str, String)> = data
            .iter()
            .map(|(field, value)| (field.as_str(), value.to_string()))
            .collect();

        let mut conn = self.conn.clone();
        let _: () = conn
            .hset_multiple(key, &items)
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))?;

        tracing::trace!(key = %key, fields = items.len(), "Hash written");
        Ok(())
    }
}
