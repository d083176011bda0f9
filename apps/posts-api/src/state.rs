//! Application state - shared across all handlers.

use std::sync::Arc;

use posts_core::PostFieldStore;
use posts_core::ports::{DocumentStore, SetFieldsPayload, StoreError};
use posts_infra::{HookRegistry, InMemoryDocumentStore};

#[cfg(feature = "redis")]
use posts_infra::RedisDocumentStore;

use crate::config::{AppConfig, StoreBackend};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostFieldStore,
    pub hooks: Arc<HookRegistry>,
}

impl AppState {
    /// Build the application state with the configured store backend.
    pub async fn new(config: &AppConfig) -> Result<Self, StoreError> {
        let store = build_store(config).await?;
        let hooks = Arc::new(HookRegistry::new());
        register_builtin_hooks(&hooks).await;

        tracing::info!("Application state initialized");
        Ok(Self::with_parts(store, hooks))
    }

    pub fn with_parts(store: Arc<dyn DocumentStore>, hooks: Arc<HookRegistry>) -> Self {
        Self {
            posts: PostFieldStore::new(store, hooks.clone()),
            hooks,
        }
    }
}

async fn build_store(config: &AppConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
    match config.store {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory document store");
            Ok(Arc::new(InMemoryDocumentStore::new()))
        }
        #[cfg(feature = "redis")]
        StoreBackend::Redis => match RedisDocumentStore::new(config.redis.clone()).await {
            Ok(store) => Ok(Arc::new(store)),
            Err(e) if config.redis.fallback_to_memory => {
                tracing::warn!(error = %e, "Redis unavailable. Falling back to in-memory store.");
                Ok(Arc::new(InMemoryDocumentStore::new()))
            }
            Err(e) => Err(e),
        },
        #[cfg(not(feature = "redis"))]
        StoreBackend::Redis => {
            tracing::warn!("Built without redis feature - using in-memory store");
            Ok(Arc::new(InMemoryDocumentStore::new()))
        }
    }
}

/// Hooks the server always carries.
async fn register_builtin_hooks(hooks: &HookRegistry) {
    hooks
        .on_set_fields("audit-log", 100, |payload: SetFieldsPayload| async move {
            let pid = payload.data.get("pid").map(ToString::to_string);
            let fields: Vec<&str> = payload
                .data
                .keys()
                .map(String::as_str)
                .filter(|k| *k != "pid")
                .collect();
            tracing::info!(pid = ?pid, fields = ?fields, "Post fields updated");
            Ok::<(), posts_core::ports::HookError>(())
        })
        .await;
}
