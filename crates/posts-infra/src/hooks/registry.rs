//! In-process hook registry.
//!
//! Callbacks are kept per hook point in priority order and run one after the
//! other. Works within a single process only.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::RwLock;

use posts_core::ports::{
    ACTION_POST_SET_FIELDS, FILTER_POST_GET_FIELDS, GetFieldsPayload, HookError, PostHooks,
    SetFieldsPayload,
};

/// Callback for `filter:post.getFields`; returns the (possibly rewritten) payload.
pub type FilterCallback = Arc<
    dyn Fn(GetFieldsPayload) -> BoxFuture<'static, Result<GetFieldsPayload, HookError>>
        + Send
        + Sync,
>;

/// Callback for `action:post.setFields`.
pub type ActionCallback =
    Arc<dyn Fn(SetFieldsPayload) -> BoxFuture<'static, Result<(), HookError>> + Send + Sync>;

struct Registered<C> {
    plugin: String,
    priority: i32,
    callback: C,
}

/// Ordered hook registry.
///
/// Lower priority runs first; equal priorities run in registration order.
/// The first callback to fail stops the dispatch and its error is returned.
pub struct HookRegistry {
    get_fields: RwLock<Vec<Registered<FilterCallback>>>,
    set_fields: RwLock<Vec<Registered<ActionCallback>>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self {
            get_fields: RwLock::new(Vec::new()),
            set_fields: RwLock::new(Vec::new()),
        }
    }

    /// Register a `filter:post.getFields` callback.
    pub async fn on_get_fields<F, Fut>(&self, plugin: impl Into<String>, priority: i32, callback: F)
    where
        F: Fn(GetFieldsPayload) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<GetFieldsPayload, HookError>> + Send + 'static,
    {
        let callback: FilterCallback =
            Arc::new(move |payload: GetFieldsPayload| callback(payload).boxed());
        let plugin = plugin.into();
        tracing::info!(hook = FILTER_POST_GET_FIELDS, plugin = %plugin, priority, "Hook registered");

        let mut chain = self.get_fields.write().await;
        insert_ordered(
            &mut chain,
            Registered {
                plugin,
                priority,
                callback,
            },
        );
    }

    /// Register an `action:post.setFields` callback.
    pub async fn on_set_fields<F, Fut>(&self, plugin: impl Into<String>, priority: i32, callback: F)
    where
        F: Fn(SetFieldsPayload) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HookError>> + Send + 'static,
    {
        let callback: ActionCallback =
            Arc::new(move |payload: SetFieldsPayload| callback(payload).boxed());
        let plugin = plugin.into();
        tracing::info!(hook = ACTION_POST_SET_FIELDS, plugin = %plugin, priority, "Hook registered");

        let mut listeners = self.set_fields.write().await;
        insert_ordered(
            &mut listeners,
            Registered {
                plugin,
                priority,
                callback,
            },
        );
    }

    /// Remove every callback `plugin` registered on `hook`. Returns how many were removed.
    pub async fn unregister(&self, hook: &str, plugin: &str) -> usize {
        let removed = match hook {
            FILTER_POST_GET_FIELDS => remove_plugin(&mut *self.get_fields.write().await, plugin),
            ACTION_POST_SET_FIELDS => remove_plugin(&mut *self.set_fields.write().await, plugin),
            _ => 0,
        };

        if removed > 0 {
            tracing::info!(hook = %hook, plugin = %plugin, removed, "Hook unregistered");
        }
        removed
    }

    /// Number of callbacks registered on `hook`.
    pub async fn hook_count(&self, hook: &str) -> usize {
        match hook {
            FILTER_POST_GET_FIELDS => self.get_fields.read().await.len(),
            ACTION_POST_SET_FIELDS => self.set_fields.read().await.len(),
            _ => 0,
        }
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn insert_ordered<C>(list: &mut Vec<Registered<C>>, entry: Registered<C>) {
    let at = list
        .iter()
        .position(|r| r.priority > entry.priority)
        .unwrap_or(list.len());
    list.insert(at, entry);
}

fn remove_plugin<C>(list: &mut Vec<Registered<C>>, plugin: &str) -> usize {
    let before = list.len();
    list.retain(|r| r.plugin != plugin);
    before - list.len()
}

/// Copy out the callbacks so no lock is held while they run.
async fn snapshot<C: Clone>(list: &RwLock<Vec<Registered<C>>>) -> Vec<(String, C)> {
    list.read()
        .await
        .iter()
        .map(|r| (r.plugin.clone(), r.callback.clone()))
        .collect()
}

#[async_trait]
impl PostHooks for HookRegistry {
    async fn filter_get_fields(
        &self,
        mut payload: GetFieldsPayload,
    ) -> Result<GetFieldsPayload, HookError> {
        for (plugin, callback) in snapshot(&self.get_fields).await {
            payload = callback(payload).await.inspect_err(|e| {
                tracing::warn!(hook = FILTER_POST_GET_FIELDS, plugin = %plugin, error = %e, "Filter failed");
            })?;
        }
        Ok(payload)
    }

    async fn action_set_fields(&self, payload: SetFieldsPayload) -> Result<(), HookError> {
        for (plugin, callback) in snapshot(&self.set_fields).await {
            callback(payload.clone()).await.inspect_err(|e| {
                tracing::warn!(hook = ACTION_POST_SET_FIELDS, plugin = %plugin, error = %e, "Action failed");
            })?;
        }
        Ok(())
    }
}
