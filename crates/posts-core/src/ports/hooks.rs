//! Hook port - extension points fired around post reads and writes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::Document;

/// Fired after a batched read, before normalization. May rewrite `posts`.
pub const FILTER_POST_GET_FIELDS: &str = "filter:post.getFields";

/// Fired after a write completes.
pub const ACTION_POST_SET_FIELDS: &str = "action:post.setFields";

/// Payload of `filter:post.getFields`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetFieldsPayload {
    pub pids: Vec<i64>,
    /// Raw records as fetched, aligned with the store's result.
    pub posts: Vec<Option<Document>>,
    /// Requested projection; empty means all fields.
    pub fields: Vec<String>,
}

/// Payload of `action:post.setFields`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetFieldsPayload {
    /// The written fields with `pid` attached.
    pub data: Document,
}

/// Hook dispatcher for the post hook points.
#[async_trait]
pub trait PostHooks: Send + Sync {
    /// Run the `filter:post.getFields` chain and return its final payload.
    async fn filter_get_fields(
        &self,
        payload: GetFieldsPayload,
    ) -> Result<GetFieldsPayload, HookError>;

    /// Run the `action:post.setFields` listeners.
    async fn action_set_fields(&self, payload: SetFieldsPayload) -> Result<(), HookError>;
}

/// Hook errors.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("Hook {hook} rejected by {plugin}: {reason}")]
    Rejected {
        hook: &'static str,
        plugin: String,
        reason: String,
    },

    #[error("Hook dispatch failed: {0}")]
    Failed(String),
}
