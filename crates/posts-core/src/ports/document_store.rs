//! Document store port - keyed flat field maps.

use async_trait::async_trait;

use crate::domain::Document;

/// Document store trait - abstraction over key-value backends (Redis, in-memory).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch many objects in one batch.
    ///
    /// The result is aligned with `keys`; a key with no stored object gives
    /// `None`. When `fields` is non-empty only those fields are returned, and
    /// requested fields that are not stored are left out.
    async fn get_objects(
        &self,
        keys: &[String],
        fields: &[String],
    ) -> Result<Vec<Option<Document>>, StoreError>;

    /// Merge `data` into the object at `key`, creating it if needed.
    async fn set_object(&self, key: &str, data: &Document) -> Result<(), StoreError>;
}

/// Document store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}
