//! In-memory document store - used as fallback when Redis is unavailable.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use posts_core::Document;
use posts_core::ports::{DocumentStore, StoreError};

/// In-memory document store using a HashMap with async RwLock.
///
/// Values are kept exactly as written, so integers stay integers.
/// Note: Data is lost on process restart.
pub struct InMemoryDocumentStore {
    objects: RwLock<HashMap<String, Document>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// The stored object at `key`, without projection.
    pub async fn raw(&self, key: &str) -> Option<Document> {
        self.objects.read().await.get(key).cloned()
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get_objects(
        &self,
        keys: &[String],
        fields: &[String],
    ) -> Result<Vec<Option<Document>>, StoreError> {
        let objects = self.objects.read().await;

        let result = keys
            .iter()
            .map(|key| {
                let object = objects.get(key)?;
                if fields.is_empty() {
                    return Some(object.clone());
                }
                Some(
                    fields
                        .iter()
                        .filter_map(|f| object.get(f).map(|v| (f.clone(), v.clone())))
                        .collect(),
                )
            })
            .collect();

        Ok(result)
    }

    async fn set_object(&self, key: &str, data: &Document) -> Result<(), StoreError> {
        if data.is_empty() {
            return Ok(());
        }

        let mut objects = self.objects.write().await;
        let object = objects.entry(key.to_string()).or_default();
        for (field, value) in data {
            object.insert(field.clone(), value.clone());
        }

        tracing::trace!(key = %key, fields = data.len(), "Object written");
        Ok(())
    }
}
