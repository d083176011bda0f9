//! Field-level reads and writes of post records.

use std::sync::Arc;

use crate::domain::{DERIVED_FIELDS, Document, FieldValue, Post, post_key};
use crate::error::PostResult;
use crate::normalize::normalize_post;
use crate::ports::{DocumentStore, GetFieldsPayload, PostHooks, SetFieldsPayload};

/// Façade over the document store for post records.
///
/// Reads go store -> `filter:post.getFields` -> normalize. Writes go
/// store -> `action:post.setFields`. Failures from either collaborator are
/// returned as-is.
#[derive(Clone)]
pub struct PostFieldStore {
    store: Arc<dyn DocumentStore>,
    hooks: Arc<dyn PostHooks>,
}

impl PostFieldStore {
    pub fn new(store: Arc<dyn DocumentStore>, hooks: Arc<dyn PostHooks>) -> Self {
        Self { store, hooks }
    }

    /// Fetch `fields` of every post in `pids`; an empty `fields` fetches all.
    ///
    /// Entries are `None` where no post is stored. Order follows the
    /// (possibly hook-rewritten) batch, not necessarily `pids`. Integer
    /// coercion always uses the `fields` given here.
    pub async fn get_posts_fields(
        &self,
        pids: &[i64],
        fields: &[&str],
    ) -> PostResult<Vec<Option<Post>>> {
        if pids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = pids.iter().map(|pid| post_key(*pid)).collect();
        let requested: Vec<String> = fields.iter().map(|f| f.to_string()).collect();

        tracing::debug!(count = keys.len(), projected = requested.len(), "Fetching post fields");
        let posts = self.store.get_objects(&keys, &requested).await?;

        let result = self
            .hooks
            .filter_get_fields(GetFieldsPayload {
                pids: pids.to_vec(),
                posts,
                fields: requested.clone(),
            })
            .await?;

        // Coercion follows the caller's projection even if a filter rewrote it.
        Ok(result
            .posts
            .into_iter()
            .map(|post| normalize_post(post, &requested))
            .collect())
    }

    /// Full record of one post, or `None` if it does not exist.
    pub async fn get_post_data(&self, pid: i64) -> PostResult<Option<Post>> {
        let posts = self.get_posts_fields(&[pid], &[]).await?;
        Ok(posts.into_iter().next().flatten())
    }

    pub async fn get_posts_data(&self, pids: &[i64]) -> PostResult<Vec<Option<Post>>> {
        self.get_posts_fields(pids, &[]).await
    }

    /// A single field of one post.
    pub async fn get_post_field(&self, pid: i64, field: &str) -> PostResult<Option<FieldValue>> {
        let post = self.get_post_fields(pid, &[field]).await?;
        Ok(post.and_then(|p| p.get(field)))
    }

    pub async fn get_post_fields(&self, pid: i64, fields: &[&str]) -> PostResult<Option<Post>> {
        let posts = self.get_posts_fields(&[pid], fields).await?;
        Ok(posts.into_iter().next().flatten())
    }

    pub async fn set_post_field(
        &self,
        pid: i64,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> PostResult<()> {
        let mut data = Document::new();
        data.insert(field.to_string(), value.into());
        self.set_post_fields(pid, data).await
    }

    /// Write `data` into the post, then fire `action:post.setFields`.
    ///
    /// Derived fields are dropped before the write; the store only ever holds
    /// source fields.
    pub async fn set_post_fields(&self, pid: i64, mut data: Document) -> PostResult<()> {
        for name in DERIVED_FIELDS {
            if data.remove(name).is_some() {
                tracing::debug!(pid, field = name, "Dropping derived field from write");
            }
        }

        self.store.set_object(&post_key(pid), &data).await?;
        tracing::debug!(pid, fields = data.len(), "Post fields written");

        data.insert("pid".to_string(), FieldValue::Int(pid));
        self.hooks
            .action_set_fields(SetFieldsPayload { data })
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::PostError;
    use crate::ports::{HookError, StoreError};

    #[derive(Default)]
    struct RecordingStore {
        objects: Mutex<HashMap<String, Document>>,
        gets: Mutex<Vec<(Vec<String>, Vec<String>)>>,
        fail: bool,
    }

    #[async_trait]
    impl DocumentStore for RecordingStore {
        async fn get_objects(
            &self,
            keys: &[String],
            fields: &[String],
        ) -> Result<Vec<Option<Document>>, StoreError> {
            if self.fail {
                return Err(StoreError::Connection("store offline".to_string()));
            }
            self.gets
                .lock()
                .unwrap()
                .push((keys.to_vec(), fields.to_vec()));

            let objects = self.objects.lock().unwrap();
            Ok(keys
                .iter()
                .map(|key| {
                    objects.get(key).map(|obj| {
                        obj.iter()
                            .filter(|(name, _)| fields.is_empty() || fields.contains(name))
                            .map(|(name, value)| (name.clone(), value.clone()))
                            .collect()
                    })
                })
                .collect())
        }

        async fn set_object(&self, key: &str, data: &Document) -> Result<(), StoreError> {
            let mut objects = self.objects.lock().unwrap();
            let entry = objects.entry(key.to_string()).or_default();
            entry.extend(data.iter().map(|(k, v)| (k.clone(), v.clone())));
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingHooks {
        filters: Mutex<Vec<GetFieldsPayload>>,
        actions: Mutex<Vec<Document>>,
        reject_filter: bool,
        inject_content: bool,
        rewrite_fields: Option<Vec<String>>,
    }

    #[async_trait]
    impl PostHooks for RecordingHooks {
        async fn filter_get_fields(
            &self,
            mut payload: GetFieldsPayload,
        ) -> Result<GetFieldsPayload, HookError> {
            self.filters.lock().unwrap().push(payload.clone());
            if self.reject_filter {
                return Err(HookError::Failed("filter blew up".to_string()));
            }
            if self.inject_content {
                for post in payload.posts.iter_mut().flatten() {
                    post.insert("content".to_string(), FieldValue::from("[filtered]"));
                }
            }
            if let Some(fields) = &self.rewrite_fields {
                payload.fields = fields.clone();
            }
            Ok(payload)
        }

        async fn action_set_fields(&self, payload: SetFieldsPayload) -> Result<(), HookError> {
            self.actions.lock().unwrap().push(payload.data);
            Ok(())
        }
    }

    fn seeded_store() -> RecordingStore {
        let store = RecordingStore::default();
        {
            let mut objects = store.objects.lock().unwrap();
            let mut p1 = Document::new();
            p1.insert("pid".to_string(), FieldValue::from("1"));
            p1.insert("uid".to_string(), FieldValue::from("8"));
            p1.insert("tid".to_string(), FieldValue::from("3"));
            p1.insert("upvotes".to_string(), FieldValue::from("5"));
            p1.insert("downvotes".to_string(), FieldValue::from("2"));
            p1.insert("timestamp".to_string(), FieldValue::from("1700000000000"));
            p1.insert("edited".to_string(), FieldValue::from("0"));
            p1.insert("content".to_string(), FieldValue::from("first"));
            objects.insert("post:1".to_string(), p1);

            let mut p2 = Document::new();
            p2.insert("pid".to_string(), FieldValue::from("2"));
            p2.insert("upvotes".to_string(), FieldValue::from("1"));
            objects.insert("post:2".to_string(), p2);
        }
        store
    }

    fn service(
        store: RecordingStore,
        hooks: RecordingHooks,
    ) -> (PostFieldStore, Arc<RecordingStore>, Arc<RecordingHooks>) {
        let store = Arc::new(store);
        let hooks = Arc::new(hooks);
        (
            PostFieldStore::new(store.clone(), hooks.clone()),
            store,
            hooks,
        )
    }

    #[tokio::test]
    async fn test_empty_pids_skips_store_and_hooks() {
        let (posts, store, hooks) = service(seeded_store(), RecordingHooks::default());

        let result = posts.get_posts_fields(&[], &["upvotes"]).await.unwrap();

        assert!(result.is_empty());
        assert!(store.gets.lock().unwrap().is_empty());
        assert_eq!(hooks.filters.lock().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_batched_fetch_normalizes_each_record() {
        let (posts, store, hooks) = service(seeded_store(), RecordingHooks::default());

        let result = posts.get_posts_fields(&[1, 2, 3], &[]).await.unwrap();

        assert_eq!(result.len(), 3);
        let first = result[0].as_ref().unwrap();
        assert_eq!(first.pid, Some(1));
        assert_eq!(first.votes, Some(3));
        assert_eq!(first.timestamp_iso.as_deref(), Some("2023-11-14T22:13:20.000Z"));
        assert_eq!(first.edited_iso.as_deref(), Some(""));

        let second = result[1].as_ref().unwrap();
        assert_eq!(second.votes, None);
        assert!(result[2].is_none());

        let gets = store.gets.lock().unwrap();
        assert_eq!(gets.len(), 1);
        assert_eq!(gets[0].0, vec!["post:1", "post:2", "post:3"]);
        assert_eq!(hooks.filters.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_filter_hook_rewrites_before_normalize() {
        let hooks = RecordingHooks {
            inject_content: true,
            ..Default::default()
        };
        let (posts, _, _) = service(seeded_store(), hooks);

        let post = posts.get_post_data(1).await.unwrap().unwrap();
        assert_eq!(post.get("content"), Some(FieldValue::from("[filtered]")));
    }

    #[tokio::test]
    async fn test_filter_receives_pids_and_projection() {
        let (posts, _, hooks) = service(seeded_store(), RecordingHooks::default());

        posts
            .get_posts_fields(&[1, 2, 3], &["upvotes", "content"])
            .await
            .unwrap();

        let seen = hooks.filters.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].pids, vec![1, 2, 3]);
        assert_eq!(seen[0].fields, vec!["upvotes".to_string(), "content".to_string()]);
        assert_eq!(seen[0].posts.len(), 3);
        let first = seen[0].posts[0].as_ref().unwrap();
        assert_eq!(first.get("upvotes"), Some(&FieldValue::from("5")));
        assert!(!first.contains_key("downvotes"));
        assert!(seen[0].posts[2].is_none());
    }

    #[tokio::test]
    async fn test_rewritten_filter_fields_do_not_change_coercion() {
        let hooks = RecordingHooks {
            rewrite_fields: Some(vec!["tid".to_string()]),
            ..Default::default()
        };
        let (posts, _, _) = service(seeded_store(), hooks);

        let post = posts
            .get_post_fields(1, &["uid", "tid"])
            .await
            .unwrap()
            .unwrap();

        assert_eq!(post.uid, Some(8));
        assert_eq!(post.tid, Some(3));
        assert!(!post.extra.contains_key("uid"));
    }

    #[tokio::test]
    async fn test_missing_post_is_none() {
        let (posts, _, _) = service(seeded_store(), RecordingHooks::default());

        assert!(posts.get_post_data(999).await.unwrap().is_none());
        assert!(posts.get_post_field(999, "upvotes").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_post_fields_passes_projection() {
        let (posts, store, _) = service(seeded_store(), RecordingHooks::default());

        let post = posts
            .get_post_fields(1, &["upvotes", "content"])
            .await
            .unwrap()
            .unwrap();

        assert_eq!(post.upvotes, Some(5));
        assert_eq!(post.downvotes, None);
        assert_eq!(post.votes, None);
        assert_eq!(
            store.gets.lock().unwrap()[0].1,
            vec!["upvotes".to_string(), "content".to_string()]
        );
    }

    #[tokio::test]
    async fn test_set_then_get_round_trip() {
        let (posts, _, _) = service(RecordingStore::default(), RecordingHooks::default());

        posts.set_post_field(42, "upvotes", 10).await.unwrap();

        let value = posts.get_post_field(42, "upvotes").await.unwrap();
        assert_eq!(value, Some(FieldValue::Int(10)));
    }

    #[tokio::test]
    async fn test_set_fires_action_with_pid_even_when_empty() {
        let (posts, _, hooks) = service(RecordingStore::default(), RecordingHooks::default());

        posts.set_post_fields(9, Document::new()).await.unwrap();

        let actions = hooks.actions.lock().unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].get("pid"), Some(&FieldValue::Int(9)));
        assert_eq!(actions[0].len(), 1);
    }

    #[tokio::test]
    async fn test_derived_fields_are_not_persisted() {
        let (posts, store, hooks) = service(RecordingStore::default(), RecordingHooks::default());

        let mut data = Document::new();
        data.insert("content".to_string(), FieldValue::from("edited"));
        data.insert("votes".to_string(), FieldValue::Int(100));
        data.insert("timestampISO".to_string(), FieldValue::from("whenever"));
        posts.set_post_fields(5, data).await.unwrap();

        let objects = store.objects.lock().unwrap();
        let stored = objects.get("post:5").unwrap();
        assert!(stored.contains_key("content"));
        assert!(!stored.contains_key("votes"));
        assert!(!stored.contains_key("timestampISO"));
        assert!(!hooks.actions.lock().unwrap()[0].contains_key("votes"));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let store = RecordingStore {
            fail: true,
            ..Default::default()
        };
        let (posts, _, hooks) = service(store, RecordingHooks::default());

        let err = posts.get_posts_data(&[1]).await.unwrap_err();
        assert!(matches!(err, PostError::Store(StoreError::Connection(_))));
        assert_eq!(err.to_string(), "Connection failed: store offline");
        assert_eq!(hooks.filters.lock().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_hook_failure_propagates() {
        let hooks = RecordingHooks {
            reject_filter: true,
            ..Default::default()
        };
        let (posts, _, _) = service(seeded_store(), hooks);

        let err = posts.get_post_data(1).await.unwrap_err();
        assert!(matches!(err, PostError::Hook(HookError::Failed(_))));
    }
}
