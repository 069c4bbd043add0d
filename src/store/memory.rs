//! In-memory store backend.
//!
//! A `HashMap` behind a `tokio::sync::RwLock`. Selected when no database
//! URL is configured; also what the test suite runs against. Implements
//! the exact same contract as the Mongo backend, version check included,
//! so the handlers cannot tell the two apart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::model::Post;
use crate::store::{Auditing, PostStore, StoreError};

pub struct MemoryStore {
    posts: RwLock<HashMap<String, Post>>,
    audit: Auditing,
}

impl MemoryStore {
    pub fn new(audit: Auditing) -> Self {
        Self { posts: RwLock::new(HashMap::new()), audit }
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn insert(&self, mut post: Post) -> Result<Post, StoreError> {
        if post.id.is_some() {
            return Err(StoreError::IdAlreadyAssigned);
        }
        let id = Uuid::new_v4().to_string();
        post.id = Some(id.clone());
        post.version = 0;
        self.audit.stamp_insert(&mut post);

        self.posts.write().await.insert(id, post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, StoreError> {
        Ok(self.posts.read().await.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Post>, StoreError> {
        Ok(self.posts.read().await.values().cloned().collect())
    }

    async fn find_by_title_contains(&self, needle: &str) -> Result<Vec<Post>, StoreError> {
        Ok(self
            .posts
            .read()
            .await
            .values()
            .filter(|p| p.title.contains(needle))
            .cloned()
            .collect())
    }

    async fn update(&self, post: Post) -> Result<Post, StoreError> {
        let id = post.id.clone().ok_or(StoreError::NotFound { id: String::new() })?;

        let mut posts = self.posts.write().await;
        let stored = posts
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound { id: id.clone() })?;

        // The compare half of the compare-and-swap; the write lock makes it
        // atomic with the swap below.
        if stored.version != post.version {
            return Err(StoreError::VersionConflict { id, expected: post.version });
        }

        stored.title = post.title;
        stored.content = post.content;
        stored.version += 1;
        self.audit.stamp_update(stored);
        Ok(stored.clone())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        self.posts.write().await.remove(id);
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        self.posts.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::FixedActor;

    fn store() -> MemoryStore {
        MemoryStore::new(Auditing::disabled())
    }

    #[tokio::test]
    async fn insert_assigns_unique_ids_and_version_zero() {
        let store = store();
        let a = store.insert(Post::new("a", "1")).await.unwrap();
        let b = store.insert(Post::new("b", "2")).await.unwrap();

        let id_a = a.id.expect("id assigned");
        let id_b = b.id.expect("id assigned");
        assert!(!id_a.is_empty());
        assert_ne!(id_a, id_b);
        assert_eq!(a.version, 0);
        assert_eq!(b.version, 0);
    }

    #[tokio::test]
    async fn insert_rejects_preset_id() {
        let store = store();
        let mut post = Post::new("a", "1");
        post.id = Some("chosen-by-caller".into());

        assert!(matches!(
            store.insert(post).await,
            Err(StoreError::IdAlreadyAssigned)
        ));
    }

    #[tokio::test]
    async fn find_by_id_returns_the_inserted_post() {
        let store = store();
        let inserted = store.insert(Post::new("hello", "world")).await.unwrap();

        let found = store
            .find_by_id(inserted.id.as_deref().unwrap())
            .await
            .unwrap()
            .expect("post present");
        assert_eq!(found, inserted);
    }

    #[tokio::test]
    async fn find_by_id_of_unknown_id_is_none() {
        let store = store();
        assert_eq!(store.find_by_id("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn title_search_is_case_sensitive_substring() {
        let store = store();
        store.insert(Post::new("Post one", "c1")).await.unwrap();
        store.insert(Post::new("Post two", "c2")).await.unwrap();

        let hits = store.find_by_title_contains("one").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Post one");

        // Case matters.
        assert!(store.find_by_title_contains("ONE").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_bumps_version_by_exactly_one() {
        let store = store();
        let created = store.insert(Post::new("before", "c")).await.unwrap();

        let mut fetched = store
            .find_by_id(created.id.as_deref().unwrap())
            .await
            .unwrap()
            .unwrap();
        fetched.title = "X".into();
        let updated = store.update(fetched).await.unwrap();

        assert_eq!(updated.version, created.version + 1);
        let reread = store
            .find_by_id(created.id.as_deref().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reread.title, "X");
        assert_eq!(reread.version, 1);
    }

    #[tokio::test]
    async fn stale_update_is_a_version_conflict() {
        let store = store();
        let created = store.insert(Post::new("t", "c")).await.unwrap();

        // Two clients fetch the same revision.
        let mut first = created.clone();
        let mut second = created.clone();

        first.title = "first wins".into();
        store.update(first).await.unwrap();

        second.title = "second loses".into();
        assert!(matches!(
            store.update(second).await,
            Err(StoreError::VersionConflict { expected: 0, .. })
        ));
    }

    #[tokio::test]
    async fn update_of_missing_id_is_not_found() {
        let store = store();
        let mut post = Post::new("t", "c");
        post.id = Some("gone".into());

        assert!(matches!(
            store.update(post).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn delete_is_idempotent_and_leaves_others_alone() {
        let store = store();
        store.insert(Post::new("keep", "c")).await.unwrap();

        store.delete_by_id("never-existed").await.unwrap();
        store.delete_by_id("never-existed").await.unwrap();
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_all_empties_the_collection() {
        let store = store();
        store.insert(Post::new("a", "1")).await.unwrap();
        store.insert(Post::new("b", "2")).await.unwrap();

        store.delete_all().await.unwrap();
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn auditing_stamps_writes_when_enabled() {
        let store = MemoryStore::new(Auditing::enabled(Arc::new(FixedActor("hantsy".into()))));

        let created = store.insert(Post::new("t", "c")).await.unwrap();
        assert!(created.created_at.is_some());
        assert_eq!(created.created_by.as_deref(), Some("hantsy"));
        assert!(created.updated_at.is_none());
        assert!(created.updated_by.is_none());

        let mut fetched = created.clone();
        fetched.title = "t2".into();
        let updated = store.update(fetched).await.unwrap();
        assert!(updated.updated_at.is_some());
        assert_eq!(updated.updated_by.as_deref(), Some("hantsy"));
        // Creation stamps survive updates.
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn auditing_disabled_leaves_fields_empty() {
        let store = store();
        let created = store.insert(Post::new("t", "c")).await.unwrap();

        assert!(created.created_at.is_none());
        assert!(created.created_by.is_none());

        let mut fetched = created;
        fetched.content = "c2".into();
        let updated = store.update(fetched).await.unwrap();
        assert!(updated.updated_at.is_none());
        assert!(updated.updated_by.is_none());
    }
}
