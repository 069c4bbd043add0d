//! Startup data seeding.
//!
//! On boot the service wipes the collection and plants two fixture Posts,
//! the same way every time. The task is spawned fire-and-forget: the
//! listener does not wait for it, and a seeding failure is logged and
//! swallowed rather than taking the process down. The `/readyz` probe is
//! the one place that observes completion, via [`Readiness`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{error, info};

use crate::model::Post;
use crate::store::{PostStore, StoreError};

const SEED_TITLES: [&str; 2] = ["Post one", "Post two"];

/// Clears the store and inserts the fixture Posts, logging the outcome.
pub async fn run(store: Arc<dyn PostStore>) {
    info!("start data initialization");
    match seed(store.as_ref()).await {
        Ok(()) => info!("done initialization"),
        Err(e) => error!("data initialization failed: {e}"),
    }
}

async fn seed(store: &dyn PostStore) -> Result<(), StoreError> {
    store.delete_all().await?;
    for title in SEED_TITLES {
        store.insert(Post::new(title, format!("content of {title}"))).await?;
    }
    for post in store.find_all().await? {
        info!("saved post: {post:?}");
    }
    Ok(())
}

// ── Readiness ─────────────────────────────────────────────────────────────────

/// One-way flag flipped when the seeding task has finished, whatever the
/// outcome. `/readyz` answers 503 until then, so anything that waits on the
/// probe before sending traffic will see the fixtures.
#[derive(Default)]
pub struct Readiness(AtomicBool);

impl Readiness {
    pub fn mark_ready(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Auditing, MemoryStore};

    #[tokio::test]
    async fn seeds_exactly_the_two_fixture_posts() {
        let store: Arc<dyn PostStore> = Arc::new(MemoryStore::new(Auditing::disabled()));
        run(Arc::clone(&store)).await;

        let mut posts = store.find_all().await.unwrap();
        posts.sort_by(|a, b| a.title.cmp(&b.title));
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "Post one");
        assert_eq!(posts[0].content, "content of Post one");
        assert_eq!(posts[1].title, "Post two");
        assert_eq!(posts[1].content, "content of Post two");
    }

    #[tokio::test]
    async fn reseeding_replaces_whatever_was_there() {
        let store: Arc<dyn PostStore> = Arc::new(MemoryStore::new(Auditing::disabled()));
        store.insert(Post::new("leftover", "junk")).await.unwrap();

        run(Arc::clone(&store)).await;
        let posts = store.find_all().await.unwrap();
        assert_eq!(posts.len(), 2);
        assert!(posts.iter().all(|p| p.title != "leftover"));
    }

    #[tokio::test]
    async fn seeded_posts_are_findable_by_title_substring() {
        let store: Arc<dyn PostStore> = Arc::new(MemoryStore::new(Auditing::disabled()));
        run(Arc::clone(&store)).await;

        let hits = store.find_by_title_contains("one").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Post one");
    }

    #[test]
    fn readiness_is_a_one_way_flip() {
        let ready = Readiness::default();
        assert!(!ready.is_ready());
        ready.mark_ready();
        assert!(ready.is_ready());
    }
}
