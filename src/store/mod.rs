//! The Post store abstraction.
//!
//! Handlers and the seeder talk to [`PostStore`] and never to a driver
//! directly. Two backends implement it:
//!
//! - [`MongoStore`] — the real thing, one `post` collection in MongoDB.
//! - [`MemoryStore`] — a `HashMap` behind an async lock, used when no
//!   database URL is configured and by the test suite.
//!
//! Both enforce the same contract: the store owns `id` and `version`, and
//! `update` is a compare-and-swap on `version` so concurrent writers cannot
//! silently overwrite each other.

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::model::Post;

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The id does not exist. Only `update` reports this; the `find_*`
    /// operations return `Ok(None)` / an empty list and `delete_by_id` is
    /// idempotent.
    #[error("no post with id `{id}`")]
    NotFound { id: String },

    /// The caller's `version` no longer matches the stored record. Someone
    /// else updated it after the caller's fetch.
    #[error("version conflict on post `{id}`: expected {expected}")]
    VersionConflict { id: String, expected: i64 },

    /// `insert` was handed a Post that already carries an id.
    #[error("id must be unset on insert")]
    IdAlreadyAssigned,

    /// The backend failed: unreachable database, driver error, corrupt
    /// document. Not retried.
    #[error("store backend: {0}")]
    Backend(String),
}

// ── The store contract ────────────────────────────────────────────────────────

/// Async CRUD over the Post collection.
///
/// Every call suspends on backend I/O. Within one caller the written order
/// is the execution order; across tasks nothing is ordered and the only
/// discipline is the per-record version check in [`update`](PostStore::update).
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Persists a new Post. `post.id` must be `None`; the store assigns an
    /// id, sets `version` to 0, stamps audit fields when auditing is on,
    /// and returns the stored record.
    async fn insert(&self, post: Post) -> Result<Post, StoreError>;

    /// `Ok(None)` when the id is unknown. Never an error for absence.
    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, StoreError>;

    /// Every Post, in backend default order. Reads may interleave with
    /// concurrent writes; no snapshot is taken.
    async fn find_all(&self) -> Result<Vec<Post>, StoreError>;

    /// Case-sensitive substring match over `title`.
    async fn find_by_title_contains(&self, needle: &str) -> Result<Vec<Post>, StoreError>;

    /// Compare-and-swap update. The caller fetches a Post, mutates `title`
    /// and `content`, and hands it back; the store bumps `version` by one
    /// if and only if the stored version still equals `post.version`.
    /// Fails with [`StoreError::VersionConflict`] on a stale version and
    /// [`StoreError::NotFound`] when the id has vanished.
    async fn update(&self, post: Post) -> Result<Post, StoreError>;

    /// Idempotent: deleting an id that does not exist is `Ok(())`.
    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError>;

    /// Removes every Post. Used by the seeder.
    async fn delete_all(&self) -> Result<(), StoreError>;
}

// ── Auditing ──────────────────────────────────────────────────────────────────

/// Supplies the actor name recorded in `createdBy`/`updatedBy`.
pub trait Actor: Send + Sync {
    fn current(&self) -> String;
}

/// An [`Actor`] that always answers with the same name.
pub struct FixedActor(pub String);

impl Actor for FixedActor {
    fn current(&self) -> String {
        self.0.clone()
    }
}

/// Audit-field policy held by a store.
///
/// Disabled: the four audit fields stay `None` forever. Enabled: the store
/// stamps `created_at`/`created_by` on insert and `updated_at`/`updated_by`
/// on update, asking the [`Actor`] for the name each time. Handlers never
/// touch these fields.
#[derive(Clone)]
pub struct Auditing(Option<Arc<dyn Actor>>);

impl Auditing {
    pub fn disabled() -> Self {
        Self(None)
    }

    pub fn enabled(actor: Arc<dyn Actor>) -> Self {
        Self(Some(actor))
    }

    pub(crate) fn stamp_insert(&self, post: &mut Post) {
        if let Some(actor) = &self.0 {
            post.created_at = Some(Utc::now());
            post.created_by = Some(actor.current());
        }
    }

    pub(crate) fn stamp_update(&self, post: &mut Post) {
        if let Some(actor) = &self.0 {
            post.updated_at = Some(Utc::now());
            post.updated_by = Some(actor.current());
        }
    }
}
