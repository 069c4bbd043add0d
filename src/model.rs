//! The Post record and its request payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored Post.
///
/// `id` and `version` belong to the store: the id is assigned on insert and
/// never changes, the version starts at 0 and is bumped by exactly one on
/// every successful update. The four audit fields are stamped by the store
/// only when auditing is enabled and are omitted from JSON otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(default)]
    pub version: i64,
}

impl Post {
    /// A fresh, never-stored Post. The store fills in the rest on insert.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            created_at: None,
            updated_at: None,
            created_by: None,
            updated_by: None,
            version: 0,
        }
    }
}

/// Client-supplied fields for create and update requests.
///
/// Everything else on [`Post`] is server-managed, so the write endpoints
/// accept only this shape.
#[derive(Debug, Deserialize)]
pub struct PostPayload {
    pub title: String,
    pub content: String,
}
