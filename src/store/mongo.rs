//! MongoDB store backend.
//!
//! One `post` collection, documents keyed by `ObjectId`. The wire/domain
//! [`Post`] and the stored document differ only in the id field, so the
//! mapping lives right here at the store boundary and nowhere else.
//!
//! The optimistic lock rides on Mongo's own conditional write: `update`
//! issues a `findOneAndUpdate` filtered on `_id` *and* `version`, with a
//! `$inc` on `version`. If the filter matches nothing the record was either
//! deleted or moved on since the caller's fetch; a follow-up point read
//! tells the two apart.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Document};
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

use crate::model::Post;
use crate::store::{Auditing, PostStore, StoreError};

/// What actually sits in the collection.
#[derive(Debug, Serialize, Deserialize)]
struct PostDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<bson::DateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<bson::DateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_by: Option<String>,
    version: i64,
}

impl From<PostDocument> for Post {
    fn from(doc: PostDocument) -> Self {
        Post {
            id: Some(doc.id.to_hex()),
            title: doc.title,
            content: doc.content,
            created_at: doc.created_at.map(bson::DateTime::to_chrono),
            updated_at: doc.updated_at.map(bson::DateTime::to_chrono),
            created_by: doc.created_by,
            updated_by: doc.updated_by,
            version: doc.version,
        }
    }
}

pub struct MongoStore {
    posts: Collection<PostDocument>,
    audit: Auditing,
}

impl MongoStore {
    /// Builds a store over `database`'s `post` collection. The driver
    /// connects lazily, so an unreachable server surfaces on the first
    /// operation rather than here.
    pub async fn connect(url: &str, database: &str, audit: Auditing) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(url).await?;
        let posts = client.database(database).collection::<PostDocument>("post");
        Ok(Self { posts, audit })
    }
}

#[async_trait]
impl PostStore for MongoStore {
    async fn insert(&self, mut post: Post) -> Result<Post, StoreError> {
        if post.id.is_some() {
            return Err(StoreError::IdAlreadyAssigned);
        }
        post.version = 0;
        self.audit.stamp_insert(&mut post);

        let doc = PostDocument {
            id: ObjectId::new(),
            title: post.title,
            content: post.content,
            created_at: post.created_at.map(bson::DateTime::from_chrono),
            updated_at: None,
            created_by: post.created_by,
            updated_by: None,
            version: post.version,
        };
        self.posts.insert_one(&doc, None).await?;
        Ok(doc.into())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, StoreError> {
        // A string that is not an ObjectId cannot name a stored post.
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        let found = self.posts.find_one(doc! { "_id": oid }, None).await?;
        Ok(found.map(Post::from))
    }

    async fn find_all(&self) -> Result<Vec<Post>, StoreError> {
        let docs: Vec<PostDocument> =
            self.posts.find(doc! {}, None).await?.try_collect().await?;
        Ok(docs.into_iter().map(Post::from).collect())
    }

    async fn find_by_title_contains(&self, needle: &str) -> Result<Vec<Post>, StoreError> {
        // Substring match via an escaped, unanchored regex. Case-sensitive,
        // same as the in-memory backend.
        let filter = doc! { "title": { "$regex": regex::escape(needle) } };
        let docs: Vec<PostDocument> =
            self.posts.find(filter, None).await?.try_collect().await?;
        Ok(docs.into_iter().map(Post::from).collect())
    }

    async fn update(&self, mut post: Post) -> Result<Post, StoreError> {
        let id = post.id.take().unwrap_or_default();
        let Ok(oid) = ObjectId::parse_str(&id) else {
            return Err(StoreError::NotFound { id });
        };
        self.audit.stamp_update(&mut post);

        let mut set = doc! { "title": post.title.as_str(), "content": post.content.as_str() };
        if let Some(at) = post.updated_at {
            set.insert("updated_at", bson::DateTime::from_chrono(at));
        }
        if let Some(by) = &post.updated_by {
            set.insert("updated_by", by.as_str());
        }
        let update: Document = doc! { "$set": set, "$inc": { "version": 1_i64 } };

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let updated = self
            .posts
            .find_one_and_update(doc! { "_id": oid, "version": post.version }, update, options)
            .await?;

        match updated {
            Some(doc) => Ok(doc.into()),
            // The conditional write missed: the record either changed under
            // the caller or is gone entirely.
            None => match self.posts.find_one(doc! { "_id": oid }, None).await? {
                Some(_) => Err(StoreError::VersionConflict { id, expected: post.version }),
                None => Err(StoreError::NotFound { id }),
            },
        }
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(());
        };
        self.posts.delete_one(doc! { "_id": oid }, None).await?;
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        self.posts.delete_many(doc! {}, None).await?;
        Ok(())
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(e: mongodb::error::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}
