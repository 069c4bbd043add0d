//! Route handlers and router assembly.
//!
//! Five thin adapters between the HTTP surface and [`PostStore`]; no
//! business logic lives here. Each handler closure captures its own clone
//! of the shared store handle at construction time, so there is no global
//! state and tests can wire up any backend they like.

use std::sync::Arc;

use http::StatusCode;
use tracing::debug;

use crate::model::{Post, PostPayload};
use crate::seed::Readiness;
use crate::store::{PostStore, StoreError};
use crate::{health, IntoResponse, Json, Request, Response, Router};

/// Builds the application router over `store`.
pub fn app(store: Arc<dyn PostStore>, readiness: Arc<Readiness>) -> Router {
    Router::new()
        .get("/posts", {
            let store = Arc::clone(&store);
            move |req| list(Arc::clone(&store), req)
        })
        .post("/posts", {
            let store = Arc::clone(&store);
            move |req| create(Arc::clone(&store), req)
        })
        .get("/posts/{id}", {
            let store = Arc::clone(&store);
            move |req| get(Arc::clone(&store), req)
        })
        .put("/posts/{id}", {
            let store = Arc::clone(&store);
            move |req| update(Arc::clone(&store), req)
        })
        .delete("/posts/{id}", {
            let store = Arc::clone(&store);
            move |req| delete(Arc::clone(&store), req)
        })
        .get("/healthz", health::liveness)
        .get("/readyz", move |req| health::readiness(Arc::clone(&readiness), req))
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// `GET /posts[?q=needle]` — the whole collection, or a title-substring
/// filter when `q` is present and not blank.
async fn list(store: Arc<dyn PostStore>, req: Request) -> Response {
    let result = match req.query("q") {
        Some(q) if !q.trim().is_empty() => store.find_by_title_contains(&q).await,
        _ => store.find_all().await,
    };
    match result {
        Ok(posts) => Json(posts).into_response(),
        Err(e) => e.into_response(),
    }
}

/// `POST /posts` — insert and echo the stored record, id and version
/// included.
async fn create(store: Arc<dyn PostStore>, req: Request) -> Response {
    let Some(payload) = parse_payload(&req) else {
        return Response::status(StatusCode::BAD_REQUEST);
    };
    match store.insert(Post::new(payload.title, payload.content)).await {
        Ok(post) => Json(post).into_response(),
        Err(e) => e.into_response(),
    }
}

/// `GET /posts/{id}` — 404 with an empty body when the id is unknown.
async fn get(store: Arc<dyn PostStore>, req: Request) -> Response {
    let id = req.param("id").unwrap_or_default();
    match store.find_by_id(id).await {
        Ok(Some(post)) => Json(post).into_response(),
        Ok(None) => Response::status(StatusCode::NOT_FOUND),
        Err(e) => e.into_response(),
    }
}

/// `PUT /posts/{id}` — fetch, overwrite title and content, save. Nothing
/// is created for an unknown id; a concurrent writer surfaces as 409.
async fn update(store: Arc<dyn PostStore>, req: Request) -> Response {
    let Some(payload) = parse_payload(&req) else {
        return Response::status(StatusCode::BAD_REQUEST);
    };
    let id = req.param("id").unwrap_or_default();

    match store.find_by_id(id).await {
        Ok(Some(mut post)) => {
            post.title = payload.title;
            post.content = payload.content;
            match store.update(post).await {
                Ok(updated) => Json(updated).into_response(),
                Err(e) => e.into_response(),
            }
        }
        Ok(None) => Response::status(StatusCode::NOT_FOUND),
        Err(e) => e.into_response(),
    }
}

/// `DELETE /posts/{id}` — 204 whether or not the id existed.
async fn delete(store: Arc<dyn PostStore>, req: Request) -> Response {
    let id = req.param("id").unwrap_or_default();
    match store.delete_by_id(id).await {
        Ok(()) => Response::status(StatusCode::NO_CONTENT),
        Err(e) => e.into_response(),
    }
}

fn parse_payload(req: &Request) -> Option<PostPayload> {
    match serde_json::from_slice(req.body()) {
        Ok(payload) => Some(payload),
        Err(e) => {
            debug!(path = req.path(), "unparsable post payload: {e}");
            None
        }
    }
}

/// Store failures map onto statuses here and nowhere else. Bodies stay
/// empty: callers get a status, details go to the log.
impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = match &self {
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::VersionConflict { .. } => StatusCode::CONFLICT,
            StoreError::IdAlreadyAssigned => StatusCode::BAD_REQUEST,
            StoreError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("store failure: {self}");
        } else {
            debug!("store rejection: {self}");
        }
        Response::status(status)
    }
}
