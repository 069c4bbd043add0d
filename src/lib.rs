//! # postd
//!
//! A small async CRUD service exposing a single resource, Posts, over
//! HTTP, backed by a document store. Route handlers delegate straight to a
//! store abstraction; there is no business logic between the wire and the
//! collection.
//!
//! ## Shape of the service
//!
//! - **HTTP**: hyper behind a radix-tree router ([`matchit`]), raw
//!   `async fn(Request) -> Response` handlers, graceful SIGTERM/Ctrl-C
//!   drain. TLS, rate limiting, and body-size limits belong to the reverse
//!   proxy in front, not here.
//! - **Store**: the [`store::PostStore`] trait with a MongoDB backend and
//!   an in-memory backend, both enforcing an optimistic per-record version
//!   lock on update.
//! - **Seeding**: at startup the collection is wiped and two fixture Posts
//!   are planted by a fire-and-forget task; `/readyz` flips to 200 once it
//!   has finished.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use postd::seed::Readiness;
//! use postd::store::{Auditing, MemoryStore, PostStore};
//! use postd::{handlers, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), postd::Error> {
//!     let store: Arc<dyn PostStore> = Arc::new(MemoryStore::new(Auditing::disabled()));
//!     let readiness = Arc::new(Readiness::default());
//!
//!     let seeding_store = Arc::clone(&store);
//!     let seeding_flag = Arc::clone(&readiness);
//!     tokio::spawn(async move {
//!         postd::seed::run(seeding_store).await;
//!         seeding_flag.mark_ready();
//!     });
//!
//!     let app = handlers::app(store, readiness);
//!     Server::bind("0.0.0.0:3000").await?.serve(app).await
//! }
//! ```

mod handler;
mod request;
mod response;
mod router;
mod server;

pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod model;
pub mod seed;
pub mod store;

pub use error::Error;
pub use handler::Handler;
pub use request::Request;
pub use response::{IntoResponse, Json, Response};
pub use router::Router;
pub use server::Server;
