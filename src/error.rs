//! Unified error type.
//!
//! Application-level failures (404, 409, etc.) are expressed as HTTP
//! [`Response`](crate::Response) values, not as `Error`s. This type covers
//! what can go wrong before and around request handling: binding the
//! listener, loading configuration, and bringing up the store.

use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid listen address `{0}`")]
    InvalidAddr(String),

    #[error("config: {0}")]
    Config(#[from] envy::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}
