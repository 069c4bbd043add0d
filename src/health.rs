//! Liveness and readiness probe handlers.
//!
//! Liveness answers "is the process alive" and intentionally has no
//! dependencies. Readiness answers "should traffic arrive yet" and is
//! gated on the startup seeding task: the listener comes up immediately,
//! but `/readyz` reports 503 until seeding has finished, so an
//! orchestrator that respects the probe will not route requests to an
//! unseeded collection.

use std::sync::Arc;

use http::StatusCode;

use crate::seed::Readiness;
use crate::{Request, Response};

/// Always `200 OK` with body `"ok"`.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// `200 OK` once the seeding task has completed (successfully or not),
/// `503 Service Unavailable` before.
pub async fn readiness(ready: Arc<Readiness>, _req: Request) -> Response {
    if ready.is_ready() {
        Response::text("ready")
    } else {
        Response::status(StatusCode::SERVICE_UNAVAILABLE)
    }
}
