//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! Build a [`Response`] in your handler and return it, or return anything
//! that implements [`IntoResponse`] ([`Json`], a bare [`StatusCode`], a
//! string) and let the conversion do the rest.

use bytes::Bytes;
use http::StatusCode;
use http_body_util::Full;
use serde::Serialize;
use tracing::error;

/// An outgoing HTTP response.
pub struct Response {
    body: Vec<u8>,
    content_type: Option<&'static str>,
    status: StatusCode,
}

impl Response {
    /// `200 OK` with an `application/json` body. Pass bytes straight from
    /// the serializer, or reach for [`Json`] to serialize and answer in one
    /// step.
    pub fn json(body: Vec<u8>) -> Self {
        Self { body, content_type: Some("application/json"), status: StatusCode::OK }
    }

    /// `200 OK` with a `text/plain` body.
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            body: body.into().into_bytes(),
            content_type: Some("text/plain; charset=utf-8"),
            status: StatusCode::OK,
        }
    }

    /// A bare status with no body.
    pub fn status(status: StatusCode) -> Self {
        Self { body: Vec::new(), content_type: None, status }
    }

    pub(crate) fn status_code(&self) -> StatusCode {
        self.status
    }

    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut response = http::Response::new(Full::new(Bytes::from(self.body)));
        *response.status_mut() = self.status;
        if let Some(content_type) = self.content_type {
            response
                .headers_mut()
                .insert(http::header::CONTENT_TYPE, http::HeaderValue::from_static(content_type));
        }
        response
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`], so handlers can return whatever
/// reads best at the call site.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response {
        self
    }
}

impl IntoResponse for StatusCode {
    fn into_response(self) -> Response {
        Response::status(self)
    }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response {
        Response::text(self)
    }
}

impl IntoResponse for String {
    fn into_response(self) -> Response {
        Response::text(self)
    }
}

// ── Json ──────────────────────────────────────────────────────────────────────

/// Serializes its payload as the response body.
///
/// Serialization failure is a programming error in our own types; it is
/// logged and answered with a bare 500 rather than a half-written body.
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(bytes) => Response::json(bytes),
            Err(e) => {
                error!("response serialization failed: {e}");
                Response::status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}
