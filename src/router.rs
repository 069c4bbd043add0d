//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup via [`matchit`]. Routes
//! are registered once at startup; a bad path is a programming error and
//! panics right there rather than surfacing per-request.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};

/// The application router. Each registration method returns `self` so
/// routes chain naturally at construction time.
pub struct Router {
    routes: HashMap<http::Method, MatchitRouter<BoxedHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Register a handler for `GET path`. Path parameters use `{name}`
    /// syntax and are retrieved with `req.param("name")`.
    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.route(http::Method::GET, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.route(http::Method::POST, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler) -> Self {
        self.route(http::Method::PUT, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.route(http::Method::DELETE, path, handler)
    }

    fn route(mut self, method: http::Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub(crate) fn lookup(
        &self,
        method: &http::Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Request, Response};

    async fn noop(_req: Request) -> Response {
        Response::text("ok")
    }

    #[test]
    fn lookup_extracts_path_params() {
        let router = Router::new().get("/posts/{id}", noop);

        let (_, params) = router.lookup(&http::Method::GET, "/posts/42").expect("route hit");
        assert_eq!(params.get("id").map(String::as_str), Some("42"));
    }

    #[test]
    fn lookup_misses_on_wrong_method_or_path() {
        let router = Router::new().get("/posts", noop);

        assert!(router.lookup(&http::Method::POST, "/posts").is_none());
        assert!(router.lookup(&http::Method::GET, "/missing").is_none());
    }
}
