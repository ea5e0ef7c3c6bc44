//! Request context threaded through nested routers.
//!
//! # Data Flow
//! ```text
//! Request + ConnInfo
//!     → Context::derive (url, path, query; routed_path = "", params = {})
//!     → Router matches a pattern
//!     → Context::advance (routed_path += routed, path = "/" + unrouted, params merged)
//!     → handler / nested router receives the advanced Context
//! ```
//!
//! # Design Decisions
//! - Contexts are values: advancing produces a new context, so sibling
//!   pattern attempts never observe each other's captures
//! - `routed_path + path` always reconstructs the original URL path
//! - Paths keep their percent-encoding; captured params are decoded

pub mod params;
pub mod query;

use serde::Serialize;
use std::net::SocketAddr;
use url::Url;

use crate::http::Request;
use crate::routing::Match;

pub use params::Params;
pub use query::{Query, QueryValue};

/// Connection metadata from the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConnInfo {
    pub local_addr: SocketAddr,
    pub remote_addr: SocketAddr,
}

impl ConnInfo {
    pub fn new(local_addr: SocketAddr, remote_addr: SocketAddr) -> Self {
        Self {
            local_addr,
            remote_addr,
        }
    }
}

/// Contextual information about the request being routed.
#[derive(Debug, Clone, Serialize)]
pub struct Context {
    #[serde(serialize_with = "serialize_url")]
    url: Url,
    path: String,
    routed_path: String,
    params: Params,
    query: Query,
    conn: ConnInfo,
}

fn serialize_url<S: serde::Serializer>(url: &Url, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(url.as_str())
}

impl Context {
    /// Build a fresh context for a request entering the outermost router.
    pub fn derive(req: &Request, conn: ConnInfo) -> Result<Self, url::ParseError> {
        let url = request_url(req)?;

        let mut path = url.path().to_string();
        if path.ends_with('/') {
            path.push_str("index");
        }

        let query = Query::from_url(&url);

        Ok(Self {
            url,
            path,
            routed_path: String::new(),
            params: Params::new(),
            query,
            conn,
        })
    }

    /// The full request URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The unrouted portion of the request path, always starting with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The portion of the request path consumed by enclosing routers.
    pub fn routed_path(&self) -> &str {
        &self.routed_path
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Shorthand for `self.params().get(name)`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn conn(&self) -> &ConnInfo {
        &self.conn
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.conn.local_addr
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.conn.remote_addr
    }

    /// Produce the context handed to the handlers of a matched pattern.
    pub(crate) fn advance(&self, m: &Match) -> Self {
        let routed_path = if self.routed_path == "/" {
            format!("/{}", m.routed)
        } else {
            format!("{}/{}", self.routed_path, m.routed)
        };

        Self {
            url: self.url.clone(),
            path: format!("/{}", m.unrouted),
            routed_path,
            params: self.params.merged(&m.params),
            query: self.query.clone(),
            conn: self.conn,
        }
    }
}

/// Conversion from whatever the caller holds into a routing [`Context`].
///
/// Implemented for [`ConnInfo`] (derives a new context) and for [`Context`]
/// itself (returned unchanged), which lets nested routers share the context
/// their parent produced.
pub trait IntoContext {
    fn into_context(self, req: &Request) -> Result<Context, url::ParseError>;
}

impl IntoContext for ConnInfo {
    fn into_context(self, req: &Request) -> Result<Context, url::ParseError> {
        Context::derive(req, self)
    }
}

impl IntoContext for Context {
    fn into_context(self, _req: &Request) -> Result<Context, url::ParseError> {
        Ok(self)
    }
}

/// Resolve the request target into an absolute URL.
fn request_url(req: &Request) -> Result<Url, url::ParseError> {
    let uri = req.uri();
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    let scheme = uri.scheme_str().unwrap_or("http");
    let host = uri
        .authority()
        .map(|a| a.as_str().to_string())
        .or_else(|| {
            req.headers()
                .get(axum::http::header::HOST)
                .and_then(|h| h.to_str().ok())
                .map(str::to_string)
        });

    if let Some(host) = host {
        if let Ok(url) = Url::parse(&format!("{scheme}://{host}{target}")) {
            return Ok(url);
        }
        tracing::trace!(host = %host, "Unusable host for request url, falling back to localhost");
    }

    Url::parse(&format!("{scheme}://localhost{target}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn() -> ConnInfo {
        ConnInfo::new(
            "127.0.0.1:8000".parse().unwrap(),
            "127.0.0.1:8001".parse().unwrap(),
        )
    }

    fn request(uri: &str) -> Request {
        Request::from(
            axum::http::Request::builder()
                .uri(uri)
                .body(axum::body::Body::empty())
                .unwrap(),
        )
    }

    #[test]
    fn test_trailing_slash_infers_index() {
        let ctx = Context::derive(&request("/a/"), conn()).unwrap();
        assert_eq!(ctx.path(), "/a/index");

        let ctx = Context::derive(&request("/"), conn()).unwrap();
        assert_eq!(ctx.path(), "/index");

        let ctx = Context::derive(&request("/a"), conn()).unwrap();
        assert_eq!(ctx.path(), "/a");
    }

    #[test]
    fn test_fresh_context_defaults() {
        let ctx = Context::derive(&request("/a/b?x=1&x=2"), conn()).unwrap();
        assert_eq!(ctx.routed_path(), "");
        assert!(ctx.params().is_empty());
        assert_eq!(
            ctx.query().get("x"),
            Some(&QueryValue::Many(vec!["1".into(), "2".into()]))
        );
        assert_eq!(ctx.remote_addr().port(), 8001);
    }

    #[test]
    fn test_url_uses_host_header() {
        let req = Request::from(
            axum::http::Request::builder()
                .uri("/docs?page=2")
                .header("host", "example.com:8080")
                .body(axum::body::Body::empty())
                .unwrap(),
        );
        let ctx = Context::derive(&req, conn()).unwrap();
        assert_eq!(ctx.url().as_str(), "http://example.com:8080/docs?page=2");
    }

    #[test]
    fn test_url_without_host_falls_back_to_localhost() {
        let ctx = Context::derive(&request("/x"), conn()).unwrap();
        assert_eq!(ctx.url().host_str(), Some("localhost"));
    }

    #[test]
    fn test_path_keeps_percent_encoding() {
        let ctx = Context::derive(&request("/hello%20world"), conn()).unwrap();
        assert_eq!(ctx.path(), "/hello%20world");
    }

    #[test]
    fn test_existing_context_is_reused() {
        let req = request("/a/b");
        let ctx = Context::derive(&req, conn()).unwrap();
        let advanced = ctx.advance(&Match {
            params: Params::new(),
            routed: "a".into(),
            unrouted: "b".into(),
        });

        let reused = advanced.clone().into_context(&req).unwrap();
        assert_eq!(reused.path(), "/b");
        assert_eq!(reused.routed_path(), "/a");
    }

    #[test]
    fn test_advance_from_root_routed_path() {
        let req = request("/x/y");
        let ctx = Context::derive(&req, conn()).unwrap();

        // A root wildcard consumes nothing: routed path becomes "/"
        let root = ctx.advance(&Match {
            params: Params::new(),
            routed: String::new(),
            unrouted: "x/y".into(),
        });
        assert_eq!(root.routed_path(), "/");
        assert_eq!(root.path(), "/x/y");

        let nested = root.advance(&Match {
            params: Params::new(),
            routed: "x".into(),
            unrouted: "y".into(),
        });
        assert_eq!(nested.routed_path(), "/x");
        assert_eq!(nested.path(), "/y");
    }
}
