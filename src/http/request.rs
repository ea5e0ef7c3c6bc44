//! Request handling.
//!
//! # Responsibilities
//! - Share one incoming request between every handler a dispatch tries
//! - Track whether the body has been consumed (decides fallthrough)
//! - Generate and propagate request IDs
//!
//! # Design Decisions
//! - Request head is immutable and shared via `Arc`; clones are cheap
//! - The body can be taken exactly once

use axum::body::{Body, Bytes};
use axum::http::{request::Parts, HeaderMap, Method, Uri, Version};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Errors raised while reading a request body.
#[derive(Debug, Error)]
pub enum BodyError {
    #[error("request body already consumed")]
    AlreadyUsed,

    #[error("failed to read request body: {0}")]
    Read(#[from] axum::Error),

    #[error("request body is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug)]
struct Inner {
    head: Parts,
    body: Mutex<Option<Body>>,
}

/// An incoming request as seen by routers and handlers.
#[derive(Debug, Clone)]
pub struct Request {
    inner: Arc<Inner>,
}

impl Request {
    pub fn method(&self) -> &Method {
        &self.inner.head.method
    }

    pub fn uri(&self) -> &Uri {
        &self.inner.head.uri
    }

    pub fn version(&self) -> Version {
        self.inner.head.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.inner.head.headers
    }

    /// The request ID assigned by the hosting server, if any.
    pub fn request_id(&self) -> Option<&str> {
        self.headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
    }

    /// True once any handler has taken the body.
    pub fn body_used(&self) -> bool {
        self.slot().is_none()
    }

    /// Take the body stream. Later handlers will see `body_used() == true`.
    pub fn take_body(&self) -> Result<Body, BodyError> {
        self.slot().take().ok_or(BodyError::AlreadyUsed)
    }

    /// Consume the body and collect it.
    pub async fn bytes(&self) -> Result<Bytes, BodyError> {
        let body = self.take_body()?;
        Ok(axum::body::to_bytes(body, usize::MAX).await?)
    }

    /// Consume the body as UTF-8 text.
    pub async fn text(&self) -> Result<String, BodyError> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Body>> {
        self.inner
            .body
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<axum::http::Request<Body>> for Request {
    fn from(req: axum::http::Request<Body>) -> Self {
        let (head, body) = req.into_parts();
        Self {
            inner: Arc::new(Inner {
                head,
                body: Mutex::new(Some(body)),
            }),
        }
    }
}

/// Generates UUID v4 request IDs for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        id.parse().ok().map(RequestId::new)
    }
}
