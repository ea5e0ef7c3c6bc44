//! Handler contract shared by leaf handlers and nested routers.
//!
//! # Design Decisions
//! - Declining is a value (`Outcome::Declined`), not an error: fallthrough
//!   is a `match`, and only real failures travel in `Err`
//! - `Routable` is the tagged union stored in handler chains, so a branch
//!   can hand back its nested `Router` for programmatic access

use futures_util::future::{BoxFuture, FutureExt};
use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

use crate::context::Context;
use crate::http::{BodyError, Request, Response};
use crate::routing::Router;

/// Boxed error for handler-specific failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// What a handler returns.
pub type HandlerResult = Result<Outcome, HandlerError>;

/// The non-error result of a handler.
#[derive(Debug)]
pub enum Outcome {
    /// The handler produced a response; dispatch stops.
    Handled(Response),
    /// The handler does not want this request.
    Declined(Declined),
}

impl Outcome {
    /// A decline without a specific path.
    pub fn decline() -> Self {
        Outcome::Declined(Declined::default())
    }

    pub fn is_handled(&self) -> bool {
        matches!(self, Outcome::Handled(_))
    }

    /// The response, if the request was handled.
    pub fn into_response(self) -> Option<Response> {
        match self {
            Outcome::Handled(response) => Some(response),
            Outcome::Declined(_) => None,
        }
    }
}

impl From<Response> for Outcome {
    fn from(response: Response) -> Self {
        Outcome::Handled(response)
    }
}

/// The not-found signal. Carries the unrouted path when raised by a router.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declined {
    path: String,
}

impl Declined {
    pub fn at(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for Declined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str("not found")
        } else {
            write!(f, "not found: {}", self.path)
        }
    }
}

/// Failures that abort a dispatch. Never treated as a decline.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Body(#[from] BodyError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] axum::http::Error),

    #[error("{0}")]
    Other(BoxError),
}

impl HandlerError {
    /// Wrap any error raised by application code.
    pub fn other(error: impl Into<BoxError>) -> Self {
        HandlerError::Other(error.into())
    }
}

/// Anything that can respond to a routed request.
///
/// Implemented for async closures taking `(Request, Context)`:
///
/// ```
/// use nested_router::{http::response, Context, Request, RouteTable, Router};
///
/// let router = Router::new(RouteTable::new().handle(
///     "hello/:name",
///     |_req: Request, ctx: Context| async move {
///         let name = ctx.param("name").unwrap_or("stranger").to_string();
///         response::respond(response::text(format!("hello {name}")))
///     },
/// ))
/// .unwrap();
/// assert_eq!(router.patterns().collect::<Vec<_>>(), vec!["hello/:name"]);
/// ```
pub trait Handler: Send + Sync + 'static {
    fn call<'a>(&'a self, req: Request, ctx: Context) -> BoxFuture<'a, HandlerResult>;

    /// Human-readable name used in logs and route listings.
    fn name(&self) -> Cow<'static, str> {
        std::any::type_name::<Self>().into()
    }
}

impl<F, Fut> Handler for F
where
    F: Fn(Request, Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call<'a>(&'a self, req: Request, ctx: Context) -> BoxFuture<'a, HandlerResult> {
        (self)(req, ctx).boxed()
    }
}

/// An entry of a handler chain: a plain handler or a nested router.
#[derive(Clone)]
pub enum Routable {
    Handler(Arc<dyn Handler>),
    Router(Arc<Router>),
}

impl Routable {
    pub fn handler(handler: impl Handler) -> Self {
        Routable::Handler(Arc::new(handler))
    }

    /// The nested router, when this entry is one.
    pub fn as_router(&self) -> Option<&Router> {
        match self {
            Routable::Router(router) => Some(&**router),
            Routable::Handler(_) => None,
        }
    }

    pub fn call<'a>(&'a self, req: Request, ctx: Context) -> BoxFuture<'a, HandlerResult> {
        match self {
            Routable::Handler(handler) => handler.call(req, ctx),
            Routable::Router(router) => router.route(req, ctx).boxed(),
        }
    }

    pub fn name(&self) -> Cow<'static, str> {
        match self {
            Routable::Handler(handler) => handler.name(),
            Routable::Router(_) => "router".into(),
        }
    }
}

impl From<Router> for Routable {
    fn from(router: Router) -> Self {
        Routable::Router(Arc::new(router))
    }
}

impl fmt::Debug for Routable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Routable::Handler(handler) => f.debug_tuple("Handler").field(&handler.name()).finish(),
            Routable::Router(router) => f.debug_tuple("Router").field(router).finish(),
        }
    }
}
