//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Compile a `RouteTable` into precedence-ordered routes
//! - Match the unrouted path against each route in order
//! - Run handler chains with not-found fallthrough
//! - Expose branches and nested routers for programmatic access
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan over routes in precedence order; first handled response wins
//! - A decline after the body was consumed is terminal: no later handler
//!   could read the request again

use futures_util::future::{BoxFuture, FutureExt};
use std::borrow::Cow;

use crate::context::{Context, IntoContext};
use crate::http::Request;
use crate::routing::precedence::sort_by_precedence;
use crate::routing::{
    Declined, Endpoint, Handler, HandlerResult, Outcome, PathSegments, Pattern, PatternError,
    Routable, RouteTable,
};

/// A compiled pattern with its handler chain.
#[derive(Debug, Clone)]
pub struct Route {
    pattern: Pattern,
    chain: Vec<Routable>,
}

impl Route {
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn chain(&self) -> &[Routable] {
        &self.chain
    }
}

/// Routes requests between handlers based on the request path.
#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<Route>,
    declared: Vec<String>,
}

impl Router {
    /// Compile `table`, including every nested table, in one pass.
    ///
    /// Fails on the first malformed pattern; nothing is routed until the
    /// whole table compiles.
    pub fn new(table: RouteTable) -> Result<Self, PatternError> {
        let mut routes = Vec::with_capacity(table.len());
        let mut declared = Vec::with_capacity(table.len());

        for (key, endpoint) in table.into_entries() {
            let Some(endpoint) = endpoint else {
                tracing::trace!(pattern = %key, "Skipping disabled route");
                continue;
            };
            let pattern = Pattern::parse(&key)?;
            let chain = match endpoint {
                Endpoint::Chain(chain) => chain,
                Endpoint::Table(nested) => vec![Routable::from(Router::new(nested)?)],
            };
            declared.push(key);
            routes.push(Route { pattern, chain });
        }

        sort_by_precedence(&mut routes, |r| &r.pattern);

        Ok(Self { routes, declared })
    }

    /// Route a request arriving from the transport or from a parent.
    ///
    /// `conn` is either the connection info of a fresh request or the
    /// context an enclosing router already produced.
    pub async fn dispatch<C: IntoContext>(&self, req: Request, conn: C) -> HandlerResult {
        let ctx = conn.into_context(&req)?;
        self.route(req, ctx).await
    }

    /// Try each route in precedence order against `ctx.path()`.
    pub async fn route(&self, req: Request, ctx: Context) -> HandlerResult {
        let path = PathSegments::parse(ctx.path());

        for route in &self.routes {
            let Some(m) = route.pattern.match_segments(&path) else {
                continue;
            };
            let next = ctx.advance(&m);
            tracing::debug!(
                pattern = %route.pattern,
                routed = %next.routed_path(),
                unrouted = %next.path(),
                "Route matched"
            );

            for handler in &route.chain {
                match handler.call(req.clone(), next.clone()).await? {
                    Outcome::Handled(response) => return Ok(Outcome::Handled(response)),
                    Outcome::Declined(declined) if req.body_used() => {
                        tracing::debug!(
                            pattern = %route.pattern,
                            handler = %handler.name(),
                            "Declined after consuming body, not falling through"
                        );
                        return Ok(Outcome::Declined(declined));
                    }
                    Outcome::Declined(_) => {
                        tracing::trace!(
                            pattern = %route.pattern,
                            handler = %handler.name(),
                            "Handler declined, falling through"
                        );
                    }
                }
            }
        }

        tracing::trace!(path = %ctx.path(), "No route handled request");
        Ok(Outcome::Declined(Declined::at(ctx.path())))
    }

    /// Handlers for the first route declared with exactly `pattern`.
    pub fn branch(&self, pattern: &str) -> Option<&[Routable]> {
        self.routes
            .iter()
            .find(|r| r.pattern.source() == pattern)
            .map(|r| r.chain.as_slice())
    }

    /// The router mounted at `pattern`, if the branch is a nested router.
    pub fn nested(&self, pattern: &str) -> Option<&Router> {
        self.branch(pattern)?.iter().find_map(Routable::as_router)
    }

    /// Compiled routes in the order they are tried.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Patterns in the order they are tried.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|r| r.pattern.source())
    }

    /// Enabled patterns in the order they were declared.
    pub fn declared(&self) -> &[String] {
        &self.declared
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl TryFrom<RouteTable> for Router {
    type Error = PatternError;

    fn try_from(table: RouteTable) -> Result<Self, Self::Error> {
        Router::new(table)
    }
}

impl Handler for Router {
    fn call<'a>(&'a self, req: Request, ctx: Context) -> BoxFuture<'a, HandlerResult> {
        self.route(req, ctx).boxed()
    }

    fn name(&self) -> Cow<'static, str> {
        "router".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response::{decline, respond, text};

    fn ok(_: Request, _: Context) -> futures_util::future::Ready<HandlerResult> {
        futures_util::future::ready(respond(text("ok")))
    }

    #[test]
    fn test_routes_sorted_by_precedence() {
        let router = Router::new(
            RouteTable::new()
                .handle("*", ok)
                .handle(":a", ok)
                .handle("b", ok),
        )
        .unwrap();
        assert_eq!(router.patterns().collect::<Vec<_>>(), vec!["b", ":a", "*"]);
        assert_eq!(router.declared(), &["*", ":a", "b"]);
    }

    #[test]
    fn test_disabled_routes_skipped() {
        let router = Router::new(RouteTable::new().disable("gone").handle("kept", ok)).unwrap();
        assert_eq!(router.len(), 1);
        assert!(router.branch("gone").is_none());
        assert!(router.branch("kept").is_some());
    }

    #[test]
    fn test_disabled_patterns_are_not_validated() {
        assert!(Router::new(RouteTable::new().disable("a//b")).is_ok());

        let err = Router::new(RouteTable::new().handle("a//b", ok)).unwrap_err();
        assert_eq!(err, PatternError::EmptySegment("a//b".into()));
    }

    #[test]
    fn test_nested_table_errors_surface() {
        let err = Router::new(
            RouteTable::new().nest("api/*", RouteTable::new().handle("a/*/", ok)),
        )
        .unwrap_err();
        assert_eq!(err.pattern(), "a/*/");
    }

    #[test]
    fn test_nested_router_accessible() {
        let router = Router::new(
            RouteTable::new().nest("api/*", RouteTable::new().handle("users", ok)),
        )
        .unwrap();
        let api = router.nested("api/*").unwrap();
        assert_eq!(api.patterns().collect::<Vec<_>>(), vec!["users"]);
        assert!(router.nested("missing").is_none());
    }

    #[tokio::test]
    async fn test_empty_router_declines_with_path() {
        let router = Router::new(RouteTable::new()).unwrap();
        let req = Request::from(
            axum::http::Request::builder()
                .uri("/nothing/here")
                .body(axum::body::Body::empty())
                .unwrap(),
        );
        let conn = crate::context::ConnInfo::new(
            "127.0.0.1:80".parse().unwrap(),
            "127.0.0.1:9000".parse().unwrap(),
        );
        match router.dispatch(req, conn).await.unwrap() {
            Outcome::Declined(d) => assert_eq!(d.path(), "/nothing/here"),
            Outcome::Handled(_) => panic!("expected decline"),
        }
    }

    #[tokio::test]
    async fn test_chain_falls_through_declines() {
        let router = Router::new(RouteTable::new().chain(
            "a",
            [
                Routable::handler(|_: Request, _: Context| async move { decline() }),
                Routable::handler(ok),
            ],
        ))
        .unwrap();
        let req = Request::from(
            axum::http::Request::builder()
                .uri("/a")
                .body(axum::body::Body::empty())
                .unwrap(),
        );
        let conn = crate::context::ConnInfo::new(
            "127.0.0.1:80".parse().unwrap(),
            "127.0.0.1:9000".parse().unwrap(),
        );
        assert!(router.dispatch(req, conn).await.unwrap().is_handled());
    }
}
