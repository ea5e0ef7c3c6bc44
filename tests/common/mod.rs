//! Shared utilities for integration tests.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::Method;
use nested_router::http::response::{self, Response};
use nested_router::{ConnInfo, Context, HandlerResult, Outcome, Request, RouteTable, Router};

/// Connection info used by every in-process dispatch.
pub fn conn_info() -> ConnInfo {
    ConnInfo::new(
        "127.0.0.1:8000".parse().unwrap(),
        "127.0.0.1:8001".parse().unwrap(),
    )
}

/// A `GET` for `uri` with an empty body.
pub fn get(uri: &str) -> Request {
    request(Method::GET, uri, Body::empty())
}

/// A `POST` for `uri` carrying `body`.
pub fn post(uri: &str, body: &'static str) -> Request {
    request(Method::POST, uri, Body::from(body))
}

pub fn request(method: Method, uri: &str, body: Body) -> Request {
    Request::from(
        axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .body(body)
            .unwrap(),
    )
}

pub fn router(table: RouteTable) -> Router {
    Router::new(table).unwrap()
}

/// Dispatch a fresh request and return the response body, or `None` when
/// every route declined.
pub async fn dispatch_text(router: &Router, req: Request) -> Option<String> {
    match router.dispatch(req, conn_info()).await.unwrap() {
        Outcome::Handled(res) => Some(body_text(res).await),
        Outcome::Declined(_) => None,
    }
}

pub async fn body_text(res: Response) -> String {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Handler that always answers `body`.
pub fn reply(body: &'static str) -> impl Fn(Request, Context) -> std::future::Ready<HandlerResult> + Clone {
    move |_, _| std::future::ready(response::respond(response::text(body)))
}

/// Handler that always declines.
pub fn refuse(_: Request, _: Context) -> std::future::Ready<HandlerResult> {
    std::future::ready(response::decline())
}
