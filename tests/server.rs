//! Hosting server tests: outcome mapping, request IDs, and a real socket.

use axum::body::Body;
use axum::http::{Request as HttpRequest, StatusCode};
use nested_router::config::ServerConfig;
use nested_router::handlers;
use nested_router::routing::HandlerError;
use nested_router::{Context, HttpServer, Outcome, Request, RouteTable, Shutdown};
use tokio::net::TcpListener;
use tower::ServiceExt;

mod common;
use common::{body_text, reply, router};

fn server() -> HttpServer {
    let table = RouteTable::new()
        .handle("hello", reply("hi"))
        .handle("boom", |_: Request, _: Context| async move {
            Err::<Outcome, _>(HandlerError::other("exploded"))
        })
        .handle("debug/*", handlers::context_json());
    HttpServer::new(&ServerConfig::default(), router(table))
}

fn get(uri: &str) -> HttpRequest<Body> {
    HttpRequest::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_handled_request_returns_response() {
    let res = server().app().oneshot(get("/hello")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_text(res).await, "hi");
}

#[tokio::test]
async fn test_declined_request_is_not_found() {
    let res = server().app().oneshot(get("/missing")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_handler_error_is_internal_error() {
    let res = server().app().oneshot(get("/boom")).await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_request_id_generated_and_propagated() {
    let res = server().app().oneshot(get("/hello")).await.unwrap();
    let id = res.headers()["x-request-id"].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());

    let req = HttpRequest::builder()
        .uri("/missing")
        .header("x-request-id", "abc-123")
        .body(Body::empty())
        .unwrap();
    let res = server().app().oneshot(req).await.unwrap();
    assert_eq!(res.headers()["x-request-id"], "abc-123");
}

#[tokio::test]
async fn test_serves_over_tcp_until_shutdown() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let handle = tokio::spawn(server().run(listener, shutdown.subscribe()));

    let client = reqwest::Client::new();
    let res = client
        .get(format!("http://{addr}/debug/a/b?x=1"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["routed_path"], "/debug");
    assert_eq!(body["path"], "/a/b");
    assert_eq!(body["query"]["x"], "1");
    assert_eq!(body["conn"]["local_addr"], addr.to_string());
    assert!(body["conn"]["remote_addr"]
        .as_str()
        .unwrap()
        .starts_with("127.0.0.1:"));

    let res = client
        .get(format!("http://{addr}/missing"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::NOT_FOUND);

    shutdown.trigger();
    handle.await.unwrap().unwrap();
}
