//! Nested request router.
//!
//! Routes HTTP requests through trees of routers keyed by path patterns.
//! Each router consumes part of the path and hands the rest, together with
//! captured params, to its handlers; handlers may decline so routing falls
//! through to the next candidate.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (axum, request ID, timeout, trace)
//!                          │
//!                          ▼
//!                     context (url, unrouted path, params, query, conn)
//!                          │
//!                          ▼
//!                     routing::Router ──▶ handler chain ──▶ Handled / Declined
//!                          │                   │
//!                          │                   └─▶ nested Router (recurses)
//!                          ▼
//!     Client Response ◀── 404 on decline, 500 on error
//!
//!     Cross-cutting: config (TOML route tables), observability, lifecycle
//! ```

// Core subsystems
pub mod context;
pub mod http;
pub mod routing;

// Handlers
pub mod assets;
pub mod handlers;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::ServerConfig;
pub use context::{ConnInfo, Context, IntoContext};
pub use http::{HttpServer, Request, Response};
pub use lifecycle::Shutdown;
pub use routing::{Handler, HandlerError, HandlerResult, Outcome, Routable, RouteTable, Router};
