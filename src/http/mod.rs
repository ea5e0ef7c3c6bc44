//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, timeout, trace)
//!     → request.rs (shared request, single-use body)
//!     → [routing layer dispatches through nested routers]
//!     → response.rs (handler response, or 404/500 on decline/error)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{BodyError, Request, UuidRequestId, X_REQUEST_ID};
pub use response::Response;
pub use server::HttpServer;
