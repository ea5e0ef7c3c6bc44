//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum app that hands every request to the root router
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener and drain on shutdown
//! - Map unresolved dispatches to transport responses (404/500)
//! - Observability (metrics, correlation IDs)

use axum::{
    extract::{ConnectInfo, State},
    response::Response,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::context::ConnInfo;
use crate::http::request::{Request, UuidRequestId};
use crate::http::response::{internal_error, not_found};
use crate::observability::metrics;
use crate::routing::{Outcome, Router};

/// Application state injected into the dispatch handler.
#[derive(Clone)]
struct AppState {
    router: Arc<Router>,
    local_addr: SocketAddr,
}

/// HTTP server hosting a root router.
pub struct HttpServer {
    router: Arc<Router>,
    request_timeout: Duration,
}

impl HttpServer {
    /// Create a new HTTP server for `router` with the given configuration.
    pub fn new(config: &ServerConfig, router: Router) -> Self {
        Self {
            router: Arc::new(router),
            request_timeout: Duration::from_secs(config.timeouts.request_secs),
        }
    }

    /// The Axum app without a bound listener. Connection addresses fall back
    /// to the unspecified address.
    pub fn app(&self) -> axum::Router {
        self.build_app(SocketAddr::from(([0, 0, 0, 0], 0)))
    }

    /// Build the Axum app with all middleware layers.
    #[allow(deprecated)]
    fn build_app(&self, local_addr: SocketAddr) -> axum::Router {
        let state = AppState {
            router: self.router.clone(),
            local_addr,
        };

        axum::Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(self.request_timeout))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.router.len(),
            "HTTP server starting"
        );

        let app = self
            .build_app(addr)
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Draining in-flight requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn router(&self) -> &Router {
        &self.router
    }
}

/// Hands the request to the root router and resolves the outcome.
async fn dispatch_handler(
    State(state): State<AppState>,
    request: axum::extract::Request,
) -> Response {
    let start_time = Instant::now();
    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr)
        .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 0)));

    let req = Request::from(request);
    let request_id = req.request_id().unwrap_or("unknown").to_string();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        remote_addr = %remote_addr,
        "Dispatching request"
    );

    let conn = ConnInfo::new(state.local_addr, remote_addr);
    let response = match state.router.dispatch(req, conn).await {
        Ok(Outcome::Handled(response)) => response,
        Ok(Outcome::Declined(declined)) => {
            tracing::debug!(
                request_id = %request_id,
                path = %path,
                unrouted = %declined.path(),
                "No route handled request"
            );
            not_found()
        }
        Err(error) => {
            tracing::error!(
                request_id = %request_id,
                path = %path,
                error = %error,
                "Handler failed"
            );
            internal_error()
        }
    };

    metrics::record_dispatch(method.as_str(), response.status().as_u16(), start_time);
    response
}
