//! Startup orchestration.
//!
//! # Responsibilities
//! - Compile the configured routing table
//! - Initialize metrics when enabled
//! - Bind the listener and serve until a stop signal
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Routes compile before the listener binds (traffic only when ready)

use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals;
use crate::observability::metrics;
use crate::routing::PatternError;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid route table: {0}")]
    Routes(#[from] PatternError),

    #[error("invalid metrics address {0:?}")]
    MetricsAddress(String),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the router, bind, and serve until SIGINT/SIGTERM.
pub async fn run(config: ServerConfig) -> Result<(), StartupError> {
    let router = config.routes.build()?;
    tracing::info!(routes = router.len(), "Route table compiled");

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        request_timeout_secs = config.timeouts.request_secs,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config, router);
    let serving = server.run(listener, shutdown.subscribe());
    tokio::pin!(serving);

    let finished = tokio::select! {
        result = &mut serving => Some(result),
        _ = signals::forward_signals(&shutdown) => None,
    };
    match finished {
        Some(result) => result?,
        // Signal forwarded: let the server drain in-flight requests
        None => serving.await?,
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
