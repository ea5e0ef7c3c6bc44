//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Routers and the HTTP server produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows from the server into every dispatch log line
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
