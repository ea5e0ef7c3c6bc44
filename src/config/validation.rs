//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Compile every route pattern at every nesting level
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::{RouteTableConfig, ServerConfig};
use crate::routing::{Pattern, PatternError};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    InvalidBindAddress(String),

    #[error("observability.metrics_address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("observability.log_level {0:?} is not a valid filter directive")]
    InvalidLogLevel(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("invalid pattern in {scope}: {error}")]
    InvalidPattern { scope: String, error: PatternError },
}

/// Check a parsed configuration. Every problem found is reported.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if EnvFilter::try_new(&observability.log_level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            observability.log_level.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    validate_routes(&config.routes, "routes", &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_routes(table: &RouteTableConfig, scope: &str, errors: &mut Vec<ValidationError>) {
    for (pattern, spec) in table.entries() {
        if spec.is_disabled() {
            continue;
        }
        if let Err(error) = Pattern::parse(pattern) {
            errors.push(ValidationError::InvalidPattern {
                scope: scope.to_string(),
                error,
            });
        }
        for nested in spec.nested() {
            validate_routes(nested, &format!("{scope}.{pattern:?}"), errors);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{LeafSpec, RouteSpec};

    fn text(body: &str) -> RouteSpec {
        RouteSpec::Single(LeafSpec::Text(body.into()))
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&ServerConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.timeouts.request_secs = 0;
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "bad".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidBindAddress("nowhere".into()),
                ValidationError::InvalidMetricsAddress("bad".into()),
                ValidationError::ZeroTimeout,
            ]
        );
    }

    #[test]
    fn test_metrics_address_ignored_when_disabled() {
        let mut config = ServerConfig::default();
        config.observability.metrics_address = "bad".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_nested_patterns_checked_with_scope() {
        let mut config = ServerConfig::default();
        config.routes = RouteTableConfig::new()
            .insert("../x", text("root"))
            .insert(
                "api/*",
                RouteSpec::Single(LeafSpec::Routes(
                    RouteTableConfig::new()
                        .insert("a/*/", text("bad"))
                        .insert("ok", text("ok")),
                )),
            )
            .insert("off//", RouteSpec::Single(LeafSpec::Disabled));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidPattern {
                    scope: "routes".into(),
                    error: PatternError::DotSegment("../x".into()),
                },
                ValidationError::InvalidPattern {
                    scope: "routes.\"api/*\"".into(),
                    error: PatternError::WildcardNotLast("a/*/".into()),
                },
            ]
        );
    }
}
