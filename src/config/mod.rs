//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, every pattern compiled)
//!     → ServerConfig (validated, immutable)
//!     → RouteTableConfig::build → root Router
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Route table key order is preserved from the file

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AssetsConfig, LeafSpec, ListenerConfig, LogFormat, ObservabilityConfig, RouteSpec,
    RouteTableConfig, ServerConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
