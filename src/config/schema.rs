//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.
//!
//! Route tables are TOML tables whose keys are patterns. Key order is
//! preserved, so declaration order survives into precedence tie-breaks:
//!
//! ```toml
//! [routes]
//! "" = { text = "home" }
//! "api/*" = { routes = { "users/:id" = "context" } }
//! "static/*" = { assets = { dir = "public" } }
//! "old" = [{ redirect = "/new" }]
//! "beta" = "disabled"
//! ```

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

use crate::assets::Assets;
use crate::handlers;
use crate::routing::{Endpoint, PatternError, Routable, RouteTable, Router};

/// Root configuration for the server.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// The root routing table.
    pub routes: RouteTableConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level or filter directive (trace, debug, info, warn, error).
    pub log_level: String,

    /// Pretty output for development, JSON for log aggregation.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Static asset directory settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AssetsConfig {
    pub dir: PathBuf,

    /// Serve `.ts` files instead of hiding them.
    #[serde(default)]
    pub serve_ts: bool,
}

/// One handler in a configured route.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum LeafSpec {
    /// Fixed `text/plain` response.
    Text(String),
    /// `302` to a fixed location.
    Redirect(String),
    /// Files under a directory.
    Assets(AssetsConfig),
    /// A nested routing table.
    Routes(RouteTableConfig),
    /// JSON dump of the routing context.
    Context,
    /// No handler; the route is skipped.
    Disabled,
}

impl LeafSpec {
    /// The handler for this leaf. `None` for a disabled leaf.
    fn routable(&self) -> Result<Option<Routable>, PatternError> {
        let routable = match self {
            LeafSpec::Text(body) => Routable::handler(handlers::text(body.clone())),
            LeafSpec::Redirect(location) => Routable::handler(handlers::redirect(location.clone())),
            LeafSpec::Assets(assets) => {
                Routable::handler(Assets::new(assets.dir.clone()).serve_ts(assets.serve_ts))
            }
            LeafSpec::Routes(table) => Routable::from(table.build()?),
            LeafSpec::Context => Routable::handler(handlers::context_json()),
            LeafSpec::Disabled => return Ok(None),
        };
        Ok(Some(routable))
    }
}

/// The value of a route key: one leaf or a chain of leaves.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum RouteSpec {
    Chain(Vec<LeafSpec>),
    Single(LeafSpec),
}

impl RouteSpec {
    /// True when no enabled handler remains.
    pub fn is_disabled(&self) -> bool {
        match self {
            RouteSpec::Single(leaf) => *leaf == LeafSpec::Disabled,
            RouteSpec::Chain(leaves) => leaves.iter().all(|l| *l == LeafSpec::Disabled),
        }
    }

    /// Nested tables declared under this route.
    pub fn nested(&self) -> impl Iterator<Item = &RouteTableConfig> {
        let leaves: &[LeafSpec] = match self {
            RouteSpec::Single(leaf) => std::slice::from_ref(leaf),
            RouteSpec::Chain(leaves) => leaves,
        };
        leaves.iter().filter_map(|leaf| match leaf {
            LeafSpec::Routes(table) => Some(table),
            _ => None,
        })
    }

    fn endpoint(&self) -> Result<Option<Endpoint>, PatternError> {
        if self.is_disabled() {
            return Ok(None);
        }
        let endpoint = match self {
            RouteSpec::Single(LeafSpec::Routes(table)) => Endpoint::Table(table.to_table()?),
            RouteSpec::Single(leaf) => Endpoint::Chain(leaf.routable()?.into_iter().collect()),
            RouteSpec::Chain(leaves) => {
                let mut chain = Vec::with_capacity(leaves.len());
                for leaf in leaves {
                    chain.extend(leaf.routable()?);
                }
                Endpoint::Chain(chain)
            }
        };
        Ok(Some(endpoint))
    }
}

/// An ordered routing table read from configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteTableConfig {
    entries: Vec<(String, RouteSpec)>,
}

impl RouteTableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, pattern: impl Into<String>, spec: RouteSpec) -> Self {
        self.entries.push((pattern.into(), spec));
        self
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[(String, RouteSpec)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert to a `RouteTable`, building the configured handlers.
    pub fn to_table(&self) -> Result<RouteTable, PatternError> {
        let mut table = RouteTable::new();
        for (pattern, spec) in &self.entries {
            table = table.insert(pattern.clone(), spec.endpoint()?);
        }
        Ok(table)
    }

    /// Compile into a `Router`.
    pub fn build(&self) -> Result<Router, PatternError> {
        Router::new(self.to_table()?)
    }
}

impl<'de> Deserialize<'de> for RouteTableConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = RouteTableConfig;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of route patterns")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, RouteSpec>()? {
                    entries.push(entry);
                }
                Ok(RouteTableConfig { entries })
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

impl Serialize for RouteTableConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (pattern, spec) in &self.entries {
            map.serialize_entry(pattern, spec)?;
        }
        map.end()
    }
}
