//! Declarative route tables.
//!
//! A `RouteTable` is the uncompiled shape of a router: an ordered list of
//! pattern keys, each mapped to a handler chain, a nested table, or nothing
//! (a disabled entry). `Router::new` compiles it.

use crate::routing::{Handler, Routable, Router};

/// What a table key maps to.
#[derive(Debug, Clone)]
pub enum Endpoint {
    /// Handlers tried in order until one does not decline.
    Chain(Vec<Routable>),
    /// A nested table, compiled into its own router.
    Table(RouteTable),
}

/// An ordered mapping from pattern keys to endpoints.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<(String, Option<Endpoint>)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `pattern` to a single handler.
    pub fn handle(self, pattern: impl Into<String>, handler: impl Handler) -> Self {
        self.chain(pattern, [Routable::handler(handler)])
    }

    /// Route `pattern` to a chain of handlers tried in order.
    pub fn chain(
        self,
        pattern: impl Into<String>,
        chain: impl IntoIterator<Item = Routable>,
    ) -> Self {
        self.insert(pattern, Some(Endpoint::Chain(chain.into_iter().collect())))
    }

    /// Route `pattern` to a nested table.
    pub fn nest(self, pattern: impl Into<String>, table: RouteTable) -> Self {
        self.insert(pattern, Some(Endpoint::Table(table)))
    }

    /// Route `pattern` to an already compiled router.
    pub fn mount(self, pattern: impl Into<String>, router: Router) -> Self {
        self.chain(pattern, [Routable::from(router)])
    }

    /// Declare `pattern` without a handler. Disabled keys are skipped.
    pub fn disable(self, pattern: impl Into<String>) -> Self {
        self.insert(pattern, None)
    }

    pub fn insert(mut self, pattern: impl Into<String>, endpoint: Option<Endpoint>) -> Self {
        self.entries.push((pattern.into(), endpoint));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_entries(self) -> Vec<(String, Option<Endpoint>)> {
        self.entries
    }
}
