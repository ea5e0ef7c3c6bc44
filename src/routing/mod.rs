//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     RouteTable (pattern → handler chain | nested table | disabled)
//!     → pattern.rs (validate, split into segments)
//!     → precedence.rs (stable sort, most specific first)
//!     → Freeze as immutable Router
//!
//! Incoming Request (unrouted path in Context):
//!     → router.rs (walk routes in precedence order)
//!     → matcher.rs (segment match, params, routed/unrouted split)
//!     → handler chain, nested routers recurse with the advanced Context
//!     → Return: Handled(response) or Declined
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (segment comparison only)
//! - Deterministic: same input always matches same route
//! - First handled response wins (ordered by precedence)

pub mod handler;
pub mod matcher;
pub mod pattern;
pub mod precedence;
pub mod router;
pub mod table;

pub use handler::{BoxError, Declined, Handler, HandlerError, HandlerResult, Outcome, Routable};
pub use matcher::{Match, PathSegments};
pub use pattern::{Pattern, PatternError, Segment};
pub use router::{Route, Router};
pub use table::{Endpoint, RouteTable};
