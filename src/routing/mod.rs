//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Registration (at startup):
//!     (method, pattern, handler)
//!     → path.rs (grammar check)
//!     → router.rs (select the method's tree)
//!     → tree.rs (insert, split nodes, detect conflicts)
//!     → Freeze as immutable Router
//!
//! Incoming Request (method, path)
//!     → router.rs (select the method's tree)
//!     → tree.rs (walk, capture params)
//!     → Return: Found(route, params) | Redirect | NotFound
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex, no priorities: a path matches at most one pattern
//! - Deterministic: same input always matches same route
//! - Ambiguous patterns are rejected at registration, never resolved at lookup

pub mod error;
pub mod params;
pub mod path;
pub mod router;
pub mod tree;

pub use error::{RouteError, RouteResult};
pub use params::{Param, Params, UrlParams};
pub use router::{MatchedRoutePath, Route, RouteMatch, Router, MATCHED_ROUTE_PATH_KEY};
pub use tree::{Lookup, Node};
