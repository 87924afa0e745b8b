//! Radix Router Library
//!
//! A compressed radix-trie URL router with named parameters, catch-all
//! segments and trailing-slash redirect hints, plus an axum dispatch layer
//! that serves a TOML-configured route table.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Lookup, Node, Params, RouteError, RouteMatch, Router};
