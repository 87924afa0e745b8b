//! Per-method route registry.
//!
//! # Responsibilities
//! - Keep one tree per HTTP method
//! - Remember the registration pattern behind every handler
//! - Report which methods resolve a path (for 405 answers)
//!
//! # Design Decisions
//! - Built once, then shared immutably (e.g. behind an `Arc`)
//! - Method strings are compared verbatim; callers normalize case

use std::collections::HashMap;
use std::sync::Arc;

use crate::routing::error::{RouteError, RouteResult};
use crate::routing::params::Params;
use crate::routing::tree::{Lookup, Node};

/// Metric label under which the matched pattern is reported.
pub const MATCHED_ROUTE_PATH_KEY: &str = "matched_route_path";

/// The registration pattern a request matched, e.g. `/users/:id`.
///
/// Inserted into request extensions on every successful match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchedRoutePath(pub Arc<str>);

impl MatchedRoutePath {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MatchedRoutePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A handler together with the pattern it was registered under.
#[derive(Debug, Clone)]
pub struct Route<H> {
    pub pattern: MatchedRoutePath,
    pub handler: H,
}

/// Result of a registry lookup.
#[derive(Debug)]
pub enum RouteMatch<'t, 'p, H> {
    Found {
        route: &'t Route<H>,
        params: Params<'t, 'p>,
    },
    Redirect,
    NotFound,
}

impl<'t, 'p, H> RouteMatch<'t, 'p, H> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect)
    }
}

/// Maps an HTTP method to the tree of routes registered for it.
#[derive(Debug)]
pub struct Router<H> {
    trees: HashMap<String, Node<Route<H>>>,
    routes: usize,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self {
            trees: HashMap::with_capacity(5),
            routes: 0,
        }
    }
}

impl<H> Router<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method` and `pattern`.
    pub fn register(&mut self, method: &str, pattern: &str, handler: H) -> RouteResult<()> {
        if method.is_empty() {
            return Err(RouteError::EmptyMethod);
        }

        let route = Route {
            pattern: MatchedRoutePath(Arc::from(pattern)),
            handler,
        };
        let tree = self.trees.entry(method.to_string()).or_default();
        if let Err(err) = tree.register(pattern.as_bytes(), route) {
            if tree.is_empty() {
                self.trees.remove(method);
            }
            return Err(err);
        }
        self.routes += 1;

        tracing::debug!(method = %method, pattern = %pattern, "Route registered");
        Ok(())
    }

    /// Resolve `path` in the tree for `method`.
    pub fn lookup<'t, 'p>(&'t self, method: &str, path: &'p [u8]) -> RouteMatch<'t, 'p, H> {
        let Some(root) = self.trees.get(method) else {
            return RouteMatch::NotFound;
        };
        match root.lookup(path) {
            Lookup::Found { handler, params } => RouteMatch::Found {
                route: handler,
                params,
            },
            Lookup::Redirect => RouteMatch::Redirect,
            Lookup::NotFound => RouteMatch::NotFound,
        }
    }

    /// Methods, other than `except`, whose tree matches `path` exactly. Sorted.
    pub fn allowed_methods(&self, path: &[u8], except: &str) -> Vec<&str> {
        let mut allowed: Vec<&str> = self
            .trees
            .iter()
            .filter(|(method, root)| method.as_str() != except && root.lookup(path).is_found())
            .map(|(method, _)| method.as_str())
            .collect();
        allowed.sort_unstable();
        allowed
    }

    /// Registered methods, sorted.
    pub fn methods(&self) -> Vec<&str> {
        let mut methods: Vec<&str> = self.trees.keys().map(String::as_str).collect();
        methods.sort_unstable();
        methods
    }

    /// Number of successfully registered routes across all methods.
    pub fn route_count(&self) -> usize {
        self.routes
    }
}
