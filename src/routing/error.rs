//! Route registration errors.

use thiserror::Error;

use crate::routing::path::PathViolation;

/// Errors raised while building a route table.
///
/// Every variant is a programming error in the route definitions. Lookups
/// never produce one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The pattern breaks the path grammar.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: PathViolation },

    /// A handler is already bound to exactly this pattern.
    #[error("the current path '{path}' handler has been registered")]
    Duplicate { path: String },

    /// The pattern is ambiguous with one that is already registered.
    #[error("'{path}' conflict with the registered path '{existing}'")]
    Conflict { path: String, existing: String },

    /// Registration was attempted with an empty HTTP method.
    #[error("method must not be empty")]
    EmptyMethod,
}

impl RouteError {
    pub(crate) fn conflict(path: &[u8], existing: &[u8]) -> Self {
        Self::Conflict {
            path: String::from_utf8_lossy(path).into_owned(),
            existing: String::from_utf8_lossy(existing).into_owned(),
        }
    }

    /// Pattern that was being registered, if the error concerns one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::InvalidPath { path, .. }
            | Self::Duplicate { path }
            | Self::Conflict { path, .. } => Some(path),
            Self::EmptyMethod => None,
        }
    }
}

/// Result type for route registration.
pub type RouteResult<T> = Result<T, RouteError>;
