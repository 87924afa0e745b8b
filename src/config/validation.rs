//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse, status codes)
//! - Detect invalid, duplicate and conflicting route patterns
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::{Method, StatusCode};
use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::routing::{RouteError, Router};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("route #{0} has an empty name")]
    EmptyName(usize),

    #[error("route name '{0}' is used more than once")]
    DuplicateName(String),

    #[error("route '{name}': invalid method '{method}'")]
    Method { name: String, method: String },

    #[error("route '{name}': invalid status code {status}")]
    Status { name: String, status: u16 },

    #[error("route '{name}': {source}")]
    Route {
        name: String,
        #[source]
        source: RouteError,
    },
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.http.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let mut names = HashSet::new();
    // Dry run of the route table; handlers are irrelevant here.
    let mut table: Router<()> = Router::new();

    for (i, route) in config.routes.iter().enumerate() {
        if route.name.is_empty() {
            errors.push(ValidationError::EmptyName(i));
        } else if !names.insert(route.name.as_str()) {
            errors.push(ValidationError::DuplicateName(route.name.clone()));
        }

        if StatusCode::from_u16(route.status).is_err() {
            errors.push(ValidationError::Status {
                name: route.name.clone(),
                status: route.status,
            });
        }

        let method = route.method.to_ascii_uppercase();
        if Method::from_bytes(method.as_bytes()).is_err() {
            errors.push(ValidationError::Method {
                name: route.name.clone(),
                method: route.method.clone(),
            });
            continue;
        }

        if let Err(source) = table.register(&method, &route.path, ()) {
            errors.push(ValidationError::Route {
                name: route.name.clone(),
                source,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RouteConfig;

    fn route(name: &str, method: &str, path: &str) -> RouteConfig {
        RouteConfig {
            name: name.into(),
            method: method.into(),
            path: path.into(),
            status: 200,
            body: None,
            content_type: None,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&RouterConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RouterConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.http.request_timeout_secs = 0;
        config.routes = vec![
            route("a", "GET", "/a"),
            route("a", "GET", "/b"),
            route("dup", "GET", "/a"),
            route("bad", "GET", "/a:/"),
            route("conflict", "GET", "/a:version"),
            route("method", "GE T", "/m"),
            route("", "POST", "/x"),
        ];
        config.routes[1].status = 1000;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 9);
        assert_eq!(errors[0], ValidationError::BindAddress("not-an-address".into()));
        assert_eq!(errors[1], ValidationError::ZeroTimeout);
        assert_eq!(errors[2], ValidationError::DuplicateName("a".into()));
        assert_eq!(
            errors[3],
            ValidationError::Status {
                name: "a".into(),
                status: 1000
            }
        );
        assert!(matches!(
            &errors[4],
            ValidationError::Route { name, source: RouteError::Duplicate { .. } } if name == "dup"
        ));
        assert!(matches!(
            &errors[5],
            ValidationError::Route { source: RouteError::InvalidPath { .. }, .. }
        ));
        assert_eq!(
            errors[6].to_string(),
            "route 'conflict': '/a:version' conflict with the registered path '/a'"
        );
        assert!(matches!(&errors[7], ValidationError::Method { .. }));
        assert_eq!(errors[8], ValidationError::EmptyName(6));
    }

    #[test]
    fn test_methods_are_case_insensitive() {
        let mut config = RouterConfig::default();
        config.routes = vec![route("a", "get", "/a"), route("b", "GET", "/a")];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            ValidationError::Route { source: RouteError::Duplicate { .. }, .. }
        ));
    }
}
