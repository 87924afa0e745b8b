//! Endpoints: what a matched route runs.
//!
//! # Responsibilities
//! - Define the handler payload stored in the route table
//! - Build the route table from configuration
//! - Render canned responses for configured routes
//!
//! # Design Decisions
//! - Endpoints are trait objects behind `Arc`, cloned out of the table per
//!   request so no table borrow is held across an await
//! - Matched pattern and params reach the endpoint through request extensions

use std::future::Future;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures_util::future::{BoxFuture, FutureExt};
use serde_json::json;

use crate::config::RouteConfig;
use crate::routing::{MatchedRoutePath, RouteResult, Router, UrlParams};

/// Something that can answer a matched request.
pub trait Endpoint: Send + Sync + 'static {
    fn call(&self, request: Request<Body>) -> BoxFuture<'static, Response>;
}

impl<F, Fut, R> Endpoint for F
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + 'static,
{
    fn call(&self, request: Request<Body>) -> BoxFuture<'static, Response> {
        self(request).map(IntoResponse::into_response).boxed()
    }
}

/// Shared handle stored in the route table.
pub type SharedEndpoint = Arc<dyn Endpoint>;

/// Method-indexed trees of endpoints.
pub type RouteTable = Router<SharedEndpoint>;

/// Wrap an endpoint for registration.
pub fn endpoint<E: Endpoint>(e: E) -> SharedEndpoint {
    Arc::new(e)
}

/// Build a route table from configuration, failing on the first bad route.
pub fn build_route_table(routes: &[RouteConfig]) -> RouteResult<RouteTable> {
    let mut table = RouteTable::new();
    for route in routes {
        let method = route.method.to_ascii_uppercase();
        table.register(&method, &route.path, endpoint(StaticEndpoint::from_config(route)))?;
    }
    Ok(table)
}

/// A configured route answering with a fixed status and body.
#[derive(Debug, Clone)]
pub struct StaticEndpoint {
    name: Arc<str>,
    status: StatusCode,
    body: Option<String>,
    content_type: String,
}

impl StaticEndpoint {
    pub fn from_config(route: &RouteConfig) -> Self {
        Self {
            name: Arc::from(route.name.as_str()),
            status: StatusCode::from_u16(route.status).unwrap_or(StatusCode::OK),
            body: route.body.clone(),
            content_type: route
                .content_type
                .clone()
                .unwrap_or_else(|| "text/plain; charset=utf-8".to_string()),
        }
    }

    fn respond(&self, request: &Request<Body>) -> Response {
        if let Some(body) = &self.body {
            return (
                self.status,
                [(header::CONTENT_TYPE, self.content_type.clone())],
                body.clone(),
            )
                .into_response();
        }

        let pattern = request
            .extensions()
            .get::<MatchedRoutePath>()
            .map(MatchedRoutePath::as_str);
        let params = request
            .extensions()
            .get::<UrlParams>()
            .map(UrlParams::to_map)
            .unwrap_or_default();

        (
            self.status,
            Json(json!({
                "route": &*self.name,
                "pattern": pattern,
                "params": params,
            })),
        )
            .into_response()
    }
}

impl Endpoint for StaticEndpoint {
    fn call(&self, request: Request<Body>) -> BoxFuture<'static, Response> {
        let response = self.respond(&request);
        futures_util::future::ready(response).boxed()
    }
}
