//! Shared utilities for integration tests.

use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use radix_router::config::{RouteConfig, RouterConfig};
use radix_router::HttpServer;
use tower::ServiceExt;

/// A GET route answering with the JSON match description.
#[allow(dead_code)]
pub fn route(name: &str, path: &str) -> RouteConfig {
    route_for(name, "GET", path)
}

#[allow(dead_code)]
pub fn route_for(name: &str, method: &str, path: &str) -> RouteConfig {
    RouteConfig {
        name: name.into(),
        method: method.into(),
        path: path.into(),
        status: 200,
        body: None,
        content_type: None,
    }
}

/// Default configuration bound to an ephemeral local port.
#[allow(dead_code)]
pub fn config(routes: Vec<RouteConfig>) -> RouterConfig {
    let mut config = RouterConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.routes = routes;
    config
}

/// The app for `config`, ready for `oneshot`.
#[allow(dead_code)]
pub fn app(config: RouterConfig) -> Router {
    HttpServer::new(config).expect("valid routes").app()
}

/// Drive one request through `app` in-process.
#[allow(dead_code)]
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let response = app.oneshot(request).await.expect("infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, headers, body)
}

#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    request("GET", uri)
}

#[allow(dead_code)]
pub fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}
