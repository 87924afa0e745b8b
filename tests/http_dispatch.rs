//! In-process dispatch tests: the axum app driven through `oneshot`.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use radix_router::config::RouterConfig;
use radix_router::http::{endpoint, RouteTable, X_REQUEST_ID};
use radix_router::routing::{MatchedRoutePath, UrlParams};
use radix_router::HttpServer;
use serde_json::{json, Value};

mod common;

use common::{app, config, get, request, route, route_for, send};

#[tokio::test]
async fn test_found_reports_pattern_and_params() {
    let app = app(config(vec![
        route("user", "/users/:id"),
        route("post", "/users/:id/posts/:post"),
    ]));

    let (status, _, body) = send(app, get("/users/42/posts/7")).await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body,
        json!({
            "route": "post",
            "pattern": "/users/:id/posts/:post",
            "params": { "id": "42", "post": "7" },
        })
    );
}

#[tokio::test]
async fn test_catch_all_captures_remainder() {
    let app = app(config(vec![route("assets", "/static/*file")]));

    let (status, _, body) = send(app, get("/static/css/site.css")).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["params"]["file"], "css/site.css");
}

#[tokio::test]
async fn test_configured_body_and_status() {
    let mut teapot = route("teapot", "/tea");
    teapot.status = 418;
    teapot.body = Some("{\"short\":true}".into());
    teapot.content_type = Some("application/json".into());

    let (status, headers, body) = send(app(config(vec![teapot])), get("/tea")).await;
    assert_eq!(status, StatusCode::IM_A_TEAPOT);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(&body[..], b"{\"short\":true}");
}

#[tokio::test]
async fn test_trailing_slash_redirects() {
    let app = app(config(vec![
        route("list", "/users"),
        route_for("create", "POST", "/items/"),
    ]));

    let (status, headers, _) = send(app.clone(), get("/users/?page=2")).await;
    assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
    assert_eq!(headers[header::LOCATION], "/users?page=2");

    let (status, headers, _) = send(app, request("POST", "/items")).await;
    assert_eq!(status, StatusCode::PERMANENT_REDIRECT);
    assert_eq!(headers[header::LOCATION], "/items/");
}

#[tokio::test]
async fn test_no_redirect_to_unregistered_path() {
    let app = app(config(vec![route("a", "/a/"), route("c", "/c")]));

    let (status, headers, _) = send(app.clone(), get("/ab")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(headers.get(header::LOCATION).is_none());

    let (status, headers, _) = send(app, get("/a")).await;
    assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
    assert_eq!(headers[header::LOCATION], "/a/");
}

#[tokio::test]
async fn test_redirect_disabled_gives_not_found() {
    let mut config = config(vec![route("list", "/users")]);
    config.http.redirect_trailing_slash = false;

    let (status, headers, _) = send(app(config), get("/users/")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(headers.get(header::LOCATION).is_none());
}

#[tokio::test]
async fn test_method_not_allowed_lists_methods() {
    let routes = vec![
        route_for("replace", "PUT", "/items/:id"),
        route_for("remove", "DELETE", "/items/:id"),
    ];

    let (status, headers, _) = send(app(config(routes.clone())), get("/items/3")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(headers[header::ALLOW], "DELETE, PUT");

    let mut config = config(routes);
    config.http.handle_method_not_allowed = false;
    let (status, _, _) = send(app(config), get("/items/3")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_not_found() {
    let app = app(config(vec![route("user", "/users/:id")]));

    let (status, _, body) = send(app, get("/accounts/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(&body[..], b"No matching route found");
}

#[tokio::test]
async fn test_request_id_is_generated_or_echoed() {
    let app = app(config(vec![route("user", "/users/:id")]));

    let (_, headers, _) = send(app.clone(), get("/users/1")).await;
    let generated = headers[X_REQUEST_ID].to_str().unwrap();
    assert!(uuid::Uuid::parse_str(generated).is_ok());

    let supplied = Request::builder()
        .uri("/nowhere")
        .header(X_REQUEST_ID, "req-77")
        .body(Body::empty())
        .unwrap();
    let (_, headers, _) = send(app, supplied).await;
    assert_eq!(headers[X_REQUEST_ID], "req-77");
}

#[tokio::test]
async fn test_custom_endpoint_sees_extensions() {
    let mut table = RouteTable::new();
    table
        .register(
            "GET",
            "/repos/:owner/:name",
            endpoint(|req: Request<Body>| async move {
                let pattern = req.extensions().get::<MatchedRoutePath>().cloned();
                let params = req.extensions().get::<UrlParams>().cloned();
                match (pattern, params) {
                    (Some(pattern), Some(params)) => format!(
                        "{} {}/{}",
                        pattern,
                        params.get("owner").unwrap_or("-"),
                        params.get("name").unwrap_or("-"),
                    ),
                    _ => String::from("missing"),
                }
            }),
        )
        .unwrap();

    let app = HttpServer::with_routes(RouterConfig::default(), table).app();
    let (status, _, body) = send(app, get("/repos/rust-lang/rust")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"/repos/:owner/:name rust-lang/rust");
}
