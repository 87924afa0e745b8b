//! Responses produced by the dispatcher itself.
//!
//! # Responsibilities
//! - Trailing-slash redirects (target path, status by method)
//! - 404 and 405 answers
//!
//! # Design Decisions
//! - GET redirects use 301; other methods use 308
//! - The query string is carried over to the redirect target
//! - A target that would read as a scheme-relative URL (`//host`) is never emitted

use axum::{
    http::{header, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};

/// Body of the 404 answer.
pub const NOT_FOUND_BODY: &str = "No matching route found";

/// Body of the 405 answer.
pub const METHOD_NOT_ALLOWED_BODY: &str = "Method not allowed";

/// `path` with its trailing slash added or removed.
pub fn toggle_trailing_slash(path: &str) -> String {
    match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        Some(_) => path.to_string(),
        None => format!("{path}/"),
    }
}

/// Location for a trailing-slash redirect of `uri`, query included.
///
/// `None` when the target would start with `//`.
pub fn redirect_location(uri: &Uri) -> Option<String> {
    let target = toggle_trailing_slash(uri.path());
    if target.starts_with("//") {
        return None;
    }
    Some(match uri.query() {
        Some(query) => format!("{target}?{query}"),
        None => target,
    })
}

/// Redirect status for `method`.
pub fn redirect_status(method: &Method) -> StatusCode {
    if method == Method::GET {
        StatusCode::MOVED_PERMANENTLY
    } else {
        StatusCode::PERMANENT_REDIRECT
    }
}

pub fn redirect(method: &Method, location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (redirect_status(method), [(header::LOCATION, value)]).into_response(),
        Err(_) => not_found(),
    }
}

pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
}

/// 405 answer listing `allowed` in the `Allow` header.
pub fn method_not_allowed(allowed: &[&str]) -> Response {
    match HeaderValue::from_str(&allowed.join(", ")) {
        Ok(value) => (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, value)],
            METHOD_NOT_ALLOWED_BODY,
        )
            .into_response(),
        Err(_) => (StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_BODY).into_response(),
    }
}
