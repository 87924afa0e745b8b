//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (add request ID)
//!     → server.rs dispatch (route table lookup)
//!         Found    → endpoint.rs (matched pattern + params in extensions)
//!         Redirect → response.rs (301/308 to the other slash form)
//!         NotFound → response.rs (405 with Allow, or 404)
//!     → Send to client
//! ```

pub mod endpoint;
pub mod request;
pub mod response;
pub mod server;

pub use endpoint::{build_route_table, endpoint, Endpoint, RouteTable, SharedEndpoint, StaticEndpoint};
pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{reload_routes, HttpServer, SharedRouteTable};
