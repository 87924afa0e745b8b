//! HTTP server setup and dispatch.
//!
//! # Responsibilities
//! - Create the Axum app with a single dispatching fallback
//! - Wire up middleware (tracing, timeout, concurrency limit, request ID)
//! - Resolve requests against the route table
//! - Answer redirects, 404 and 405 without involving an endpoint
//! - Swap in new route tables on config updates
//! - Observability (metrics, correlation IDs)

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{HttpConfig, RouterConfig};
use crate::http::endpoint::{build_route_table, RouteTable, SharedEndpoint};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::http::response;
use crate::observability::metrics;
use crate::routing::{MatchedRoutePath, RouteError, RouteMatch, UrlParams};

/// Route table shared between the dispatcher and the reload task.
pub type SharedRouteTable = Arc<ArcSwap<RouteTable>>;

/// Application state injected into the dispatcher.
#[derive(Clone)]
pub struct AppState {
    pub routes: SharedRouteTable,
    pub http_config: HttpConfig,
}

/// HTTP server dispatching through the route table.
pub struct HttpServer {
    router: Router,
    config: RouterConfig,
    routes: SharedRouteTable,
}

impl HttpServer {
    /// Create a server whose routes come from `config.routes`.
    pub fn new(config: RouterConfig) -> Result<Self, RouteError> {
        let table = build_route_table(&config.routes)?;
        Ok(Self::with_routes(config, table))
    }

    /// Create a server around a route table built elsewhere.
    pub fn with_routes(config: RouterConfig, table: RouteTable) -> Self {
        metrics::record_routes(table.route_count());
        let routes: SharedRouteTable = Arc::new(ArcSwap::from_pointee(table));

        let state = AppState {
            routes: routes.clone(),
            http_config: config.http.clone(),
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            routes,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RouterConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.http.request_timeout_secs,
            )))
            .layer(ConcurrencyLimitLayer::new(config.listener.max_connections))
            .layer(TraceLayer::new_for_http())
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configurations received on `config_updates` replace the route table;
    /// listener and dispatch settings keep their startup values.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RouterConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.routes.load().route_count(),
            "HTTP server starting"
        );

        let routes = self.routes.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                // Rejections are logged and counted inside; the current table stays live.
                let _ = reload_routes(&routes, &config);
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The app as a tower service, for in-process use.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Handle to the live route table.
    pub fn routes(&self) -> SharedRouteTable {
        self.routes.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }
}

/// Build a table from `config` and publish it. The old table stays live on error.
pub fn reload_routes(routes: &ArcSwap<RouteTable>, config: &RouterConfig) -> Result<(), RouteError> {
    match build_route_table(&config.routes) {
        Ok(table) => {
            let count = table.route_count();
            routes.store(Arc::new(table));
            metrics::record_routes(count);
            metrics::record_config_reload(true);
            tracing::info!(routes = count, "Route table reloaded");
            Ok(())
        }
        Err(e) => {
            metrics::record_config_reload(false);
            tracing::error!(error = %e, "Rejected new route table, keeping current routes");
            Err(e)
        }
    }
}

enum Resolution {
    Found(SharedEndpoint, MatchedRoutePath, UrlParams),
    Redirect,
    Miss,
}

/// Fallback handler: every request lands here.
async fn dispatch(State(state): State<AppState>, mut request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request.request_id().unwrap_or("unknown").to_string();
    let method = request.method().clone();
    let table = state.routes.load_full();

    let resolution = match table.lookup(method.as_str(), request.uri().path().as_bytes()) {
        RouteMatch::Found { route, params } => Resolution::Found(
            route.handler.clone(),
            route.pattern.clone(),
            params.to_url_params(),
        ),
        RouteMatch::Redirect => Resolution::Redirect,
        RouteMatch::NotFound => Resolution::Miss,
    };

    match resolution {
        Resolution::Found(endpoint, pattern, params) => {
            tracing::debug!(
                request_id = %request_id,
                method = %method,
                route = %pattern,
                "Route matched"
            );
            request.extensions_mut().insert(pattern.clone());
            request.extensions_mut().insert(params);

            let response = endpoint.call(request).await;
            metrics::record_request(
                method.as_str(),
                response.status().as_u16(),
                pattern.as_str(),
                start_time,
            );
            response
        }
        Resolution::Redirect if state.http_config.redirect_trailing_slash => {
            let response = match response::redirect_location(request.uri()) {
                Some(location) => {
                    tracing::debug!(
                        request_id = %request_id,
                        path = %request.uri().path(),
                        location = %location,
                        "Trailing slash redirect"
                    );
                    response::redirect(&method, &location)
                }
                None => response::not_found(),
            };
            metrics::record_request(
                method.as_str(),
                response.status().as_u16(),
                metrics::UNMATCHED,
                start_time,
            );
            response
        }
        Resolution::Redirect | Resolution::Miss => {
            let path = request.uri().path();
            let allowed = if state.http_config.handle_method_not_allowed {
                table.allowed_methods(path.as_bytes(), method.as_str())
            } else {
                Vec::new()
            };

            let response = if allowed.is_empty() {
                tracing::debug!(request_id = %request_id, method = %method, path = %path, "No route matched");
                response::not_found()
            } else {
                tracing::debug!(request_id = %request_id, method = %method, path = %path, "Method not allowed");
                response::method_not_allowed(&allowed)
            };
            metrics::record_request(
                method.as_str(),
                response.status().as_u16(),
                metrics::UNMATCHED,
                start_time,
            );
            response
        }
    }
}
