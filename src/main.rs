//! Radix Router
//!
//! Serves a TOML route table through a compressed radix trie.
//!
//! # Architecture Overview
//!
//! ```text
//!     routes.toml ──▶ config ──▶ routing::Router ──▶ ArcSwap<RouteTable>
//!                       ▲                                   │
//!                       │ watcher (hot reload)               ▼
//!     Client Request ─────────────────────────────▶ http::server dispatch
//!                                                   │    │        │
//!                                               endpoint │    404 / 405
//!                                                  redirect (301 / 308)
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use radix_router::config::{load_config, ConfigError, ConfigWatcher};
use radix_router::http::{build_route_table, response};
use radix_router::observability::{logging, metrics};
use radix_router::routing::RouteMatch;
use radix_router::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "radix-router")]
#[command(about = "Radix-trie HTTP router serving a TOML route table", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the route table over HTTP
    Serve {
        #[arg(short, long, default_value = "routes.toml")]
        config: PathBuf,

        /// Reload the route table when the file changes
        #[arg(short, long)]
        watch: bool,
    },
    /// Validate a route table without serving it
    Check {
        #[arg(short, long, default_value = "routes.toml")]
        config: PathBuf,
    },
    /// Resolve one request against a route table
    Lookup {
        #[arg(short, long, default_value = "routes.toml")]
        config: PathBuf,

        method: String,

        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, watch } => serve(&config, watch).await,
        Commands::Check { config } => Ok(check(&config)),
        Commands::Lookup {
            config,
            method,
            path,
        } => lookup(&config, &method, &path),
    }
}

async fn serve(path: &Path, watch: bool) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = match load_config(path) {
        Ok(config) => config,
        Err(e) => return Ok(report(path, &e)),
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("radix-router v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        path = %path.display(),
        bind_address = %config.listener.bind_address,
        max_connections = config.listener.max_connections,
        request_timeout_secs = config.http.request_timeout_secs,
        routes = config.routes.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Validation guarantees the address parses.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    // Keeps the file watch alive for the lifetime of the server.
    let (_watch_guard, config_updates) = if watch {
        let (watcher, updates) = ConfigWatcher::new(path);
        (Some(watcher.run()?), updates)
    } else {
        let (_, updates) = mpsc::unbounded_channel();
        (None, updates)
    };

    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(ExitCode::SUCCESS)
}

fn check(path: &Path) -> ExitCode {
    match load_config(path) {
        Ok(config) => {
            let mut methods: Vec<String> =
                config.routes.iter().map(|r| r.method.to_ascii_uppercase()).collect();
            methods.sort_unstable();
            methods.dedup();
            println!(
                "{}: {} routes OK ({})",
                path.display(),
                config.routes.len(),
                methods.join(", ")
            );
            ExitCode::SUCCESS
        }
        Err(e) => report(path, &e),
    }
}

fn lookup(path: &Path, method: &str, request_path: &str) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = match load_config(path) {
        Ok(config) => config,
        Err(e) => return Ok(report(path, &e)),
    };
    let table = build_route_table(&config.routes)?;
    let method = method.to_ascii_uppercase();

    let result = match table.lookup(&method, request_path.as_bytes()) {
        RouteMatch::Found { route, params } => json!({
            "result": "found",
            "pattern": route.pattern.as_str(),
            "params": params.to_url_params().to_map(),
        }),
        RouteMatch::Redirect => json!({
            "result": "redirect",
            "location": response::toggle_trailing_slash(request_path),
        }),
        RouteMatch::NotFound => json!({
            "result": "not_found",
            "allowed": table.allowed_methods(request_path.as_bytes(), &method),
        }),
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(ExitCode::SUCCESS)
}

fn report(path: &Path, error: &ConfigError) -> ExitCode {
    match error {
        ConfigError::Validation(errors) => {
            eprintln!("{}: {} problem(s)", path.display(), errors.len());
            for err in errors {
                eprintln!("  - {}", err);
            }
        }
        other => eprintln!("{}: {}", path.display(), other),
    }
    ExitCode::FAILURE
}
