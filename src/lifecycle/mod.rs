//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → resolve the signal future
//!
//! Shutdown (shutdown.rs):
//!     Signal or trigger() → broadcast → server stops accepting → drain → exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup lives in main: config, logging, metrics, routes, listener
//! - Ordered shutdown: stop accept, drain in-flight requests, close

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::wait_for_signal;
