//! Herald Runtime - orchestration layer for the Herald event dispatcher.
//!
//! This crate provides:
//! - Layered configuration (`herald.toml`, `HERALD_*` environment variables)
//! - Logging setup driven by that configuration
//! - [`HeraldRuntime`]: validates controllers, publishes the command schema
//!   once and dispatches inbound events, one task per event
//! - The REST broadcast endpoint
//!
//! ```ignore
//! use herald_runtime::HeraldRuntime;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut runtime = HeraldRuntime::new();
//!     runtime.register_controller(MyController);
//!
//!     // Run until the event stream ends or Ctrl+C
//!     runtime.run(client, events).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod rest;
pub mod runtime;

pub use config::{ConfigError, ConfigLoader, ConfigResult, HeraldConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use rest::BroadcastSummary;
pub use runtime::{HeraldRuntime, RuntimeBuilder};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Logging macros for convenient imports.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
