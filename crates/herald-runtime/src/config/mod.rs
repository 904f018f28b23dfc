//! Configuration module for the Herald runtime.
//!
//! Layered loading (defaults, files, environment) and validation of the
//! logging, command publishing and REST settings.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config};
pub use schema::{
    CommandsConfig, HeraldConfig, LogFormat, LogLevel, LogOutput, LogRotation, LoggingConfig,
    RestConfig, SpanEventConfig,
};
pub use validation::validate_config;
