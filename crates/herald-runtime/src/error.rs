//! Runtime error types.

use thiserror::Error;

use herald_core::ApiError;
use herald_framework::{RegistrationError, SchemaError};

use crate::config::ConfigError;

/// Errors that can occur during runtime operations.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Loading or validating the configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Two controllers declare the same command or modal.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A handler mapping failed validation.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// Publishing the command schema was rejected.
    #[error("Failed to publish commands: {0}")]
    Publish(#[source] ApiError),

    /// `start` was called a second time.
    #[error("Runtime is already started")]
    AlreadyStarted,

    /// An operation needs a started runtime.
    #[error("Runtime is not started")]
    NotStarted,

    /// Binding or serving the REST endpoint failed.
    #[error("REST server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
