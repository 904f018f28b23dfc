//! Unified error types for the Herald core.
//!
//! Framework-level errors (registration, extraction) are defined in
//! `herald-framework`; runtime and configuration errors in `herald-runtime`.

use thiserror::Error;

// =============================================================================
// API Errors
// =============================================================================

/// Error type for outbound calls made through a [`Client`](crate::Client).
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The client is not connected to the platform.
    #[error("client is not connected")]
    NotConnected,
    /// The call timed out.
    #[error("API call timed out")]
    Timeout,
    /// The platform rejected the call.
    #[error("API error ({code}): {message}")]
    Rejected { code: i64, message: String },
    /// The interaction was already acknowledged; the platform accepts one reply.
    #[error("interaction {interaction_id} was already acknowledged")]
    AlreadyAcknowledged { interaction_id: u64 },
    /// The target channel does not exist or is not a text channel.
    #[error("unknown channel {0}")]
    UnknownChannel(u64),
    /// Failed to serialize/deserialize.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

// =============================================================================
// Event Kind Parsing
// =============================================================================

/// Returned when a string does not name a recognised [`EventKind`](crate::EventKind).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised event kind '{0}'")]
pub struct ParseEventKindError(pub String);

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;
