//! Error types for the Herald framework.
//!
//! - [`RegistrationError`]: fatal, raised by [`Registrar::build`](crate::Registrar::build)
//!   before the dispatcher exists.
//! - [`SchemaError`]: fatal, raised while aggregating controller command schemas.
//! - [`ExtractError`]: per-invocation, logged by the dispatcher when a handler's
//!   parameters cannot be pulled out of an event.

use thiserror::Error;

use herald_core::{CommandType, EventKind, OptionType};

/// A handler mapping that cannot be served. Every variant names the handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("handler `{handler}`: unrecognised event kind '{kind}'")]
    UnknownEventKind { handler: String, kind: String },

    #[error("handler `{handler}`: no event kind given and none implied by its event type")]
    MissingEventKind { handler: String },

    #[error("handler `{handler}`: mapped as {mapped} but receives {received} events")]
    KindMismatch {
        handler: String,
        mapped: EventKind,
        received: EventKind,
    },

    #[error("handler `{handler}`: {kind} mappings require an identifier")]
    MissingIdentifier { handler: String, kind: EventKind },

    #[error("handler `{handler}`: {kind} mappings take no identifier (got '{identifier}')")]
    UnexpectedIdentifier {
        handler: String,
        kind: EventKind,
        identifier: String,
    },

    #[error("handler `{handler}`: focused option '{option}' is only valid for autocomplete")]
    UnexpectedFocusedOption { handler: String, option: String },

    #[error("handler `{handler}`: autocomplete mappings require a focused option")]
    MissingFocusedOption { handler: String },

    #[error("handler `{handler}`: no {kind} named '{identifier}' is declared")]
    UnknownIdentifier {
        handler: String,
        kind: EventKind,
        identifier: String,
    },

    #[error("handler `{handler}`: '{identifier}' declares no option '{option}'")]
    UnknownOption {
        handler: String,
        identifier: String,
        option: String,
    },

    #[error("handler `{handler}`: option '{option}' of '{identifier}' has autocomplete disabled")]
    FocusedOptionNotAutocomplete {
        handler: String,
        identifier: String,
        option: String,
    },

    #[error("handler `{handler}`: takes {expected} parameter(s) but {got} name(s) were given")]
    ParamArity {
        handler: String,
        expected: usize,
        got: usize,
    },

    #[error("handler `{handler}`: {kind} events carry no options to bind parameters to")]
    ParamsNotSupported { handler: String, kind: EventKind },

    #[error("handler `{handler}`: parameter '{option}' is {param} but the option is {declared}")]
    ParamTypeMismatch {
        handler: String,
        option: String,
        param: OptionType,
        declared: OptionType,
    },

    #[error("handler `{handler}`: option '{option}' is optional, its parameter must be an Option")]
    OptionalParamNotOption { handler: String, option: String },
}

/// A conflict between the command schemas of two controllers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("{command_type} command '{name}' is declared more than once")]
    DuplicateCommand {
        command_type: CommandType,
        name: String,
    },

    #[error("modal '{id}' is declared more than once")]
    DuplicateModal { id: String },
}

/// Errors that can occur while extracting handler parameters from an event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// A required option is absent from the event.
    #[error("required option '{name}' is missing")]
    Missing { name: String },

    /// The option is present but carries a different type.
    #[error("option '{name}' expected {expected}, got {got}")]
    TypeMismatch {
        name: String,
        expected: OptionType,
        got: OptionType,
    },

    /// The event is not of the kind the handler receives.
    #[error("event type mismatch: expected '{expected}', got '{got}'")]
    EventMismatch {
        expected: &'static str,
        got: EventKind,
    },

    /// Fewer parameter names were bound than the handler declares.
    #[error("handler declares more parameters than were bound")]
    ParamArity,
}

/// Result type for registration.
pub type RegistrationResult<T> = Result<T, RegistrationError>;

/// Result type for schema aggregation.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;
