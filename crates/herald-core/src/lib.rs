//! # Herald Core
//!
//! The foundation types of the Herald event dispatcher.
//!
//! This crate has no behaviour of its own. It defines the vocabulary the
//! framework and runtime share:
//!
//! ## Foundation Layer
//!
//! - **Platform Model**: [`User`], [`Member`], [`Message`], [`Guild`]
//! - **Events**: [`InboundEvent`], its payloads and routing [`EventKind`]
//! - **Command Schema**: [`CommandData`], [`OptionData`], [`Modal`] and the
//!   option values and [`Choice`]s exchanged at runtime
//!
//! ## Integration Layer
//!
//! - **Client**: the platform connection contract ([`Client`])
//!
//! ```text
//! ┌──────────┐  InboundEvent  ┌────────────┐     ┌───────────┐
//! │  Client  │───────────────▶│ Dispatcher │────▶│  Handler  │
//! │          │◀───────────────│            │────▶│  Handler  │
//! └──────────┘  reply / send  └────────────┘     └───────────┘
//! ```

pub mod foundation;
pub mod integration;

#[cfg(feature = "testing")]
pub mod testing;

pub use foundation::{
    ApiError, ApiResult, Autocomplete, Choice, CommandData, CommandOption, CommandType, EventKind,
    FromEvent, Guild, InboundEvent, Interaction, Interactive, Member, Message, MessageContext,
    MessageReceived, Modal, ModalField, ModalSubmit, OptionData, OptionType, OptionValue,
    ParseEventKindError, Ready, SlashCommand, Snowflake, TextInput, TextInputStyle, User,
    UserContext,
};
pub use integration::{BoxedClient, Client, CommandScope};

/// Prelude for common imports.
pub mod prelude {
    pub use super::foundation::*;
    pub use super::integration::*;
}
