//! Foundation layer - Core abstractions and type system.
//!
//! This module contains the fundamental building blocks of Herald:
//! - Platform entities (users, members, messages, guilds)
//! - Inbound events and their routing kinds
//! - Command, option and modal schema types

pub mod command;
pub mod error;
pub mod event;
pub mod model;

pub use command::{
    Choice, CommandData, CommandOption, CommandType, Modal, ModalField, OptionData, OptionType,
    OptionValue, TextInput, TextInputStyle,
};
pub use error::{ApiError, ApiResult, ParseEventKindError};
pub use event::{
    Autocomplete, EventKind, FromEvent, InboundEvent, Interaction, Interactive, MessageContext,
    MessageReceived, ModalSubmit, Ready, SlashCommand, UserContext,
};
pub use model::{Guild, Member, Message, Snowflake, User};
