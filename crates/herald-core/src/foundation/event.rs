//! Event system for Herald.
//!
//! This module provides the inbound event infrastructure:
//!
//! - [`EventKind`] - The seven routable event kinds
//! - [`InboundEvent`] - Tagged union over every event the platform delivers
//! - Per-kind payloads ([`Ready`], [`MessageReceived`], [`SlashCommand`], ...)
//! - [`FromEvent`] - Extracting a kind-specific payload from an [`InboundEvent`]
//!
//! # Payload Extraction
//!
//! Handlers name the payload they want as their first argument; the
//! framework uses [`FromEvent`] to pull it out of the inbound event:
//!
//! ```rust,ignore
//! async fn ping(ctx: Context<SlashCommand>) -> &'static str { "pong" }
//!
//! // Handlers that want to see several kinds take the whole event.
//! async fn audit(ctx: Context<InboundEvent>) { /* ... */ }
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::command::{CommandOption, ModalField, OptionValue};
use super::error::ParseEventKindError;
use super::model::{Member, Message, Snowflake, User};

// ============================================================================
// Event Kind
// ============================================================================

/// Classification of inbound events for routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// The client finished logging in.
    Ready,
    /// A raw chat message was posted.
    MessageReceived,
    /// A slash command was invoked.
    SlashCommand,
    /// A user context-menu command was invoked.
    UserContext,
    /// A message context-menu command was invoked.
    MessageContext,
    /// The platform asks for candidates while an option is being typed.
    Autocomplete,
    /// A modal form was submitted.
    ModalSubmit,
}

impl EventKind {
    /// Every kind, in declaration order.
    pub const ALL: [EventKind; 7] = [
        Self::Ready,
        Self::MessageReceived,
        Self::SlashCommand,
        Self::UserContext,
        Self::MessageContext,
        Self::Autocomplete,
        Self::ModalSubmit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::MessageReceived => "message_received",
            Self::SlashCommand => "slash_command",
            Self::UserContext => "user_context",
            Self::MessageContext => "message_context",
            Self::Autocomplete => "autocomplete",
            Self::ModalSubmit => "modal_submit",
        }
    }

    /// Whether events of this kind are routed by a string identifier
    /// (command name or modal id).
    pub fn requires_identifier(&self) -> bool {
        !matches!(self, Self::Ready | Self::MessageReceived)
    }

    /// Whether events of this kind carry named values handlers can declare
    /// as parameters.
    pub fn carries_options(&self) -> bool {
        matches!(
            self,
            Self::SlashCommand | Self::Autocomplete | Self::ModalSubmit
        )
    }
}

impl FromStr for EventKind {
    type Err = ParseEventKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "ready" => Self::Ready,
            "message" | "message_received" => Self::MessageReceived,
            "slash" | "slash_command" => Self::SlashCommand,
            "user" | "user_context" => Self::UserContext,
            "message_context" => Self::MessageContext,
            "autocomplete" => Self::Autocomplete,
            "modal" | "modal_submit" => Self::ModalSubmit,
            _ => return Err(ParseEventKindError(s.to_string())),
        })
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Payloads
// ============================================================================

/// Common data of every interaction: who triggered it, where, and the token
/// a reply is addressed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: Snowflake,
    pub token: String,
    /// The invoking user.
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<Snowflake>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
}

/// Access to the [`Interaction`] of interaction payloads.
pub trait Interactive {
    fn interaction(&self) -> &Interaction;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ready {
    /// The account the client logged in as.
    pub self_user: User,
    #[serde(default)]
    pub guild_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReceived {
    pub message: Message,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlashCommand {
    pub interaction: Interaction,
    /// Command name, without the leading `/`.
    pub command: String,
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub interaction: Interaction,
    pub command: String,
    /// The user whose context menu was used.
    pub target: User,
    /// The target's guild membership, absent outside guilds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_member: Option<Member>,
}

impl UserContext {
    /// The target's name as shown where the command was used.
    pub fn target_name(&self) -> &str {
        match &self.target_member {
            Some(member) => member.effective_name(),
            None => self.target.display_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContext {
    pub interaction: Interaction,
    pub command: String,
    /// The message whose context menu was used.
    pub target: Message,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Autocomplete {
    pub interaction: Interaction,
    pub command: String,
    /// Current option values; exactly one is marked focused.
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

impl Autocomplete {
    /// The option being typed, if the platform marked one.
    pub fn focused_option(&self) -> Option<&CommandOption> {
        self.options.iter().find(|o| o.focused)
    }

    /// The partial text of the focused option; empty when nothing is typed
    /// yet or the focused option is not a string.
    pub fn focused_value(&self) -> &str {
        self.focused_option()
            .and_then(|o| o.value.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalSubmit {
    pub interaction: Interaction,
    pub modal_id: String,
    #[serde(default)]
    pub fields: Vec<ModalField>,
}

macro_rules! impl_interactive {
    ($($ty:ty),*) => {
        $(
            impl Interactive for $ty {
                fn interaction(&self) -> &Interaction {
                    &self.interaction
                }
            }
        )*
    };
}

impl_interactive!(SlashCommand, UserContext, MessageContext, Autocomplete, ModalSubmit);

// ============================================================================
// Inbound Event
// ============================================================================

/// An event delivered by the platform client.
///
/// Serialized internally tagged by `type`:
///
/// ```json
/// {"type": "slash_command", "command": "ping", "interaction": {...}, "options": []}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    Ready(Ready),
    MessageReceived(MessageReceived),
    SlashCommand(SlashCommand),
    UserContext(UserContext),
    MessageContext(MessageContext),
    Autocomplete(Autocomplete),
    ModalSubmit(ModalSubmit),
}

impl InboundEvent {
    /// Returns the routing kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Ready(_) => EventKind::Ready,
            Self::MessageReceived(_) => EventKind::MessageReceived,
            Self::SlashCommand(_) => EventKind::SlashCommand,
            Self::UserContext(_) => EventKind::UserContext,
            Self::MessageContext(_) => EventKind::MessageContext,
            Self::Autocomplete(_) => EventKind::Autocomplete,
            Self::ModalSubmit(_) => EventKind::ModalSubmit,
        }
    }

    /// Returns the routing identifier: the command name or modal id.
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Self::Ready(_) | Self::MessageReceived(_) => None,
            Self::SlashCommand(e) => Some(&e.command),
            Self::UserContext(e) => Some(&e.command),
            Self::MessageContext(e) => Some(&e.command),
            Self::Autocomplete(e) => Some(&e.command),
            Self::ModalSubmit(e) => Some(&e.modal_id),
        }
    }

    /// Returns the name of the option being typed (autocomplete only).
    pub fn focused_option(&self) -> Option<&str> {
        match self {
            Self::Autocomplete(e) => e.focused_option().map(|o| o.name.as_str()),
            _ => None,
        }
    }

    /// Returns the interaction data, if this event is an interaction.
    pub fn interaction(&self) -> Option<&Interaction> {
        match self {
            Self::Ready(_) | Self::MessageReceived(_) => None,
            Self::SlashCommand(e) => Some(e.interaction()),
            Self::UserContext(e) => Some(e.interaction()),
            Self::MessageContext(e) => Some(e.interaction()),
            Self::Autocomplete(e) => Some(e.interaction()),
            Self::ModalSubmit(e) => Some(e.interaction()),
        }
    }

    /// Looks up a named value: a command option for slash commands and
    /// autocomplete, a text-input field for modal submissions.
    pub fn value(&self, name: &str) -> Option<OptionValue> {
        let options = match self {
            Self::SlashCommand(e) => &e.options,
            Self::Autocomplete(e) => &e.options,
            Self::ModalSubmit(e) => {
                return e
                    .fields
                    .iter()
                    .find(|f| f.id == name)
                    .map(|f| OptionValue::String(f.value.clone()));
            }
            _ => return None,
        };
        options
            .iter()
            .find(|o| o.name == name)
            .map(|o| o.value.clone())
    }
}

// ============================================================================
// Event Extraction
// ============================================================================

/// Trait for extracting a typed payload from an [`InboundEvent`].
///
/// `KIND` is the event kind the payload belongs to; `None` means the type
/// accepts every kind (only [`InboundEvent`] itself).
pub trait FromEvent: Sized + Send + Sync + 'static {
    const KIND: Option<EventKind>;

    /// Attempts to extract this payload, cloning out of the event.
    fn from_event(event: &InboundEvent) -> Option<Self>;
}

impl FromEvent for InboundEvent {
    const KIND: Option<EventKind> = None;

    fn from_event(event: &InboundEvent) -> Option<Self> {
        Some(event.clone())
    }
}

macro_rules! impl_from_event {
    ($($variant:ident),*) => {
        $(
            impl FromEvent for $variant {
                const KIND: Option<EventKind> = Some(EventKind::$variant);

                fn from_event(event: &InboundEvent) -> Option<Self> {
                    match event {
                        InboundEvent::$variant(e) => Some(e.clone()),
                        _ => None,
                    }
                }
            }

            impl From<$variant> for InboundEvent {
                fn from(e: $variant) -> Self {
                    InboundEvent::$variant(e)
                }
            }
        )*
    };
}

impl_from_event!(
    Ready,
    MessageReceived,
    SlashCommand,
    UserContext,
    MessageContext,
    Autocomplete,
    ModalSubmit
);
