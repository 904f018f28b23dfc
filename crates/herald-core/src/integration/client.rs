//! Client trait and related types.
//!
//! The [`Client`] is the connection to the chat platform. The runtime feeds
//! events it receives into the dispatcher; handlers answer through it.
//!
//! Implementations decide how calls reach the platform (gateway and REST,
//! a console, a recorder in tests). Herald itself never opens a connection.

use std::sync::Arc;

use async_trait::async_trait;

use crate::foundation::command::{Choice, CommandData, Modal};
use crate::foundation::error::ApiResult;
use crate::foundation::event::Interaction;
use crate::foundation::model::{Guild, Snowflake};

/// Where application commands are published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandScope {
    /// Visible in every guild the client is in. Propagation can take a while.
    Global,
    /// Visible in one guild only. Takes effect immediately.
    Guild(Snowflake),
}

/// The core Client trait.
///
/// # Acknowledgement
///
/// The platform accepts exactly one initial response per interaction:
/// [`reply`](Self::reply), [`reply_choices`](Self::reply_choices) or
/// [`reply_modal`](Self::reply_modal). The framework guards this with a
/// per-event flag, so implementations only ever see the first response.
#[async_trait]
pub trait Client: Send + Sync {
    /// Posts a message to a channel, returning the new message's id.
    async fn send_message(&self, channel_id: Snowflake, content: &str) -> ApiResult<Snowflake>;

    /// Answers an interaction with a text message.
    async fn reply(&self, interaction: &Interaction, content: &str) -> ApiResult<()>;

    /// Answers an autocomplete interaction with candidate choices.
    async fn reply_choices(&self, interaction: &Interaction, choices: &[Choice]) -> ApiResult<()>;

    /// Answers an interaction by opening a modal.
    async fn reply_modal(&self, interaction: &Interaction, modal: &Modal) -> ApiResult<()>;

    /// Lists the guilds the client is connected to.
    async fn guilds(&self) -> ApiResult<Vec<Guild>>;

    /// Replaces the published command set in `scope` with `commands`.
    async fn publish_commands(&self, scope: CommandScope, commands: &[CommandData])
    -> ApiResult<()>;
}

/// Type alias for a shared client.
pub type BoxedClient = Arc<dyn Client>;
