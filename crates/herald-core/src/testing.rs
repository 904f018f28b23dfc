//! Testing utilities for Herald.
//!
//! Enabled with the `testing` feature.
//!
//! - [`RecordingClient`]: A [`Client`] that records every outbound call
//!
//! # Example
//!
//! ```rust,ignore
//! let client = RecordingClient::new();
//! dispatcher.dispatch(event, client.boxed()).await;
//!
//! assert_eq!(client.replies(), vec!["pong".to_string()]);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::foundation::command::{Choice, CommandData, Modal};
use crate::foundation::error::{ApiError, ApiResult};
use crate::foundation::event::Interaction;
use crate::foundation::model::{Guild, Snowflake};
use crate::integration::client::{BoxedClient, Client, CommandScope};

/// One outbound call observed by a [`RecordingClient`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SendMessage {
        channel_id: Snowflake,
        content: String,
    },
    Reply {
        interaction_id: Snowflake,
        content: String,
    },
    ReplyChoices {
        interaction_id: Snowflake,
        choices: Vec<Choice>,
    },
    ReplyModal {
        interaction_id: Snowflake,
        modal: Modal,
    },
    Guilds,
    PublishCommands {
        scope: CommandScope,
        commands: Vec<CommandData>,
    },
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    guilds: Vec<Guild>,
    failing_channels: Vec<Snowflake>,
    failing_replies: usize,
    fail_publish: bool,
}

/// A client that records every call and answers from canned state.
///
/// Clones share the same recording.
#[derive(Clone, Default)]
pub struct RecordingClient {
    state: Arc<Mutex<State>>,
    next_message_id: Arc<AtomicU64>,
}

impl RecordingClient {
    /// Creates a recording client connected to no guilds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the guilds returned by [`Client::guilds`].
    pub fn with_guilds(self, guilds: Vec<Guild>) -> Self {
        self.state.lock().guilds = guilds;
        self
    }

    /// Makes `send_message` to `channel_id` fail with [`ApiError::UnknownChannel`].
    pub fn failing_channel(self, channel_id: Snowflake) -> Self {
        self.state.lock().failing_channels.push(channel_id);
        self
    }

    /// Makes the next `count` interaction replies fail with
    /// [`ApiError::Rejected`].
    pub fn failing_replies(self, count: usize) -> Self {
        self.state.lock().failing_replies = count;
        self
    }

    /// Makes `publish_commands` fail.
    pub fn failing_publish(self) -> Self {
        self.state.lock().fail_publish = true;
        self
    }

    /// Returns this client as a shared [`BoxedClient`].
    pub fn boxed(&self) -> BoxedClient {
        Arc::new(self.clone())
    }

    /// Get a clone of the recorded calls.
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    /// Text of every interaction reply, in call order.
    pub fn replies(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Reply { content, .. } => Some(content),
                _ => None,
            })
            .collect()
    }

    /// Every `(channel, content)` pair sent with `send_message`.
    pub fn sent_messages(&self) -> Vec<(Snowflake, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::SendMessage {
                    channel_id,
                    content,
                } => Some((channel_id, content)),
                _ => None,
            })
            .collect()
    }

    /// Every choice list sent as an autocomplete response.
    pub fn choice_replies(&self) -> Vec<Vec<Choice>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::ReplyChoices { choices, .. } => Some(choices),
                _ => None,
            })
            .collect()
    }

    /// Every modal opened as a response.
    pub fn modal_replies(&self) -> Vec<Modal> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::ReplyModal { modal, .. } => Some(modal),
                _ => None,
            })
            .collect()
    }

    /// Every publish call.
    pub fn published(&self) -> Vec<(CommandScope, Vec<CommandData>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::PublishCommands { scope, commands } => Some((scope, commands)),
                _ => None,
            })
            .collect()
    }

    /// Get the number of recorded calls.
    pub fn count(&self) -> usize {
        self.state.lock().calls.len()
    }

    /// Clear all recorded calls.
    pub fn clear(&self) {
        self.state.lock().calls.clear();
    }

    fn record(&self, call: Call) {
        self.state.lock().calls.push(call);
    }
}

#[async_trait]
impl Client for RecordingClient {
    async fn send_message(&self, channel_id: Snowflake, content: &str) -> ApiResult<Snowflake> {
        if self.state.lock().failing_channels.contains(&channel_id) {
            return Err(ApiError::UnknownChannel(channel_id));
        }
        self.record(Call::SendMessage {
            channel_id,
            content: content.to_string(),
        });
        Ok(self.next_message_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    async fn reply(&self, interaction: &Interaction, content: &str) -> ApiResult<()> {
        {
            let mut state = self.state.lock();
            if state.failing_replies > 0 {
                state.failing_replies -= 1;
                return Err(ApiError::Rejected {
                    code: 10062,
                    message: "Unknown interaction".into(),
                });
            }
        }
        self.record(Call::Reply {
            interaction_id: interaction.id,
            content: content.to_string(),
        });
        Ok(())
    }

    async fn reply_choices(&self, interaction: &Interaction, choices: &[Choice]) -> ApiResult<()> {
        self.record(Call::ReplyChoices {
            interaction_id: interaction.id,
            choices: choices.to_vec(),
        });
        Ok(())
    }

    async fn reply_modal(&self, interaction: &Interaction, modal: &Modal) -> ApiResult<()> {
        self.record(Call::ReplyModal {
            interaction_id: interaction.id,
            modal: modal.clone(),
        });
        Ok(())
    }

    async fn guilds(&self) -> ApiResult<Vec<Guild>> {
        self.record(Call::Guilds);
        Ok(self.state.lock().guilds.clone())
    }

    async fn publish_commands(
        &self,
        scope: CommandScope,
        commands: &[CommandData],
    ) -> ApiResult<()> {
        if self.state.lock().fail_publish {
            return Err(ApiError::Rejected {
                code: 50035,
                message: "Invalid Form Body".into(),
            });
        }
        self.record(Call::PublishCommands {
            scope,
            commands: commands.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_recording() {
        let client = RecordingClient::new();
        let boxed = client.boxed();
        boxed.send_message(7, "hello").await.unwrap();

        assert_eq!(client.sent_messages(), vec![(7, "hello".to_string())]);
    }

    #[tokio::test]
    async fn test_failing_channel_is_not_recorded() {
        let client = RecordingClient::new().failing_channel(9);
        let err = client.send_message(9, "hello").await.unwrap_err();

        assert!(matches!(err, ApiError::UnknownChannel(9)));
        assert_eq!(client.count(), 0);
    }
}
