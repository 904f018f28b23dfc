//! A console stand-in for a platform connection.
//!
//! [`ConsoleClient`] logs every outbound call instead of sending it, and
//! [`json_lines`] turns newline-delimited JSON into an event stream.

use std::sync::atomic::{AtomicU64, Ordering};

use futures::Stream;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use herald::async_trait;
use herald::prelude::*;

/// A client that logs outbound calls.
pub struct ConsoleClient {
    guilds: Vec<Guild>,
    next_message_id: AtomicU64,
}

impl ConsoleClient {
    /// Creates a client with no guilds.
    pub fn new() -> Self {
        Self {
            guilds: Vec::new(),
            next_message_id: AtomicU64::new(1),
        }
    }

    /// Adds a guild reported by [`Client::guilds`].
    pub fn with_guild(mut self, guild: Guild) -> Self {
        self.guilds.push(guild);
        self
    }
}

impl Default for ConsoleClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Client for ConsoleClient {
    async fn send_message(&self, channel_id: Snowflake, content: &str) -> ApiResult<Snowflake> {
        let id = self.next_message_id.fetch_add(1, Ordering::Relaxed);
        info!(channel_id, message_id = id, "send_message: {content}");
        Ok(id)
    }

    async fn reply(&self, interaction: &Interaction, content: &str) -> ApiResult<()> {
        info!(interaction = interaction.id, "reply: {content}");
        Ok(())
    }

    async fn reply_choices(&self, interaction: &Interaction, choices: &[Choice]) -> ApiResult<()> {
        let names: Vec<&str> = choices.iter().map(|c| c.name.as_str()).collect();
        info!(interaction = interaction.id, "reply_choices: {names:?}");
        Ok(())
    }

    async fn reply_modal(&self, interaction: &Interaction, modal: &Modal) -> ApiResult<()> {
        info!(
            interaction = interaction.id,
            modal = %modal.id,
            inputs = modal.inputs.len(),
            "reply_modal: {}",
            modal.title
        );
        Ok(())
    }

    async fn guilds(&self) -> ApiResult<Vec<Guild>> {
        Ok(self.guilds.clone())
    }

    async fn publish_commands(
        &self,
        scope: CommandScope,
        commands: &[CommandData],
    ) -> ApiResult<()> {
        for command in commands {
            info!(?scope, kind = ?command.command_type, "publish_commands: {}", command.name);
        }
        Ok(())
    }
}

/// Events read from stdin, one JSON object per line.
pub fn stdin_events() -> impl Stream<Item = InboundEvent> + Send {
    json_lines(BufReader::new(tokio::io::stdin()))
}

/// Parses newline-delimited JSON events. Blank lines are ignored, malformed
/// lines are logged and skipped; the stream ends at EOF or a read error.
pub fn json_lines<R>(reader: R) -> impl Stream<Item = InboundEvent> + Send
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    futures::stream::unfold(reader.lines(), |mut lines| async move {
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(e) => {
                    error!(error = %e, "Failed to read events");
                    return None;
                }
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<InboundEvent>(line) {
                Ok(event) => return Some((event, lines)),
                Err(e) => warn!(error = %e, "Skipping malformed event line"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_json_lines_skips_bad_input() {
        let input: &'static [u8] = b"\n{\"type\":\"ready\",\"self_user\":{\"id\":1,\"name\":\"herald\"}}\nnot json\n{\"type\":\"slash_command\",\"interaction\":{\"id\":2,\"token\":\"t\",\"user\":{\"id\":3,\"name\":\"ada\"}},\"command\":\"ping\"}\n";

        let kinds: Vec<EventKind> = json_lines(input).map(|e| e.kind()).collect().await;

        assert_eq!(kinds, vec![EventKind::Ready, EventKind::SlashCommand]);
    }

    #[tokio::test]
    async fn test_console_client_counts_messages() {
        let client = ConsoleClient::new().with_guild(Guild {
            id: 1,
            name: "console".into(),
            default_channel_id: Some(1),
        });

        assert_eq!(client.send_message(1, "a").await.unwrap(), 1);
        assert_eq!(client.send_message(1, "b").await.unwrap(), 2);
        assert_eq!(client.guilds().await.unwrap().len(), 1);
    }
}
