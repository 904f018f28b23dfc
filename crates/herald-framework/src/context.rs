//! Handler context.
//!
//! Two context types model how one event is processed by several handlers:
//!
//! - [`BaseContext`] is the **shared** base for one dispatch cycle. A single
//!   `Arc<BaseContext>` is created per inbound event and handed to every
//!   matching handler. It holds the event, the client, and the
//!   acknowledgement flag.
//!
//! - [`Context<E>`] is what a handler receives: the shared base plus the
//!   event payload `E` already extracted. It dereferences to `E`.
//!
//! The platform accepts one initial response per interaction. Responding
//! through any handler's context flips the shared flag, so a second handler
//! trying to answer the same interaction gets
//! [`ApiError::AlreadyAcknowledged`] instead of a platform error. A failed
//! client call releases the flag again.
//!
//! Replies produced from handler return values go through
//! [`BaseContext::respond_detached`]: the response slot is claimed right away
//! and the client call runs on a tracked task the dispatcher does not await.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use herald_core::{
    ApiError, ApiResult, Autocomplete, BoxedClient, Choice, FromEvent, InboundEvent, Interaction,
    Interactive, MessageReceived, Modal, Snowflake,
};
use tokio_util::task::TaskTracker;
use tracing::{error, warn};

// =============================================================================
// BaseContext: shared base, one per dispatch cycle
// =============================================================================

/// The shared base context for a single event dispatch cycle.
pub struct BaseContext {
    event: InboundEvent,
    client: BoxedClient,
    /// Set by the first response to the event's interaction.
    acknowledged: AtomicBool,
    replies: TaskTracker,
}

impl BaseContext {
    /// Creates a new shared event context with its own reply tracker.
    pub fn new(event: InboundEvent, client: BoxedClient) -> Self {
        Self::with_tracker(event, client, TaskTracker::new())
    }

    pub(crate) fn with_tracker(
        event: InboundEvent,
        client: BoxedClient,
        replies: TaskTracker,
    ) -> Self {
        Self {
            event,
            client,
            acknowledged: AtomicBool::new(false),
            replies,
        }
    }

    /// Returns the event being dispatched.
    pub fn event(&self) -> &InboundEvent {
        &self.event
    }

    /// Returns the platform client.
    pub fn client(&self) -> &BoxedClient {
        &self.client
    }

    /// Returns `true` once some handler has responded to the interaction.
    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged.load(Ordering::SeqCst)
    }

    /// Claims the single initial response slot of `interaction`.
    fn acknowledge(&self, interaction: &Interaction) -> ApiResult<()> {
        if self.acknowledged.swap(true, Ordering::SeqCst) {
            return Err(ApiError::AlreadyAcknowledged {
                interaction_id: interaction.id,
            });
        }
        Ok(())
    }

    /// Clears the flag after a failed client call so another reply can go out.
    fn release_on_error<T>(&self, result: ApiResult<T>) -> ApiResult<T> {
        if result.is_err() {
            self.acknowledged.store(false, Ordering::SeqCst);
        }
        result
    }

    pub(crate) async fn reply_to(&self, interaction: &Interaction, content: &str) -> ApiResult<()> {
        self.acknowledge(interaction)?;
        let result = self.client.reply(interaction, content).await;
        self.release_on_error(result)
    }

    pub(crate) async fn modal_to(&self, interaction: &Interaction, modal: &Modal) -> ApiResult<()> {
        self.acknowledge(interaction)?;
        let result = self.client.reply_modal(interaction, modal).await;
        self.release_on_error(result)
    }

    pub(crate) async fn choices_to(
        &self,
        interaction: &Interaction,
        choices: &[Choice],
    ) -> ApiResult<()> {
        self.acknowledge(interaction)?;
        let result = self.client.reply_choices(interaction, choices).await;
        self.release_on_error(result)
    }

    /// Answers the event with a text message.
    ///
    /// Interactions get an interaction reply; raw messages get a message in
    /// the same channel. Ready events have nobody to answer.
    pub async fn respond(&self, content: &str) -> ApiResult<()> {
        self.claim_response()?;
        self.deliver(content).await
    }

    /// Like [`respond`](Self::respond), but only the response slot is claimed
    /// before returning. The client call runs on the dispatcher's reply
    /// tracker and failures are logged.
    ///
    /// Must be called within a Tokio runtime.
    pub fn respond_detached(self: &Arc<Self>, content: String) {
        if let Err(e) = self.claim_response() {
            match e {
                ApiError::AlreadyAcknowledged { .. } => warn!("Dropping handler reply: {e}"),
                _ => error!("Failed to send reply: {e}"),
            }
            return;
        }

        let base = Arc::clone(self);
        self.replies.spawn(async move {
            if let Err(e) = base.deliver(&content).await {
                error!("Failed to send reply: {e}");
            }
        });
    }

    /// Claims the interaction's response slot. Raw messages have none.
    fn claim_response(&self) -> ApiResult<()> {
        match &self.event {
            InboundEvent::MessageReceived(_) => Ok(()),
            InboundEvent::Ready(_) => Err(ApiError::Other(
                "ready events have no reply target".to_string(),
            )),
            other => match other.interaction() {
                Some(interaction) => self.acknowledge(interaction),
                None => Err(ApiError::Other(format!("{} has no reply target", other.kind()))),
            },
        }
    }

    async fn deliver(&self, content: &str) -> ApiResult<()> {
        match &self.event {
            InboundEvent::MessageReceived(e) => self
                .client
                .send_message(e.message.channel_id, content)
                .await
                .map(|_| ()),
            other => match other.interaction() {
                Some(interaction) => {
                    let result = self.client.reply(interaction, content).await;
                    self.release_on_error(result)
                }
                None => Err(ApiError::Other(format!("{} has no reply target", other.kind()))),
            },
        }
    }
}

impl fmt::Debug for BaseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseContext")
            .field("event", &self.event.kind())
            .field("acknowledged", &self.is_acknowledged())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Context<E>: handed to handlers
// =============================================================================

/// The context a handler receives, typed by the event payload it handles.
///
/// ```rust,ignore
/// async fn ping(ctx: Context<SlashCommand>) -> ApiResult<()> {
///     tracing::info!(user = %ctx.interaction.user.name, "ping");
///     ctx.reply("pong").await
/// }
/// ```
pub struct Context<E> {
    base: Arc<BaseContext>,
    event: E,
}

impl<E: FromEvent> Context<E> {
    /// Extracts `E` from the shared event; `None` if the kinds differ.
    pub fn new(base: Arc<BaseContext>) -> Option<Self> {
        let event = E::from_event(base.event())?;
        Some(Self { base, event })
    }
}

impl<E> Context<E> {
    /// Returns the platform client.
    pub fn client(&self) -> &BoxedClient {
        self.base.client()
    }

    /// Returns the untyped event.
    pub fn raw(&self) -> &InboundEvent {
        self.base.event()
    }

    /// Returns the shared base context.
    pub fn base(&self) -> &Arc<BaseContext> {
        &self.base
    }

    /// Consumes the context, returning the payload.
    pub fn into_inner(self) -> E {
        self.event
    }
}

impl<E: Interactive> Context<E> {
    /// Replies to the interaction with a text message.
    pub async fn reply(&self, content: impl AsRef<str>) -> ApiResult<()> {
        self.base
            .reply_to(self.event.interaction(), content.as_ref())
            .await
    }

    /// Replies to the interaction by opening a modal.
    pub async fn reply_modal(&self, modal: &Modal) -> ApiResult<()> {
        self.base.modal_to(self.event.interaction(), modal).await
    }
}

impl Context<Autocomplete> {
    /// Answers the autocomplete request with candidate choices.
    pub async fn reply_choices(&self, choices: &[Choice]) -> ApiResult<()> {
        self.base
            .choices_to(self.event.interaction(), choices)
            .await
    }
}

impl Context<MessageReceived> {
    /// Posts a message to the channel the received message was sent in.
    pub async fn send(&self, content: impl AsRef<str>) -> ApiResult<Snowflake> {
        self.client()
            .send_message(self.event.message.channel_id, content.as_ref())
            .await
    }
}

impl<E> Deref for Context<E> {
    type Target = E;

    fn deref(&self) -> &Self::Target {
        &self.event
    }
}

impl<E: fmt::Debug> fmt::Debug for Context<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("event", &self.event)
            .field("acknowledged", &self.base.is_acknowledged())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::testing::RecordingClient;
    use herald_core::{SlashCommand, User};

    fn slash_event() -> InboundEvent {
        serde_json::from_value(serde_json::json!({
            "type": "slash_command",
            "interaction": { "id": 5, "token": "t", "user": { "id": 1, "name": "ada" } },
            "command": "ping"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_second_reply_is_rejected() {
        let client = RecordingClient::new();
        let base = Arc::new(BaseContext::new(slash_event(), client.boxed()));
        let first = Context::<SlashCommand>::new(Arc::clone(&base)).unwrap();
        let second = Context::<SlashCommand>::new(Arc::clone(&base)).unwrap();

        first.reply("pong").await.unwrap();
        let err = second.reply("pong again").await.unwrap_err();

        assert!(matches!(
            err,
            ApiError::AlreadyAcknowledged { interaction_id: 5 }
        ));
        assert_eq!(client.replies(), vec!["pong".to_string()]);
    }

    #[test]
    fn test_respond_to_message_posts_in_channel() {
        let client = RecordingClient::new();
        let event = InboundEvent::MessageReceived(MessageReceived {
            message: herald_core::Message {
                id: 1,
                channel_id: 42,
                guild_id: None,
                author: User::new(2, "bob"),
                content: "ping".into(),
            },
        });
        let base = BaseContext::new(event, client.boxed());

        tokio_test::block_on(base.respond("pong")).unwrap();

        assert_eq!(client.sent_messages(), vec![(42, "pong".to_string())]);
        assert!(!base.is_acknowledged());
    }

    #[test]
    fn test_context_rejects_other_kinds() {
        let client = RecordingClient::new();
        let base = Arc::new(BaseContext::new(slash_event(), client.boxed()));
        assert!(Context::<Autocomplete>::new(base).is_none());
    }

    #[tokio::test]
    async fn test_failed_reply_releases_acknowledgement() {
        let client = RecordingClient::new().failing_replies(1);
        let base = Arc::new(BaseContext::new(slash_event(), client.boxed()));
        let ctx = Context::<SlashCommand>::new(Arc::clone(&base)).unwrap();

        let err = ctx.reply("pong").await.unwrap_err();
        assert!(matches!(err, ApiError::Rejected { code: 10062, .. }));
        assert!(!base.is_acknowledged());

        ctx.reply("pong again").await.unwrap();
        assert!(base.is_acknowledged());
        assert_eq!(client.replies(), vec!["pong again".to_string()]);
    }

    #[tokio::test]
    async fn test_detached_reply_claims_slot_immediately() {
        let client = RecordingClient::new();
        let tracker = TaskTracker::new();
        let base = Arc::new(BaseContext::with_tracker(
            slash_event(),
            client.boxed(),
            tracker.clone(),
        ));

        base.respond_detached("pong".to_string());
        base.respond_detached("again".to_string());
        assert!(base.is_acknowledged());

        tracker.close();
        tracker.wait().await;
        assert_eq!(client.replies(), vec!["pong".to_string()]);
    }
}
