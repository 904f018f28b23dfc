//! The general listener: one handler per event kind.

use tracing::info;

use herald::prelude::*;

use crate::count_words;

/// Fruits offered by `/options` autocomplete.
pub const FRUITS: [&str; 3] = ["Apple", "Banana", "Pear"];

pub struct GeneralListener;

impl Controller for GeneralListener {
    fn name(&self) -> &str {
        "general"
    }

    fn register(&self, registrar: &mut Registrar) {
        registrar
            .map(Mapping::event(), on_ready)
            .map(Mapping::event(), ping_pong)
            .map(Mapping::id("ping"), ping_pong_slash)
            .map(Mapping::id("Name user"), name_user)
            .map(Mapping::id("Count words"), count_words_in_message)
            .map(Mapping::id("options").focused("fruit"), fruit_autocomplete)
            .map_with(Mapping::id("options"), &["fruit", "user"], options_slash);
    }

    fn commands(&self) -> Vec<CommandData> {
        vec![
            CommandData::slash("ping", "Sends a ping to the bot"),
            CommandData::user("Name user"),
            CommandData::message("Count words"),
            CommandData::slash("options", "A command with some options")
                .option(
                    OptionData::new(OptionType::String, "fruit", "Pick a fruit")
                        .required(true)
                        .autocomplete(true),
                )
                .option(OptionData::new(OptionType::User, "user", "Pick a user").required(true)),
        ]
    }
}

async fn on_ready(ctx: Context<Ready>) {
    info!("Bot {} has finished loading", ctx.self_user.name);
}

/// Answers a raw `ping` message in its channel.
async fn ping_pong(ctx: Context<MessageReceived>) -> Option<&'static str> {
    (ctx.message.content == "ping").then_some("pong")
}

async fn ping_pong_slash(_ctx: Context<SlashCommand>) -> &'static str {
    "pong"
}

/// Replies with the clicked user's name as shown in the guild.
async fn name_user(ctx: Context<UserContext>) -> String {
    ctx.target_name().to_string()
}

async fn count_words_in_message(ctx: Context<MessageContext>) -> String {
    count_words(&ctx.target.content).to_string()
}

async fn fruit_autocomplete(ctx: Context<Autocomplete>) -> ApiResult<()> {
    let choices = Choice::filter_contains(FRUITS, ctx.focused_value());
    ctx.reply_choices(&choices).await
}

async fn options_slash(_ctx: Context<SlashCommand>, fruit: String, user: User) -> String {
    info!("Fruit: {fruit} was selected");
    info!("User: {} was selected", user.name);
    format!("{} wants {fruit}", user.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald::core::testing::{Call, RecordingClient};
    use serde_json::json;

    fn dispatcher() -> Dispatcher {
        let controllers: Vec<BoxedController> = vec![std::sync::Arc::new(GeneralListener)];
        let schema = CommandSchema::collect(&controllers).unwrap();
        let mut registrar = Registrar::new();
        registrar.register(&GeneralListener);
        registrar.build(&schema).unwrap()
    }

    /// Dispatches `event` and waits for the replies it produced.
    async fn dispatch(event: InboundEvent, client: &RecordingClient) -> DispatchReport {
        let dispatcher = dispatcher();
        let report = dispatcher.dispatch(event, client.boxed()).await;
        dispatcher.flush_replies().await;
        report
    }

    fn interaction() -> serde_json::Value {
        json!({ "id": 7, "token": "tok", "user": { "id": 2, "name": "ada" } })
    }

    fn event(value: serde_json::Value) -> InboundEvent {
        serde_json::from_value(value).unwrap()
    }

    fn message(content: &str) -> InboundEvent {
        event(json!({
            "type": "message_received",
            "message": {
                "id": 1, "channel_id": 100,
                "author": { "id": 2, "name": "ada" },
                "content": content
            }
        }))
    }

    #[tokio::test]
    async fn test_raw_ping() {
        let dispatcher = dispatcher();
        let client = RecordingClient::new();

        dispatcher.dispatch(message("ping"), client.boxed()).await;
        dispatcher.dispatch(message("pingx"), client.boxed()).await;
        dispatcher.flush_replies().await;

        assert_eq!(client.sent_messages(), vec![(100, "pong".to_string())]);
    }

    #[tokio::test]
    async fn test_slash_ping() {
        let client = RecordingClient::new();
        let ping = event(json!({
            "type": "slash_command", "interaction": interaction(), "command": "ping"
        }));

        dispatch(ping, &client).await;

        assert_eq!(client.replies(), vec!["pong".to_string()]);
    }

    #[tokio::test]
    async fn test_name_user_uses_nickname() {
        let client = RecordingClient::new();
        let name_user = event(json!({
            "type": "user_context",
            "interaction": interaction(),
            "command": "Name user",
            "target": { "id": 3, "name": "mycroft", "global_name": "Mycroft" },
            "target_member": {
                "user": { "id": 3, "name": "mycroft", "global_name": "Mycroft" },
                "nickname": "Mycroft Canner"
            }
        }));

        dispatch(name_user, &client).await;

        assert_eq!(client.replies(), vec!["Mycroft Canner".to_string()]);
    }

    #[tokio::test]
    async fn test_count_words_reply() {
        let client = RecordingClient::new();
        let count = event(json!({
            "type": "message_context",
            "interaction": interaction(),
            "command": "Count words",
            "target": {
                "id": 9, "channel_id": 100,
                "author": { "id": 3, "name": "mycroft" },
                "content": "Too Like the Lightning\n"
            }
        }));

        dispatch(count, &client).await;

        assert_eq!(client.replies(), vec!["4".to_string()]);
    }

    #[tokio::test]
    async fn test_fruit_autocomplete() {
        let client = RecordingClient::new();
        let typing = event(json!({
            "type": "autocomplete",
            "interaction": interaction(),
            "command": "options",
            "options": [{ "name": "fruit", "value": "an", "focused": true }]
        }));

        let report = dispatch(typing, &client).await;

        assert_eq!(report.invoked, 1);
        assert_eq!(
            client.choice_replies(),
            vec![vec![Choice::new("Banana", "Banana")]]
        );
        assert!(client.replies().is_empty());
    }

    #[tokio::test]
    async fn test_options_slash() {
        let client = RecordingClient::new();
        let options = event(json!({
            "type": "slash_command",
            "interaction": interaction(),
            "command": "options",
            "options": [
                { "name": "fruit", "value": "Pear" },
                { "name": "user", "value": { "id": 3, "name": "mycroft" } }
            ]
        }));

        dispatch(options, &client).await;

        assert_eq!(client.replies(), vec!["mycroft wants Pear".to_string()]);
    }

    #[tokio::test]
    async fn test_ready_sends_nothing() {
        let client = RecordingClient::new();
        let ready = event(json!({
            "type": "ready", "self_user": { "id": 1, "name": "herald", "bot": true }
        }));

        let report = dispatch(ready, &client).await;

        assert_eq!(report.invoked, 1);
        assert!(
            client
                .calls()
                .iter()
                .all(|call| !matches!(call, Call::SendMessage { .. } | Call::Reply { .. }))
        );
    }
}
