//! A slash command that opens a modal, and the modal's submission handler.

use tracing::info;

use herald::prelude::*;

/// Id of the book form modal.
pub const BOOK_MODAL: &str = "form_modal";

pub struct FormListener;

impl Controller for FormListener {
    fn name(&self) -> &str {
        "form"
    }

    fn register(&self, registrar: &mut Registrar) {
        registrar
            .map(Mapping::id("form"), open_form)
            .map_with(
                Mapping::id(BOOK_MODAL),
                &["title", "author", "description"],
                submit_form,
            );
    }

    fn commands(&self) -> Vec<CommandData> {
        vec![CommandData::slash("form", "Fill out this form please.")]
    }

    fn modals(&self) -> Vec<Modal> {
        vec![book_modal()]
    }
}

/// The "Create Book" modal: title and author are required, the description
/// is optional.
pub fn book_modal() -> Modal {
    Modal::new(BOOK_MODAL, "Create Book")
        .input(
            TextInput::new("title", "Book Title", TextInputStyle::Short)
                .placeholder("Too Like the Lightning"),
        )
        .input(
            TextInput::new("author", "Book Author", TextInputStyle::Short).placeholder("Ada Palmer"),
        )
        .input(
            TextInput::new("description", "Book Description", TextInputStyle::Paragraph)
                .required(false),
        )
}

async fn open_form(ctx: Context<SlashCommand>) -> ApiResult<()> {
    ctx.reply_modal(&book_modal()).await
}

async fn submit_form(
    _ctx: Context<ModalSubmit>,
    title: String,
    author: String,
    description: Option<String>,
) -> &'static str {
    info!("Book title: {title}");
    info!("Book author: {author}");
    info!(
        "Book description: {}",
        description.as_deref().unwrap_or("<none>")
    );
    "Thank you for your submission!"
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald::core::testing::RecordingClient;
    use serde_json::json;

    fn dispatcher() -> Dispatcher {
        let schema = CommandSchema::new()
            .with_command(CommandData::slash("form", "Fill out this form please."))
            .and_then(|s| s.with_modal(book_modal()))
            .unwrap();
        let mut registrar = Registrar::new();
        registrar.register(&FormListener);
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
        json!({ "id": 8, "token": "tok", "user": { "id": 2, "name": "ada" } })
    }

    #[test]
    fn test_book_modal_inputs() {
        let modal = book_modal();
        assert_eq!(modal.title, "Create Book");
        assert!(modal.find_input("title").is_some_and(|i| i.required));
        assert_eq!(
            modal.find_input("author").and_then(|i| i.placeholder.as_deref()),
            Some("Ada Palmer")
        );
        let description = modal.find_input("description").unwrap();
        assert!(!description.required);
        assert_eq!(description.style, TextInputStyle::Paragraph);
    }

    #[tokio::test]
    async fn test_form_opens_modal() {
        let client = RecordingClient::new();
        let form: InboundEvent = serde_json::from_value(json!({
            "type": "slash_command", "interaction": interaction(), "command": "form"
        }))
        .unwrap();

        dispatch(form, &client).await;

        assert_eq!(client.modal_replies(), vec![book_modal()]);
    }

    #[tokio::test]
    async fn test_submission_without_description() {
        let client = RecordingClient::new();
        let submit: InboundEvent = serde_json::from_value(json!({
            "type": "modal_submit",
            "interaction": interaction(),
            "modal_id": "form_modal",
            "fields": [
                { "id": "title", "value": "Too Like the Lightning" },
                { "id": "author", "value": "Ada Palmer" }
            ]
        }))
        .unwrap();

        let report = dispatch(submit, &client).await;

        assert_eq!(report.invoked, 1);
        assert_eq!(
            client.replies(),
            vec!["Thank you for your submission!".to_string()]
        );
    }

    #[tokio::test]
    async fn test_submission_missing_title_is_skipped() {
        let client = RecordingClient::new();
        let submit: InboundEvent = serde_json::from_value(json!({
            "type": "modal_submit",
            "interaction": interaction(),
            "modal_id": "form_modal",
            "fields": [{ "id": "author", "value": "Ada Palmer" }]
        }))
        .unwrap();

        let report = dispatch(submit, &client).await;

        assert_eq!(report.skipped, 1);
        assert!(client.replies().is_empty());
    }
}
