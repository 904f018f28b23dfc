//! General Bot
//!
//! Two controllers showing every mapping style Herald supports:
//!
//! - [`GeneralListener`]: ready logging, raw message ping, slash `/ping`,
//!   user and message context commands, and `/options` with autocomplete
//! - [`FormListener`]: a slash command opening a modal and the modal's
//!   submission handler
//!
//! [`console`] provides a client that logs outbound calls and reads
//! JSON-lines events from stdin, so the bot runs without a platform
//! connection:
//!
//! ```bash
//! cargo run --package general-bot < demos/general-bot/events.jsonl
//! ```

use std::sync::Arc;

use herald::prelude::BoxedController;

pub mod console;
pub mod form;
pub mod general;

pub use form::FormListener;
pub use general::GeneralListener;

/// All controllers of this bot.
pub fn controllers() -> Vec<BoxedController> {
    vec![Arc::new(GeneralListener), Arc::new(FormListener)]
}

/// Number of whitespace-separated words in `text`.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald::prelude::*;

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("Too Like the Lightning"), 4);
        assert_eq!(count_words("Too Like the Lightning\n"), 4);
        assert_eq!(count_words("  spaced   out \n words "), 3);
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn test_controllers_register_cleanly() {
        let controllers = controllers();
        let schema = CommandSchema::collect(&controllers).unwrap();

        let mut registrar = Registrar::new();
        for controller in &controllers {
            registrar.register(controller.as_ref());
        }
        let dispatcher = registrar.build(&schema).unwrap();

        assert_eq!(schema.commands().len(), 5);
        assert_eq!(schema.modals().len(), 1);
        assert_eq!(dispatcher.handler_count(), 9);
    }
}
