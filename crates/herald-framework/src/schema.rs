//! Command schema aggregation.
//!
//! Every controller contributes its commands and modals; the aggregate is
//! what gets published to the platform (once) and what handler mappings are
//! validated against.

use herald_core::{CommandData, CommandType, Modal};

use crate::controller::BoxedController;
use crate::error::{SchemaError, SchemaResult};

/// The commands and modals of all controllers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandSchema {
    commands: Vec<CommandData>,
    modals: Vec<Modal>,
}

impl CommandSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregates the schemas of `controllers`, in order.
    ///
    /// Fails on the first command name declared twice for the same command
    /// type, or modal id declared twice.
    pub fn collect(controllers: &[BoxedController]) -> SchemaResult<Self> {
        let mut schema = Self::new();
        for controller in controllers {
            for command in controller.commands() {
                schema.add_command(command)?;
            }
            for modal in controller.modals() {
                schema.add_modal(modal)?;
            }
        }
        Ok(schema)
    }

    pub fn add_command(&mut self, command: CommandData) -> SchemaResult<()> {
        if self
            .find_command(command.command_type, &command.name)
            .is_some()
        {
            return Err(SchemaError::DuplicateCommand {
                command_type: command.command_type,
                name: command.name,
            });
        }
        self.commands.push(command);
        Ok(())
    }

    pub fn add_modal(&mut self, modal: Modal) -> SchemaResult<()> {
        if self.find_modal(&modal.id).is_some() {
            return Err(SchemaError::DuplicateModal { id: modal.id });
        }
        self.modals.push(modal);
        Ok(())
    }

    /// Builder-style [`add_command`](Self::add_command).
    pub fn with_command(mut self, command: CommandData) -> SchemaResult<Self> {
        self.add_command(command)?;
        Ok(self)
    }

    /// Builder-style [`add_modal`](Self::add_modal).
    pub fn with_modal(mut self, modal: Modal) -> SchemaResult<Self> {
        self.add_modal(modal)?;
        Ok(self)
    }

    /// All commands, in declaration order.
    pub fn commands(&self) -> &[CommandData] {
        &self.commands
    }

    pub fn modals(&self) -> &[Modal] {
        &self.modals
    }

    pub fn find_command(&self, command_type: CommandType, name: &str) -> Option<&CommandData> {
        self.commands
            .iter()
            .find(|c| c.command_type == command_type && c.name == name)
    }

    pub fn find_modal(&self, id: &str) -> Option<&Modal> {
        self.modals.iter().find(|m| m.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_different_type_is_allowed() {
        let schema = CommandSchema::new()
            .with_command(CommandData::slash("ping", "Replies with pong"))
            .and_then(|s| s.with_command(CommandData::user("ping")))
            .unwrap();
        assert_eq!(schema.commands().len(), 2);
    }

    #[test]
    fn test_duplicate_command_is_rejected() {
        let err = CommandSchema::new()
            .with_command(CommandData::slash("ping", "a"))
            .and_then(|s| s.with_command(CommandData::slash("ping", "b")))
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateCommand {
                command_type: CommandType::Slash,
                name: "ping".into()
            }
        );
    }

    #[test]
    fn test_duplicate_modal_is_rejected() {
        let err = CommandSchema::new()
            .with_modal(Modal::new("form_modal", "A"))
            .and_then(|s| s.with_modal(Modal::new("form_modal", "B")))
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateModal {
                id: "form_modal".into()
            }
        );
    }
}
