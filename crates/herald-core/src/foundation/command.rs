//! Command schema and option types.
//!
//! Two halves live here:
//!
//! - **Schema** ([`CommandData`], [`OptionData`], [`Modal`], [`TextInput`]):
//!   what gets published to the platform once at startup and what handler
//!   parameter declarations are validated against.
//! - **Values** ([`CommandOption`], [`OptionValue`], [`ModalField`],
//!   [`Choice`]): what arrives inside interaction events and what
//!   autocomplete replies carry.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::model::User;

// ============================================================================
// Option Types & Values
// ============================================================================

/// The type of a command option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionType {
    String,
    Integer,
    Boolean,
    User,
}

impl OptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::User => "user",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed option value as delivered by the platform.
///
/// Serialized untagged: JSON strings, integers, booleans and user objects map
/// onto the matching variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    User(User),
}

impl OptionValue {
    /// Returns the [`OptionType`] of this value.
    pub fn option_type(&self) -> OptionType {
        match self {
            Self::String(_) => OptionType::String,
            Self::Integer(_) => OptionType::Integer,
            Self::Boolean(_) => OptionType::Boolean,
            Self::User(_) => OptionType::User,
        }
    }

    /// Returns the value as a string slice if it is a string option.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

/// A named option value inside a slash-command or autocomplete interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOption {
    pub name: String,
    pub value: OptionValue,
    /// Set on the option the user is currently typing (autocomplete only).
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub focused: bool,
}

impl CommandOption {
    pub fn new(name: impl Into<String>, value: OptionValue) -> Self {
        Self {
            name: name.into(),
            value,
            focused: false,
        }
    }

    /// Marks this option as the one being typed.
    pub fn focused(mut self) -> Self {
        self.focused = true;
        self
    }
}

/// A submitted text-input value inside a modal submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalField {
    pub id: String,
    pub value: String,
}

// ============================================================================
// Autocomplete Choices
// ============================================================================

/// An autocomplete candidate: the text shown to the user and the value
/// submitted when it is picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub name: String,
    pub value: String,
}

impl Choice {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Builds the choices whose text contains `typed` (case-sensitive).
    ///
    /// Each surviving candidate becomes a choice whose display text and
    /// submitted value are both the candidate itself. Candidate order is kept.
    pub fn filter_contains<I, S>(candidates: I, typed: &str) -> Vec<Choice>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        candidates
            .into_iter()
            .filter(|candidate| candidate.as_ref().contains(typed))
            .map(|candidate| Choice::new(candidate.as_ref(), candidate.as_ref()))
            .collect()
    }
}

// ============================================================================
// Command Schema
// ============================================================================

/// The kind of application command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandType {
    /// Typed as `/name` in the chat client.
    Slash,
    /// Shown on a user's context menu.
    User,
    /// Shown on a message's context menu.
    Message,
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Slash => "slash",
            Self::User => "user",
            Self::Message => "message",
        })
    }
}

/// Declaration of a single command option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionData {
    pub option_type: OptionType,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub autocomplete: bool,
}

impl OptionData {
    /// Creates an optional, non-autocompleted option.
    pub fn new(
        option_type: OptionType,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            option_type,
            name: name.into(),
            description: description.into(),
            required: false,
            autocomplete: false,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn autocomplete(mut self, autocomplete: bool) -> Self {
        self.autocomplete = autocomplete;
        self
    }
}

/// Declaration of an application command as published to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandData {
    pub command_type: CommandType,
    pub name: String,
    /// Only slash commands carry a description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionData>,
}

impl CommandData {
    /// A slash command, invoked as `/name`.
    pub fn slash(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            command_type: CommandType::Slash,
            name: name.into(),
            description: Some(description.into()),
            options: Vec::new(),
        }
    }

    /// A user context-menu command.
    pub fn user(name: impl Into<String>) -> Self {
        Self {
            command_type: CommandType::User,
            name: name.into(),
            description: None,
            options: Vec::new(),
        }
    }

    /// A message context-menu command.
    pub fn message(name: impl Into<String>) -> Self {
        Self {
            command_type: CommandType::Message,
            name: name.into(),
            description: None,
            options: Vec::new(),
        }
    }

    /// Adds an option.
    pub fn option(mut self, option: OptionData) -> Self {
        self.options.push(option);
        self
    }

    /// Looks up an option by name.
    pub fn find_option(&self, name: &str) -> Option<&OptionData> {
        self.options.iter().find(|o| o.name == name)
    }
}

// ============================================================================
// Modals
// ============================================================================

/// Visual style of a modal text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextInputStyle {
    /// Single line.
    Short,
    /// Multi-line.
    Paragraph,
}

/// A text input row of a modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextInput {
    pub id: String,
    pub label: String,
    pub style: TextInputStyle,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl TextInput {
    /// Creates a required text input.
    pub fn new(id: impl Into<String>, label: impl Into<String>, style: TextInputStyle) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            style,
            required: true,
            placeholder: None,
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// A pop-up form. Its `id` is the identifier its submission is routed by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modal {
    pub id: String,
    pub title: String,
    pub inputs: Vec<TextInput>,
}

impl Modal {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            inputs: Vec::new(),
        }
    }

    /// Adds a text input row.
    pub fn input(mut self, input: TextInput) -> Self {
        self.inputs.push(input);
        self
    }

    /// Looks up a text input by id.
    pub fn find_input(&self, id: &str) -> Option<&TextInput> {
        self.inputs.iter().find(|i| i.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_contains_substring() {
        let choices = Choice::filter_contains(["Apple", "Banana", "Pear"], "an");
        assert_eq!(choices, vec![Choice::new("Banana", "Banana")]);
    }

    #[test]
    fn test_filter_contains_is_case_sensitive() {
        let choices = Choice::filter_contains(["Apple", "Banana", "Pear"], "ap");
        assert!(choices.is_empty());
    }

    #[test]
    fn test_filter_contains_empty_input_keeps_all() {
        let choices = Choice::filter_contains(["Apple", "Banana", "Pear"], "");
        assert_eq!(choices.len(), 3);
        assert_eq!(choices[0].value, "Apple");
    }

    #[test]
    fn test_command_option_json_shape() {
        let option: CommandOption = serde_json::from_value(serde_json::json!({
            "name": "fruit",
            "value": "Pe",
            "focused": true
        }))
        .unwrap();
        assert_eq!(option.name, "fruit");
        assert_eq!(option.value, OptionValue::String("Pe".into()));
        assert!(option.focused);
    }
}
