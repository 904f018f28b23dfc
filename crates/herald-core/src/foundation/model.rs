//! Platform entities carried inside events.
//!
//! These are the small subset of the chat platform's object model that the
//! dispatcher and its handlers need: users, guild members, messages and
//! guilds. Identifiers are platform snowflakes.

use serde::{Deserialize, Serialize};

/// A platform snowflake identifier.
pub type Snowflake = u64;

/// A platform account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Snowflake,
    /// The unique account name.
    pub name: String,
    /// The account-wide display name, if the user set one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_name: Option<String>,
    #[serde(default)]
    pub bot: bool,
}

impl User {
    /// Creates a user with only an id and account name.
    pub fn new(id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            global_name: None,
            bot: false,
        }
    }

    /// Returns the display name, falling back to the account name.
    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.name)
    }
}

/// A user's membership in a guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub user: User,
    /// Guild-specific nickname.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

impl Member {
    /// Returns the name shown for this member in the guild.
    ///
    /// Resolution order: guild nickname, global display name, account name.
    pub fn effective_name(&self) -> &str {
        self.nickname
            .as_deref()
            .unwrap_or_else(|| self.user.display_name())
    }
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    pub author: User,
    /// Raw message content, mentions and markdown unresolved.
    #[serde(default)]
    pub content: String,
}

/// A guild (server) the client is connected to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guild {
    pub id: Snowflake,
    pub name: String,
    /// The guild's default text channel, if it has one the client can see.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_channel_id: Option<Snowflake>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_name_prefers_nickname() {
        let mut user = User::new(1, "ada_palmer");
        user.global_name = Some("Ada".into());
        let member = Member {
            user,
            nickname: Some("Mycroft".into()),
        };
        assert_eq!(member.effective_name(), "Mycroft");
    }

    #[test]
    fn test_effective_name_falls_back_to_account_name() {
        let member = Member {
            user: User::new(1, "ada_palmer"),
            nickname: None,
        };
        assert_eq!(member.effective_name(), "ada_palmer");
    }
}
