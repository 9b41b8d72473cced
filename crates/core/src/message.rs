use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identifier of a message within one session's message set.
///
/// Used as the height-cache key, so it must never be reused for a different
/// message in the same session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for MessageId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    #[serde(alias = "assistant")]
    Agent,
    System,
    Tool,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Agent => "agent",
            Self::System => "system",
            Self::Tool => "tool",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown message role: {0}")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" | "human" => Ok(Self::User),
            "agent" | "assistant" => Ok(Self::Agent),
            "system" => Ok(Self::System),
            "tool" | "tool_result" => Ok(Self::Tool),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

/// A single recorded message. Immutable once fetched for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub content: String,
}

impl Message {
    pub fn new(
        id: impl Into<MessageId>,
        role: Role,
        timestamp: DateTime<Utc>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            role,
            timestamp,
            content: content.into(),
        }
    }

    /// First non-blank line of the content, trimmed.
    pub fn first_line(&self) -> &str {
        self.content
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("")
    }
}

/// Global ordering of a session's message sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Chronological,
    NewestFirst,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Chronological => Self::NewestFirst,
            Self::NewestFirst => Self::Chronological,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Chronological => "oldest first",
            Self::NewestFirst => "newest first",
        }
    }

    /// Arrange messages fetched in chronological order according to this direction.
    pub fn arrange(self, mut messages: Vec<Message>) -> Vec<Message> {
        if self == Self::NewestFirst {
            messages.reverse();
        }
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn role_parses_wire_aliases() {
        assert_eq!("assistant".parse::<Role>(), Ok(Role::Agent));
        assert_eq!(" Human ".parse::<Role>(), Ok(Role::User));
        assert_eq!("tool_result".parse::<Role>(), Ok(Role::Tool));
        assert_eq!(
            "narrator".parse::<Role>(),
            Err(ParseRoleError("narrator".to_string()))
        );
    }

    #[test]
    fn message_deserializes_assistant_alias_and_missing_content() {
        let raw = r#"{"id":"m1","role":"assistant","timestamp":"2025-01-02T03:04:05Z"}"#;
        let message: Message = serde_json::from_str(raw).unwrap();
        assert_eq!(message.id.as_str(), "m1");
        assert_eq!(message.role, Role::Agent);
        assert!(message.content.is_empty());
    }

    #[test]
    fn first_line_skips_blank_lines() {
        let message = testing::message("m1", Role::User, "\n\n  hello there \nsecond");
        assert_eq!(message.first_line(), "hello there");
    }

    #[test]
    fn newest_first_reverses_sequence() {
        let messages = testing::messages(3);
        let arranged = SortDirection::NewestFirst.arrange(messages.clone());
        let ids: Vec<_> = arranged.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m2", "m1", "m0"]);
        assert_eq!(SortDirection::Chronological.arrange(messages.clone()), messages);
        assert_eq!(
            SortDirection::Chronological.toggled(),
            SortDirection::NewestFirst
        );
    }
}
