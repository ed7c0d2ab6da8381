//! Chat and message types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chat identifier, derived from the creation time in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub u64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChatId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(ChatId)
    }
}

/// Position of a message within its chat, starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    User,
    Assistant,
}

/// A single immutable chat message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub origin: Origin,
    pub timestamp: DateTime<Utc>,
}

/// A named, append-only thread of messages
#[derive(Debug, Clone, Serialize)]
pub struct Chat {
    id: ChatId,
    display_name: String,
    messages: Vec<Message>,
    created_at: DateTime<Utc>,
}

impl Chat {
    pub(super) fn new(id: ChatId, display_name: String) -> Self {
        Self {
            id,
            display_name,
            messages: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> ChatId {
        self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message(&self, id: MessageId) -> Option<&Message> {
        let index = usize::try_from(id.0.checked_sub(1)?).ok()?;
        self.messages.get(index)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Append a message at the tail and return its id
    pub(super) fn push(&mut self, text: String, origin: Origin) -> MessageId {
        let id = MessageId(self.messages.len() as u64 + 1);
        self.messages.push(Message {
            id,
            text,
            origin,
            timestamp: Utc::now(),
        });
        id
    }
}
