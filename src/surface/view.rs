//! Serializable views of store state

use crate::chat::{Chat, ChatId, Message};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Shown at the top of every chat; not stored as a message
pub const GREETING: &str = "Welcome to Aarogya! How can I assist you today?";

/// A chat with its full message log
#[derive(Debug, Clone, Serialize)]
pub struct ChatView {
    pub id: ChatId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub greeting: &'static str,
    pub messages: Vec<Message>,
}

impl From<&Chat> for ChatView {
    fn from(chat: &Chat) -> Self {
        Self {
            id: chat.id(),
            name: chat.display_name().to_string(),
            created_at: chat.created_at(),
            greeting: GREETING,
            messages: chat.messages().to_vec(),
        }
    }
}

/// Sidebar entry
#[derive(Debug, Clone, Serialize)]
pub struct ChatSummary {
    pub id: ChatId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub message_count: usize,
}

impl From<&Chat> for ChatSummary {
    fn from(chat: &Chat) -> Self {
        Self {
            id: chat.id(),
            name: chat.display_name().to_string(),
            created_at: chat.created_at(),
            message_count: chat.messages().len(),
        }
    }
}

/// Every chat in creation order plus the active one
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub chats: Vec<ChatSummary>,
    pub active_chat_id: Option<ChatId>,
}
