//! Conversation store: the set of chats plus the active pointer

use super::types::{Chat, ChatId, MessageId, Origin};
use chrono::Utc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("chat {0} does not exist")]
    UnknownChat(ChatId),
}

/// Chats in creation order and the chat currently being viewed.
///
/// The active pointer is only ever set to an id that was just created or
/// checked against the set, so `active_chat` resolves whenever it is set.
#[derive(Debug, Default)]
pub struct ConversationStore {
    chats: Vec<Chat>,
    active: Option<ChatId>,
    /// Last id handed out; survives `clear_all` so ids never repeat
    last_id: Option<ChatId>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty chat, make it active and return its id
    pub fn create_chat(&mut self) -> ChatId {
        let id = self.next_id();
        let name = format!("Chat {}", self.chats.len() + 1);
        self.chats.push(Chat::new(id, name));
        self.active = Some(id);

        tracing::debug!(chat_id = %id, count = self.len(), "Created chat");
        id
    }

    pub fn select_chat(&mut self, id: ChatId) -> Result<(), StoreError> {
        if self.chat(id).is_none() {
            tracing::warn!(chat_id = %id, "Refusing to select unknown chat");
            return Err(StoreError::UnknownChat(id));
        }
        self.active = Some(id);
        Ok(())
    }

    pub fn append_message(
        &mut self,
        chat_id: ChatId,
        text: impl Into<String>,
        origin: Origin,
    ) -> Result<MessageId, StoreError> {
        let Some(chat) = self.chats.iter_mut().find(|c| c.id() == chat_id) else {
            tracing::warn!(chat_id = %chat_id, ?origin, "Dropping append to unknown chat");
            return Err(StoreError::UnknownChat(chat_id));
        };
        Ok(chat.push(text.into(), origin))
    }

    /// Remove every chat and clear the active pointer
    pub fn clear_all(&mut self) {
        tracing::info!(count = self.len(), "Clearing all chats");
        self.chats.clear();
        self.active = None;
    }

    pub fn active_chat(&self) -> Option<&Chat> {
        self.active.and_then(|id| self.chat(id))
    }

    pub fn active_chat_id(&self) -> Option<ChatId> {
        self.active_chat().map(Chat::id)
    }

    pub fn chat(&self, id: ChatId) -> Option<&Chat> {
        self.chats.iter().find(|c| c.id() == id)
    }

    /// All chats in insertion order
    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    pub fn len(&self) -> usize {
        self.chats.len()
    }

    #[allow(dead_code)] // API completeness
    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }

    /// Millisecond timestamp, bumped past the previous id when the clock
    /// has not moved (or moved backwards)
    fn next_id(&mut self) -> ChatId {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let id = match self.last_id {
            Some(ChatId(last)) if now <= last => ChatId(last + 1),
            _ => ChatId(now),
        };
        self.last_id = Some(id);
        id
    }
}
