//! In-memory chat registry
//!
//! Owns the ordered set of chats and the active-chat pointer. Nothing here
//! is persisted; a restart starts from an empty store.

mod store;
mod types;

#[cfg(test)]
mod proptests;

pub use store::{ConversationStore, StoreError};
pub use types::{Chat, ChatId, Message, MessageId, Origin};
