//! Chat surface: user actions over the store and the AI gateway
//!
//! A submit appends the user's message, asks the gateway for a reply, then
//! appends exactly one assistant message holding either the reply or the
//! presentable text of the failure. Store locks are released while the
//! provider call is outstanding.
//!
//! Each turn runs on its own task, so a caller that goes away mid-request
//! does not leave a user message without its reply. Turns are serialized
//! end to end: a second submit waits until the first reply is appended.

mod view;

pub use view::{ChatSummary, ChatView, Snapshot, GREETING};

use crate::chat::{ChatId, ConversationStore, Message, MessageId, Origin, StoreError};
use crate::gateway::{AiGateway, GatewayError, GatewayStatus};
use crate::llm::LlmErrorKind;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("message text is empty")]
    EmptyMessage,
    #[error("no chat is active")]
    NoActiveChat,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("chat turn aborted: {0}")]
    Turn(#[from] tokio::task::JoinError),
}

/// Why the assistant message is a fallback rather than a real reply
#[derive(Debug, Clone, Serialize)]
pub struct ReplyError {
    pub kind: Option<LlmErrorKind>,
    pub detail: String,
}

impl From<&GatewayError> for ReplyError {
    fn from(err: &GatewayError) -> Self {
        Self {
            kind: err.kind(),
            detail: err.to_string(),
        }
    }
}

/// Result of one submitted message
#[derive(Debug, Clone, Serialize)]
pub struct SubmitOutcome {
    pub chat_id: ChatId,
    pub user_message: Message,
    pub reply: Message,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ReplyError>,
}

/// Decrements the in-flight count even if the submit future is dropped
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct ChatSurface {
    store: RwLock<ConversationStore>,
    gateway: Arc<AiGateway>,
    /// Held from the user append through the reply append
    turn: Mutex<()>,
    /// Parent of every outstanding request's token; replaced on cancel
    cancel_root: Mutex<CancellationToken>,
    /// Incremented only while `cancel_root` is locked
    in_flight: AtomicUsize,
}

impl ChatSurface {
    pub fn new(gateway: Arc<AiGateway>) -> Self {
        Self {
            store: RwLock::new(ConversationStore::new()),
            gateway,
            turn: Mutex::new(()),
            cancel_root: Mutex::new(CancellationToken::new()),
            in_flight: AtomicUsize::new(0),
        }
    }

    pub async fn new_chat(&self) -> Result<ChatView, SurfaceError> {
        let mut store = self.store.write().await;
        let id = store.create_chat();
        tracing::info!(chat_id = %id, "New chat");
        store
            .chat(id)
            .map(ChatView::from)
            .ok_or(SurfaceError::Store(StoreError::UnknownChat(id)))
    }

    pub async fn select_chat(&self, id: ChatId) -> Result<ChatView, SurfaceError> {
        let mut store = self.store.write().await;
        store.select_chat(id)?;
        store
            .chat(id)
            .map(ChatView::from)
            .ok_or(SurfaceError::Store(StoreError::UnknownChat(id)))
    }

    pub async fn clear_all(&self) {
        self.store.write().await.clear_all();
    }

    pub async fn chat(&self, id: ChatId) -> Option<ChatView> {
        self.store.read().await.chat(id).map(ChatView::from)
    }

    pub async fn active_chat(&self) -> Option<ChatView> {
        self.store.read().await.active_chat().map(ChatView::from)
    }

    pub async fn snapshot(&self) -> Snapshot {
        let store = self.store.read().await;
        Snapshot {
            chats: store.chats().iter().map(ChatSummary::from).collect(),
            active_chat_id: store.active_chat_id(),
        }
    }

    /// Submit to whichever chat is active
    pub async fn submit(self: &Arc<Self>, text: &str) -> Result<SubmitOutcome, SurfaceError> {
        if text.trim().is_empty() {
            return Err(SurfaceError::EmptyMessage);
        }
        let chat_id = self
            .store
            .read()
            .await
            .active_chat_id()
            .ok_or(SurfaceError::NoActiveChat)?;
        self.submit_to(chat_id, text).await
    }

    pub async fn submit_to(
        self: &Arc<Self>,
        chat_id: ChatId,
        text: &str,
    ) -> Result<SubmitOutcome, SurfaceError> {
        if text.trim().is_empty() {
            return Err(SurfaceError::EmptyMessage);
        }

        let surface = Arc::clone(self);
        let text = text.to_string();
        let turn = tokio::spawn(async move { surface.run_turn(chat_id, &text).await });
        turn.await?
    }

    async fn run_turn(&self, chat_id: ChatId, text: &str) -> Result<SubmitOutcome, SurfaceError> {
        let _turn = self.turn.lock().await;
        let user_message = self.append(chat_id, text, Origin::User).await?;

        let (cancel, _in_flight) = {
            let root = self.cancel_root.lock().await;
            (root.child_token(), InFlight::enter(&self.in_flight))
        };
        let result = self.gateway.send_with_cancel(text, &cancel).await;

        let (reply_text, error) = match result {
            Ok(reply) => (reply, None),
            Err(e) => {
                tracing::info!(chat_id = %chat_id, error = %e, "Replying with fallback text");
                (e.user_message().to_string(), Some(ReplyError::from(&e)))
            }
        };

        // The chat may have been cleared while we waited; report it
        let reply = self
            .append(chat_id, reply_text, Origin::Assistant)
            .await
            .inspect_err(|_| {
                tracing::warn!(chat_id = %chat_id, "Chat vanished before the reply arrived");
            })?;

        Ok(SubmitOutcome {
            chat_id,
            user_message,
            reply,
            error,
        })
    }

    /// Cancel every outstanding request; returns whether any was pending
    pub async fn cancel_in_flight(&self) -> bool {
        let mut root = self.cancel_root.lock().await;
        let pending = self.in_flight.load(Ordering::SeqCst) > 0;
        root.cancel();
        *root = CancellationToken::new();
        tracing::info!(pending, "Cancel requested");
        pending
    }

    pub async fn reset_session(&self) -> bool {
        self.gateway.reset().await
    }

    pub fn session_status(&self) -> (GatewayStatus, Option<String>) {
        (self.gateway.status(), self.gateway.model_id())
    }

    async fn append(
        &self,
        chat_id: ChatId,
        text: impl Into<String>,
        origin: Origin,
    ) -> Result<Message, SurfaceError> {
        let mut store = self.store.write().await;
        let id = store.append_message(chat_id, text, origin)?;
        lookup(&store, chat_id, id)
    }
}

fn lookup(store: &ConversationStore, chat_id: ChatId, id: MessageId) -> Result<Message, SurfaceError> {
    store
        .chat(chat_id)
        .and_then(|chat| chat.message(id))
        .cloned()
        .ok_or(SurfaceError::Store(StoreError::UnknownChat(chat_id)))
}
