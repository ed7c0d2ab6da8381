//! Conversational AI gateway
//!
//! Holds the single conversation handle shared by every chat. The handle is
//! created lazily on the first send and dropped by `reset`:
//!
//! ```text
//! Uninitialized --send--> Active --send--> Active
//!       ^                   |
//!       +------reset--------+
//! ```
//!
//! Sends are serialized: the handle's lock is held for the whole provider
//! call, so a second send waits for the first and sees its turn in history.
//! Status is published on a watch channel and never waits on that lock.

use crate::llm::{
    GenerationConfig, LlmConfig, LlmError, LlmErrorKind, LlmMessage, LlmRequest, LlmService,
    ServiceFactory,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("message text is empty")]
    EmptyInput,
    #[error(transparent)]
    Provider(#[from] LlmError),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("request cancelled")]
    Cancelled,
}

impl GatewayError {
    /// Provider category, when the failure came from (or stands in for) one
    pub fn kind(&self) -> Option<LlmErrorKind> {
        match self {
            GatewayError::Provider(e) => Some(e.kind),
            GatewayError::Timeout(_) => Some(LlmErrorKind::Network),
            GatewayError::EmptyInput | GatewayError::Cancelled => None,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            GatewayError::EmptyInput => "Please enter a message.",
            GatewayError::Cancelled => "The request was cancelled.",
            GatewayError::Provider(_) | GatewayError::Timeout(_) => {
                self.kind().unwrap_or(LlmErrorKind::Unknown).user_message()
            }
        }
    }
}

/// Observable lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GatewayStatus {
    Uninitialized,
    Active { turns: usize },
}

/// Last published view of the session
#[derive(Debug, Clone, PartialEq, Eq)]
struct SessionInfo {
    status: GatewayStatus,
    model: Option<String>,
}

impl SessionInfo {
    const UNINITIALIZED: Self = Self {
        status: GatewayStatus::Uninitialized,
        model: None,
    };
}

/// Live conversation: the provider client plus every completed turn
struct ChatSession {
    service: Arc<dyn LlmService>,
    history: Vec<LlmMessage>,
}

impl ChatSession {
    fn new(service: Arc<dyn LlmService>) -> Self {
        Self {
            service,
            history: Vec::new(),
        }
    }

    fn turns(&self) -> usize {
        self.history.len() / 2
    }

    fn info(&self) -> SessionInfo {
        SessionInfo {
            status: GatewayStatus::Active {
                turns: self.turns(),
            },
            model: Some(self.service.model_id().to_string()),
        }
    }
}

pub struct AiGateway {
    factory: Box<dyn ServiceFactory>,
    /// `None` is the uninitialized state
    session: Mutex<Option<ChatSession>>,
    /// Updated while `session` is locked
    info: watch::Sender<SessionInfo>,
    generation: GenerationConfig,
    timeout: Duration,
}

impl AiGateway {
    pub fn new(factory: impl ServiceFactory + 'static, timeout: Duration) -> Self {
        Self {
            factory: Box::new(factory),
            session: Mutex::new(None),
            info: watch::Sender::new(SessionInfo::UNINITIALIZED),
            generation: GenerationConfig::default(),
            timeout,
        }
    }

    pub fn from_config(config: LlmConfig) -> Self {
        let timeout = config.timeout;
        Self::new(config, timeout)
    }

    /// Send one user utterance and wait for the reply
    pub async fn send(&self, text: &str) -> Result<String, GatewayError> {
        self.send_with_cancel(text, &CancellationToken::new()).await
    }

    pub async fn send_with_cancel(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<String, GatewayError> {
        if text.trim().is_empty() {
            return Err(GatewayError::EmptyInput);
        }

        let mut guard = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(GatewayError::Cancelled),
            guard = self.session.lock() => guard,
        };

        let session = match *guard {
            Some(ref mut session) => session,
            ref mut slot @ None => {
                let service = self.factory.create().inspect_err(|e| {
                    tracing::error!(error = %e.message, "Cannot start AI conversation");
                })?;
                tracing::info!(model = %service.model_id(), "Started AI conversation");
                let session = slot.insert(ChatSession::new(service));
                self.info.send_replace(session.info());
                session
            }
        };

        let mut messages = session.history.clone();
        messages.push(LlmMessage::user(text));
        let request = LlmRequest {
            messages,
            generation: self.generation,
        };

        tracing::debug!(turns = session.turns(), "Sending message to AI provider");

        let call = tokio::time::timeout(self.timeout, session.service.complete(&request));
        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::info!("AI request cancelled");
                return Err(GatewayError::Cancelled);
            }
            outcome = call => outcome,
        };

        let response = match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::warn!(kind = ?e.kind, error = %e.message, "AI provider returned an error");
                return Err(e.into());
            }
            Err(_) => {
                tracing::warn!(timeout_ms = %self.timeout.as_millis(), "AI request timed out");
                return Err(GatewayError::Timeout(self.timeout));
            }
        };

        session.history.push(LlmMessage::user(text));
        session
            .history
            .push(LlmMessage::assistant(response.text.clone()));
        self.info.send_replace(session.info());
        Ok(response.text)
    }

    /// Drop the conversation handle; the next send starts a fresh context.
    ///
    /// Returns whether a conversation was active.
    pub async fn reset(&self) -> bool {
        let previous = {
            let mut session = self.session.lock().await;
            self.info.send_replace(SessionInfo::UNINITIALIZED);
            session.take()
        };
        tracing::info!(
            turns = previous.as_ref().map_or(0, ChatSession::turns),
            "AI conversation reset"
        );
        previous.is_some()
    }

    pub fn status(&self) -> GatewayStatus {
        self.info.borrow().status
    }

    /// Model of the live conversation, if any
    pub fn model_id(&self) -> Option<String> {
        self.info.borrow().model.clone()
    }
}
