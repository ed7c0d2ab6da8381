//! API request and response types

use crate::gateway::GatewayStatus;
use crate::surface::ChatView;
use serde::{Deserialize, Serialize};

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Response with a single chat
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub chat: ChatView,
}

/// Response for cancel action
#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub cancelled: bool,
}

/// Response for session reset
#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub was_active: bool,
}

/// AI session status
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    #[serde(flatten)]
    pub status: GatewayStatus,
    pub model: Option<String>,
}

/// Model information
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub id: String,
    pub description: String,
}

/// Response for model list
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
    pub default: String,
}

/// Response for lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
