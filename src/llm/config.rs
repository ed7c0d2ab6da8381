//! Provider configuration and service construction

use super::gemini::GeminiService;
use super::models::DEFAULT_MODEL;
use super::{LlmError, LlmService, LoggingService};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Builds the provider client for a fresh conversation
pub trait ServiceFactory: Send + Sync {
    fn create(&self) -> Result<Arc<dyn LlmService>, LlmError>;
}

/// Configuration for the Gemini provider
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: String,
    /// Base URL override, e.g. a proxy in front of the Gemini API
    pub gateway: Option<String>,
    /// Upper bound on a single request, enforced by the chat gateway
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            gateway: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("GEMINI_API_KEY").ok(),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            gateway: std::env::var("LLM_GATEWAY").ok(),
            timeout: std::env::var("LLM_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map_or(DEFAULT_TIMEOUT, Duration::from_secs),
        }
    }

    /// The API key, if present and non-blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

impl ServiceFactory for LlmConfig {
    fn create(&self) -> Result<Arc<dyn LlmService>, LlmError> {
        let api_key = self.api_key().ok_or_else(|| {
            LlmError::configuration("API key is missing. Set GEMINI_API_KEY.")
        })?;

        let service = GeminiService::new(api_key, &self.model, self.gateway.as_deref())?;
        Ok(Arc::new(LoggingService::new(Arc::new(service))))
    }
}
