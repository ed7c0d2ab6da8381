//! LLM error types and provider failure translation

use thiserror::Error;

/// LLM error with classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct LlmError {
    pub kind: LlmErrorKind,
    /// Raw provider or transport detail, for logs
    pub message: String,
}

impl LlmError {
    pub fn new(kind: LlmErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::Configuration, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::Network, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(LlmErrorKind::Unknown, message)
    }

    /// Build an error from a failed provider response
    pub fn from_provider(failure: &ProviderFailure<'_>) -> Self {
        Self::new(classify(failure), failure.message)
    }

    /// Fixed text suitable for showing in the chat
    pub fn user_message(&self) -> &'static str {
        self.kind.user_message()
    }
}

/// Categories a provider failure is reported as
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmErrorKind {
    /// Missing or invalid credential
    Configuration,
    /// Credential lacks access to the model
    Permission,
    /// Rate or usage limit hit
    QuotaExceeded,
    /// Model name not resolvable by the provider
    ModelUnavailable,
    /// Transport-level failure or timeout
    Network,
    Unknown,
}

impl LlmErrorKind {
    pub fn user_message(self) -> &'static str {
        match self {
            Self::Configuration => {
                "There's an issue with the API key. Please check your configuration."
            }
            Self::Permission => "The API key doesn't have permission to access this model.",
            Self::QuotaExceeded => "You've reached your quota limit for the Gemini API.",
            Self::ModelUnavailable => "The selected model is not available or doesn't exist.",
            Self::Network => "Network error. Please check your internet connection.",
            Self::Unknown => "An error occurred while processing your request.",
        }
    }
}

/// What the provider told us when a request failed
#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderFailure<'a> {
    pub http_status: Option<u16>,
    /// Structured status code from the error body, e.g. `RESOURCE_EXHAUSTED`
    pub status: Option<&'a str>,
    pub message: &'a str,
}

/// Map a provider failure to one of the presentable categories.
///
/// Structured status wins over the HTTP code, which wins over matching
/// substrings of the message text.
pub fn classify(failure: &ProviderFailure<'_>) -> LlmErrorKind {
    let by_status = failure.status.and_then(|status| match status {
        "UNAUTHENTICATED" => Some(LlmErrorKind::Configuration),
        "PERMISSION_DENIED" => Some(LlmErrorKind::Permission),
        "RESOURCE_EXHAUSTED" => Some(LlmErrorKind::QuotaExceeded),
        "NOT_FOUND" => Some(LlmErrorKind::ModelUnavailable),
        _ => None,
    });
    if let Some(kind) = by_status {
        return kind;
    }

    let by_http = failure.http_status.and_then(|code| match code {
        401 => Some(LlmErrorKind::Configuration),
        403 => Some(LlmErrorKind::Permission),
        404 => Some(LlmErrorKind::ModelUnavailable),
        429 => Some(LlmErrorKind::QuotaExceeded),
        _ => None,
    });
    if let Some(kind) = by_http {
        return kind;
    }

    classify_message(failure.message)
}

/// Last-resort matching on free text
/// Substring matches are case-sensitive
fn classify_message(message: &str) -> LlmErrorKind {
    if message.contains("API key") {
        LlmErrorKind::Configuration
    } else if message.contains("PERMISSION_DENIED") {
        LlmErrorKind::Permission
    } else if message.contains("RESOURCE_EXHAUSTED") {
        LlmErrorKind::QuotaExceeded
    } else if message.contains("model not found") || message.contains("is not found") {
        LlmErrorKind::ModelUnavailable
    } else if message.contains("network") {
        LlmErrorKind::Network
    } else {
        LlmErrorKind::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure<'a>(http: Option<u16>, status: Option<&'a str>, message: &'a str) -> ProviderFailure<'a> {
        ProviderFailure {
            http_status: http,
            status,
            message,
        }
    }

    #[test]
    fn test_structured_status_takes_priority() {
        // 400 plus a message mentioning the key, but the status is authoritative
        let f = failure(Some(400), Some("RESOURCE_EXHAUSTED"), "API key quota used up");
        assert_eq!(classify(&f), LlmErrorKind::QuotaExceeded);

        let f = failure(Some(403), Some("PERMISSION_DENIED"), "API key lacks scope");
        assert_eq!(classify(&f), LlmErrorKind::Permission);

        let f = failure(Some(404), Some("NOT_FOUND"), "models/gemini-9 is not found");
        assert_eq!(classify(&f), LlmErrorKind::ModelUnavailable);
    }

    #[test]
    fn test_http_status_used_without_structured_status() {
        assert_eq!(classify(&failure(Some(401), None, "nope")), LlmErrorKind::Configuration);
        assert_eq!(classify(&failure(Some(403), None, "nope")), LlmErrorKind::Permission);
        assert_eq!(classify(&failure(Some(404), None, "nope")), LlmErrorKind::ModelUnavailable);
        assert_eq!(classify(&failure(Some(429), None, "slow down")), LlmErrorKind::QuotaExceeded);
    }

    #[test]
    fn test_invalid_key_arrives_as_bad_request() {
        // Gemini reports a bad key as 400 INVALID_ARGUMENT
        let f = failure(
            Some(400),
            Some("INVALID_ARGUMENT"),
            "API key not valid. Please pass a valid API key.",
        );
        assert_eq!(classify(&f), LlmErrorKind::Configuration);
    }

    #[test]
    fn test_substring_fallback_order() {
        assert_eq!(classify_message("[403] PERMISSION_DENIED"), LlmErrorKind::Permission);
        assert_eq!(classify_message("RESOURCE_EXHAUSTED: try later"), LlmErrorKind::QuotaExceeded);
        assert_eq!(classify_message("model not found: foo"), LlmErrorKind::ModelUnavailable);
        assert_eq!(classify_message("a network hiccup"), LlmErrorKind::Network);
        assert_eq!(classify_message("something odd"), LlmErrorKind::Unknown);
        // Key problems are checked first
        assert_eq!(classify_message("API key PERMISSION_DENIED"), LlmErrorKind::Configuration);
    }

    #[test]
    fn test_substring_match_is_case_sensitive() {
        assert_eq!(classify_message("bad api key"), LlmErrorKind::Unknown);
        assert_eq!(classify_message("Network unreachable"), LlmErrorKind::Unknown);
        assert_eq!(classify_message("Model not found"), LlmErrorKind::Unknown);
    }

    #[test]
    fn test_server_errors_are_unknown() {
        let f = failure(Some(500), Some("INTERNAL"), "internal error");
        assert_eq!(classify(&f), LlmErrorKind::Unknown);
    }

    #[test]
    fn test_each_kind_has_fixed_message() {
        let err = LlmError::from_provider(&failure(Some(429), None, "raw detail"));
        assert_eq!(err.kind, LlmErrorKind::QuotaExceeded);
        assert_eq!(err.message, "raw detail");
        assert_eq!(err.user_message(), "You've reached your quota limit for the Gemini API.");
        assert_eq!(
            LlmErrorKind::Unknown.user_message(),
            "An error occurred while processing your request."
        );
    }
}
