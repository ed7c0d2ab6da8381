//! Gemini model catalogue

/// Model used when `GEMINI_MODEL` is not set
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Model definition with metadata
#[derive(Debug, Clone, Copy)]
pub struct ModelDef {
    /// User-facing model ID
    pub id: &'static str,
    /// Name in the provider's URL path
    pub api_name: &'static str,
    pub description: &'static str,
}

pub fn all_models() -> &'static [ModelDef] {
    &[
        ModelDef {
            id: "gemini-1.5-flash",
            api_name: "gemini-1.5-flash",
            description: "Gemini 1.5 Flash (fast responses)",
        },
        ModelDef {
            id: "gemini-1.5-pro",
            api_name: "gemini-1.5-pro",
            description: "Gemini 1.5 Pro (more complex queries)",
        },
    ]
}

/// Provider-side model name for a model ID.
///
/// IDs outside the catalogue pass through unchanged, so a typo reaches the
/// provider and comes back as a model-unavailable error.
pub fn api_name(model_id: &str) -> &str {
    all_models()
        .iter()
        .find(|m| m.id == model_id)
        .map_or(model_id, |m| m.api_name)
}
