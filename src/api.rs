//! HTTP API for the Aarogya chat service

mod handlers;
mod types;

pub use handlers::create_router;

use crate::surface::ChatSurface;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub surface: Arc<ChatSurface>,
    /// Model new conversations are started with
    pub model: Arc<str>,
}

impl AppState {
    pub fn new(surface: ChatSurface, model: &str) -> Self {
        Self {
            surface: Arc::new(surface),
            model: Arc::from(model),
        }
    }
}
