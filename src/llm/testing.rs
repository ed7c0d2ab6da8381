//! Mock provider for tests
//!
//! Lets gateway and surface tests run without network I/O.

use super::{LlmError, LlmRequest, LlmResponse, LlmService, ServiceFactory};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock LLM service replaying queued results
pub struct MockLlmService {
    responses: Mutex<VecDeque<Result<LlmResponse, LlmError>>>,
    /// Reply used once the queue is empty; `None` means a network error
    fallback: Option<String>,
    delay: Option<Duration>,
    /// Record of all requests made
    pub requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlmService {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fallback: None,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer every request with the same text
    pub fn always(text: impl Into<String>) -> Self {
        Self {
            fallback: Some(text.into()),
            ..Self::new()
        }
    }

    /// Sleep before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn queue_text(&self, text: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(LlmResponse::text(text)));
    }

    pub fn queue_error(&self, error: LlmError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmService for MockLlmService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let queued = self.responses.lock().unwrap().pop_front();
        queued.unwrap_or_else(|| match &self.fallback {
            Some(text) => Ok(LlmResponse::text(text.clone())),
            None => Err(LlmError::network("No mock response queued")),
        })
    }

    fn model_id(&self) -> &str {
        "mock-model"
    }
}

/// Factory handing out one shared mock and counting sessions built
pub struct MockFactory {
    service: Arc<MockLlmService>,
    pub created: AtomicUsize,
}

impl MockFactory {
    pub fn new(service: Arc<MockLlmService>) -> Self {
        Self {
            service,
            created: AtomicUsize::new(0),
        }
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl ServiceFactory for MockFactory {
    fn create(&self) -> Result<Arc<dyn LlmService>, LlmError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(self.service.clone())
    }
}

impl ServiceFactory for Arc<MockFactory> {
    fn create(&self) -> Result<Arc<dyn LlmService>, LlmError> {
        self.as_ref().create()
    }
}
