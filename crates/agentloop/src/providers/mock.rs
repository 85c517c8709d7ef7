use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::errors::ModelRequestError;
use crate::models::content::ContentBlock;
use crate::models::message::Message;
use crate::models::role::Role;
use crate::providers::base::{CompletionRequest, ModelResponse, Provider};

type Requests = Arc<Mutex<Vec<CompletionRequest>>>;

/// A mock provider that returns pre-configured responses and records every request
pub struct MockProvider {
    responses: Mutex<Vec<Result<ModelResponse, ModelRequestError>>>,
    requests: Requests,
}

impl MockProvider {
    /// Create a new mock provider with a sequence of assistant replies
    pub fn new(responses: Vec<Message>) -> Self {
        Self::with_results(
            responses
                .into_iter()
                .map(|message| Ok(response(message.content)))
                .collect(),
        )
    }

    pub fn with_results(responses: Vec<Result<ModelResponse, ModelRequestError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the recorded requests, usable after the provider is boxed
    pub fn requests(&self) -> Requests {
        Arc::clone(&self.requests)
    }
}

pub fn response(content: Vec<ContentBlock>) -> ModelResponse {
    ModelResponse {
        id: "msg_mock".to_string(),
        kind: "message".to_string(),
        role: Role::Assistant,
        model: "mock".to_string(),
        content,
        stop_reason: None,
        usage: None,
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<ModelResponse, ModelRequestError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // Return empty text if no more pre-configured responses
            Ok(response(vec![ContentBlock::text("")]))
        } else {
            responses.remove(0)
        }
    }
}
