use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::base::{CompletionRequest, ModelResponse, Provider};
use super::configs::{AnthropicProviderConfig, ANTHROPIC_VERSION};
use crate::errors::ModelRequestError;

const MAX_ERROR_BODY_CHARS: usize = 500;

pub struct AnthropicProvider {
    client: Client,
    config: AnthropicProviderConfig,
}

impl AnthropicProvider {
    pub fn new(config: AnthropicProviderConfig) -> Result<Self, ModelRequestError> {
        let client = Client::builder()
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.config.host.trim_end_matches('/'))
    }

    async fn post(&self, request: &CompletionRequest) -> Result<ModelResponse, ModelRequestError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(request)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await?;
                serde_json::from_str(&body).map_err(|e| ModelRequestError::Parse(e.to_string()))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ModelRequestError::Status {
                    status: status.as_u16(),
                    body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
                })
            }
        }
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<ModelResponse, ModelRequestError> {
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "sending messages request"
        );
        self.post(request).await
    }
}
