use crate::conversation::Conversation;
use crate::errors::ModelRequestError;
use crate::models::role::Role;
use crate::providers::base::{CompletionRequest, ModelResponse, Provider};
use crate::providers::utils::{check_tool_use_ids, tools_to_anthropic_spec};
use crate::tools::ToolRegistry;

pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Sends the transcript to the model and records its reply.
pub struct ModelClient {
    provider: Box<dyn Provider>,
    model: String,
    max_tokens: u32,
}

impl ModelClient {
    pub fn new<S: Into<String>>(provider: Box<dyn Provider>, model: S, max_tokens: u32) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The request for the current transcript: full history, tool catalogue and system string
    pub fn build_request(
        &self,
        conversation: &Conversation,
        tools: &ToolRegistry,
        system: &str,
    ) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: conversation.messages().to_vec(),
            max_tokens: self.max_tokens,
            tools: tools_to_anthropic_spec(&tools.descriptors()),
            system: system.to_string(),
        }
    }

    /// Request the next assistant turn.
    ///
    /// On success the reply is appended to `conversation` before returning, so the
    /// model always sees its own previous turn. On failure the transcript is untouched.
    pub async fn send_turn(
        &self,
        conversation: &mut Conversation,
        tools: &ToolRegistry,
        system: &str,
    ) -> Result<ModelResponse, ModelRequestError> {
        let request = self.build_request(conversation, tools, system);
        let mut response = self.provider.complete(&request).await?;

        if response.role != Role::Assistant {
            return Err(ModelRequestError::Protocol(format!(
                "expected an assistant reply, got role {:?}",
                response.role
            )));
        }
        check_tool_use_ids(&response.content)?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                id = %response.id,
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                stop_reason = response.stop_reason.as_deref(),
                "model response"
            );
        }

        // The API rejects empty text blocks and empty assistant turns in later requests
        response
            .content
            .retain(|block| block.as_text().map_or(true, |text| !text.trim().is_empty()));
        if !response.content.is_empty() {
            conversation.push_assistant(response.content.clone());
        }
        Ok(response)
    }
}
