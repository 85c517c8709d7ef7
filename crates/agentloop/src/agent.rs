use futures::stream::BoxStream;

use crate::client::ModelClient;
use crate::conversation::Conversation;
use crate::errors::{AgentError, AgentResult};
use crate::models::content::{ContentBlock, ToolInput, ToolUse};
use crate::permission::PermissionGate;
use crate::providers::utils::preview;
use crate::tools::{Tool, ToolRegistry};

/// Follow-up model requests allowed within one turn before giving up
pub const DEFAULT_MAX_DEPTH: usize = 25;
const MAX_PARAMETER_DISPLAY_CHARS: usize = 100;
const MAX_RESULT_LOG_CHARS: usize = 200;

/// One tool parameter as shown to the operator
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDisplay {
    pub name: String,
    /// The value with newlines escaped, cut after 100 characters
    pub value: String,
    /// What the tool's schema says the parameter is for
    pub description: Option<String>,
}

/// A tool call that is about to run
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub id: String,
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterDisplay>,
}

/// Output of a turn, in the order it happened
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    /// Reply text from the model
    Text(String),
    /// A tool is about to run (emitted before any permission prompt)
    ToolInvocation(ToolInvocation),
    /// The result sent back to the model for one tool request
    ToolResult { id: String, content: String },
}

/// Agent drives the conversation between the model and the local tools
pub struct Agent {
    client: ModelClient,
    tools: ToolRegistry,
    system: String,
    gate: Option<Box<dyn PermissionGate>>,
    max_depth: usize,
}

impl Agent {
    /// Create a new Agent. `system` is sent unchanged with every request.
    pub fn new<S: Into<String>>(client: ModelClient, tools: ToolRegistry, system: S) -> Self {
        Self {
            client,
            tools,
            system: system.into(),
            gate: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Require confirmation before every tool execution (safe mode)
    pub fn with_permission_gate(mut self, gate: Box<dyn PermissionGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn safe_mode(&self) -> bool {
        self.gate.is_some()
    }

    fn describe_invocation(&self, tool: &dyn Tool, tool_use: &ToolUse<'_>) -> ToolInvocation {
        let schema = tool.input_schema();
        let parameters = tool_use
            .input
            .iter()
            .map(|(name, value)| ParameterDisplay {
                name: name.clone(),
                value: preview(value, MAX_PARAMETER_DISPLAY_CHARS),
                description: schema.describe(name).map(str::to_string),
            })
            .collect();

        ToolInvocation {
            id: tool_use.id.to_string(),
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            parameters,
        }
    }

    /// Run one tool, turning every failure into text the model can read
    async fn run_tool(&self, tool: &dyn Tool, input: &ToolInput) -> String {
        if let Some(gate) = &self.gate {
            if !gate.confirm(tool.name(), tool.description(), input).await {
                tracing::warn!(tool = tool.name(), "tool execution denied by user");
                return AgentError::PermissionDenied.to_string();
            }
        }

        tracing::info!(tool = tool.name(), "executing tool");
        match tool.execute(input).await {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(tool = tool.name(), error = %e, "tool failed");
                AgentError::from(e).to_string()
            }
        }
    }

    fn check_depth(&self, follow_ups: usize) -> AgentResult<()> {
        if follow_ups >= self.max_depth {
            return Err(AgentError::DepthExceeded(self.max_depth));
        }
        Ok(())
    }

    /// Process one user utterance.
    ///
    /// The returned stream yields model text and tool activity as it happens and
    /// ends once the model answers without requesting any tool. A model request
    /// failure ends the stream with an error; everything appended to
    /// `conversation` before the failure is kept.
    pub fn reply<'a>(
        &'a self,
        conversation: &'a mut Conversation,
        text: &str,
    ) -> BoxStream<'a, AgentResult<AgentEvent>> {
        let text = text.to_string();

        Box::pin(async_stream::try_stream! {
            conversation.push_user_text(text);
            let mut follow_ups = 0;

            loop {
                let response = self
                    .client
                    .send_turn(conversation, &self.tools, &self.system)
                    .await
                    .map_err(AgentError::from)?;

                // Text is surfaced before any tool runs
                for block in &response.content {
                    if let ContentBlock::Text { text } = block {
                        yield AgentEvent::Text(text.clone());
                    }
                }

                let tool_uses: Vec<ToolUse<'_>> = response
                    .content
                    .iter()
                    .filter_map(ContentBlock::as_tool_use)
                    .collect();

                if tool_uses.is_empty() {
                    // No more tool calls, end the reply loop
                    break;
                }

                // Sequential, in the order the model listed them
                let mut results = Vec::with_capacity(tool_uses.len());
                for tool_use in &tool_uses {
                    let content = match self.tools.get(tool_use.name) {
                        Some(tool) => {
                            yield AgentEvent::ToolInvocation(self.describe_invocation(tool, tool_use));
                            self.run_tool(tool, tool_use.input).await
                        }
                        None => {
                            tracing::warn!(tool = tool_use.name, "model requested an unknown tool");
                            AgentError::ToolNotFound(tool_use.name.to_string()).to_string()
                        }
                    };

                    tracing::debug!(
                        id = tool_use.id,
                        result = %preview(&content, MAX_RESULT_LOG_CHARS),
                        "tool result"
                    );
                    yield AgentEvent::ToolResult {
                        id: tool_use.id.to_string(),
                        content: content.clone(),
                    };
                    results.push(ContentBlock::tool_result(tool_use.id, content));
                }

                // One follow-up request answers every tool request of the turn
                conversation.push_tool_results(results)?;

                self.check_depth(follow_ups)?;
                follow_ups += 1;
            }
        })
    }
}
