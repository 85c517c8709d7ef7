use async_trait::async_trait;
use std::time::Duration;

use crate::errors::{AgentError, AgentResult, ToolError, ToolResult};
use crate::models::content::ToolInput;
use crate::models::tool::{InputSchema, ToolDescriptor};

pub mod fetch;
pub mod html;
pub mod read_file;
pub mod terminal;
pub mod write_file;

pub use fetch::FetchUrlTool;
pub use read_file::ReadFileTool;
pub use terminal::TerminalTool;
pub use write_file::WriteFileTool;

/// A named unit of work the model can ask the agent to perform
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name, description and input schema advertised to the model
    fn descriptor(&self) -> &ToolDescriptor;

    /// Run the tool with exactly the input the model supplied.
    ///
    /// Called at most once per request; a failed call is never retried.
    async fn execute(&self, parameters: &ToolInput) -> ToolResult<String>;

    fn name(&self) -> &str {
        &self.descriptor().name
    }

    fn description(&self) -> &str {
        &self.descriptor().description
    }

    fn input_schema(&self) -> &InputSchema {
        &self.descriptor().input_schema
    }
}

/// Fetch a parameter the tool cannot run without
pub fn required_param<'a>(parameters: &'a ToolInput, name: &str) -> ToolResult<&'a str> {
    parameters
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| ToolError::MissingParameter(name.to_string()))
}

/// Cut overly long tool output, keeping at most `max_chars` characters
pub(crate) fn truncate_output(mut output: String, max_chars: usize) -> String {
    if let Some((byte_idx, _)) = output.char_indices().nth(max_chars) {
        output.truncate(byte_idx);
        output.push_str("\n... [output truncated]");
    }
    output
}

/// Tools available to the agent, in registration order.
///
/// Populated once at startup and read-only afterwards.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool. Names must be unique across the registry.
    pub fn register(&mut self, tool: Box<dyn Tool>) -> AgentResult<()> {
        if self.get(tool.name()).is_some() {
            return Err(AgentError::DuplicateTool(tool.name().to_string()));
        }
        self.tools.push(tool);
        Ok(())
    }

    pub fn with_tool(mut self, tool: Box<dyn Tool>) -> AgentResult<Self> {
        self.register(tool)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|tool| tool.name() == name)
            .map(|tool| &**tool)
    }

    /// The tool catalogue advertised to the model
    pub fn descriptors(&self) -> Vec<&ToolDescriptor> {
        self.tools.iter().map(|tool| tool.descriptor()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// The built-in file, shell and web tools
pub fn default_tools(http_timeout: Duration) -> AgentResult<ToolRegistry> {
    ToolRegistry::new()
        .with_tool(Box::new(ReadFileTool::new()))?
        .with_tool(Box::new(WriteFileTool::new()))?
        .with_tool(Box::new(TerminalTool::new()))?
        .with_tool(Box::new(FetchUrlTool::new(http_timeout)?))
}
