use thiserror::Error;

/// Errors raised by a tool's own operation
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Command timed out after {0} seconds")]
    Timeout(u64),

    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("{0}")]
    Execution(String),
}

pub type ToolResult<T> = Result<T, ToolError>;

/// Failures talking to the model endpoint. These are never recovered inside a turn.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelRequestError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response from model: {0}")]
    Parse(String),

    #[error("Protocol error in model response: {0}")]
    Protocol(String),
}

impl From<reqwest::Error> for ModelRequestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ModelRequestError::Timeout
        } else if err.is_decode() {
            ModelRequestError::Parse(err.to_string())
        } else {
            ModelRequestError::Transport(err.to_string())
        }
    }
}

/// Startup problems that stop the agent from being built
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
}

#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentError {
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Tool execution denied by user")]
    PermissionDenied,

    #[error("Error executing tool: {0}")]
    ToolExecution(String),

    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Stopped after {0} follow-up model requests without a final answer")]
    DepthExceeded(usize),

    #[error(transparent)]
    ModelRequest(#[from] ModelRequestError),
}

impl From<ToolError> for AgentError {
    fn from(err: ToolError) -> Self {
        AgentError::ToolExecution(err.to_string())
    }
}

pub type AgentResult<T> = Result<T, AgentError>;
