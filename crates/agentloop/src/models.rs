//! These models represent the objects passed between the agent, its tools and the LLM
//!
//! The internal structs are shaped after the Anthropic messages API so they can be
//! sent and parsed without an intermediate conversion layer:
//! - a [`message::Message`] is one turn of the transcript
//! - a [`content::ContentBlock`] is a typed fragment of a message
//! - a [`tool::ToolDescriptor`] is what the model sees of a tool
pub mod content;
pub mod message;
pub mod role;
pub mod tool;
