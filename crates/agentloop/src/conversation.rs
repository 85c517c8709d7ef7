use std::collections::HashSet;

use crate::errors::{AgentError, AgentResult};
use crate::models::content::ContentBlock;
use crate::models::message::Message;
use crate::models::role::Role;

/// The ordered transcript sent with every model request.
///
/// Append-only: messages can be added but never edited or removed. A conversation
/// lives for one process and is never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Append a user message holding a single text block
    pub fn push_user_text<S: Into<String>>(&mut self, text: S) {
        self.messages.push(Message::user().with_text(text));
    }

    /// Append a parsed model reply
    pub fn push_assistant(&mut self, content: Vec<ContentBlock>) {
        self.messages.push(Message {
            role: Role::Assistant,
            content,
        });
    }

    /// Append the results for the previous assistant message as one user message.
    ///
    /// Every ToolUse id of the preceding assistant message must be answered exactly
    /// once, and no other ids may appear.
    pub fn push_tool_results(&mut self, results: Vec<ContentBlock>) -> AgentResult<()> {
        let expected: Vec<&str> = match self.messages.last() {
            Some(message) if message.role == Role::Assistant => {
                message.tool_uses().iter().map(|t| t.id).collect()
            }
            _ => {
                return Err(AgentError::Protocol(
                    "tool results must follow an assistant message".to_string(),
                ))
            }
        };

        let mut seen = HashSet::new();
        for block in &results {
            let id = match block.as_tool_result() {
                Some((id, _)) => id,
                None => {
                    return Err(AgentError::Protocol(
                        "only tool results may be sent in a tool result message".to_string(),
                    ))
                }
            };
            if !expected.contains(&id) {
                return Err(AgentError::Protocol(format!(
                    "tool result for unknown tool use id '{}'",
                    id
                )));
            }
            if !seen.insert(id) {
                return Err(AgentError::Protocol(format!(
                    "duplicate tool result for tool use id '{}'",
                    id
                )));
            }
        }
        if let Some(missing) = expected.iter().find(|id| !seen.contains(*id)) {
            return Err(AgentError::Protocol(format!(
                "no tool result for tool use id '{}'",
                missing
            )));
        }

        self.messages.push(Message {
            role: Role::User,
            content: results,
        });
        Ok(())
    }
}
