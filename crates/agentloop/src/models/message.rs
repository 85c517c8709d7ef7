use super::content::{ContentBlock, ToolInput, ToolUse};
use super::role::Role;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A message to or from an LLM
pub struct Message {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl Message {
    /// Create a new, empty user message
    pub fn user() -> Self {
        Message {
            role: Role::User,
            content: Vec::new(),
        }
    }

    /// Create a new, empty assistant message
    pub fn assistant() -> Self {
        Message {
            role: Role::Assistant,
            content: Vec::new(),
        }
    }

    /// Add any ContentBlock to the message
    pub fn with_content(mut self, content: ContentBlock) -> Self {
        self.content.push(content);
        self
    }

    /// Add text content to the message
    pub fn with_text<S: Into<String>>(self, text: S) -> Self {
        self.with_content(ContentBlock::text(text))
    }

    /// Add a tool request to the message
    pub fn with_tool_use<I: Into<String>, N: Into<String>>(
        self,
        id: I,
        name: N,
        input: ToolInput,
    ) -> Self {
        self.with_content(ContentBlock::tool_use(id, name, input))
    }

    /// Add a tool result to the message
    pub fn with_tool_result<I: Into<String>, C: Into<String>>(self, id: I, content: C) -> Self {
        self.with_content(ContentBlock::tool_result(id, content))
    }

    /// All tool requests in this message, in the order the model listed them
    pub fn tool_uses(&self) -> Vec<ToolUse<'_>> {
        self.content
            .iter()
            .filter_map(ContentBlock::as_tool_use)
            .collect()
    }

    pub fn has_tool_use(&self) -> bool {
        self.content
            .iter()
            .any(|c| matches!(c, ContentBlock::ToolUse { .. }))
    }

    /// Concatenated text of all Text blocks
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(ContentBlock::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_wire_shape() {
        let message = Message::user().with_text("What's 2+2?");
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({"role": "user", "content": [{"type": "text", "text": "What's 2+2?"}]})
        );
    }

    #[test]
    fn test_tool_uses_keep_order() {
        let message = Message::assistant()
            .with_text("Let me look.")
            .with_tool_use("t1", "read_file", ToolInput::new())
            .with_text("And also...")
            .with_tool_use("t2", "fetch_url", ToolInput::new());

        let ids: Vec<&str> = message.tool_uses().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["t1", "t2"]);
        assert!(message.has_tool_use());
        assert_eq!(message.text(), "Let me look.\nAnd also...");
    }
}
