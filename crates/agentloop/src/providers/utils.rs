use serde_json::{json, Value};
use std::collections::HashSet;

use crate::errors::ModelRequestError;
use crate::models::content::ContentBlock;
use crate::models::tool::ToolDescriptor;

/// Convert tool descriptors to Anthropic's tool specification
pub fn tools_to_anthropic_spec(tools: &[&ToolDescriptor]) -> Vec<Value> {
    tools
        .iter()
        .map(|tool| {
            json!({
                "name": tool.name,
                "description": tool.description,
                "input_schema": {
                    "type": "object",
                    "properties": tool.input_schema.properties,
                    "required": tool.input_schema.required,
                }
            })
        })
        .collect()
}

/// Each tool request in a response needs its own id so results can be matched back
pub fn check_tool_use_ids(content: &[ContentBlock]) -> Result<(), ModelRequestError> {
    let mut seen = HashSet::new();
    for block in content {
        match block {
            ContentBlock::ToolUse { id, .. } => {
                if id.is_empty() {
                    return Err(ModelRequestError::Protocol(
                        "tool_use block without an id".to_string(),
                    ));
                }
                if !seen.insert(id.as_str()) {
                    return Err(ModelRequestError::Protocol(format!(
                        "duplicate tool_use id '{}'",
                        id
                    )));
                }
            }
            ContentBlock::ToolResult { .. } => {
                return Err(ModelRequestError::Protocol(
                    "model responses cannot contain tool results".to_string(),
                ));
            }
            ContentBlock::Text { .. } => {}
        }
    }
    Ok(())
}

/// Shorten text for log output: escape newlines and cut after `max_chars` characters
pub fn preview(text: &str, max_chars: usize) -> String {
    let escaped = text.replace('\r', "\\r").replace('\n', "\\n");
    match escaped.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &escaped[..byte_idx]),
        None => escaped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::ToolInput;
    use crate::models::tool::{InputSchema, PropertySchema};

    #[test]
    fn test_schema_round_trip() {
        let descriptor = ToolDescriptor::new(
            "fetch_url",
            "Fetch a page",
            InputSchema::new()
                .required_property("url", PropertySchema::string("The URL to fetch")),
        );

        let spec = tools_to_anthropic_spec(&[&descriptor]);
        assert_eq!(
            spec,
            vec![json!({
                "name": "fetch_url",
                "description": "Fetch a page",
                "input_schema": {
                    "type": "object",
                    "properties": {
                        "url": {"type": "string", "description": "The URL to fetch"}
                    },
                    "required": ["url"]
                }
            })]
        );

        let schema = &spec[0]["input_schema"];
        let properties: std::collections::BTreeMap<String, PropertySchema> =
            serde_json::from_value(schema["properties"].clone()).unwrap();
        assert_eq!(properties, descriptor.input_schema.properties);
    }

    #[test]
    fn test_empty_required_is_still_a_list() {
        let descriptor = ToolDescriptor::new("noop", "Does nothing", InputSchema::new());
        let spec = tools_to_anthropic_spec(&[&descriptor]);
        assert_eq!(spec[0]["input_schema"]["required"], json!([]));
        assert_eq!(spec[0]["input_schema"]["properties"], json!({}));
    }

    #[test]
    fn test_duplicate_tool_use_ids() {
        let content = vec![
            ContentBlock::tool_use("t1", "read_file", ToolInput::new()),
            ContentBlock::tool_use("t1", "write_file", ToolInput::new()),
        ];
        assert!(matches!(
            check_tool_use_ids(&content),
            Err(ModelRequestError::Protocol(_))
        ));

        let content = vec![
            ContentBlock::text("two reads"),
            ContentBlock::tool_use("t1", "read_file", ToolInput::new()),
            ContentBlock::tool_use("t2", "read_file", ToolInput::new()),
        ];
        assert!(check_tool_use_ids(&content).is_ok());
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("line one\nline two", 100), "line one\\nline two");
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("abc", 3), "abc");
    }
}
