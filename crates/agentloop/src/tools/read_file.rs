use async_trait::async_trait;
use std::io::ErrorKind;

use super::{required_param, Tool};
use crate::errors::{ToolError, ToolResult};
use crate::models::content::ToolInput;
use crate::models::tool::{InputSchema, PropertySchema, ToolDescriptor};

pub struct ReadFileTool {
    descriptor: ToolDescriptor,
}

impl ReadFileTool {
    pub fn new() -> Self {
        let descriptor = ToolDescriptor::new(
            "read_file",
            "Read the full contents of a text file from the local filesystem. \
            Use this to inspect source code, configuration or notes before changing them.",
            InputSchema::new().required_property(
                "file_path",
                PropertySchema::string("Absolute or relative path of the file to read."),
            ),
        );
        Self { descriptor }
    }
}

impl Default for ReadFileTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn execute(&self, parameters: &ToolInput) -> ToolResult<String> {
        let path = required_param(parameters, "file_path")?;

        // A missing file is an answer the model can act on, not a failure
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Ok(format!("Error: File not found: {}", path))
            }
            Err(e) => Err(ToolError::Execution(format!(
                "Failed to read file '{}': {}",
                path, e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(path: &str) -> ToolInput {
        ToolInput::from([("file_path".to_string(), path.to_string())])
    }

    #[tokio::test]
    async fn test_read_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello\nworld").unwrap();

        let tool = ReadFileTool::new();
        let content = tool.execute(&input(path.to_str().unwrap())).await.unwrap();
        assert_eq!(content, "hello\nworld");
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        let path = path.to_str().unwrap();

        let result = ReadFileTool::new().execute(&input(path)).await.unwrap();
        assert!(result.starts_with("Error: File not found"));
        assert!(result.ends_with(path));
    }

    #[tokio::test]
    async fn test_read_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = ReadFileTool::new()
            .execute(&input(dir.path().to_str().unwrap()))
            .await;
        assert!(matches!(result, Err(ToolError::Execution(_))));
    }

    #[tokio::test]
    async fn test_missing_parameter() {
        let err = ReadFileTool::new()
            .execute(&ToolInput::new())
            .await
            .unwrap_err();
        assert_eq!(err, ToolError::MissingParameter("file_path".to_string()));
    }
}
