use async_trait::async_trait;
use std::path::Path;

use super::{required_param, Tool};
use crate::errors::{ToolError, ToolResult};
use crate::models::content::ToolInput;
use crate::models::tool::{InputSchema, PropertySchema, ToolDescriptor};

pub struct WriteFileTool {
    descriptor: ToolDescriptor,
}

impl WriteFileTool {
    pub fn new() -> Self {
        let descriptor = ToolDescriptor::new(
            "write_file",
            "Write text to a file, replacing any existing contents. \
            Missing parent directories are created.",
            InputSchema::new()
                .required_property(
                    "file_path",
                    PropertySchema::string("Absolute or relative path of the file to write."),
                )
                .required_property(
                    "content",
                    PropertySchema::string("The complete new contents of the file."),
                ),
        );
        Self { descriptor }
    }
}

impl Default for WriteFileTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for WriteFileTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn execute(&self, parameters: &ToolInput) -> ToolResult<String> {
        let path = required_param(parameters, "file_path")?;
        let content = required_param(parameters, "content")?;

        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    ToolError::Execution(format!(
                        "Failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        tokio::fs::write(path, content)
            .await
            .map_err(|e| ToolError::Execution(format!("Failed to write file '{}': {}", path, e)))?;

        Ok(format!(
            "Successfully wrote {} bytes to {}",
            content.len(),
            path
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.txt");
        let path_str = path.to_str().unwrap();

        let parameters = ToolInput::from([
            ("file_path".to_string(), path_str.to_string()),
            ("content".to_string(), "Hello, world!".to_string()),
        ]);
        let result = WriteFileTool::new().execute(&parameters).await.unwrap();

        assert_eq!(
            result,
            format!("Successfully wrote 13 bytes to {}", path_str)
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Hello, world!");
    }

    #[tokio::test]
    async fn test_write_requires_content() {
        let parameters = ToolInput::from([("file_path".to_string(), "x.txt".to_string())]);
        let err = WriteFileTool::new().execute(&parameters).await.unwrap_err();
        assert_eq!(err, ToolError::MissingParameter("content".to_string()));
    }
}
