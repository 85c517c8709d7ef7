use async_trait::async_trait;
use kill_tree::Config;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use super::{required_param, truncate_output, Tool};
use crate::errors::{ToolError, ToolResult};
use crate::models::content::ToolInput;
use crate::models::tool::{InputSchema, PropertySchema, ToolDescriptor};

pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 30;
const MAX_OUTPUT_CHARS: usize = 10_000;

/// Runs a shell command and reports its combined output
pub struct TerminalTool {
    descriptor: ToolDescriptor,
    default_timeout: u64,
}

impl TerminalTool {
    pub fn new() -> Self {
        Self::with_default_timeout(DEFAULT_COMMAND_TIMEOUT_SECS)
    }

    pub fn with_default_timeout(default_timeout: u64) -> Self {
        let descriptor = ToolDescriptor::new(
            "run_terminal_command",
            "Run a command in the system shell and return its output. \
            Use for listing files, running builds or tests, and inspecting the environment. \
            Long-running commands are stopped when the timeout expires.",
            InputSchema::new()
                .required_property(
                    "command",
                    PropertySchema::string("The shell command to execute."),
                )
                .property(
                    "timeout",
                    PropertySchema::integer(format!(
                        "Maximum run time in seconds (default: {}).",
                        default_timeout
                    )),
                ),
        );
        Self {
            descriptor,
            default_timeout,
        }
    }

    fn timeout_secs(&self, parameters: &ToolInput) -> ToolResult<u64> {
        match parameters.get("timeout").map(|t| t.trim()) {
            None | Some("") => Ok(self.default_timeout),
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Ok(secs),
                _ => Err(ToolError::InvalidParameter(format!(
                    "timeout must be a positive number of seconds, got '{}'",
                    raw
                ))),
            },
        }
    }
}

impl Default for TerminalTool {
    fn default() -> Self {
        Self::new()
    }
}

fn shell_command(command: &str) -> Command {
    let (shell, flag) = if cfg!(target_os = "windows") {
        ("cmd", "/C")
    } else {
        ("sh", "-c")
    };
    let mut cmd = Command::new(shell);
    cmd.arg(flag)
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        // Covers cancellation of the whole tool call; timeouts kill the full tree
        .kill_on_drop(true);
    cmd
}

async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// SIGKILL the shell and everything it started
async fn kill_process_tree(pid: u32) {
    let config = Config {
        signal: "SIGKILL".to_string(),
        ..Default::default()
    };
    match kill_tree::tokio::kill_tree_with_config(pid, &config).await {
        Ok(outputs) => tracing::debug!(pid, killed = outputs.len(), "killed timed out command"),
        Err(e) => tracing::warn!(pid, error = %e, "failed to kill timed out command"),
    }
}

#[async_trait]
impl Tool for TerminalTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn execute(&self, parameters: &ToolInput) -> ToolResult<String> {
        let command = required_param(parameters, "command")?;
        let timeout = self.timeout_secs(parameters)?;

        tracing::info!(command, timeout, "running terminal command");

        let mut child = shell_command(command)
            .spawn()
            .map_err(|e| ToolError::Execution(format!("Failed to execute command: {}", e)))?;
        let pid = child.id();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let finished = tokio::time::timeout(Duration::from_secs(timeout), async {
            tokio::try_join!(child.wait(), read_pipe(stdout), read_pipe(stderr))
        })
        .await;

        let (status, stdout, stderr): (ExitStatus, Vec<u8>, Vec<u8>) = match finished {
            Ok(result) => result
                .map_err(|e| ToolError::Execution(format!("Failed to execute command: {}", e)))?,
            Err(_) => {
                // Grandchildren outlive a killed shell, so take down the whole tree
                if let Some(pid) = pid {
                    kill_process_tree(pid).await;
                }
                let _ = child.kill().await;
                return Err(ToolError::Timeout(timeout));
            }
        };

        let stdout = String::from_utf8_lossy(&stdout);
        let stderr = String::from_utf8_lossy(&stderr);

        let mut combined = stdout.into_owned();
        if !stderr.is_empty() {
            if !combined.is_empty() && !combined.ends_with('\n') {
                combined.push('\n');
            }
            combined.push_str(&stderr);
        }
        let combined = truncate_output(combined, MAX_OUTPUT_CHARS);

        if !status.success() {
            let code = status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            return Err(ToolError::Execution(format!(
                "Command exited with status {}: {}",
                code, combined
            )));
        }

        Ok(combined)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Instant;

    fn command(cmd: &str) -> ToolInput {
        ToolInput::from([("command".to_string(), cmd.to_string())])
    }

    #[tokio::test]
    async fn test_command_output() {
        let result = TerminalTool::new()
            .execute(&command("echo hello"))
            .await
            .unwrap();
        assert_eq!(result, "hello\n");
    }

    #[tokio::test]
    async fn test_stderr_is_included() {
        let result = TerminalTool::new()
            .execute(&command("echo out; echo err 1>&2"))
            .await
            .unwrap();
        assert!(result.contains("out"));
        assert!(result.contains("err"));
    }

    #[tokio::test]
    async fn test_non_zero_exit() {
        let err = TerminalTool::new()
            .execute(&command("echo broken; exit 3"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ToolError::Execution("Command exited with status 3: broken\n".to_string())
        );
    }

    #[tokio::test]
    async fn test_timeout_kills_command() {
        let mut parameters = command("sleep 10");
        parameters.insert("timeout".to_string(), "1".to_string());

        let started = Instant::now();
        let err = TerminalTool::new().execute(&parameters).await.unwrap_err();

        assert_eq!(err, ToolError::Timeout(1));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_timeout_kills_nested_processes() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("marker");
        let mut parameters = command(&format!(
            "sh -c 'sleep 2; touch {}'; true",
            marker.display()
        ));
        parameters.insert("timeout".to_string(), "1".to_string());

        let err = TerminalTool::new().execute(&parameters).await.unwrap_err();
        assert_eq!(err, ToolError::Timeout(1));

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(!marker.exists(), "nested command kept running after the timeout");
    }

    #[tokio::test]
    async fn test_invalid_timeout() {
        let mut parameters = command("true");
        parameters.insert("timeout".to_string(), "soon".to_string());
        let err = TerminalTool::new().execute(&parameters).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidParameter(_)));
    }
}
