use async_trait::async_trait;
use std::io::{self, BufRead, Write};

use crate::models::content::ToolInput;
use crate::providers::utils::preview;

const MAX_PARAMETER_CHARS: usize = 100;

/// Asks a human whether a pending tool call may run.
///
/// The agent awaits `confirm` before executing the tool and does no other work in
/// the meantime: the whole loop is paused until an answer arrives.
#[async_trait]
pub trait PermissionGate: Send + Sync {
    async fn confirm(&self, tool_name: &str, description: &str, parameters: &ToolInput) -> bool;
}

/// Only `y` or `yes` (any case, surrounding whitespace ignored) grant permission
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Prompts on stdout and reads the answer from stdin.
///
/// The read happens on tokio's blocking pool so the runtime's workers stay free,
/// but the caller is still suspended until the line arrives.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleGate;

impl ConsoleGate {
    pub fn new() -> Self {
        ConsoleGate
    }
}

/// The pending call as shown before asking: description, parameters, then the question
pub fn confirmation_prompt(tool_name: &str, description: &str, parameters: &ToolInput) -> String {
    let mut prompt = format!("{}: {}\n", tool_name, description);
    for (name, value) in parameters {
        prompt.push_str(&format!("  {}: {}\n", name, preview(value, MAX_PARAMETER_CHARS)));
    }
    prompt.push_str(&format!("Allow tool '{}' to run? [y/N] ", tool_name));
    prompt
}

fn read_answer(prompt: &str) -> io::Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{}", prompt)?;
    stdout.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer)
}

#[async_trait]
impl PermissionGate for ConsoleGate {
    async fn confirm(&self, tool_name: &str, description: &str, parameters: &ToolInput) -> bool {
        let prompt = confirmation_prompt(tool_name, description, parameters);
        match tokio::task::spawn_blocking(move || read_answer(&prompt)).await {
            Ok(Ok(answer)) => is_affirmative(&answer),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "could not read confirmation, denying");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "confirmation prompt failed, denying");
                false
            }
        }
    }
}
