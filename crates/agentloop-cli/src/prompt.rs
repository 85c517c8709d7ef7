use agentloop::agent::AgentEvent;
use anyhow::Result;

pub mod rustyline;

/// The terminal surface of a session
pub trait Prompt {
    fn render(&mut self, event: &AgentEvent);
    fn render_error(&mut self, message: &str);
    fn get_input(&mut self) -> Result<Input>;
    fn show_busy(&mut self);
    fn hide_busy(&mut self);
    fn close(&self);
    fn ready(&self, safe_mode: bool) {
        println!();
        if safe_mode {
            println!("Safe mode is on: every tool call needs your confirmation.");
        }
        println!("Enter your instructions, or type \"exit\" to quit.");
        println!();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Input {
    pub input_type: InputType,
    pub content: Option<String>, // Only set for messages
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputType {
    AskAgain, // Blank line, prompt again
    Message,  // User sent a message
    Exit,     // User wants to exit the session
}

impl Input {
    pub fn exit() -> Self {
        Input {
            input_type: InputType::Exit,
            content: None,
        }
    }
}

/// Classify one line typed at the prompt
pub fn parse_input(line: &str) -> Input {
    let text = line.trim();
    if text.is_empty() {
        Input {
            input_type: InputType::AskAgain,
            content: None,
        }
    } else if text.eq_ignore_ascii_case("exit") {
        Input::exit()
    } else {
        Input {
            input_type: InputType::Message,
            content: Some(text.to_string()),
        }
    }
}
