use std::collections::HashMap;
use std::io::{self, Write};

use agentloop::agent::{AgentEvent, ToolInvocation};
use anyhow::Result;
use bat::WrappingMode;
use cliclack::spinner;
use console::style;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use super::{parse_input, Input, Prompt};

const PROMPT: &str = "\x1b[1m\x1b[38;5;30m> \x1b[0m";
const THEME: &str = "zenburn";
const MAX_RESULT_LINES: usize = 20;
const INDENT: &str = "    ";

pub struct RustylinePrompt {
    editor: DefaultEditor,
    spinner: cliclack::ProgressBar,
    busy: bool,
    renderers: HashMap<&'static str, Box<dyn ToolRenderer>>,
    /// Name of the tool whose result is expected next
    last_tool: Option<String>,
}

impl RustylinePrompt {
    pub fn new() -> Result<Self> {
        let mut renderers: HashMap<&'static str, Box<dyn ToolRenderer>> = HashMap::new();
        for renderer in [
            Box::new(DefaultRenderer) as Box<dyn ToolRenderer>,
            Box::new(TerminalRenderer),
        ] {
            renderers.insert(renderer.tool_name(), renderer);
        }

        Ok(RustylinePrompt {
            editor: DefaultEditor::new()?,
            spinner: spinner(),
            busy: false,
            renderers,
            last_tool: None,
        })
    }

    fn renderer(&self, tool_name: Option<&str>) -> &dyn ToolRenderer {
        tool_name
            .and_then(|name| self.renderers.get(name))
            .or_else(|| self.renderers.get(DEFAULT_RENDERER))
            .map(|renderer| renderer.as_ref())
            .unwrap_or(&DefaultRenderer)
    }
}

const DEFAULT_RENDERER: &str = "default";

/// Implement the ToolRenderer trait for each tool that you want to render in the prompt.
trait ToolRenderer {
    fn tool_name(&self) -> &'static str;
    fn request(&self, invocation: &ToolInvocation);
    fn response(&self, content: &str);
}

struct DefaultRenderer;

impl ToolRenderer for DefaultRenderer {
    fn tool_name(&self) -> &'static str {
        DEFAULT_RENDERER
    }

    fn request(&self, invocation: &ToolInvocation) {
        print_request_header(invocation);
        print_params(invocation);
        print_newline();
    }

    fn response(&self, content: &str) {
        print_result(content);
    }
}

struct TerminalRenderer;

impl ToolRenderer for TerminalRenderer {
    fn tool_name(&self) -> &'static str {
        "run_terminal_command"
    }

    fn request(&self, invocation: &ToolInvocation) {
        print_request_header(invocation);
        match invocation.parameters.iter().find(|p| p.name == "command") {
            Some(command) => {
                println!("{}: {}", style("command").dim(), style(&command.value).green());
            }
            None => print_params(invocation),
        }
        print_newline();
    }

    fn response(&self, content: &str) {
        print_result(content);
    }
}

fn print_request_header(invocation: &ToolInvocation) {
    let tool_header = format!(
        "─── {} | {} ──────────────────────────",
        style(&invocation.name),
        style(&invocation.id).magenta().dim(),
    );
    print_newline();
    println!("{}", tool_header);
    println!("{}", style(&invocation.description).dim());
}

fn print_params(invocation: &ToolInvocation) {
    for param in &invocation.parameters {
        println!(
            "{}{}: {}",
            INDENT,
            style(&param.name).dim(),
            style(&param.value).green()
        );
        if let Some(description) = &param.description {
            println!("{}{}{}", INDENT, INDENT, style(description).dim().italic());
        }
    }
}

/// Tool output can be long, only the head is shown
fn print_result(content: &str) {
    let total = content.lines().count();
    for line in content.lines().take(MAX_RESULT_LINES) {
        println!("{}", style(line).dim());
    }
    if total > MAX_RESULT_LINES {
        println!(
            "{}",
            style(format!("... ({} more lines)", total - MAX_RESULT_LINES)).dim()
        );
    }
}

fn print_markdown(content: &str) {
    let printed = bat::PrettyPrinter::new()
        .input(bat::Input::from_bytes(content.as_bytes()))
        .theme(THEME)
        .language("Markdown")
        .wrapping_mode(WrappingMode::Character)
        .print();
    if printed.is_err() {
        println!("{}", content);
    }
}

fn print_newline() {
    println!();
}

impl Prompt for RustylinePrompt {
    fn render(&mut self, event: &AgentEvent) {
        match event {
            AgentEvent::Text(text) => {
                print_markdown(text);
                print_newline();
            }
            AgentEvent::ToolInvocation(invocation) => {
                self.last_tool = Some(invocation.name.clone());
                self.renderer(Some(invocation.name.as_str()))
                    .request(invocation);
            }
            AgentEvent::ToolResult { content, .. } => {
                // Unknown tools get a result without a preceding invocation
                let tool = self.last_tool.take();
                self.renderer(tool.as_deref()).response(content);
                print_newline();
            }
        }
        let _ = io::stdout().flush();
    }

    fn render_error(&mut self, message: &str) {
        eprintln!("{} {}", style("Error:").red().bold(), message);
    }

    fn show_busy(&mut self) {
        if !self.busy {
            self.spinner = spinner();
            self.spinner.start("awaiting reply...");
            self.busy = true;
        }
    }

    fn hide_busy(&mut self) {
        if self.busy {
            self.spinner.stop("");
            self.busy = false;
        }
    }

    fn get_input(&mut self) -> Result<Input> {
        match self.editor.readline(PROMPT) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(parse_input(&line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(Input::exit()),
            Err(e) => {
                eprintln!("Input error: {}", e);
                Ok(Input::exit())
            }
        }
    }

    fn close(&self) {
        // No cleanup required
    }
}
