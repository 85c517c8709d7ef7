use std::path::PathBuf;
use std::time::Duration;

use agentloop::agent::{Agent, DEFAULT_MAX_DEPTH};
use agentloop::client::{ModelClient, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use agentloop::permission::ConsoleGate;
use agentloop::prompt_template::system_prompt;
use agentloop::providers::anthropic::AnthropicProvider;
use agentloop::providers::configs::AnthropicProviderConfig;
use agentloop::tools::default_tools;
use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod prompt;
mod session;

use prompt::rustyline::RustylinePrompt;
use session::Session;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Ask for confirmation before every tool execution
    #[arg(long)]
    safe_mode: bool,

    /// Timeout in seconds for model requests and web fetches
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Model to use
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Maximum tokens per model reply
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// Maximum follow-up model requests per message
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// File whose contents replace the built-in instructions
    #[arg(long, value_name = "FILE")]
    system_prompt: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Send this message, print the reply and exit
    message: Option<String>,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_agent(cli: &Cli) -> Result<Agent> {
    let timeout = Duration::from_secs(cli.timeout);

    let config = AnthropicProviderConfig::from_env()
        .context("Set ANTHROPIC_API_KEY in the environment or a .env file")?
        .with_timeout(timeout);
    let provider = AnthropicProvider::new(config)?;
    let client = ModelClient::new(Box::new(provider), cli.model.clone(), cli.max_tokens);

    let instructions = match &cli.system_prompt {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read system prompt {}", path.display()))?,
        ),
        None => None,
    };
    let system = system_prompt(instructions.as_deref())?;

    let mut agent = Agent::new(client, default_tools(timeout)?, system).with_max_depth(cli.max_depth);
    if cli.safe_mode {
        agent = agent.with_permission_gate(Box::new(ConsoleGate::new()));
    }
    Ok(agent)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let agent = build_agent(&cli)?;
    tracing::debug!(model = %cli.model, safe_mode = cli.safe_mode, "agent ready");

    let prompt = RustylinePrompt::new()?;
    let mut session = Session::new(agent, Box::new(prompt));
    match &cli.message {
        Some(message) => session.headless_start(message).await,
        None => session.start().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["agentloop"]);
        assert!(!cli.safe_mode);
        assert_eq!(cli.timeout, 30);
        assert_eq!(cli.model, "claude-3-5-sonnet-20241022");
        assert_eq!(cli.max_tokens, 4096);
        assert_eq!(cli.max_depth, 25);
        assert!(cli.message.is_none());
    }

    #[test]
    fn test_one_shot_with_flags() {
        let cli = Cli::parse_from([
            "agentloop",
            "--safe-mode",
            "--timeout",
            "5",
            "--system-prompt",
            "rules.md",
            "list the files here",
        ]);
        assert!(cli.safe_mode);
        assert_eq!(cli.timeout, 5);
        assert_eq!(cli.system_prompt, Some(PathBuf::from("rules.md")));
        assert_eq!(cli.message.as_deref(), Some("list the files here"));
    }
}
