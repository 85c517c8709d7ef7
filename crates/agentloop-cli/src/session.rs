use agentloop::agent::{Agent, AgentEvent};
use agentloop::conversation::Conversation;
use agentloop::errors::AgentResult;
use anyhow::Result;
use futures::StreamExt;

use crate::prompt::{InputType, Prompt};

pub struct Session<'a> {
    agent: Agent,
    prompt: Box<dyn Prompt + 'a>,
    conversation: Conversation,
}

impl<'a> Session<'a> {
    pub fn new(agent: Agent, prompt: Box<dyn Prompt + 'a>) -> Self {
        Session {
            agent,
            prompt,
            conversation: Conversation::new(),
        }
    }

    /// Interactive loop. A failed turn is reported and the next line is read.
    pub async fn start(&mut self) -> Result<()> {
        self.prompt.ready(self.agent.safe_mode());

        loop {
            let input = self.prompt.get_input()?;
            let text = match input.input_type {
                InputType::Message => match input.content {
                    Some(text) => text,
                    None => continue,
                },
                InputType::AskAgain => continue,
                InputType::Exit => break,
            };

            if let Err(e) = self.process(&text).await {
                self.prompt.render_error(&e.to_string());
            }
        }
        self.prompt.close();
        Ok(())
    }

    /// Answer a single message and return
    pub async fn headless_start(&mut self, message: &str) -> Result<()> {
        let result = self.process(message).await;
        self.prompt.close();
        Ok(result?)
    }

    async fn process(&mut self, text: &str) -> AgentResult<()> {
        self.prompt.show_busy();
        let mut stream = self.agent.reply(&mut self.conversation, text);
        let result = loop {
            match stream.next().await {
                Some(Ok(event)) => {
                    // The spinner must be gone before a permission prompt
                    self.prompt.hide_busy();
                    self.prompt.render(&event);
                    if matches!(event, AgentEvent::ToolResult { .. }) {
                        self.prompt.show_busy();
                    }
                }
                Some(Err(e)) => break Err(e),
                None => break Ok(()),
            }
        };
        self.prompt.hide_busy();
        result
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }
}
