//! CLI adapter — interactive and single-message command line interface.

use std::io::{self, BufRead, Write};

use crate::agent::{AgentLoop, Conversation, LlmClient, Response};
use crate::{ui, Result};

/// CLI channel for interactive agent sessions.
pub struct CliChannel<C: LlmClient> {
    agent: AgentLoop<C>,
    conversation: Conversation,
}

impl<C: LlmClient> CliChannel<C> {
    /// Create a new CLI channel.
    pub fn new(agent: AgentLoop<C>, conversation: Conversation) -> Self {
        Self {
            agent,
            conversation,
        }
    }

    /// Run a single message and return the response, printing tool results
    /// as they come in.
    pub async fn run_once(&mut self, message: &str) -> Result<Response> {
        self.agent
            .run_with(&mut self.conversation, message, |call, outcome| {
                ui::print_tool_result(&call.name, &outcome.to_content(), outcome.is_success());
            })
            .await
    }

    /// Run interactive REPL loop.
    pub async fn run_interactive(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        loop {
            print!("\nUser: ");
            stdout.flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                // EOF
                break;
            }

            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            if is_exit_command(input) {
                println!("Goodbye! 👋");
                break;
            }

            match self.run_once(input).await {
                Ok(response) => ui::print_assistant(&response.content),
                Err(e) => ui::print_error(&e.to_string()),
            }
        }

        Ok(())
    }

    /// Clear conversation history, keeping the system prompt.
    pub fn clear_history(&mut self) {
        self.conversation.clear();
    }

    /// Get current history length.
    pub fn history_len(&self) -> usize {
        self.conversation.len()
    }
}

fn is_exit_command(input: &str) -> bool {
    matches!(input.to_lowercase().as_str(), "exit" | "quit")
}
