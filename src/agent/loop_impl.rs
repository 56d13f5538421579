//! Agent loop - core message processing

use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::context::Conversation;
use super::llm::{LlmClient, Usage};
use super::message::{Message, Response};
use crate::error::Error;
use crate::tools::{ToolCallRequest, ToolOutcome, ToolRegistry};
use crate::Result;

/// The agent loop processes messages through LLM and tool execution
pub struct AgentLoop<C: LlmClient> {
    client: C,
    registry: ToolRegistry,
    max_iterations: usize,
}

impl<C: LlmClient> AgentLoop<C> {
    /// Create a new agent loop
    pub fn new(client: C, registry: ToolRegistry, max_iterations: usize) -> Self {
        Self {
            client,
            registry,
            max_iterations,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run one user turn to completion
    pub async fn run(&self, conversation: &mut Conversation, input: &str) -> Result<Response> {
        self.run_with(conversation, input, |_, _| {}).await
    }

    /// Run one user turn, reporting every dispatched tool call to `on_tool`.
    ///
    /// On error the conversation is rolled back to where it was before the
    /// turn, so a failed turn leaves no dangling user message.
    pub async fn run_with<F>(
        &self,
        conversation: &mut Conversation,
        input: &str,
        on_tool: F,
    ) -> Result<Response>
    where
        F: FnMut(&ToolCallRequest, &ToolOutcome) + Send,
    {
        let checkpoint = conversation.len();
        let result = self.run_turn(conversation, input, on_tool).await;
        if let Err(ref e) = result {
            debug!("Turn failed ({}), rolling back to {} message(s)", e, checkpoint);
            conversation.truncate(checkpoint);
        }
        result
    }

    async fn run_turn<F>(
        &self,
        conversation: &mut Conversation,
        input: &str,
        mut on_tool: F,
    ) -> Result<Response>
    where
        F: FnMut(&ToolCallRequest, &ToolOutcome) + Send,
    {
        conversation.push(Message::user(input));
        info!("Starting agent loop with message: {}", input);

        let mut usage = Usage::default();
        let mut llm_time = Duration::ZERO;
        let mut tool_calls = 0;

        for iteration in 1..=self.max_iterations {
            debug!("Iteration {}/{}", iteration, self.max_iterations);

            let started = Instant::now();
            let response = self
                .client
                .chat(conversation.messages(), self.registry.descriptors())
                .await?;
            let elapsed = started.elapsed();
            llm_time += elapsed;
            usage += response.usage;
            info!(
                "LLM call {} took {:?} ({} tokens)",
                iteration, elapsed, response.usage.total_tokens
            );

            if !response.has_tool_calls() {
                let content = response.content.unwrap_or_default();
                conversation.push(Message::assistant(content.clone()));
                info!(
                    "Agent completed after {} iteration(s), {} tool call(s), {:?} in LLM",
                    iteration, tool_calls, llm_time
                );
                return Ok(Response {
                    content,
                    iterations: iteration,
                    tool_calls,
                    usage,
                    llm_time,
                });
            }

            conversation.push(Message::assistant_with_tools(
                response.content.unwrap_or_default(),
                response.tool_calls.clone(),
            ));

            for call in &response.tool_calls {
                debug!("Executing tool: {} with args: {}", call.name, call.arguments);
                let outcome = self.registry.dispatch(call);
                tool_calls += 1;

                on_tool(call, &outcome);
                conversation.push(Message::tool_result(&call.name, outcome.to_content()));
            }
        }

        Err(Error::MaxIterations)
    }
}
