//! Agent module — core agent logic.
//!
//! This module contains:
//! - Message types (Message, Response)
//! - LLM client trait and the Ollama implementation
//! - Agent loop for processing a user turn
//! - Conversation transcript

mod context;
mod loop_impl;
mod message;

// LLM providers in submodule
pub mod llm;

// Re-exports for convenience
pub use context::{Conversation, DEFAULT_SYSTEM_PROMPT};
pub use llm::{LlmClient, LlmResponse, OllamaClient, Usage};
pub use loop_impl::AgentLoop;
pub use message::{Message, Response, Role};
pub use crate::tools::ToolCallRequest;
