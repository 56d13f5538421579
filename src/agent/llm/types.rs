//! Wire types for the Ollama `/api/chat` endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tools::ToolDescriptor;

/// Request body for `/api/chat`.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<WireMessage<'a>>,
    pub tools: &'a [ToolDescriptor],
    pub stream: bool,
    pub options: ChatOptions,
}

#[derive(Debug, Serialize)]
pub struct ChatOptions {
    pub temperature: f32,
}

/// A transcript message as Ollama expects it.
#[derive(Debug, Serialize)]
pub struct WireMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<WireToolCall<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct WireToolCall<'a> {
    pub function: WireFunction<'a>,
}

#[derive(Debug, Serialize)]
pub struct WireFunction<'a> {
    pub name: &'a str,
    pub arguments: &'a Value,
}

/// Top-level `/api/chat` response (non-streaming).
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub message: ResponseMessage,
    #[serde(default)]
    pub done_reason: Option<String>,
    #[serde(default)]
    pub prompt_eval_count: Option<usize>,
    #[serde(default)]
    pub eval_count: Option<usize>,
}

/// Assistant message in a response.
#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tool_calls: Vec<ResponseToolCall>,
}

/// Function call requested by the model.
#[derive(Debug, Deserialize)]
pub struct ResponseToolCall {
    #[serde(default)]
    pub id: Option<String>,
    pub function: ResponseFunction,
}

#[derive(Debug, Deserialize)]
pub struct ResponseFunction {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}
