//! Ollama LLM client implementation (local `/api/chat`).

use async_trait::async_trait;
use reqwest::Client;

use crate::config::Config;
use crate::error::Error;
use crate::tools::{ToolCallRequest, ToolDescriptor};
use crate::Result;

use super::super::message::{Message, Role};
use super::types::{
    ChatOptions, ChatRequest, ChatResponse, WireFunction, WireMessage, WireToolCall,
};
use super::{LlmClient, LlmResponse, Usage};

pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";

/// Client for a local Ollama server.
#[derive(Clone)]
pub struct OllamaClient {
    host: String,
    model: String,
    temperature: f32,
    client: Client,
}

impl OllamaClient {
    /// Create a new Ollama client.
    pub fn new(host: &str, model: &str) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            model: model.to_string(),
            temperature: 0.7,
            client: Client::new(),
        }
    }

    /// Create a client from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.ollama_host, &config.model).with_temperature(config.temperature)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn build_url(&self) -> String {
        format!("{}/api/chat", self.host)
    }

    fn convert_messages<'a>(&self, messages: &'a [Message]) -> Vec<WireMessage<'a>> {
        messages
            .iter()
            .map(|m| WireMessage {
                role: match m.role {
                    Role::System => "system",
                    Role::User => "user",
                    Role::Assistant => "assistant",
                    Role::Tool => "tool",
                },
                content: &m.content,
                tool_calls: m
                    .tool_calls
                    .iter()
                    .flatten()
                    .map(|tc| WireToolCall {
                        function: WireFunction {
                            name: &tc.name,
                            arguments: &tc.arguments,
                        },
                    })
                    .collect(),
                tool_name: m.tool_name.as_deref(),
            })
            .collect()
    }

    fn parse_response(&self, response: ChatResponse) -> LlmResponse {
        let tool_calls: Vec<ToolCallRequest> = response
            .message
            .tool_calls
            .into_iter()
            .enumerate()
            .map(|(i, tc)| ToolCallRequest {
                id: tc.id.unwrap_or_else(|| format!("call_{}", i)),
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        let content = Some(response.message.content).filter(|c| !c.is_empty());

        let prompt_tokens = response.prompt_eval_count.unwrap_or(0);
        let completion_tokens = response.eval_count.unwrap_or(0);

        let finish_reason = match response.done_reason {
            Some(reason) => reason,
            None if !tool_calls.is_empty() => "tool_calls".to_string(),
            None => "stop".to_string(),
        };

        LlmResponse {
            content,
            tool_calls,
            finish_reason,
            usage: Usage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            },
        }
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn chat(
        &self,
        messages: &[Message],
        tools: &[ToolDescriptor],
    ) -> Result<LlmResponse> {
        let request = ChatRequest {
            model: &self.model,
            messages: self.convert_messages(messages),
            tools,
            stream: false,
            options: ChatOptions {
                temperature: self.temperature,
            },
        };

        let response = self.client.post(self.build_url()).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(Error::Llm(format!("Ollama API error ({status}): {error_text}")));
        }

        let chat_response: ChatResponse = response.json().await?;
        Ok(self.parse_response(chat_response))
    }

    fn default_model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolRegistry;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_chat_parses_tool_calls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(json!({
                "model": "llama3.2:3b",
                "stream": false,
                "messages": [{"role": "user", "content": "add 2 and 3"}],
                "tools": [{"type": "function", "function": {"name": "add"}}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "llama3.2:3b",
                "message": {
                    "role": "assistant",
                    "content": "",
                    "tool_calls": [
                        {"function": {"name": "add", "arguments": {"a": 2, "b": "3"}}}
                    ]
                },
                "done": true,
                "done_reason": "stop",
                "prompt_eval_count": 30,
                "eval_count": 12
            })))
            .mount(&server)
            .await;

        let mut registry = ToolRegistry::new();
        registry.register(crate::tools::IntegerOpTool::add());

        let client = OllamaClient::new(&server.uri(), "llama3.2:3b");
        let response = client
            .chat(&[Message::user("add 2 and 3")], registry.descriptors())
            .await
            .unwrap();

        assert!(response.has_tool_calls());
        assert_eq!(response.content, None);
        assert_eq!(response.tool_calls[0].id, "call_0");
        assert_eq!(response.tool_calls[0].name, "add");
        assert_eq!(response.tool_calls[0].arguments, json!({"a": 2, "b": "3"}));
        assert_eq!(response.usage.total_tokens, 42);
    }

    #[tokio::test]
    async fn test_chat_text_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": {"role": "assistant", "content": "Hi there!"},
                "done": true
            })))
            .mount(&server)
            .await;

        let client = OllamaClient::new(&format!("{}/", server.uri()), "m");
        let response = client.chat(&[Message::user("hi")], &[]).await.unwrap();

        assert_eq!(response.content.as_deref(), Some("Hi there!"));
        assert_eq!(response.finish_reason, "stop");
        assert!(!response.has_tool_calls());
        assert_eq!(client.default_model(), "m");
    }

    #[tokio::test]
    async fn test_chat_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
            .mount(&server)
            .await;

        let client = OllamaClient::new(&server.uri(), "missing");
        let err = client.chat(&[Message::user("hi")], &[]).await.unwrap_err();

        assert!(matches!(err, Error::Llm(ref m) if m.contains("model not found")));
    }

    #[test]
    fn test_convert_messages_carries_tool_fields() {
        let client = OllamaClient::new(DEFAULT_OLLAMA_HOST, "m");
        let messages = vec![
            Message::assistant_with_tools(
                "",
                vec![ToolCallRequest::new("call_0", "add", json!({"a": 1, "b": 2}))],
            ),
            Message::tool_result("add", "3"),
        ];

        let wire = serde_json::to_value(client.convert_messages(&messages)).unwrap();
        assert_eq!(
            wire,
            json!([
                {
                    "role": "assistant",
                    "content": "",
                    "tool_calls": [{"function": {"name": "add", "arguments": {"a": 1, "b": 2}}}]
                },
                {"role": "tool", "content": "3", "tool_name": "add"}
            ])
        );
    }
}
