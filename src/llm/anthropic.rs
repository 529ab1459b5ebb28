//! Anthropic Messages API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::{ChatMessage, ChatResponse, LlmClient, Role, ToolCall, ToolSchema};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Client for `POST {base_url}/v1/messages`.
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    base_url: String,
    max_tokens: u32,
}

impl AnthropicClient {
    pub fn new(api_key: String, base_url: String, max_tokens: u32) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url,
            max_tokens,
        })
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn chat_completion(
        &self,
        model: &str,
        temperature: f32,
        messages: &[ChatMessage],
        tools: Option<&[ToolSchema]>,
    ) -> anyhow::Result<ChatResponse> {
        let mut payload = json!({
            "model": model,
            "max_tokens": self.max_tokens,
            "temperature": temperature,
            "messages": to_anthropic_messages(messages),
        });
        if let Some(tools) = tools {
            payload["tools"] = serde_json::to_value(tools)?;
        }

        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Anthropic API error {}: {}", status, body);
        }

        let body: Value = response.json().await?;
        parse_response(&body)
    }
}

/// Convert the conversation into Anthropic's content-block format.
///
/// Consecutive tool results are merged into a single `user` message, since
/// the API expects every `tool_result` for one assistant turn together.
fn to_anthropic_messages(messages: &[ChatMessage]) -> Vec<Value> {
    let mut out: Vec<Value> = Vec::with_capacity(messages.len());
    let mut pending_results: Vec<Value> = Vec::new();

    for message in messages {
        if message.role != Role::Tool && !pending_results.is_empty() {
            out.push(json!({ "role": "user", "content": std::mem::take(&mut pending_results) }));
        }

        match message.role {
            Role::User => out.push(json!({ "role": "user", "content": message.text() })),
            Role::Assistant => {
                let mut blocks = Vec::new();
                if !message.text().is_empty() {
                    blocks.push(json!({ "type": "text", "text": message.text() }));
                }
                for call in &message.tool_calls {
                    blocks.push(json!({
                        "type": "tool_use",
                        "id": call.id,
                        "name": call.name,
                        "input": call.arguments,
                    }));
                }
                out.push(json!({ "role": "assistant", "content": blocks }));
            }
            Role::Tool => pending_results.push(json!({
                "type": "tool_result",
                "tool_use_id": message.tool_call_id.as_deref().unwrap_or_default(),
                "content": message.text(),
            })),
        }
    }

    if !pending_results.is_empty() {
        out.push(json!({ "role": "user", "content": pending_results }));
    }
    out
}

fn parse_response(body: &Value) -> anyhow::Result<ChatResponse> {
    let blocks = body
        .get("content")
        .and_then(|c| c.as_array())
        .ok_or_else(|| anyhow::anyhow!("Invalid response format from Anthropic API: {}", body))?;

    let mut text = String::new();
    let mut tool_calls = Vec::new();

    for block in blocks {
        match block.get("type").and_then(|t| t.as_str()) {
            Some("text") => {
                if let Some(t) = block.get("text").and_then(|t| t.as_str()) {
                    text.push_str(t);
                }
            }
            Some("tool_use") => {
                let id = block.get("id").and_then(|v| v.as_str());
                let name = block.get("name").and_then(|v| v.as_str());
                let (Some(id), Some(name)) = (id, name) else {
                    anyhow::bail!("Malformed tool_use block: {}", block);
                };
                tool_calls.push(ToolCall {
                    id: id.to_string(),
                    name: name.to_string(),
                    arguments: block.get("input").cloned().unwrap_or_else(|| json!({})),
                });
            }
            _ => {}
        }
    }

    Ok(ChatResponse {
        content: (!text.is_empty()).then_some(text),
        tool_calls,
    })
}
