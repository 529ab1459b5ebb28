//! Scripted LLM client for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{ChatMessage, ChatResponse, LlmClient, ToolCall, ToolSchema};

/// Returns pre-configured replies in order and records every request.
pub struct ScriptedClient {
    replies: Mutex<VecDeque<anyhow::Result<ChatResponse>>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<anyhow::Result<ChatResponse>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Messages sent on each call, in call order.
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn chat_completion(
        &self,
        _model: &str,
        _temperature: f32,
        messages: &[ChatMessage],
        _tools: Option<&[ToolSchema]>,
    ) -> anyhow::Result<ChatResponse> {
        self.requests.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow::anyhow!("no scripted reply left")))
    }
}

/// Final answer with no tool calls.
pub fn text_reply(text: &str) -> anyhow::Result<ChatResponse> {
    Ok(ChatResponse {
        content: Some(text.to_string()),
        tool_calls: Vec::new(),
    })
}

/// Reply requesting the given `(id, tool, arguments)` calls.
pub fn tool_reply(calls: &[(&str, &str, Value)]) -> anyhow::Result<ChatResponse> {
    Ok(ChatResponse {
        content: None,
        tool_calls: calls
            .iter()
            .map(|(id, name, args)| ToolCall {
                id: id.to_string(),
                name: name.to_string(),
                arguments: args.clone(),
            })
            .collect(),
    })
}
