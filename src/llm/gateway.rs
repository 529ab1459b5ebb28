//! Model gateway: one place where the agent talks to the LLM.

use std::sync::Arc;

use crate::error::AgentError;

use super::{ChatMessage, ChatResponse, LlmClient, RetryPolicy, ToolSchema};

/// Sampling temperature used for every request.
pub const TEMPERATURE: f32 = 0.0;

/// Sends the accumulated conversation to the model.
///
/// Model id, temperature and the advertised tool set are fixed at
/// construction. Each [`infer`](Self::infer) call is wrapped in the
/// gateway's [`RetryPolicy`].
pub struct ModelGateway {
    client: Arc<dyn LlmClient>,
    model: String,
    temperature: f32,
    tools: Vec<ToolSchema>,
    retry: RetryPolicy,
}

impl ModelGateway {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>, tools: Vec<ToolSchema>) -> Self {
        Self {
            client,
            model: model.into(),
            temperature: TEMPERATURE,
            tools,
            retry: RetryPolicy::default(),
        }
    }

    /// Replace the default retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run one inference over the full message sequence.
    pub async fn infer(&self, messages: &[ChatMessage]) -> Result<ChatResponse, AgentError> {
        let tools = (!self.tools.is_empty()).then_some(self.tools.as_slice());

        self.retry
            .run(|attempt| async move {
                tracing::debug!(
                    model = %self.model,
                    attempt,
                    messages = messages.len(),
                    "Calling model"
                );
                self.client
                    .chat_completion(&self.model, self.temperature, messages, tools)
                    .await
            })
            .await
            .map_err(|last_error| AgentError::Model {
                attempts: self.retry.attempts(),
                last_error,
            })
    }
}
