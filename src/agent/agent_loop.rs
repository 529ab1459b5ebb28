//! Core agent loop implementation.

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::AgentError;
use crate::llm::{AnthropicClient, ChatMessage, LlmClient, ModelGateway, ToolCall};
use crate::store::Store;
use crate::tools::ToolRegistry;

use super::executor::ToolExecutor;

/// Loop state for one turn.
#[derive(Debug)]
enum LoopState {
    /// Waiting for the model's next response.
    AwaitingModel,
    /// Dispatching the tool calls of the last response, in request order.
    ExecutingTools(Vec<ToolCall>),
    /// The model answered without requesting tools.
    Done(ChatMessage),
}

/// The conversational agent.
pub struct Agent {
    gateway: ModelGateway,
    executor: ToolExecutor,
    max_iterations: Option<usize>,
}

impl Agent {
    pub fn new(gateway: ModelGateway, executor: ToolExecutor) -> Self {
        Self {
            gateway,
            executor,
            max_iterations: None,
        }
    }

    /// Build the production agent: Anthropic client, built-in tools, and
    /// limits from `config`.
    pub fn from_config(config: &Config, store: Arc<Store>) -> anyhow::Result<Self> {
        let client: Arc<dyn LlmClient> = Arc::new(AnthropicClient::new(
            config.api_key.clone(),
            config.base_url.clone(),
            config.max_tokens,
        )?);
        Ok(Self::with_client(client, config, store))
    }

    /// Same as [`from_config`](Self::from_config) with a caller-supplied LLM client.
    pub fn with_client(client: Arc<dyn LlmClient>, config: &Config, store: Arc<Store>) -> Self {
        let registry = Arc::new(ToolRegistry::new(store.clone()));
        let gateway = ModelGateway::new(client, config.model.clone(), registry.get_tool_schemas());
        let executor = ToolExecutor::new(registry, store)
            .with_timeout(config.tool_timeout_secs.map(Duration::from_secs));

        Self::new(gateway, executor).with_max_iterations(config.max_iterations)
    }

    /// Cap model round trips per turn. `None` means unbounded.
    pub fn with_max_iterations(mut self, max_iterations: Option<usize>) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        self.executor.registry()
    }

    /// Run one turn and return the final assistant message.
    ///
    /// `history` is not modified; appending the user message and the reply
    /// is the caller's job.
    pub async fn process_turn(
        &self,
        history: &[ChatMessage],
        user_text: &str,
    ) -> Result<ChatMessage, AgentError> {
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(user_text));

        tracing::info!(
            model = self.gateway.model(),
            history = history.len(),
            "Processing turn"
        );
        self.run_loop(&mut messages).await
    }

    /// Drive the state machine until the model stops requesting tools.
    ///
    /// `messages` grows by one assistant message plus one tool message per
    /// requested call on every round trip.
    async fn run_loop(&self, messages: &mut Vec<ChatMessage>) -> Result<ChatMessage, AgentError> {
        let mut state = LoopState::AwaitingModel;
        let mut iteration = 0usize;

        loop {
            state = match state {
                LoopState::AwaitingModel => {
                    if let Some(max) = self.max_iterations {
                        if iteration >= max {
                            return Err(AgentError::MaxIterations(max));
                        }
                    }
                    iteration += 1;
                    tracing::debug!("Agent iteration {}", iteration);

                    let message = self.gateway.infer(messages.as_slice()).await?.into_message();
                    if message.has_tool_calls() {
                        let calls = message.tool_calls.clone();
                        messages.push(message);
                        LoopState::ExecutingTools(calls)
                    } else {
                        LoopState::Done(message)
                    }
                }
                LoopState::ExecutingTools(calls) => {
                    for call in &calls {
                        let outcome = self.executor.execute(&call.name, &call.arguments).await?;
                        messages.push(ChatMessage::tool_result(&call.id, outcome.output));
                    }
                    LoopState::AwaitingModel
                }
                LoopState::Done(message) => {
                    tracing::info!(iterations = iteration, "Turn complete");
                    return Ok(message);
                }
            };
        }
    }
}
