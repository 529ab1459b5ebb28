//! Tool executor: the single chokepoint every tool call passes through.
//!
//! Each call is timed and produces exactly one invocation record, whether
//! the tool succeeds, returns an error, times out, panics, or does not
//! exist. The record is written before control returns to the caller; if
//! that write fails, the store error is returned instead of the outcome.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::error::AgentError;
use crate::store::{now_string, NewInvocation, Store};
use crate::tools::ToolRegistry;

/// Prefix of the output field for failed invocations.
pub const ERROR_PREFIX: &str = "ERROR: ";

/// Result of a successful tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome {
    pub output: String,
    pub duration_secs: f64,
}

pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
    store: Arc<Store>,
    timeout: Option<Duration>,
}

impl ToolExecutor {
    pub fn new(registry: Arc<ToolRegistry>, store: Arc<Store>) -> Self {
        Self {
            registry,
            store,
            timeout: None,
        }
    }

    /// Fail tool calls that run longer than `timeout`. `None` waits forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Invoke `tool_name` with `args`.
    pub async fn execute(&self, tool_name: &str, args: &Value) -> Result<ToolOutcome, AgentError> {
        let input_params = args.to_string();
        let timestamp = now_string();

        let Some(tool) = self.registry.get(tool_name) else {
            tracing::error!("Model requested unknown tool: {}", tool_name);
            self.record(
                tool_name,
                input_params,
                format!("{}tool not found", ERROR_PREFIX),
                0.0,
                timestamp,
            )?;
            return Err(AgentError::ToolNotFound(tool_name.to_string()));
        };

        tracing::info!("Calling tool: {} with args: {}", tool_name, input_params);

        let started = Instant::now();
        let owned_args = args.clone();
        let mut handle = tokio::spawn(async move { tool.execute(owned_args).await });

        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, &mut handle).await {
                Ok(joined) => flatten(joined),
                Err(_) => {
                    handle.abort();
                    Err(format!("tool timed out after {}s", limit.as_secs_f64()))
                }
            },
            None => flatten(handle.await),
        };
        let duration_secs = started.elapsed().as_secs_f64();

        match result {
            Ok(output) => {
                self.record(tool_name, input_params, output.clone(), duration_secs, timestamp)?;
                tracing::info!(
                    tool = tool_name,
                    duration_secs,
                    "Tool call succeeded"
                );
                Ok(ToolOutcome {
                    output,
                    duration_secs,
                })
            }
            Err(message) => {
                self.record(
                    tool_name,
                    input_params,
                    format!("{}{}", ERROR_PREFIX, message),
                    duration_secs,
                    timestamp,
                )?;
                tracing::error!(
                    tool = tool_name,
                    duration_secs,
                    "Tool call failed: {}",
                    message
                );
                Err(AgentError::ToolFailed {
                    tool: tool_name.to_string(),
                    message,
                })
            }
        }
    }

    fn record(
        &self,
        tool_name: &str,
        input_params: String,
        output_result: String,
        execution_time: f64,
        timestamp: String,
    ) -> Result<(), AgentError> {
        self.store.record_invocation(&NewInvocation {
            tool_name: tool_name.to_string(),
            input_params,
            output_result,
            execution_time,
            timestamp,
        })?;
        Ok(())
    }
}

fn flatten(
    joined: Result<anyhow::Result<String>, tokio::task::JoinError>,
) -> Result<String, String> {
    match joined {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(format!("{:#}", e)),
        Err(e) if e.is_panic() => Err(format!("tool panicked: {}", panic_message(e))),
        Err(e) => Err(format!("tool task aborted: {}", e)),
    }
}

fn panic_message(err: tokio::task::JoinError) -> String {
    let payload = err.into_panic();
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
