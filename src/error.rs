//! Errors that end a conversation turn.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AgentError {
    /// The model asked for a tool that is not registered.
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// The tool body returned an error (or timed out). Already logged.
    #[error("Tool '{tool}' failed: {message}")]
    ToolFailed { tool: String, message: String },

    /// Every model attempt failed; `last_error` is the final failure.
    #[error("Model request failed after {attempts} attempt(s): {last_error:#}")]
    Model {
        attempts: u32,
        last_error: anyhow::Error,
    },

    #[error("Max iterations ({0}) reached without a final answer")]
    MaxIterations(usize),

    #[error(transparent)]
    Store(#[from] StoreError),
}
