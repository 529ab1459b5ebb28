//! Agent module - the core control loop and tool dispatch.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Send the conversation (history plus the new user message) to the model
//! 2. If the model requests tool calls, execute them in order through the
//!    [`ToolExecutor`] and append one result message per call
//! 3. Repeat until the model answers without requesting tools

mod agent_loop;
mod executor;

pub use agent_loop::Agent;
pub use executor::{ToolExecutor, ToolOutcome, ERROR_PREFIX};
