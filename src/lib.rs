//! # Tool Agent
//!
//! A minimal tool-augmented conversational agent.
//!
//! This library provides:
//! - A tool-based agent loop that alternates model calls and tool calls
//! - A tool executor that records every invocation in an audit log
//! - A model gateway with a bounded exponential retry policy
//! - SQLite persistence for the list, email queue and invocation log
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern:
//! 1. Receive a user message together with the prior conversation
//! 2. Call the LLM with the message sequence and the tool definitions
//! 3. Execute any requested tool calls, in order, and append their results
//! 4. Repeat until the LLM answers without requesting tools
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tool_agent::{Agent, Config, ConversationSession, Store};
//!
//! let config = Config::from_env()?;
//! let store = Arc::new(Store::open(&config.database_path)?);
//! let agent = Agent::from_config(&config, store)?;
//! let mut session = ConversationSession::new();
//! let reply = session.submit(&agent, "Add milk to my list").await?;
//! ```

pub mod agent;
pub mod config;
pub mod console;
pub mod error;
pub mod llm;
pub mod session;
pub mod store;
pub mod tools;

pub use agent::Agent;
pub use config::Config;
pub use error::AgentError;
pub use session::ConversationSession;
pub use store::Store;
