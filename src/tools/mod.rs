//! Tool system for the agent.
//!
//! Each tool declares a name, a description shown to the model, a JSON
//! Schema for its arguments, and an async implementation. Tools that
//! persist data receive a [`Store`] handle at construction; no other state
//! is shared between them.

mod catalog;
mod email;
mod list;
mod weather;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::llm::ToolSchema;
use crate::store::Store;

pub use catalog::AllTools;
pub use email::SendEmail;
pub use list::{AddListItem, GetListItems};
pub use weather::{GetCoolestCities, GetWeather};

/// A callable tool.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name the model uses to call the tool.
    fn name(&self) -> &str;

    /// Description surfaced to the model for tool selection.
    fn description(&self) -> &str;

    /// JSON Schema object for the arguments.
    fn parameters_schema(&self) -> Value;

    /// Run the tool. Missing or invalid arguments are reported as errors.
    async fn execute(&self, args: Value) -> anyhow::Result<String>;
}

/// Name and description of a registered tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
}

/// The fixed catalog of tools. Immutable once built.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    /// Build the registry with every built-in tool.
    pub fn new(store: Arc<Store>) -> Self {
        let mut tools: Vec<Arc<dyn Tool>> = vec![
            Arc::new(GetWeather),
            Arc::new(GetCoolestCities),
            Arc::new(AddListItem::new(store.clone())),
            Arc::new(GetListItems::new(store.clone())),
            Arc::new(SendEmail::new(store)),
        ];

        let mut catalog: Vec<ToolInfo> = tools.iter().map(|t| ToolInfo::of(t.as_ref())).collect();
        catalog.push(AllTools::info());
        tools.push(Arc::new(AllTools::new(catalog)));

        Self::from_tools(tools)
    }

    /// Build a registry from an explicit tool set, keeping the given order.
    pub fn from_tools(tools: Vec<Arc<dyn Tool>>) -> Self {
        let mut map = HashMap::new();
        let mut order = Vec::new();
        for tool in tools {
            let name = tool.name().to_string();
            if map.insert(name.clone(), tool).is_none() {
                order.push(name);
            } else {
                tracing::warn!("Duplicate tool '{}' replaced an earlier registration", name);
            }
        }
        Self { tools: map, order }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Tool names and descriptions in registration order.
    pub fn list_tools(&self) -> Vec<ToolInfo> {
        self.iter().map(ToolInfo::of).collect()
    }

    /// Definitions advertised to the model.
    pub fn get_tool_schemas(&self) -> Vec<ToolSchema> {
        self.iter()
            .map(|t| ToolSchema {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.parameters_schema(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn iter(&self) -> impl Iterator<Item = &dyn Tool> + '_ {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| t.as_ref())
    }
}

impl ToolInfo {
    fn of(tool: &dyn Tool) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
        }
    }
}

/// Read a required string argument.
pub(crate) fn required_str<'a>(args: &'a Value, key: &str) -> anyhow::Result<&'a str> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("Missing '{}' argument", key))
}
