//! Self-describing tool: lists everything the registry offers.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Tool, ToolInfo};

const NAME: &str = "all_tools";
const DESCRIPTION: &str = "Lists all available tools and their descriptions";

/// Enumerates the registered tools, itself included.
pub struct AllTools {
    catalog: Vec<ToolInfo>,
}

impl AllTools {
    pub fn new(catalog: Vec<ToolInfo>) -> Self {
        Self { catalog }
    }

    /// This tool's own catalog entry.
    pub fn info() -> ToolInfo {
        ToolInfo {
            name: NAME.to_string(),
            description: DESCRIPTION.to_string(),
        }
    }
}

#[async_trait]
impl Tool for AllTools {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn parameters_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _args: Value) -> anyhow::Result<String> {
        Ok(self
            .catalog
            .iter()
            .map(|t| format!("- {}: {}", t.name, t.description))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
