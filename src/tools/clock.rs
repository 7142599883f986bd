//! Clock tools - current local time and date

use crate::tool::{Tool, ToolContext, ToolDefinition, ToolResult};
use async_trait::async_trait;
use serde_json::json;

fn no_parameters() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {},
        "required": []
    })
}

pub struct CurrentTimeTool;

#[async_trait]
impl Tool for CurrentTimeTool {
    fn name(&self) -> &str {
        "get_current_time"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_current_time".to_string(),
            description: "Get the current time.".to_string(),
            parameters: no_parameters(),
        }
    }

    async fn execute(&self, _args: serde_json::Value, _ctx: &ToolContext) -> ToolResult {
        let now = chrono::Local::now();
        ToolResult::success(format!("The current time is {}", now.format("%H:%M:%S")))
    }
}

pub struct CurrentDateTool;

#[async_trait]
impl Tool for CurrentDateTool {
    fn name(&self) -> &str {
        "get_current_date"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_current_date".to_string(),
            description: "Get the current date.".to_string(),
            parameters: no_parameters(),
        }
    }

    async fn execute(&self, _args: serde_json::Value, _ctx: &ToolContext) -> ToolResult {
        let today = chrono::Local::now();
        ToolResult::success(format!("The current date is {}", today.format("%Y-%m-%d")))
    }
}
