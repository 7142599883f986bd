//! The square-root calculator agent served by the calculator service

use crate::agent::{AgentConfig, AgentFactory, ComposedAgent, ExposedAgents};
use crate::error::Result;
use crate::tool::{Tool, ToolContext, ToolDefinition, ToolRegistry, ToolResult};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

pub const AGENT_ID: &str = "square_root_calculator";
pub const AGENT_NAME: &str = "Square Root Calculator Agent";
pub const AGENT_MODEL: &str = "gpt-4o-mini";
pub const TOOL_NAME: &str = "calculate_square_root";

const INSTRUCTIONS: &str = "You are a helpful assistant that specializes in calculating square roots. \
You have access to a calculate_square_root tool that can compute the square root of any non-negative number. \
When a user asks for a square root calculation, use the tool to provide the answer. \
If they ask about something else, politely explain that you specialize in square root calculations.";

#[derive(Debug, Deserialize)]
struct Args {
    number: f64,
}

/// Integral values keep one decimal place (`16.0`)
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 {
        format!("{:.1}", n)
    } else {
        n.to_string()
    }
}

pub fn square_root(number: f64) -> String {
    if number < 0.0 {
        return format!(
            "Error: Cannot calculate square root of negative number {}",
            format_number(number)
        );
    }
    format!(
        "The square root of {} is {}",
        format_number(number),
        format_number(number.sqrt())
    )
}

pub struct SquareRootTool;

#[async_trait]
impl Tool for SquareRootTool {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: TOOL_NAME.to_string(),
            description: "Calculate the square root of a positive number.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "number": {
                        "type": "number",
                        "description": "The number to calculate the square root of (must be non-negative)"
                    }
                },
                "required": ["number"]
            }),
        }
    }

    async fn execute(&self, args: serde_json::Value, _ctx: &ToolContext) -> ToolResult {
        match serde_json::from_value::<Args>(args) {
            Ok(args) => ToolResult::success(square_root(args.number)),
            Err(e) => ToolResult::error(format!("Error calculating square root: {}", e)),
        }
    }
}

/// Compose the calculator agent
pub fn square_root_agent() -> Result<ComposedAgent> {
    let mut registry = ToolRegistry::new();
    registry.register(SquareRootTool)?;

    let config =
        AgentConfig::new(AGENT_ID, AGENT_NAME, AGENT_MODEL, INSTRUCTIONS).with_tool(TOOL_NAME);
    AgentFactory::new(Arc::new(registry)).build(&config, &ExposedAgents::new(), &[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_root_output() {
        assert_eq!(square_root(16.0), "The square root of 16.0 is 4.0");
        assert_eq!(square_root(2.25), "The square root of 2.25 is 1.5");
        assert_eq!(square_root(0.0), "The square root of 0.0 is 0.0");
    }

    #[test]
    fn test_negative_number_is_error_text() {
        assert_eq!(
            square_root(-4.0),
            "Error: Cannot calculate square root of negative number -4.0"
        );
    }

    #[tokio::test]
    async fn test_tool_execute() {
        let result = SquareRootTool
            .execute(json!({"number": 25}), &ToolContext::new(AGENT_NAME))
            .await;
        assert_eq!(result, ToolResult::success("The square root of 25.0 is 5.0"));

        let result = SquareRootTool
            .execute(json!({"number": "abc"}), &ToolContext::new(AGENT_NAME))
            .await;
        assert!(result.is_error);
    }

    #[test]
    fn test_agent_composition() {
        let agent = square_root_agent().unwrap();
        assert_eq!(agent.name, AGENT_NAME);
        assert_eq!(agent.model, AGENT_MODEL);
        assert_eq!(agent.tool_names(), vec![TOOL_NAME]);
    }
}
