//! Calculator agent tool - forwards a query to the remote square-root service
//!
//! Failures are reported back to the model as text, never as run errors.

use crate::error::{AgentError, Result};
use crate::tool::{Tool, ToolContext, ToolDefinition, ToolResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

const ERROR_PREFIX: &str = "Error calling calculator agent:";

#[derive(Debug, Deserialize)]
struct Args {
    query: String,
}

#[derive(Debug, Serialize)]
struct RunRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct RunResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

pub struct CalculatorAgentTool {
    client: Client,
    base_url: String,
}

impl CalculatorAgentTool {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn call(&self, query: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/run", self.base_url))
            .json(&RunRequest { query })
            .send()
            .await
            .map_err(|e| AgentError::RemoteTool(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.detail)
                .unwrap_or(body);
            return Err(AgentError::RemoteTool(format!(
                "HTTP {}: {}",
                status.as_u16(),
                detail
            )));
        }

        let body: RunResponse = response
            .json()
            .await
            .map_err(|e| AgentError::RemoteTool(format!("invalid response body: {}", e)))?;
        Ok(body.result)
    }
}

#[async_trait]
impl Tool for CalculatorAgentTool {
    fn name(&self) -> &str {
        "calculator_agent"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "calculator_agent".to_string(),
            description: "Ask the remote calculator agent a question about square roots. \
                          Pass the user's full question."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The question to send, e.g. 'What is the square root of 25?'"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn execute(&self, args: serde_json::Value, ctx: &ToolContext) -> ToolResult {
        let args: Args = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => return ToolResult::error(format!("{} invalid arguments: {}", ERROR_PREFIX, e)),
        };

        match self.call(&args.query).await {
            Ok(result) => ToolResult::success(result),
            Err(e) => {
                tracing::warn!(agent = %ctx.agent, url = %self.base_url, error = %e, "Calculator call failed");
                ToolResult::error(format!("{} {}", ERROR_PREFIX, e))
            }
        }
    }
}
