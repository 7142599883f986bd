//! Web search tool using SearXNG

use crate::tool::{Tool, ToolContext, ToolDefinition, ToolResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct Args {
    query: String,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    5
}

pub struct WebSearchTool {
    client: Client,
    searxng_url: String,
}

impl WebSearchTool {
    pub fn with_url(url: &str) -> Self {
        Self {
            client: Client::new(),
            searxng_url: url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearxResponse {
    results: Vec<SearchResult>,
    #[serde(default)]
    infoboxes: Vec<Infobox>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    url: String,
    title: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct Infobox {
    infobox: String,
    #[serde(default)]
    content: String,
}

/// Render a SearXNG response as markdown, infoboxes first
fn format_results(data: &SearxResponse, limit: usize) -> String {
    let mut text = String::new();

    for infobox in &data.infoboxes {
        text.push_str(&format!("## Infobox: {}\n", infobox.infobox));
        text.push_str(&format!("{}\n\n", infobox.content));
    }

    if data.results.is_empty() {
        text.push_str("No results found.\n");
    } else {
        for result in data.results.iter().take(limit) {
            text.push_str(&format!("### {}\n", result.title));
            text.push_str(&format!("URL: {}\n", result.url));
            text.push_str(&format!("{}\n\n", result.content));
        }
    }

    text
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "web_search".to_string(),
            description: "Search the web for real-time information, news, facts, or current data."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum results (default: 5)"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn execute(&self, args_value: serde_json::Value, _ctx: &ToolContext) -> ToolResult {
        let args: Args = match serde_json::from_value(args_value) {
            Ok(a) => a,
            Err(e) => return ToolResult::error(format!("Invalid arguments: {}", e)),
        };

        let response = match self
            .client
            .get(format!("{}/search", self.searxng_url))
            .query(&[("q", args.query.as_str()), ("format", "json")])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return ToolResult::error(format!("Search request failed: {}", e)),
        };

        if !response.status().is_success() {
            return ToolResult::error(format!("Search failed: {}", response.status()));
        }

        match response.json::<SearxResponse>().await {
            Ok(data) => ToolResult::success(format_results(&data, args.limit)),
            Err(e) => ToolResult::error(format!("Failed to parse response: {}", e)),
        }
    }
}
