//! OpenAI-compatible provider client
//!
//! Non-streaming chat completions with tool support over async-openai.

use super::ProviderConfig;
use crate::error::{AgentError, Result};
use crate::message::{to_request_messages, ToolCall};
use crate::runner::{ChatModel, ModelRequest, ModelResponse};
use async_openai::{
    config::OpenAIConfig,
    types::{ChatCompletionResponseMessage, CreateChatCompletionRequestArgs},
    Client,
};
use async_trait::async_trait;

/// OpenAI-compatible client wrapper
#[derive(Clone)]
pub struct ProviderClient {
    config: ProviderConfig,
    client: Client<OpenAIConfig>,
}

impl ProviderClient {
    /// Create a new provider client from config
    pub fn new(config: ProviderConfig, api_key: &str) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(&config.base_url);

        Self {
            config,
            client: Client::with_config(openai_config),
        }
    }

    /// Get the provider config
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

/// Text and tool calls out of the first choice
fn parse_message(message: ChatCompletionResponseMessage) -> ModelResponse {
    let tool_calls = message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|tc| ToolCall::new(tc.id, tc.function.name, tc.function.arguments))
        .collect();

    ModelResponse {
        content: message.content.filter(|c| !c.is_empty()),
        tool_calls,
    }
}

#[async_trait]
impl ChatModel for ProviderClient {
    async fn complete(&self, request: ModelRequest) -> Result<ModelResponse> {
        let model = if request.model.is_empty() {
            self.config.default_model.as_str()
        } else {
            request.model.as_str()
        };
        let messages = to_request_messages(&request.system_prompt, &request.transcript)?;

        let mut request_builder = CreateChatCompletionRequestArgs::default();
        request_builder.model(model).messages(messages);

        if !request.tools.is_empty() {
            request_builder.tools(
                request
                    .tools
                    .iter()
                    .map(|t| t.to_openai())
                    .collect::<Vec<_>>(),
            );
        }

        let chat_request = request_builder
            .build()
            .map_err(|e| AgentError::Provider(format!("Failed to build request: {}", e)))?;

        let start = std::time::Instant::now();
        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(|e| {
                tracing::error!(target: "llm", model = model, error = %e, "LLM call failed");
                AgentError::Provider(format!("API call failed: {}", e))
            })?;

        tracing::info!(
            target: "llm",
            provider = %self.config.name,
            model = model,
            elapsed_ms = start.elapsed().as_millis() as u64,
            input_tokens = response.usage.as_ref().map(|u| u.prompt_tokens),
            output_tokens = response.usage.as_ref().map(|u| u.completion_tokens),
            "LLM call completed"
        );

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Provider("No choices in response".to_string()))?;
        Ok(parse_message(choice.message))
    }
}
