//! Run engine - executes one request against a composed agent
//!
//! The loop, per model turn:
//! 1. Call the model with the active agent's instructions, the transcript
//!    and the agent's tools (function tools, agent tools, handoffs)
//! 2. Text only: that is the final output
//! 3. Otherwise answer every tool call and go again
//!
//! A handoff switches the active agent for the following turns. The agent
//! that produced the final output is reported back as `last_agent`.

use crate::agent::{ComposedAgent, ToolBinding};
use crate::error::{AgentError, Result};
use crate::hooks::{NoopHooks, RunHooks};
use crate::message::{Message, ToolCall};
use crate::templates::{render_instructions, InstructionContext};
use crate::tool::{ToolContext, ToolDefinition};
use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::json;
use std::sync::Arc;

/// One model call
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub model: String,
    pub system_prompt: String,
    pub transcript: Vec<Message>,
    pub tools: Vec<ToolDefinition>,
}

/// What the model answered
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelResponse {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

impl ModelResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }

    pub fn calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: None,
            tool_calls,
        }
    }
}

/// A chat-completions model
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, request: ModelRequest) -> Result<ModelResponse>;
}

/// Outcome of a run
#[derive(Debug, Clone)]
pub struct RunResult {
    pub final_output: String,
    /// The agent that produced `final_output`
    pub last_agent: Arc<ComposedAgent>,
    /// The input transcript plus everything added during the run
    pub transcript: Vec<Message>,
}

#[derive(Clone)]
pub struct Runner {
    model: Arc<dyn ChatModel>,
    hooks: Arc<dyn RunHooks>,
}

impl Runner {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            hooks: Arc::new(NoopHooks),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn RunHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Run a single user input against `agent` with an empty history
    pub async fn run_once(&self, agent: Arc<ComposedAgent>, input: &str) -> Result<String> {
        let result = self.run(agent, vec![Message::user(input)]).await?;
        Ok(result.final_output)
    }

    /// Run until the active agent answers with text.
    ///
    /// More than the starting agent's `max_turns` model calls fails with
    /// `MaxTurnsExceeded`. Handoffs do not reset the count.
    pub fn run(
        &self,
        agent: Arc<ComposedAgent>,
        mut transcript: Vec<Message>,
    ) -> BoxFuture<'_, Result<RunResult>> {
        Box::pin(async move {
            let max_turns = agent.max_turns;
            let started = agent.id.clone();
            let mut active = agent;

            for turn in 0..max_turns {
                let context = InstructionContext::new(&active.id, &active.name);
                let request = ModelRequest {
                    model: active.model.clone(),
                    system_prompt: render_instructions(&active.instructions, &context),
                    transcript: transcript.clone(),
                    tools: active.tool_definitions(),
                };

                tracing::debug!(
                    agent = %active.id,
                    turn,
                    messages = request.transcript.len(),
                    tools = request.tools.len(),
                    "Calling model"
                );
                let response = self.model.complete(request).await?;

                if response.tool_calls.is_empty() {
                    let output = response.content.unwrap_or_default();
                    transcript.push(Message::assistant(output.clone()));
                    tracing::debug!(agent = %active.id, turns = turn + 1, "Run finished");
                    return Ok(RunResult {
                        final_output: output,
                        last_agent: active,
                        transcript,
                    });
                }

                transcript.push(Message::Assistant {
                    content: response.content,
                    tool_calls: response.tool_calls.clone(),
                });

                let mut handed_off: Option<Arc<ComposedAgent>> = None;
                for call in &response.tool_calls {
                    if let Some(target) = &handed_off {
                        transcript.push(Message::tool(
                            &call.id,
                            format!("Skipped: the conversation was handed off to {}.", target.name),
                        ));
                        continue;
                    }

                    if let Some(handoff) = active.handoff(&call.name) {
                        let target = handoff.agent.clone();
                        self.hooks.on_handoff(&active.name, &target.name);
                        transcript.push(Message::tool(
                            &call.id,
                            json!({ "assistant": target.name }).to_string(),
                        ));
                        handed_off = Some(target);
                        continue;
                    }

                    let output = self.call_tool(&active, call).await;
                    transcript.push(Message::tool(&call.id, output));
                }

                if let Some(target) = handed_off {
                    tracing::info!(from = %active.id, to = %target.id, "Handing off conversation");
                    active = target;
                }
            }

            Err(AgentError::MaxTurnsExceeded {
                agent: started,
                max_turns,
            })
        })
    }

    /// Answer one non-handoff tool call. Failures become the output text.
    async fn call_tool(&self, agent: &ComposedAgent, call: &ToolCall) -> String {
        let Some(binding) = agent.tool(&call.name) else {
            tracing::warn!(agent = %agent.id, tool = %call.name, "Model called an unknown tool");
            return format!("Unknown tool: {}", call.name);
        };

        self.hooks.on_tool_start(&agent.name, &call.name);
        let output = match binding {
            ToolBinding::Function(tool) => {
                let result = tool
                    .execute(call.parsed_arguments(), &ToolContext::new(&agent.name))
                    .await;
                if result.is_error {
                    tracing::debug!(agent = %agent.id, tool = %call.name, error = %result.output, "Tool returned an error");
                }
                result.output
            }
            ToolBinding::Agent(agent_tool) => {
                let args = call.parsed_arguments();
                let input = args
                    .get("input")
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| call.arguments.clone());
                match self.run_once(agent_tool.agent.clone(), &input).await {
                    Ok(output) => output,
                    Err(e) => {
                        tracing::warn!(agent = %agent.id, sub_agent = %agent_tool.agent.id, error = %e, "Sub-agent run failed");
                        format!("Error running agent {}: {}", agent_tool.name, e)
                    }
                }
            }
        };
        self.hooks.on_tool_end(&agent.name, &call.name, &output);
        output
    }
}
