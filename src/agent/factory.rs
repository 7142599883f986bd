//! Agent factory - composes agents from validated configs
//!
//! Two composition relations, kept apart:
//! - `ToolBinding::Agent`: a sub-agent called like a tool (call and return)
//! - `Handoff`: an agent control of the conversation is transferred to
//!
//! All names are resolved here, so a composed agent never holds a dangling
//! reference and unknown names fail at startup.

use super::config::AgentConfig;
use crate::error::{AgentError, Result};
use crate::tool::{Tool, ToolDefinition, ToolRegistry};
use indexmap::IndexMap;
use serde_json::json;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Prefix of the tool names that trigger a handoff
pub const HANDOFF_TOOL_PREFIX: &str = "transfer_to_";

/// A resolved tool on a composed agent
#[derive(Clone)]
pub enum ToolBinding {
    /// A registry tool
    Function(Arc<dyn Tool>),
    /// A sub-agent exposed as a tool
    Agent(AgentTool),
}

/// A sub-agent exposed as a callable tool.
///
/// Calling it runs the sub-agent one-shot on the given input and returns its
/// final text output.
#[derive(Clone)]
pub struct AgentTool {
    pub name: String,
    pub description: String,
    pub agent: Arc<ComposedAgent>,
}

/// A handoff target
#[derive(Clone)]
pub struct Handoff {
    pub tool_name: String,
    pub agent: Arc<ComposedAgent>,
}

impl Handoff {
    pub fn new(agent: Arc<ComposedAgent>) -> Self {
        Self {
            tool_name: handoff_tool_name(&agent.id),
            agent,
        }
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.tool_name.clone(),
            description: format!(
                "Handoff to the {} agent to handle the request.",
                self.agent.name
            ),
            parameters: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        }
    }
}

/// Tool name used to hand off to agent `id`
pub fn handoff_tool_name(id: &str) -> String {
    format!("{}{}", HANDOFF_TOOL_PREFIX, id)
}

impl ToolBinding {
    pub fn name(&self) -> &str {
        match self {
            ToolBinding::Function(tool) => tool.name(),
            ToolBinding::Agent(agent_tool) => &agent_tool.name,
        }
    }

    pub fn definition(&self) -> ToolDefinition {
        match self {
            ToolBinding::Function(tool) => tool.definition(),
            ToolBinding::Agent(agent_tool) => ToolDefinition {
                name: agent_tool.name.clone(),
                description: agent_tool.description.clone(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "input": {
                            "type": "string",
                            "description": "The request to send to the agent"
                        }
                    },
                    "required": ["input"]
                }),
            },
        }
    }
}

/// An agent ready to run. Immutable once built.
pub struct ComposedAgent {
    pub id: String,
    pub name: String,
    pub model: String,
    pub instructions: String,
    pub tools: Vec<ToolBinding>,
    pub handoffs: Vec<Handoff>,
    pub max_turns: usize,
}

impl ComposedAgent {
    pub fn tool(&self, name: &str) -> Option<&ToolBinding> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn handoff(&self, tool_name: &str) -> Option<&Handoff> {
        self.handoffs.iter().find(|h| h.tool_name == tool_name)
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn handoff_ids(&self) -> Vec<&str> {
        self.handoffs.iter().map(|h| h.agent.id.as_str()).collect()
    }

    /// Definitions offered to the model: tools first, then handoffs
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| t.definition())
            .chain(self.handoffs.iter().map(|h| h.definition()))
            .collect()
    }
}

impl fmt::Debug for ComposedAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposedAgent")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("model", &self.model)
            .field("tools", &self.tool_names())
            .field("handoffs", &self.handoff_ids())
            .field("max_turns", &self.max_turns)
            .finish()
    }
}

/// A sub-agent offered to the factory for exposure as a tool
#[derive(Clone)]
pub struct ExposedAgent {
    pub agent: Arc<ComposedAgent>,
    pub description: String,
}

impl ExposedAgent {
    pub fn new(agent: Arc<ComposedAgent>, description: impl Into<String>) -> Self {
        Self {
            agent,
            description: description.into(),
        }
    }
}

/// Sub-agents by the tool name they are exposed under
pub type ExposedAgents = IndexMap<String, ExposedAgent>;

/// Builds composed agents against a fixed tool registry
#[derive(Clone)]
pub struct AgentFactory {
    tools: Arc<ToolRegistry>,
}

impl AgentFactory {
    pub fn new(tools: Arc<ToolRegistry>) -> Self {
        Self { tools }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Compose an agent.
    ///
    /// - each `config.tools` name binds a registry tool, else an exposed
    ///   sub-agent, else fails with `UnresolvedTool`
    /// - each `config.handoffs` id must be one of `handoff_agents`, else
    ///   `UnresolvedHandoff`; supplied agents the config does not name are
    ///   attached after the named ones
    pub fn build(
        &self,
        config: &AgentConfig,
        exposed: &ExposedAgents,
        handoff_agents: &[Arc<ComposedAgent>],
    ) -> Result<ComposedAgent> {
        let mut seen = HashSet::new();

        let mut tools = Vec::with_capacity(config.tools.len());
        for name in &config.tools {
            let binding = if let Some(tool) = self.tools.get(name) {
                ToolBinding::Function(tool)
            } else if let Some(sub) = exposed.get(name) {
                ToolBinding::Agent(AgentTool {
                    name: name.clone(),
                    description: sub.description.clone(),
                    agent: sub.agent.clone(),
                })
            } else {
                return Err(AgentError::UnresolvedTool {
                    agent: config.id.clone(),
                    tool: name.clone(),
                });
            };

            if !seen.insert(binding.name().to_string()) {
                return Err(AgentError::DuplicateTool(binding.name().to_string()));
            }
            tools.push(binding);
        }

        let mut targets: Vec<Arc<ComposedAgent>> = Vec::with_capacity(handoff_agents.len());
        for id in &config.handoffs {
            let agent = handoff_agents
                .iter()
                .find(|a| &a.id == id)
                .ok_or_else(|| AgentError::UnresolvedHandoff {
                    agent: config.id.clone(),
                    handoff: id.clone(),
                })?;
            targets.push(agent.clone());
        }
        for agent in handoff_agents {
            if !config.handoffs.contains(&agent.id) {
                targets.push(agent.clone());
            }
        }

        let mut handoffs = Vec::with_capacity(targets.len());
        for agent in targets {
            let handoff = Handoff::new(agent);
            if !seen.insert(handoff.tool_name.clone()) {
                return Err(AgentError::DuplicateTool(handoff.tool_name));
            }
            handoffs.push(handoff);
        }

        tracing::debug!(
            agent = %config.id,
            tools = ?tools.iter().map(|t| t.name()).collect::<Vec<_>>(),
            handoffs = handoffs.len(),
            "Composed agent"
        );

        Ok(ComposedAgent {
            id: config.id.clone(),
            name: config.name.clone(),
            model: config.model.clone(),
            instructions: config.instructions.clone(),
            tools,
            handoffs,
            max_turns: config.get_max_turns(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolSettings;
    use crate::tool::ToolContext;
    use crate::tools::create_registry;

    fn factory() -> AgentFactory {
        AgentFactory::new(Arc::new(create_registry(&ToolSettings::default()).unwrap()))
    }

    fn weather_config() -> AgentConfig {
        AgentConfig::new("weather", "Weather Agent", "gpt-4o-mini", "Answer weather questions.")
            .with_tool("get_current_weather")
    }

    #[tokio::test]
    async fn test_weather_agent_single_tool() {
        let agent = factory()
            .build(&weather_config(), &ExposedAgents::new(), &[])
            .unwrap();

        assert_eq!(agent.tools.len(), 1);
        let ToolBinding::Function(tool) = agent.tool("get_current_weather").unwrap() else {
            panic!("expected a function tool");
        };
        let result = tool
            .execute(json!({"city": "Paris"}), &ToolContext::new(&agent.name))
            .await;
        assert_eq!(result.output, "The weather in Paris is sunny.");
    }

    #[test]
    fn test_unresolved_tool() {
        let config = weather_config().with_tool("does_not_exist");
        let err = factory()
            .build(&config, &ExposedAgents::new(), &[])
            .unwrap_err();
        assert!(matches!(
            err,
            AgentError::UnresolvedTool { ref tool, .. } if tool == "does_not_exist"
        ));
    }

    #[test]
    fn test_tool_count_matches_config() {
        let config = weather_config()
            .with_tool("get_current_temperature")
            .with_tool("get_seven_day_forecast");
        let agent = factory().build(&config, &ExposedAgents::new(), &[]).unwrap();
        assert_eq!(agent.tools.len(), config.tools.len());
        assert_eq!(
            agent.tool_names(),
            vec!["get_current_weather", "get_current_temperature", "get_seven_day_forecast"]
        );
    }

    #[test]
    fn test_sub_agent_exposed_as_tool() {
        let factory = factory();
        let weather = Arc::new(
            factory
                .build(&weather_config(), &ExposedAgents::new(), &[])
                .unwrap(),
        );

        let mut exposed = ExposedAgents::new();
        exposed.insert(
            "weather".to_string(),
            ExposedAgent::new(weather.clone(), "Get weather information"),
        );

        let config = AgentConfig::new("conversation", "Conversation", "gpt-4o-mini", "Chat.")
            .with_tool("weather")
            .with_tool("get_current_time");
        let agent = factory.build(&config, &exposed, &[]).unwrap();

        let ToolBinding::Agent(agent_tool) = agent.tool("weather").unwrap() else {
            panic!("expected an agent tool");
        };
        assert!(Arc::ptr_eq(&agent_tool.agent, &weather));
        assert_eq!(agent_tool.description, "Get weather information");
        assert_eq!(
            agent.tool_definitions()[0].parameters["required"],
            json!(["input"])
        );
    }

    #[test]
    fn test_registry_tool_takes_precedence_over_sub_agent() {
        let factory = factory();
        let weather = Arc::new(
            factory
                .build(&weather_config(), &ExposedAgents::new(), &[])
                .unwrap(),
        );
        let mut exposed = ExposedAgents::new();
        exposed.insert(
            "get_current_time".to_string(),
            ExposedAgent::new(weather, "shadow"),
        );

        let config = AgentConfig::new("c", "C", "m", "").with_tool("get_current_time");
        let agent = factory.build(&config, &exposed, &[]).unwrap();
        assert!(matches!(agent.tools[0], ToolBinding::Function(_)));
    }

    #[test]
    fn test_handoffs_resolve_in_order() {
        let factory = factory();
        let math = Arc::new(
            factory
                .build(&AgentConfig::new("math", "Math", "m", ""), &ExposedAgents::new(), &[])
                .unwrap(),
        );
        let news = Arc::new(
            factory
                .build(&AgentConfig::new("news", "News", "m", ""), &ExposedAgents::new(), &[])
                .unwrap(),
        );

        let config = AgentConfig::new("triage", "Triage", "m", "").with_handoff("news");
        let agent = factory
            .build(&config, &ExposedAgents::new(), &[math.clone(), news.clone()])
            .unwrap();

        // named first, then the remaining supplied agents
        assert_eq!(agent.handoff_ids(), vec!["news", "math"]);
        assert!(agent.handoff("transfer_to_math").is_some());
        let defs = agent.tool_definitions();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].name, "transfer_to_news");
        assert_eq!(defs[0].description, "Handoff to the News agent to handle the request.");
    }

    #[test]
    fn test_unresolved_handoff() {
        let config = AgentConfig::new("triage", "Triage", "m", "").with_handoff("billing");
        let err = factory()
            .build(&config, &ExposedAgents::new(), &[])
            .unwrap_err();
        assert!(matches!(
            err,
            AgentError::UnresolvedHandoff { ref handoff, .. } if handoff == "billing"
        ));
    }

    #[test]
    fn test_duplicate_tool_name_in_config() {
        let config = weather_config().with_tool("get_current_weather");
        let err = factory()
            .build(&config, &ExposedAgents::new(), &[])
            .unwrap_err();
        assert!(matches!(err, AgentError::DuplicateTool(_)));
    }

    #[test]
    fn test_build_twice_gives_independent_agents() {
        let factory = factory();
        let a = factory.build(&weather_config(), &ExposedAgents::new(), &[]).unwrap();
        let b = factory.build(&weather_config(), &ExposedAgents::new(), &[]).unwrap();
        assert_eq!(a.tool_definitions(), b.tool_definitions());
        assert_eq!(a.instructions, b.instructions);
        assert!(!std::ptr::eq(a.tools.as_ptr(), b.tools.as_ptr()));

        // Function tools are the registry's shared instances
        let registered = factory.registry().get("get_current_weather").unwrap();
        for agent in [&a, &b] {
            match agent.tool("get_current_weather") {
                Some(ToolBinding::Function(tool)) => assert!(Arc::ptr_eq(tool, &registered)),
                _ => panic!("expected a function binding"),
            }
        }
    }
}
