//! Agent configuration document
//!
//! One JSON document per agent. The `id` may be left out of the document;
//! the loader fills it in from the file stem or store key suffix.

use serde::{Deserialize, Serialize};

/// Model calls allowed per run when a config does not set `max_turns`
pub const DEFAULT_MAX_TURNS: usize = 10;

/// Configuration for an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Agent identifier (unique). Set from the source when loading.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Human-readable display name
    pub name: String,

    /// Model identifier
    pub model: String,

    /// System instructions (free text, may contain `{{placeholders}}`)
    pub instructions: String,

    /// Tool names: registry tools or exposed sub-agent names, in order
    #[serde(default)]
    pub tools: Vec<String>,

    /// Ids of agents the conversation may be handed off to, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub handoffs: Vec<String>,

    /// Max model calls per run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_turns: Option<usize>,
}

impl AgentConfig {
    /// Create a new agent config with no tools
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        model: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            model: model.into(),
            instructions: instructions.into(),
            tools: Vec::new(),
            handoffs: Vec::new(),
            max_turns: None,
        }
    }

    /// Builder: add a tool name
    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tools.push(tool.into());
        self
    }

    /// Builder: add a handoff target id
    pub fn with_handoff(mut self, agent_id: impl Into<String>) -> Self {
        self.handoffs.push(agent_id.into());
        self
    }

    /// Builder: set max turns
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = Some(max_turns);
        self
    }

    /// Get effective max turns (with default fallback)
    pub fn get_max_turns(&self) -> usize {
        self.max_turns.unwrap_or(DEFAULT_MAX_TURNS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_config_builder() {
        let config = AgentConfig::new("conversation", "Conversation", "gpt-4o-mini", "Be nice.")
            .with_tool("weather")
            .with_tool("get_current_time")
            .with_handoff("math");

        assert_eq!(config.tools, vec!["weather", "get_current_time"]);
        assert_eq!(config.handoffs, vec!["math"]);
        assert_eq!(config.get_max_turns(), DEFAULT_MAX_TURNS);
    }

    #[test]
    fn test_optional_fields_default() {
        let config: AgentConfig = serde_json::from_str(
            r#"{"name": "Weather", "model": "gpt-4o-mini", "instructions": "hi", "tools": []}"#,
        )
        .unwrap();
        assert!(config.id.is_empty());
        assert!(config.handoffs.is_empty());
        assert_eq!(config.max_turns, None);
    }

    #[test]
    fn test_empty_optionals_are_not_serialized() {
        let config = AgentConfig::new("", "Weather", "gpt-4o-mini", "hi");
        let value = serde_json::to_value(&config).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("id"));
        assert!(!object.contains_key("handoffs"));
        assert!(!object.contains_key("max_turns"));
        assert!(object.contains_key("tools"));
    }
}
