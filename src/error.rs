//! Error taxonomy for loading, composing and running agents
//!
//! Tool failures inside a run are not errors here: they are turned into
//! `ToolResult::error` text so the model can react to them.

use std::path::PathBuf;

/// Errors raised while loading, composing or running agents
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("no config document for agent '{id}' at {location}")]
    ConfigNotFound { id: String, location: String },

    #[error("config for agent '{id}' is not valid JSON: {message}")]
    ConfigParse { id: String, message: String },

    #[error("config for agent '{id}' violates the schema: {}", violations.join("; "))]
    SchemaViolation { id: String, violations: Vec<String> },

    #[error("agent '{agent}' references unknown tool '{tool}'")]
    UnresolvedTool { agent: String, tool: String },

    #[error("agent '{agent}' references unknown handoff target '{handoff}'")]
    UnresolvedHandoff { agent: String, handoff: String },

    #[error("agents reference each other in a cycle: {}", path.join(" -> "))]
    CompositionCycle { path: Vec<String> },

    #[error("tool '{0}' is registered more than once")]
    DuplicateTool(String),

    #[error("remote tool call failed: {0}")]
    RemoteTool(String),

    #[error("could not connect to config store at {url}: {message}")]
    StoreConnection { url: String, message: String },

    #[error("config store error: {0}")]
    Store(String),

    #[error("{0} is not set in the environment")]
    MissingApiKey(String),

    #[error("model provider error: {0}")]
    Provider(String),

    #[error("agent '{agent}' exceeded {max_turns} model turns without a final answer")]
    MaxTurnsExceeded { agent: String, max_turns: usize },

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AgentError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<redis::RedisError> for AgentError {
    fn from(err: redis::RedisError) -> Self {
        AgentError::Store(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_violation_lists_every_constraint() {
        let err = AgentError::SchemaViolation {
            id: "weather".into(),
            violations: vec![
                "/: \"model\" is a required property".into(),
                "/tools: 3 is not of type \"array\"".into(),
            ],
        };
        let text = err.to_string();
        assert!(text.contains("weather"));
        assert!(text.contains("\"model\" is a required property; /tools"));
    }

    #[test]
    fn test_unresolved_tool_names_the_tool() {
        let err = AgentError::UnresolvedTool {
            agent: "weather".into(),
            tool: "does_not_exist".into(),
        };
        assert_eq!(
            err.to_string(),
            "agent 'weather' references unknown tool 'does_not_exist'"
        );
    }
}
