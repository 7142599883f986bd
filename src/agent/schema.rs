//! JSON schema validation for agent config documents
//!
//! The default schema is embedded from `configs/agent_config_schema.json`
//! and compiled once. A schema can also be loaded from disk for the importer.

use crate::error::{AgentError, Result};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::path::Path;
use std::sync::OnceLock;

/// File name of the schema inside a config directory
pub const SCHEMA_FILE_NAME: &str = "agent_config_schema.json";

const EMBEDDED_SCHEMA: &str = include_str!("../../configs/agent_config_schema.json");

/// A compiled agent config schema
pub struct AgentSchema {
    compiled: JSONSchema,
}

impl AgentSchema {
    /// Compile a schema from its JSON value
    pub fn compile(schema: &Value) -> std::result::Result<Self, String> {
        JSONSchema::compile(schema)
            .map(|compiled| Self { compiled })
            .map_err(|err| format!("failed compiling agent config schema: {err}"))
    }

    /// The schema shipped with the crate
    pub fn embedded() -> Result<&'static AgentSchema> {
        static SCHEMA: OnceLock<std::result::Result<AgentSchema, String>> = OnceLock::new();
        let compiled = SCHEMA.get_or_init(|| {
            let value = serde_json::from_str::<Value>(EMBEDDED_SCHEMA)
                .map_err(|err| format!("invalid embedded schema json: {err}"))?;
            AgentSchema::compile(&value)
        });

        compiled.as_ref().map_err(|err| AgentError::SchemaViolation {
            id: SCHEMA_FILE_NAME.to_string(),
            violations: vec![err.clone()],
        })
    }

    /// Load and compile a schema file
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| AgentError::io(path, e))?;
        let value = serde_json::from_str::<Value>(&raw).map_err(|e| AgentError::ConfigParse {
            id: SCHEMA_FILE_NAME.to_string(),
            message: e.to_string(),
        })?;
        Self::compile(&value).map_err(|err| AgentError::SchemaViolation {
            id: SCHEMA_FILE_NAME.to_string(),
            violations: vec![err],
        })
    }

    /// Check a parsed document. Every violated constraint is reported.
    pub fn validate(&self, id: &str, document: &Value) -> Result<()> {
        if let Err(errors) = self.compiled.validate(document) {
            let violations = errors
                .map(|err| {
                    let path = err.instance_path.to_string();
                    let path = if path.is_empty() { "/".to_string() } else { path };
                    format!("{}: {}", path, err)
                })
                .collect::<Vec<_>>();
            return Err(AgentError::SchemaViolation {
                id: id.to_string(),
                violations,
            });
        }
        Ok(())
    }
}

/// Validate a document against the embedded schema
pub fn validate_agent_document(id: &str, document: &Value) -> Result<()> {
    AgentSchema::embedded()?.validate(id, document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn violations(document: Value) -> Vec<String> {
        match validate_agent_document("test", &document) {
            Err(AgentError::SchemaViolation { violations, .. }) => violations,
            other => panic!("expected schema violation, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_document() {
        let document = json!({
            "name": "Weather Agent",
            "model": "gpt-4o-mini",
            "instructions": "Answer weather questions.",
            "tools": ["get_current_weather"],
            "handoffs": []
        });
        assert!(validate_agent_document("weather", &document).is_ok());
    }

    #[test]
    fn test_missing_required_field() {
        let found = violations(json!({
            "name": "Weather Agent",
            "instructions": "Answer weather questions.",
            "tools": []
        }));
        assert_eq!(found.len(), 1);
        assert!(found[0].contains("model"), "{:?}", found);
    }

    #[test]
    fn test_wrong_type() {
        let found = violations(json!({
            "name": "Weather Agent",
            "model": "gpt-4o-mini",
            "instructions": "Answer weather questions.",
            "tools": "get_current_weather"
        }));
        assert!(found.iter().any(|v| v.starts_with("/tools")), "{:?}", found);
    }

    #[test]
    fn test_unexpected_field() {
        let found = violations(json!({
            "name": "Weather Agent",
            "model": "gpt-4o-mini",
            "instructions": "Answer weather questions.",
            "tools": [],
            "temperature": 0.2
        }));
        assert!(found.iter().any(|v| v.contains("temperature")), "{:?}", found);
    }

    #[test]
    fn test_every_violation_is_reported() {
        let found = violations(json!({ "tools": [1] }));
        // name, model, instructions missing + non-string tool
        assert!(found.len() >= 4, "{:?}", found);
    }

    #[test]
    fn test_schema_from_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join(SCHEMA_FILE_NAME);
        std::fs::write(&path, EMBEDDED_SCHEMA).unwrap();

        let schema = AgentSchema::from_path(&path).unwrap();
        assert!(schema.validate("x", &json!({})).is_err());
    }
}
