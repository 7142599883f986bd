//! Agent configuration loader
//!
//! Loads one agent config document by id from:
//! - a directory: `<dir>/<id>.json`
//! - a config store: key `agent|<id>`
//!
//! Every document is parsed, checked against the schema, then deserialized.

use super::config::AgentConfig;
use super::schema::{validate_agent_document, SCHEMA_FILE_NAME};
use crate::error::{AgentError, Result};
use crate::store::{agent_key, ConfigStore};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where agent config documents come from
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Where the document for `id` would be found (for messages)
    fn location(&self, id: &str) -> String;

    /// Raw document text, or `None` if there is no document for `id`
    async fn fetch(&self, id: &str) -> Result<Option<String>>;
}

/// Reads `<id>.json` from a directory
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ConfigSource for DirectorySource {
    fn location(&self, id: &str) -> String {
        config_path(&self.dir, id).display().to_string()
    }

    async fn fetch(&self, id: &str) -> Result<Option<String>> {
        if !is_valid_id(id) {
            return Ok(None);
        }
        let path = config_path(&self.dir, id);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AgentError::io(path, e)),
        }
    }
}

/// Reads key `agent|<id>` from a config store
#[derive(Clone)]
pub struct StoreSource {
    store: Arc<dyn ConfigStore>,
}

impl StoreSource {
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ConfigSource for StoreSource {
    fn location(&self, id: &str) -> String {
        format!("{} key '{}'", self.store.location(), agent_key(id))
    }

    async fn fetch(&self, id: &str) -> Result<Option<String>> {
        if !is_valid_id(id) {
            return Ok(None);
        }
        self.store.get(&agent_key(id)).await
    }
}

/// Ids become file names and key suffixes, so no separators
fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && !id.contains(['/', '\\']) && id != "." && id != ".."
}

/// Load and validate the config for `id`
pub async fn load_agent_config(source: &dyn ConfigSource, id: &str) -> Result<AgentConfig> {
    let raw = source
        .fetch(id)
        .await?
        .ok_or_else(|| AgentError::ConfigNotFound {
            id: id.to_string(),
            location: source.location(id),
        })?;

    let config = parse_agent_document(id, &raw)?;
    tracing::debug!(agent = %id, location = %source.location(id), "Loaded agent config");
    Ok(config)
}

/// Parse raw document text into a validated config whose id is `id`
pub fn parse_agent_document(id: &str, raw: &str) -> Result<AgentConfig> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| AgentError::ConfigParse {
            id: id.to_string(),
            message: e.to_string(),
        })?;

    validate_agent_document(id, &value)?;

    let mut config: AgentConfig =
        serde_json::from_value(value).map_err(|e| AgentError::ConfigParse {
            id: id.to_string(),
            message: e.to_string(),
        })?;

    // The source id is authoritative
    if !config.id.is_empty() && config.id != id {
        tracing::warn!(
            document_id = %config.id,
            source_id = %id,
            "Config document id differs from its source, using the source id"
        );
    }
    config.id = id.to_string();

    Ok(config)
}

/// Path of the config file for `id` in `dir`
pub fn config_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{}.json", id))
}

/// All `*.json` config files in `dir` (schema file excluded), sorted by name
pub fn list_config_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| AgentError::io(dir, e))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|path| path.is_file())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("json"))
        .filter(|path| path.file_name().and_then(|n| n.to_str()) != Some(SCHEMA_FILE_NAME))
        .collect();
    files.sort();
    Ok(files)
}

/// Save an agent config as `<dir>/<id>.json`
pub fn save_config_file(dir: &Path, config: &AgentConfig) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| AgentError::io(dir, e))?;

    let path = config_path(dir, &config.id);
    let content = serde_json::to_string_pretty(config).map_err(|e| AgentError::ConfigParse {
        id: config.id.clone(),
        message: e.to_string(),
    })?;
    std::fs::write(&path, content).map_err(|e| AgentError::io(&path, e))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use tempfile::TempDir;

    const WEATHER: &str = r#"{
        "name": "Weather Agent",
        "model": "gpt-4o-mini",
        "instructions": "Answer weather questions.",
        "tools": ["get_current_weather"]
    }"#;

    #[tokio::test]
    async fn test_load_from_directory() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("weather.json"), WEATHER).unwrap();

        let source = DirectorySource::new(temp.path());
        let config = load_agent_config(&source, "weather").await.unwrap();
        assert_eq!(config.id, "weather");
        assert_eq!(config.name, "Weather Agent");
        assert_eq!(config.tools, vec!["get_current_weather"]);
    }

    #[tokio::test]
    async fn test_missing_document() {
        let temp = TempDir::new().unwrap();
        let source = DirectorySource::new(temp.path());
        let err = load_agent_config(&source, "news").await.unwrap_err();
        assert!(matches!(err, AgentError::ConfigNotFound { ref id, .. } if id == "news"));
    }

    #[tokio::test]
    async fn test_path_like_id_is_not_found() {
        let temp = TempDir::new().unwrap();
        let source = DirectorySource::new(temp.path());
        let err = load_agent_config(&source, "../weather").await.unwrap_err();
        assert!(matches!(err, AgentError::ConfigNotFound { .. }));
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("broken.json"), "{ not json").unwrap();

        let source = DirectorySource::new(temp.path());
        let err = load_agent_config(&source, "broken").await.unwrap_err();
        assert!(matches!(err, AgentError::ConfigParse { ref id, .. } if id == "broken"));
    }

    #[tokio::test]
    async fn test_schema_violation_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        store
            .set("agent|weather", r#"{"name": "Weather Agent", "tools": []}"#)
            .await
            .unwrap();

        let source = StoreSource::new(store);
        let err = load_agent_config(&source, "weather").await.unwrap_err();
        assert!(matches!(err, AgentError::SchemaViolation { .. }));
    }

    #[tokio::test]
    async fn test_load_from_store() {
        let store = Arc::new(MemoryStore::new());
        store.set("agent|weather", WEATHER).await.unwrap();

        let source = StoreSource::new(store);
        let config = load_agent_config(&source, "weather").await.unwrap();
        assert_eq!(config.id, "weather");
        assert_eq!(config.model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_store_then_load_round_trip() {
        let original = AgentConfig::new("conversation", "Conversation", "gpt-4o", "Be helpful.")
            .with_tool("weather")
            .with_handoff("math")
            .with_max_turns(4);

        let store = Arc::new(MemoryStore::new());
        store
            .set(&agent_key(&original.id), &serde_json::to_string(&original).unwrap())
            .await
            .unwrap();

        let loaded = load_agent_config(&StoreSource::new(store), "conversation")
            .await
            .unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_source_id_wins() {
        let raw = r#"{"id": "other", "name": "N", "model": "m", "instructions": "", "tools": []}"#;
        let config = parse_agent_document("weather", raw).unwrap();
        assert_eq!(config.id, "weather");
    }

    #[test]
    fn test_save_and_list() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(SCHEMA_FILE_NAME), "{}").unwrap();
        std::fs::write(temp.path().join("notes.txt"), "ignore").unwrap();

        let config = AgentConfig::new("weather", "Weather", "gpt-4o-mini", "hi")
            .with_tool("get_current_weather");
        let path = save_config_file(temp.path(), &config).unwrap();
        assert_eq!(path, temp.path().join("weather.json"));

        let files = list_config_files(temp.path()).unwrap();
        assert_eq!(files, vec![temp.path().join("weather.json")]);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(parse_agent_document("weather", &raw).unwrap(), config);
    }
}
