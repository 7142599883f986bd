//! Key-value store for agent config documents
//!
//! Documents live under `agent|<id>` as raw JSON text.

mod importer;
mod memory;
mod redis_store;

pub use importer::{parse_confirmation, ImportReport, Importer, ScanReport};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;

use crate::error::Result;
use async_trait::async_trait;

/// Key prefix for stored agent configs
pub const AGENT_KEY_PREFIX: &str = "agent|";

/// Pattern matching every stored agent config
pub const AGENT_KEY_PATTERN: &str = "agent|*";

/// Store key for an agent id
pub fn agent_key(id: &str) -> String {
    format!("{}{}", AGENT_KEY_PREFIX, id)
}

/// Agent id from a store key, if the key is an agent key
pub fn agent_id_from_key(key: &str) -> Option<&str> {
    key.strip_prefix(AGENT_KEY_PREFIX).filter(|id| !id.is_empty())
}

/// Minimal string key-value store interface
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Human-readable location (for messages)
    fn location(&self) -> String;

    /// Check the store is reachable
    async fn ping(&self) -> Result<()>;

    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key, returning whether it existed
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Keys matching a glob pattern (`*`, `?`, `[...]`), sorted
    async fn keys(&self, pattern: &str) -> Result<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_keys() {
        assert_eq!(agent_key("weather"), "agent|weather");
        assert_eq!(agent_id_from_key("agent|weather"), Some("weather"));
        assert_eq!(agent_id_from_key("agent|"), None);
        assert_eq!(agent_id_from_key("session|abc"), None);
    }
}
