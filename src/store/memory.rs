//! In-process config store

use super::ConfigStore;
use crate::error::{AgentError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;

/// Config store backed by an in-memory map
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries (sorted by key)
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries.lock().clone()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    fn location(&self) -> String {
        "memory".to_string()
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.entries.lock().remove(key).is_some())
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
        let pattern = glob::Pattern::new(pattern)
            .map_err(|e| AgentError::Store(format!("invalid key pattern '{}': {}", pattern, e)))?;
        Ok(self
            .entries
            .lock()
            .keys()
            .filter(|key| pattern.matches(key))
            .cloned()
            .collect())
    }
}
