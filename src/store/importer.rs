//! Config store importer
//!
//! One pass over a store and a config directory:
//! 1. check every stored `agent|*` entry against the schema
//! 2. delete the invalid ones, all or none, if the caller agrees
//! 3. upload every valid `<id>.json` file as `agent|<id>` (raw text)
//! 4. list what is stored
//!
//! Per-entry and per-file problems are reported, never fatal.

use super::{agent_id_from_key, agent_key, ConfigStore, AGENT_KEY_PATTERN};
use crate::agent::config_loader::list_config_files;
use crate::agent::AgentSchema;
use crate::error::{AgentError, Result};
use std::path::{Path, PathBuf};

/// Stored entries checked by `scan_existing`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub valid: Vec<String>,
    /// `(key, reason)`
    pub invalid: Vec<(String, String)>,
}

impl ScanReport {
    pub fn invalid_keys(&self) -> Vec<String> {
        self.invalid.iter().map(|(key, _)| key.clone()).collect()
    }
}

/// Files handled by `import_dir`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// `(file, key)` for every uploaded file
    pub stored: Vec<(PathBuf, String)>,
    /// `(file, reason)` for every file left out
    pub skipped: Vec<(PathBuf, String)>,
}

pub struct Importer<'a> {
    store: &'a dyn ConfigStore,
    schema: &'a AgentSchema,
}

/// Why a document does not pass, or `None` if it does
fn check_document(schema: &AgentSchema, id: &str, raw: &str) -> Option<String> {
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => return Some(format!("invalid JSON: {}", e)),
    };
    match schema.validate(id, &value) {
        Ok(()) => None,
        Err(AgentError::SchemaViolation { violations, .. }) => {
            Some(format!("schema violation: {}", violations.join("; ")))
        }
        Err(e) => Some(e.to_string()),
    }
}

/// Interpret an answer to the delete prompt; `None` means ask again
pub fn parse_confirmation(answer: &str) -> Option<bool> {
    match answer.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

impl<'a> Importer<'a> {
    pub fn new(store: &'a dyn ConfigStore, schema: &'a AgentSchema) -> Self {
        Self { store, schema }
    }

    /// Fails with `StoreConnection` if the store does not answer
    pub async fn connect_check(&self) -> Result<()> {
        self.store.ping().await.map_err(|e| match e {
            AgentError::StoreConnection { .. } => e,
            other => AgentError::StoreConnection {
                url: self.store.location(),
                message: other.to_string(),
            },
        })
    }

    pub async fn scan_existing(&self) -> Result<ScanReport> {
        let mut report = ScanReport::default();

        for key in self.store.keys(AGENT_KEY_PATTERN).await? {
            let id = agent_id_from_key(&key).unwrap_or(key.as_str()).to_string();
            let raw = match self.store.get(&key).await {
                Ok(Some(raw)) => raw,
                // deleted since the listing
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Could not read stored config");
                    continue;
                }
            };

            match check_document(self.schema, &id, &raw) {
                None => report.valid.push(key),
                Some(reason) => {
                    tracing::warn!(key = %key, reason = %reason, "Stored config is invalid");
                    report.invalid.push((key, reason));
                }
            }
        }

        Ok(report)
    }

    /// Delete every given key, returning how many were removed
    pub async fn delete_invalid(&self, keys: &[String]) -> Result<usize> {
        let mut deleted = 0;
        for key in keys {
            match self.store.delete(key).await {
                Ok(true) => {
                    tracing::info!(key = %key, "Deleted invalid config");
                    deleted += 1;
                }
                Ok(false) => {}
                Err(e) => tracing::warn!(key = %key, error = %e, "Failed to delete config"),
            }
        }
        Ok(deleted)
    }

    /// Upload every valid config file in `dir`
    pub async fn import_dir(&self, dir: &Path) -> Result<ImportReport> {
        let mut report = ImportReport::default();

        for path in list_config_files(dir)? {
            let Some(id) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };

            let raw = match tokio::fs::read_to_string(&path).await {
                Ok(raw) => raw,
                Err(e) => {
                    report.skipped.push((path, format!("unreadable: {}", e)));
                    continue;
                }
            };

            if let Some(reason) = check_document(self.schema, &id, &raw) {
                tracing::warn!(file = %path.display(), reason = %reason, "Skipping config file");
                report.skipped.push((path, reason));
                continue;
            }

            let key = agent_key(&id);
            match self.store.set(&key, &raw).await {
                Ok(()) => {
                    tracing::info!(file = %path.display(), key = %key, "Stored config");
                    report.stored.push((path, key));
                }
                Err(e) => report.skipped.push((path, format!("store error: {}", e))),
            }
        }

        Ok(report)
    }

    /// All stored agent keys, sorted
    pub async fn list_keys(&self) -> Result<Vec<String>> {
        let mut keys = self.store.keys(AGENT_KEY_PATTERN).await?;
        keys.sort();
        Ok(keys)
    }
}
