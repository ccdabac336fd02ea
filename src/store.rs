//! Persistent key-value storage for settings.
//!
//! Credentials and the local entitlement ledger are kept as plain strings
//! under well-known names. The file-backed store persists them in
//! `~/.aichatty/settings.json` (or a custom data directory).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::error::StoreError;

/// Name of the active access key entry.
pub const API_KEY: &str = "openApiKey";

/// Name of the host override entry.
pub const API_HOST: &str = "apiHost";

/// File name of the settings file inside the data directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// Host used when no override is stored.
pub const DEFAULT_API_HOST: &str = "https://api.openai.com";

/// Effective API host: the stored override, or the default host.
pub fn api_host(store: &dyn KeyValueStore) -> String {
    store
        .get(API_HOST)
        .filter(|host| !host.is_empty())
        .unwrap_or_else(|| DEFAULT_API_HOST.to_string())
}

/// String store consumed by the coordination layer.
///
/// Writes never fail from the caller's point of view: implementations that
/// persist to disk keep their in-memory view authoritative and log flush
/// failures.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&self, name: &str, value: &str);
    fn remove(&self, name: &str);
}

/// In-memory store. Used by tests and as a scratch store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, name: &str) -> Option<String> {
        read_entries(&self.entries).get(name).cloned()
    }

    fn set(&self, name: &str, value: &str) {
        write_entries(&self.entries).insert(name.to_string(), value.to_string());
    }

    fn remove(&self, name: &str) {
        write_entries(&self.entries).remove(name);
    }
}

/// JSON file store, loaded once and written through on every mutation.
pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open (or create) the settings file inside `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

        let path = data_dir.join(SETTINGS_FILE);
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings file: {:?}", path))?;
            match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Ignoring unreadable settings file {:?}: {}", path, e);
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        debug!("Opened settings store at {:?} ({} entries)", path, entries.len());

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Path of the backing settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> std::result::Result<(), StoreError> {
        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, content).map_err(|source| StoreError::Io {
            path: self.path.display().to_string(),
            source,
        })
    }

    fn mutate(&self, name: &str, apply: impl FnOnce(&mut BTreeMap<String, String>)) {
        let mut entries = write_entries(&self.entries);
        apply(&mut entries);
        match self.flush(&entries) {
            Ok(()) => debug!("Settings entry '{}' saved to {:?}", name, self.path),
            Err(e) => error!("Failed to persist settings entry '{}': {}", name, e),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, name: &str) -> Option<String> {
        read_entries(&self.entries).get(name).cloned()
    }

    fn set(&self, name: &str, value: &str) {
        self.mutate(name, |entries| {
            entries.insert(name.to_string(), value.to_string());
        });
    }

    fn remove(&self, name: &str) {
        self.mutate(name, |entries| {
            entries.remove(name);
        });
        info!("Settings entry '{}' removed", name);
    }
}

fn read_entries(
    lock: &RwLock<BTreeMap<String, String>>,
) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, String>> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_entries(
    lock: &RwLock<BTreeMap<String, String>>,
) -> std::sync::RwLockWriteGuard<'_, BTreeMap<String, String>> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}
