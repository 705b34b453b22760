//! Persisted theme preference
//!
//! The preference lives under [`PREFERENCE_KEY`] in a key/value store. A
//! missing key means "follow the system colour scheme".

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

pub const PREFERENCE_KEY: &str = "phx:theme";

const SYSTEM: &str = "system";

/// The user's theme choice
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ThemePreference {
    /// Follow the OS colour scheme
    #[default]
    System,
    /// A named theme such as `light` or `dark`
    Theme(String),
}

impl ThemePreference {
    pub fn parse(value: &str) -> Self {
        if value == SYSTEM {
            ThemePreference::System
        } else {
            ThemePreference::Theme(value.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ThemePreference::System => SYSTEM,
            ThemePreference::Theme(name) => name,
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, ThemePreference::System)
    }

    /// Read the preference, treating a missing key as [`ThemePreference::System`]
    pub fn load(store: &dyn PreferenceStore) -> Result<Self> {
        Ok(store
            .get(PREFERENCE_KEY)?
            .map(|value| Self::parse(&value))
            .unwrap_or_default())
    }
}

impl From<String> for ThemePreference {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<ThemePreference> for String {
    fn from(preference: ThemePreference) -> Self {
        preference.as_str().to_string()
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key/value storage for preferences
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.values.write().insert(key.to_string(), value.to_string());
        store
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.write().remove(key);
        Ok(())
    }
}

/// Store backed by a JSON object on disk
///
/// The whole file is rewritten on every change. A missing file reads as empty.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, values: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(values)?)?;
        debug!("Wrote {} preference(s) to {}", values.len(), self.path.display());
        Ok(())
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.read();
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.write();
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.write();
        let mut values = self.read_all()?;
        if values.remove(key).is_some() {
            self.write_all(&values)?;
        }
        Ok(())
    }
}
