//! Session Store
//!
//! One JSON document on disk. Saves follow write-temp-then-rename so a
//! crash mid-write leaves either the old file or a complete new one,
//! never a torn read for the next startup.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use inkstone_tabs::LogicalTab;

use crate::error::SessionError;
use crate::record::{SessionRecord, SessionTab};
use crate::Result;

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Best-effort load. Missing file, unreadable file, and malformed
    /// JSON all collapse to the default record; none of them may stop
    /// the shell from starting.
    pub fn load(&self) -> SessionRecord {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No prior session");
                return SessionRecord::default();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Session file unreadable");
                return SessionRecord::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Session file corrupt, starting empty");
                SessionRecord::default()
            }
        }
    }

    /// Persist the open tabs (resolved paths only, order preserved) and
    /// theme preference. Unknown keys in the existing document, both
    /// top-level and per-tab, are carried forward.
    pub fn save(&self, open_tabs: &[LogicalTab], theme: &str) -> Result<()> {
        let mut document = self.existing_document();
        let carried_tabs = Self::carried_tab_extras(&document);

        let tabs: Vec<Value> = open_tabs
            .iter()
            .filter_map(|tab| tab.file_path.as_ref())
            .map(|path| {
                let mut entry = carried_tabs
                    .get(path.as_path())
                    .cloned()
                    .unwrap_or_default();
                entry.insert(
                    "file_path".to_string(),
                    Value::String(path.display().to_string()),
                );
                Value::Object(entry)
            })
            .collect();

        let tab_count = tabs.len();
        document.insert("theme".to_string(), Value::String(theme.to_string()));
        document.insert("tabs".to_string(), Value::Array(tabs));

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| SessionError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let serialized = serde_json::to_string_pretty(&Value::Object(document))?;

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, serialized).map_err(|e| SessionError::Io {
            path: tmp_path.clone(),
            source: e,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|e| SessionError::Io {
            path: self.path.clone(),
            source: e,
        })?;

        tracing::info!(path = %self.path.display(), tabs = tab_count, "Session saved");

        Ok(())
    }

    /// The current on-disk document as a JSON object, or empty when
    /// there is nothing usable to merge with.
    fn existing_document(&self) -> Map<String, Value> {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|raw| serde_json::from_str::<Value>(&raw).ok())
            .and_then(|value| match value {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Per-tab unknown keys from the previous document, indexed by path
    fn carried_tab_extras(document: &Map<String, Value>) -> std::collections::HashMap<PathBuf, Map<String, Value>> {
        let mut carried = std::collections::HashMap::new();

        let Some(Value::Array(tabs)) = document.get("tabs") else {
            return carried;
        };

        for entry in tabs {
            if let Ok(tab) = serde_json::from_value::<SessionTab>(entry.clone()) {
                carried.insert(tab.file_path, tab.extra);
            }
        }

        carried
    }
}
