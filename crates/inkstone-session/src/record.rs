//! Session snapshot data structures
//!
//! Unknown keys ride along in the `extra` maps so a newer build's
//! session file survives a round trip through an older one.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Theme applied when the session carries no preference
pub const DEFAULT_THEME: &str = "nord";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub tabs: Vec<SessionTab>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTab {
    pub file_path: PathBuf,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            tabs: Vec::new(),
            extra: Map::new(),
        }
    }
}

impl SessionRecord {
    pub fn tab_paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.tabs.iter().map(|tab| &tab.file_path)
    }
}
