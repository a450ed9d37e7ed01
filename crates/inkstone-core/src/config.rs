//! Editor configuration
//!
//! One immutable value built at startup and passed into the components
//! that need it; there are no process-wide mutable settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use inkstone_session::DEFAULT_THEME;
use inkstone_surface::DEFAULT_CAPACITY;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the session file
    pub session_path: PathBuf,
    /// Maximum number of live rendering surfaces
    pub surface_capacity: usize,
    /// Theme applied before any session preference is loaded
    pub theme: String,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            session_path: data_dir.join("session.json"),
            surface_capacity: DEFAULT_CAPACITY,
            theme: DEFAULT_THEME.to_string(),
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("Inkstone"))
            .unwrap_or_else(|| PathBuf::from(".inkstone"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

// Simple dirs implementation for common directories
mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}
