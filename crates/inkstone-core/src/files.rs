//! File I/O collaborator
//!
//! Reads and writes document files on behalf of the coordinator. Only
//! UTF-8 text is accepted; anything else is rejected here so the tab
//! registry never holds undisplayable content.

use std::fs;
use std::path::Path;

use crate::error::CoreError;
use crate::Result;

pub fn open_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| CoreError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    String::from_utf8(bytes).map_err(|_| CoreError::NotText {
        path: path.to_path_buf(),
    })
}

pub fn save_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| CoreError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(path, content).map_err(|e| CoreError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
