//! Logical tab data structure

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One open document, independent of rendering state.
///
/// The in-memory `content` is the source of truth for restoration:
/// surfaces are disposable, tabs are not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogicalTab {
    /// Unique identifier, stable for the tab's lifetime, never reused
    pub id: String,
    /// Resolved file path; `None` for unsaved/new documents
    pub file_path: Option<PathBuf>,
    /// In-memory text buffer
    pub content: String,
    /// True when content differs from the last saved version
    pub is_modified: bool,
    /// Monotonic activation counter used for LRU ordering
    pub last_accessed: u64,
    /// Creation order, used to break LRU ties deterministically
    pub created_seq: u64,
    /// When the tab was created
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl LogicalTab {
    pub(crate) fn new(
        file_path: Option<PathBuf>,
        content: String,
        created_seq: u64,
        last_accessed: u64,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            file_path,
            content,
            is_modified: false,
            last_accessed,
            created_seq,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the buffer contents (editor change notification)
    pub fn set_content(&mut self, content: String) {
        self.content = content;
        self.is_modified = true;
        self.updated_at = Utc::now();
    }

    /// Record a successful save, optionally under a new path (save-as)
    pub fn mark_saved(&mut self, path: PathBuf) {
        self.file_path = Some(path);
        self.is_modified = false;
        self.updated_at = Utc::now();
    }

    /// Name to show in the tab strip and window title
    pub fn display_name(&self) -> String {
        self.file_path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string())
    }
}

/// Resolve a path to its on-disk identity for duplicate detection.
///
/// Falls back to the path as given when it does not exist yet (a new
/// file being saved has no canonical form until the first write).
pub(crate) fn resolve_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tab() {
        let tab = LogicalTab::new(None, "# Notes".to_string(), 0, 0);
        assert!(tab.file_path.is_none());
        assert!(!tab.is_modified);
        assert_eq!(tab.content, "# Notes");
        assert_eq!(tab.display_name(), "Untitled");
    }

    #[test]
    fn test_content_change_marks_modified() {
        let mut tab = LogicalTab::new(None, String::new(), 0, 0);
        tab.set_content("hello".to_string());
        assert!(tab.is_modified);
        assert_eq!(tab.content, "hello");
    }

    #[test]
    fn test_mark_saved_clears_flag_and_renames() {
        let mut tab = LogicalTab::new(None, String::new(), 0, 0);
        tab.set_content("hello".to_string());
        tab.mark_saved(PathBuf::from("/notes/todo.md"));

        assert!(!tab.is_modified);
        assert_eq!(tab.file_path.as_deref(), Some(Path::new("/notes/todo.md")));
        assert_eq!(tab.display_name(), "todo.md");
    }
}
