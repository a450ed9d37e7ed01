//! Tab Registry
//!
//! Owns all logical tab state. Surfaces and storage are handled
//! elsewhere; nothing here has side effects beyond the in-memory map.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::TabError;
use crate::tab::{resolve_path, LogicalTab};
use crate::Result;

/// Outcome of a create request.
///
/// Opening a path that is already open is not an error: the caller is
/// expected to focus the existing tab instead of creating a duplicate.
#[derive(Debug, Clone)]
pub enum TabCreation {
    Created(LogicalTab),
    Existing(String),
}

impl TabCreation {
    pub fn id(&self) -> &str {
        match self {
            TabCreation::Created(tab) => &tab.id,
            TabCreation::Existing(id) => id,
        }
    }
}

pub struct TabRegistry {
    /// In-memory tab map
    tabs: Arc<RwLock<HashMap<String, LogicalTab>>>,
    /// Monotonic activation clock shared by all tabs
    clock: Arc<AtomicU64>,
    /// Creation sequence, for deterministic LRU tie-breaking
    next_seq: Arc<AtomicU64>,
}

impl TabRegistry {
    pub fn new() -> Self {
        Self {
            tabs: Arc::new(RwLock::new(HashMap::new())),
            clock: Arc::new(AtomicU64::new(1)),
            next_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Create a new tab, or report the existing one for an already-open path
    pub fn create(&self, file_path: Option<&Path>, content: String) -> Result<TabCreation> {
        let resolved = file_path.map(resolve_path);

        if let Some(path) = resolved.as_deref() {
            if let Some(existing_id) = self.find_by_path(path) {
                tracing::debug!(path = %path.display(), tab_id = %existing_id, "Path already open");
                return Ok(TabCreation::Existing(existing_id));
            }
        }

        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let stamp = self.clock.fetch_add(1, Ordering::Relaxed);
        let tab = LogicalTab::new(resolved, content, seq, stamp);

        self.tabs.write().insert(tab.id.clone(), tab.clone());

        tracing::info!(tab_id = %tab.id, name = %tab.display_name(), "Created new tab");

        Ok(TabCreation::Created(tab))
    }

    /// Get a tab by ID
    pub fn get(&self, tab_id: &str) -> Result<LogicalTab> {
        self.tabs
            .read()
            .get(tab_id)
            .cloned()
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))
    }

    /// Mark a tab as most recently used (tab switch or creation focus)
    pub fn activate(&self, tab_id: &str) -> Result<LogicalTab> {
        let stamp = self.clock.fetch_add(1, Ordering::Relaxed);
        let mut tabs = self.tabs.write();
        let tab = tabs
            .get_mut(tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?;

        tab.last_accessed = stamp;
        Ok(tab.clone())
    }

    /// Remove a tab. Idempotent: closing an unknown id is a no-op.
    pub fn close(&self, tab_id: &str) {
        if self.tabs.write().remove(tab_id).is_some() {
            tracing::info!(tab_id = %tab_id, "Closed tab");
        }
    }

    /// Look up an open tab by resolved path
    pub fn find_by_path(&self, path: &Path) -> Option<String> {
        let resolved = resolve_path(path);
        self.tabs
            .read()
            .values()
            .find(|tab| tab.file_path.as_deref() == Some(resolved.as_path()))
            .map(|tab| tab.id.clone())
    }

    /// The candidate tab with the oldest activation, excluding the
    /// active tab. This is the one place the LRU ordering is defined;
    /// the surface cache passes its resident ids as the candidates.
    ///
    /// The active tab must never be evicted, so the exclusion is part of
    /// the query rather than a caller-side check. Ties (equal clock
    /// values cannot occur, but equal defaults can after restoration)
    /// are broken by creation order, first created wins.
    pub fn least_recently_used<'a>(
        &self,
        candidates: impl IntoIterator<Item = &'a str>,
        excluding: &str,
    ) -> Option<String> {
        let tabs = self.tabs.read();
        candidates
            .into_iter()
            .filter(|id| *id != excluding)
            .filter_map(|id| tabs.get(id))
            .min_by_key(|tab| (tab.last_accessed, tab.created_seq))
            .map(|tab| tab.id.clone())
    }

    /// Mirror an editor change into the registry (synchronous, see cache docs)
    pub fn set_content(&self, tab_id: &str, content: String) -> Result<()> {
        let mut tabs = self.tabs.write();
        let tab = tabs
            .get_mut(tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?;

        tab.set_content(content);
        Ok(())
    }

    /// Record a successful save, enforcing the one-tab-per-path invariant
    pub fn mark_saved(&self, tab_id: &str, path: &Path) -> Result<LogicalTab> {
        let resolved = resolve_path(path);

        if let Some(other_id) = self.find_by_path(&resolved) {
            if other_id != tab_id {
                return Err(TabError::DuplicatePath {
                    path: resolved.display().to_string(),
                    existing_id: other_id,
                });
            }
        }

        let mut tabs = self.tabs.write();
        let tab = tabs
            .get_mut(tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?;

        tab.mark_saved(resolved);
        Ok(tab.clone())
    }

    /// Snapshot of all open tabs in creation order
    pub fn open_tabs(&self) -> Vec<LogicalTab> {
        let mut tabs: Vec<LogicalTab> = self.tabs.read().values().cloned().collect();
        tabs.sort_by_key(|tab| tab.created_seq);
        tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.read().is_empty()
    }
}

impl Default for TabRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TabRegistry {
    fn clone(&self) -> Self {
        Self {
            tabs: Arc::clone(&self.tabs),
            clock: Arc::clone(&self.clock),
            next_seq: Arc::clone(&self.next_seq),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn create_id(registry: &TabRegistry, path: &str) -> String {
        match registry
            .create(Some(Path::new(path)), String::new())
            .unwrap()
        {
            TabCreation::Created(tab) => tab.id,
            TabCreation::Existing(id) => panic!("unexpected existing tab {id}"),
        }
    }

    #[test]
    fn test_create_and_get() {
        let registry = TabRegistry::new();
        let id = create_id(&registry, "/notes/a.md");

        let tab = registry.get(&id).unwrap();
        assert_eq!(tab.file_path, Some(PathBuf::from("/notes/a.md")));
        assert!(!tab.is_modified);
    }

    #[test]
    fn test_duplicate_path_returns_existing() {
        let registry = TabRegistry::new();
        let first = create_id(&registry, "/notes/a.md");

        match registry
            .create(Some(Path::new("/notes/a.md")), String::new())
            .unwrap()
        {
            TabCreation::Existing(id) => assert_eq!(id, first),
            TabCreation::Created(tab) => panic!("duplicate tab created: {}", tab.id),
        }

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unsaved_tabs_never_collide() {
        let registry = TabRegistry::new();
        registry.create(None, String::new()).unwrap();
        registry.create(None, String::new()).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_close_is_idempotent() {
        let registry = TabRegistry::new();
        let id = create_id(&registry, "/notes/a.md");

        registry.close(&id);
        assert!(registry.get(&id).is_err());

        // Second close observes nothing to do
        registry.close(&id);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_lru_excludes_active() {
        let registry = TabRegistry::new();
        let a = create_id(&registry, "/notes/a.md");
        let b = create_id(&registry, "/notes/b.md");

        registry.activate(&a).unwrap();
        registry.activate(&b).unwrap();

        let all = [a.as_str(), b.as_str()];

        // a is oldest; but excluding a must pick b
        assert_eq!(registry.least_recently_used(all, &b), Some(a.clone()));
        assert_eq!(registry.least_recently_used(all, &a), Some(b));
    }

    #[test]
    fn test_lru_tie_breaks_by_creation_order() {
        let registry = TabRegistry::new();
        let a = create_id(&registry, "/notes/a.md");
        let b = create_id(&registry, "/notes/b.md");

        // Force equal activation stamps, as after a session restore
        {
            let mut tabs = registry.tabs.write();
            for tab in tabs.values_mut() {
                tab.last_accessed = 0;
            }
        }

        assert_eq!(
            registry.least_recently_used([a.as_str(), b.as_str()], &b),
            Some(a.clone())
        );
        let _ = (a, b);
    }

    #[test]
    fn test_lru_empty_when_only_active_tab() {
        let registry = TabRegistry::new();
        let a = create_id(&registry, "/notes/a.md");
        assert_eq!(registry.least_recently_used([a.as_str()], &a), None);
    }

    #[test]
    fn test_mark_saved_rejects_colliding_rename() {
        let registry = TabRegistry::new();
        let a = create_id(&registry, "/notes/a.md");
        let b = create_id(&registry, "/notes/b.md");

        let err = registry.mark_saved(&b, Path::new("/notes/a.md")).unwrap_err();
        assert!(matches!(err, TabError::DuplicatePath { .. }));

        // Saving onto its own path is fine
        registry.mark_saved(&a, Path::new("/notes/a.md")).unwrap();
    }

    #[test]
    fn test_open_tabs_in_creation_order() {
        let registry = TabRegistry::new();
        let a = create_id(&registry, "/notes/a.md");
        let b = create_id(&registry, "/notes/b.md");
        let c = create_id(&registry, "/notes/c.md");

        // Activation order must not disturb creation order
        registry.activate(&c).unwrap();
        registry.activate(&a).unwrap();

        let ids: Vec<String> = registry.open_tabs().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a, b, c]);
    }
}
