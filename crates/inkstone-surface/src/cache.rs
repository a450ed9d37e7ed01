//! Surface Cache
//!
//! Maps tab id -> rendering surface, bounded by a fixed capacity, with
//! LRU eviction driven by the tab registry's activation order. The
//! registry owns document state; losing a surface loses nothing as long
//! as editor changes are mirrored into the registry synchronously,
//! which is the coordinator's job.
//!
//! All methods run on the single UI event loop. Ready signals from the
//! host arrive on the same loop but possibly after newer user actions,
//! so [`SurfaceCache::notify_ready`] validates its surface id against
//! the current entry before acting (cancellation by staleness).

use std::collections::HashMap;

use inkstone_tabs::{SurfaceState, TabRegistry};

use crate::error::SurfaceError;
use crate::escape::escape_for_injection;
use crate::host::{RenderHost, SurfaceId};
use crate::Result;

struct SurfaceEntry {
    surface: SurfaceId,
    state: SurfaceState,
    /// One coalesced content push, delivered on readiness. Content is
    /// read from the registry at fire time, so a later request
    /// supersedes an earlier unfired one instead of stacking.
    push_queued: bool,
}

pub struct SurfaceCache {
    host: Box<dyn RenderHost>,
    registry: TabRegistry,
    entries: HashMap<String, SurfaceEntry>,
    capacity: usize,
}

impl SurfaceCache {
    /// Capacity below one would evict the active tab's own surface, so
    /// it is clamped.
    pub fn new(host: Box<dyn RenderHost>, registry: TabRegistry, capacity: usize) -> Self {
        Self {
            host,
            registry,
            entries: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Return the surface for a tab, creating (and evicting) as needed.
    ///
    /// Re-entrant safe: an already-resident tab returns its surface
    /// immediately without touching the rest of the cache, so a ready
    /// callback that triggers another acquire cannot double-evict.
    pub fn acquire(&mut self, tab_id: &str) -> Result<SurfaceId> {
        if let Some(entry) = self.entries.get(tab_id) {
            return Ok(entry.surface);
        }

        // Surfaces exist only for open tabs
        self.registry.get(tab_id)?;

        // Create before evicting: a failed create must leave the cache
        // untouched, and the new surface is not in the map yet, so the
        // capacity bound holds either way.
        let surface = self.host.create()?;

        if self.entries.len() >= self.capacity {
            if let Some(victim) = self.eviction_victim(tab_id) {
                self.evict(&victim);
            }
        }

        tracing::debug!(
            tab_id = %tab_id,
            from = %SurfaceState::Unbound,
            to = %SurfaceState::Pending,
            "Surface state transition"
        );

        self.entries.insert(
            tab_id.to_string(),
            SurfaceEntry {
                surface,
                state: SurfaceState::Pending,
                push_queued: true,
            },
        );

        tracing::info!(
            tab_id = %tab_id,
            surface = %surface,
            resident = self.entries.len(),
            "Surface created"
        );

        Ok(surface)
    }

    /// The host finished bringing a surface up.
    ///
    /// A signal for a surface that was evicted or closed in the meantime
    /// finds no entry and is dropped; rapid tab switching makes this a
    /// normal occurrence, not an error.
    pub fn notify_ready(&mut self, surface: SurfaceId) {
        let Some((tab_id, entry)) = self
            .entries
            .iter_mut()
            .find(|(_, entry)| entry.surface == surface)
        else {
            tracing::debug!(surface = %surface, "Stale ready signal, surface no longer registered");
            return;
        };

        if let Err(e) = Self::transition(entry, tab_id, SurfaceState::Ready) {
            tracing::warn!(tab_id = %tab_id, error = %e, "Ready signal in unexpected state");
            return;
        }

        if entry.push_queued {
            entry.push_queued = false;

            match self.registry.get(tab_id) {
                Ok(tab) => {
                    let escaped = escape_for_injection(&tab.content);
                    self.host
                        .inject(entry.surface, tab.file_path.as_deref(), &escaped);
                    tracing::debug!(tab_id = %tab_id, surface = %surface, "Injected content");
                }
                Err(e) => {
                    tracing::warn!(tab_id = %tab_id, error = %e, "Tab vanished before injection");
                }
            }
        }
    }

    /// Deliver the tab's current content to its surface.
    ///
    /// Ready surfaces are injected immediately; pending surfaces get the
    /// push on readiness. A tab with no surface is a no-op: the registry
    /// already holds the content and the next acquire delivers it.
    pub fn push_content(&mut self, tab_id: &str) -> Result<()> {
        let Some(entry) = self.entries.get_mut(tab_id) else {
            return Ok(());
        };

        match entry.state {
            SurfaceState::Ready => {
                let tab = self.registry.get(tab_id)?;
                let escaped = escape_for_injection(&tab.content);
                self.host
                    .inject(entry.surface, tab.file_path.as_deref(), &escaped);
            }
            _ => {
                entry.push_queued = true;
            }
        }

        Ok(())
    }

    /// Destroy a tab's surface under cache pressure. No-op when absent.
    pub fn evict(&mut self, tab_id: &str) {
        self.release(tab_id, SurfaceState::Evicted);
    }

    /// Destroy a tab's surface because the tab is closing. No-op when
    /// absent. Any pending ready continuation goes stale with the entry.
    pub fn close(&mut self, tab_id: &str) {
        self.release(tab_id, SurfaceState::Closed);
    }

    fn release(&mut self, tab_id: &str, target: SurfaceState) {
        let Some(mut entry) = self.entries.remove(tab_id) else {
            return;
        };

        if let Err(e) = Self::transition(&mut entry, tab_id, target) {
            tracing::warn!(tab_id = %tab_id, error = %e, "Releasing surface in unexpected state");
        }

        // Teardown happens while we still hold the handle, so the host
        // can flush writes and detach subscriptions.
        self.host.destroy(entry.surface);

        tracing::info!(
            tab_id = %tab_id,
            surface = %entry.surface,
            reason = %target,
            resident = self.entries.len(),
            "Surface released"
        );
    }

    /// Registry LRU order restricted to tabs that actually hold a
    /// surface. The acquiring (active) tab is excluded structurally:
    /// it can never come back as the victim.
    fn eviction_victim(&self, excluding: &str) -> Option<String> {
        self.registry
            .least_recently_used(self.entries.keys().map(String::as_str), excluding)
    }

    fn transition(entry: &mut SurfaceEntry, tab_id: &str, target: SurfaceState) -> Result<()> {
        if !entry.state.can_transition_to(target) {
            return Err(SurfaceError::InvalidTransition {
                from: entry.state.to_string(),
                to: target.to_string(),
            });
        }

        tracing::debug!(
            tab_id = %tab_id,
            from = %entry.state,
            to = %target,
            "Surface state transition"
        );

        entry.state = target;
        Ok(())
    }

    pub fn is_resident(&self, tab_id: &str) -> bool {
        self.state_of(tab_id).is_resident()
    }

    pub fn surface_for(&self, tab_id: &str) -> Option<SurfaceId> {
        self.entries.get(tab_id).map(|entry| entry.surface)
    }

    /// Lifecycle state of a tab's slot; absent entries read as unbound.
    pub fn state_of(&self, tab_id: &str) -> SurfaceState {
        self.entries
            .get(tab_id)
            .map(|entry| entry.state)
            .unwrap_or(SurfaceState::Unbound)
    }

    pub fn resident_count(&self) -> usize {
        self.entries.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkstone_tabs::TabCreation;
    use parking_lot::Mutex;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    enum HostEvent {
        Created(SurfaceId),
        Injected {
            surface: SurfaceId,
            path: Option<PathBuf>,
            content: String,
        },
        Destroyed(SurfaceId),
    }

    #[derive(Default)]
    struct MockHostInner {
        next_id: u64,
        events: Vec<HostEvent>,
        fail_next_create: bool,
    }

    #[derive(Clone, Default)]
    struct MockHost {
        inner: Arc<Mutex<MockHostInner>>,
    }

    impl MockHost {
        fn events(&self) -> Vec<HostEvent> {
            self.inner.lock().events.clone()
        }

        fn injected(&self) -> Vec<(SurfaceId, String)> {
            self.inner
                .lock()
                .events
                .iter()
                .filter_map(|event| match event {
                    HostEvent::Injected {
                        surface, content, ..
                    } => Some((*surface, content.clone())),
                    _ => None,
                })
                .collect()
        }

        fn destroyed(&self) -> Vec<SurfaceId> {
            self.inner
                .lock()
                .events
                .iter()
                .filter_map(|event| match event {
                    HostEvent::Destroyed(surface) => Some(*surface),
                    _ => None,
                })
                .collect()
        }

        fn fail_next_create(&self) {
            self.inner.lock().fail_next_create = true;
        }
    }

    impl RenderHost for MockHost {
        fn create(&mut self) -> Result<SurfaceId> {
            let mut inner = self.inner.lock();
            if inner.fail_next_create {
                inner.fail_next_create = false;
                return Err(SurfaceError::ResourceExhausted(
                    "render process limit reached".to_string(),
                ));
            }

            inner.next_id += 1;
            let surface = SurfaceId(inner.next_id);
            inner.events.push(HostEvent::Created(surface));
            Ok(surface)
        }

        fn inject(&mut self, surface: SurfaceId, file_path: Option<&Path>, content: &str) {
            self.inner.lock().events.push(HostEvent::Injected {
                surface,
                path: file_path.map(Path::to_path_buf),
                content: content.to_string(),
            });
        }

        fn destroy(&mut self, surface: SurfaceId) {
            self.inner.lock().events.push(HostEvent::Destroyed(surface));
        }
    }

    fn setup(capacity: usize) -> (TabRegistry, MockHost, SurfaceCache) {
        let registry = TabRegistry::new();
        let host = MockHost::default();
        let cache = SurfaceCache::new(Box::new(host.clone()), registry.clone(), capacity);
        (registry, host, cache)
    }

    fn open_tab(registry: &TabRegistry, path: &str, content: &str) -> String {
        match registry
            .create(Some(Path::new(path)), content.to_string())
            .unwrap()
        {
            TabCreation::Created(tab) => {
                registry.activate(&tab.id).unwrap();
                tab.id
            }
            TabCreation::Existing(id) => panic!("tab already open: {id}"),
        }
    }

    #[test]
    fn test_capacity_bound_and_lru_eviction() {
        let (registry, host, mut cache) = setup(3);

        // Open A, B, C, D in order, each activated then acquired
        let a = open_tab(&registry, "/docs/a.md", "");
        let surface_a = cache.acquire(&a).unwrap();
        let b = open_tab(&registry, "/docs/b.md", "");
        cache.acquire(&b).unwrap();
        let c = open_tab(&registry, "/docs/c.md", "");
        cache.acquire(&c).unwrap();
        let d = open_tab(&registry, "/docs/d.md", "");
        cache.acquire(&d).unwrap();

        // A, the least recently used, lost its surface; B and C remain
        assert_eq!(cache.resident_count(), 3);
        assert!(!cache.is_resident(&a));
        assert!(cache.is_resident(&b));
        assert!(cache.is_resident(&c));
        assert!(cache.is_resident(&d));
        assert_eq!(host.destroyed(), vec![surface_a]);
    }

    #[test]
    fn test_active_tab_never_evicted() {
        let (registry, _host, mut cache) = setup(2);

        let a = open_tab(&registry, "/docs/a.md", "");
        cache.acquire(&a).unwrap();
        let b = open_tab(&registry, "/docs/b.md", "");
        cache.acquire(&b).unwrap();

        // Make A the most recent, then bring in C: B must go, not A, and
        // certainly not C itself
        registry.activate(&a).unwrap();
        let c = open_tab(&registry, "/docs/c.md", "");
        cache.acquire(&c).unwrap();

        assert!(cache.is_resident(&a));
        assert!(!cache.is_resident(&b));
        assert!(cache.is_resident(&c));
    }

    #[test]
    fn test_reacquire_after_eviction_restores_content() {
        let (registry, host, mut cache) = setup(1);

        let a = open_tab(&registry, "/docs/a.md", "hello");
        let first = cache.acquire(&a).unwrap();
        cache.notify_ready(first);

        // Eviction by pressure from a second tab
        let b = open_tab(&registry, "/docs/b.md", "");
        cache.acquire(&b).unwrap();
        assert!(!cache.is_resident(&a));

        // Reacquire: a fresh surface goes pending, and readiness
        // re-injects the stored content byte for byte
        registry.activate(&a).unwrap();
        let second = cache.acquire(&a).unwrap();
        assert_ne!(first, second);
        assert_eq!(cache.state_of(&a), SurfaceState::Pending);

        cache.notify_ready(second);
        let injected = host.injected();
        assert_eq!(injected.last().unwrap(), &(second, "hello".to_string()));
    }

    #[test]
    fn test_stale_ready_signal_is_a_no_op() {
        let (registry, host, mut cache) = setup(3);

        let a = open_tab(&registry, "/docs/a.md", "hello");
        let surface = cache.acquire(&a).unwrap();
        cache.evict(&a);

        let before = host.events();
        cache.notify_ready(surface);

        assert_eq!(host.events(), before);
        assert_eq!(cache.state_of(&a), SurfaceState::Unbound);
    }

    #[test]
    fn test_acquire_resident_is_reentrant_safe() {
        let (registry, host, mut cache) = setup(1);

        let a = open_tab(&registry, "/docs/a.md", "");
        let surface = cache.acquire(&a).unwrap();

        // A second acquire (e.g. from inside a ready callback) returns
        // the same surface without evicting anything
        assert_eq!(cache.acquire(&a).unwrap(), surface);
        assert!(host.destroyed().is_empty());
        assert_eq!(cache.resident_count(), 1);
    }

    #[test]
    fn test_create_failure_leaves_no_ghost_entry() {
        // Capacity 1 so the failed acquire happens against a full cache:
        // the would-be victim must survive, not just the new entry
        let (registry, host, mut cache) = setup(1);

        let a = open_tab(&registry, "/docs/a.md", "");
        let surface_a = cache.acquire(&a).unwrap();

        let b = open_tab(&registry, "/docs/b.md", "");
        host.fail_next_create();
        let err = cache.acquire(&b).unwrap_err();
        assert!(matches!(err, SurfaceError::ResourceExhausted(_)));

        // No ghost entry for B, and A was neither evicted nor destroyed
        assert!(!cache.is_resident(&b));
        assert!(cache.is_resident(&a));
        assert_eq!(cache.surface_for(&a), Some(surface_a));
        assert!(host.destroyed().is_empty());
        assert_eq!(cache.resident_count(), 1);

        // The cache recovers on the next attempt, evicting as usual
        cache.acquire(&b).unwrap();
        assert!(cache.is_resident(&b));
        assert!(!cache.is_resident(&a));
        assert_eq!(host.destroyed(), vec![surface_a]);
        assert_eq!(cache.resident_count(), 1);
    }

    #[test]
    fn test_acquire_unknown_tab_fails() {
        let (_registry, _host, mut cache) = setup(3);
        let err = cache.acquire("no-such-tab").unwrap_err();
        assert!(matches!(
            err,
            SurfaceError::Tab(inkstone_tabs::TabError::NotFound(_))
        ));
        assert_eq!(cache.resident_count(), 0);
    }

    #[test]
    fn test_pending_pushes_coalesce() {
        let (registry, host, mut cache) = setup(3);

        let a = open_tab(&registry, "/docs/a.md", "v1");
        let surface = cache.acquire(&a).unwrap();

        // Two edits while the surface is still loading
        registry.set_content(&a, "v2".to_string()).unwrap();
        cache.push_content(&a).unwrap();
        registry.set_content(&a, "v3".to_string()).unwrap();
        cache.push_content(&a).unwrap();

        cache.notify_ready(surface);

        // Exactly one injection, carrying the latest content
        assert_eq!(host.injected(), vec![(surface, "v3".to_string())]);
    }

    #[test]
    fn test_push_to_ready_surface_injects_immediately() {
        let (registry, host, mut cache) = setup(3);

        let a = open_tab(&registry, "/docs/a.md", "draft");
        let surface = cache.acquire(&a).unwrap();
        cache.notify_ready(surface);

        registry.set_content(&a, "final".to_string()).unwrap();
        cache.push_content(&a).unwrap();

        assert_eq!(host.injected().last().unwrap().1, "final");
    }

    #[test]
    fn test_injection_is_transport_escaped() {
        let (registry, host, mut cache) = setup(3);

        let a = open_tab(&registry, "/docs/a.md", "```sh\necho $HOME\n```");
        let surface = cache.acquire(&a).unwrap();
        cache.notify_ready(surface);

        let injected = host.injected();
        assert_eq!(injected[0].1, "\\`\\`\\`sh\necho \\$HOME\n\\`\\`\\`");
    }

    #[test]
    fn test_close_destroys_and_is_idempotent() {
        let (registry, host, mut cache) = setup(3);

        let a = open_tab(&registry, "/docs/a.md", "");
        let surface = cache.acquire(&a).unwrap();

        cache.close(&a);
        assert_eq!(host.destroyed(), vec![surface]);
        assert!(!cache.is_resident(&a));

        cache.close(&a);
        assert_eq!(host.destroyed(), vec![surface]);
    }

    #[test]
    fn test_close_while_pending_cancels_injection() {
        let (registry, host, mut cache) = setup(3);

        let a = open_tab(&registry, "/docs/a.md", "hello");
        let surface = cache.acquire(&a).unwrap();

        // Close before the host ever signals readiness
        cache.close(&a);
        cache.notify_ready(surface);

        assert!(host.injected().is_empty());
    }
}
