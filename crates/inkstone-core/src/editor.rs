//! Editor shell coordinator
//!
//! Binds UI events to the tab registry and surface cache, keeping
//! exactly one visible surface for the active tab. All methods run on
//! the UI event loop; the shell owns the cache and shares the registry
//! with it.

use std::path::Path;

use inkstone_session::SessionStore;
use inkstone_surface::{RenderHost, SurfaceCache, SurfaceError, SurfaceId};
use inkstone_tabs::{LogicalTab, SurfaceState, TabCreation, TabRegistry};

use crate::config::Config;
use crate::error::CoreError;
use crate::event::EditorEvent;
use crate::files;
use crate::theme::theme_or_default;
use crate::ui::UiShell;
use crate::Result;

const APP_NAME: &str = "Inkstone";

pub struct EditorShell {
    config: Config,
    registry: TabRegistry,
    cache: SurfaceCache,
    session: SessionStore,
    ui: Box<dyn UiShell>,
    /// Currently active tab; updated only when its surface is in place
    active_tab_id: Option<String>,
    /// Surface attached to the visible container, for the identity
    /// check that avoids relayout when switching back to a resident tab
    displayed: Option<(String, SurfaceId)>,
    theme: String,
}

impl EditorShell {
    pub fn new(config: Config, host: Box<dyn RenderHost>, ui: Box<dyn UiShell>) -> Self {
        let registry = TabRegistry::new();
        let cache = SurfaceCache::new(host, registry.clone(), config.surface_capacity);
        let session = SessionStore::new(config.session_path.clone());
        let theme = config.theme.clone();

        Self {
            config,
            registry,
            cache,
            session,
            ui,
            active_tab_id: None,
            displayed: None,
            theme,
        }
    }

    /// Dispatch one UI event into the state machine
    pub fn handle_event(&mut self, event: EditorEvent) -> Result<()> {
        match event {
            EditorEvent::TabActivated { tab_id } => self.activate_tab(&tab_id),
            EditorEvent::TabCloseRequested { tab_id } => self.close_tab(&tab_id),
            EditorEvent::ContentChanged { tab_id, content } => {
                self.content_changed(&tab_id, content)
            }
            EditorEvent::SurfaceReady { surface } => {
                self.surface_ready(surface);
                Ok(())
            }
            EditorEvent::OpenFileRequested { path } => self.open_file(&path).map(|_| ()),
            EditorEvent::NewTabRequested => self.new_tab().map(|_| ()),
            EditorEvent::SaveRequested { tab_id, path } => {
                self.save_tab(&tab_id, path.as_deref())
            }
            EditorEvent::ThemeChanged { theme } => {
                self.set_theme(&theme);
                Ok(())
            }
            EditorEvent::Shutdown => {
                self.shutdown();
                Ok(())
            }
        }
    }

    // === Tab operations ===

    /// Open a fresh unsaved buffer and focus it
    pub fn new_tab(&mut self) -> Result<String> {
        let tab_id = self
            .registry
            .create(None, String::new())?
            .id()
            .to_string();

        self.activate_tab(&tab_id)?;
        Ok(tab_id)
    }

    /// Open a document, routing an already-open path to its existing tab
    pub fn open_file(&mut self, path: &Path) -> Result<String> {
        if let Some(existing) = self.registry.find_by_path(path) {
            self.activate_tab(&existing)?;
            return Ok(existing);
        }

        let content = files::open_file(path)?;

        let tab_id = match self.registry.create(Some(path), content)? {
            TabCreation::Created(tab) => tab.id,
            TabCreation::Existing(id) => id,
        };

        self.activate_tab(&tab_id)?;
        Ok(tab_id)
    }

    /// Make a tab current and ensure its surface is displayed.
    ///
    /// If the cache hands back the surface already on screen, nothing is
    /// re-attached. If surface creation fails, the prior view stays up
    /// and the failure is reported as a non-fatal notice.
    pub fn activate_tab(&mut self, tab_id: &str) -> Result<()> {
        self.registry.activate(tab_id)?;

        let surface = match self.cache.acquire(tab_id) {
            Ok(surface) => surface,
            Err(SurfaceError::ResourceExhausted(reason)) => {
                tracing::error!(tab_id = %tab_id, reason = %reason, "Surface creation failed");
                self.ui
                    .notify(&format!("Could not open a view for this tab: {reason}"));
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let same_surface = self
            .displayed
            .as_ref()
            .is_some_and(|(_, shown)| *shown == surface);

        if !same_surface {
            if let Some((old_id, _)) = self.displayed.take() {
                self.ui.detach(&old_id);
            }
            self.ui.attach(tab_id, surface);
            self.displayed = Some((tab_id.to_string(), surface));
        }

        self.active_tab_id = Some(tab_id.to_string());
        self.refresh_chrome()
    }

    /// Close a tab. The surface is released first so teardown can still
    /// read the tab's state; then the registry entry goes.
    pub fn close_tab(&mut self, tab_id: &str) -> Result<()> {
        if self
            .displayed
            .as_ref()
            .is_some_and(|(shown_id, _)| shown_id == tab_id)
        {
            self.ui.detach(tab_id);
            self.displayed = None;
        }

        self.cache.close(tab_id);
        self.registry.close(tab_id);

        if self.active_tab_id.as_deref() == Some(tab_id) {
            self.active_tab_id = None;

            // Focus whichever remaining tab the user touched last
            let next = self
                .registry
                .open_tabs()
                .into_iter()
                .max_by_key(|tab| tab.last_accessed)
                .map(|tab| tab.id);

            match next {
                Some(next_id) => self.activate_tab(&next_id)?,
                None => self.refresh_chrome()?,
            }
        }

        Ok(())
    }

    /// Mirror an editor change into the registry. This must stay
    /// synchronous: it is what makes surface eviction loss-free.
    pub fn content_changed(&mut self, tab_id: &str, content: String) -> Result<()> {
        self.registry.set_content(tab_id, content)?;

        if self.active_tab_id.as_deref() == Some(tab_id) {
            self.refresh_chrome()?;
        }

        Ok(())
    }

    /// Write a tab to disk, optionally under a new path (save-as)
    pub fn save_tab(&mut self, tab_id: &str, path_override: Option<&Path>) -> Result<()> {
        let tab = self.registry.get(tab_id)?;

        let path = path_override
            .map(Path::to_path_buf)
            .or_else(|| tab.file_path.clone())
            .ok_or_else(|| CoreError::NoSavePath(tab_id.to_string()))?;

        files::save_file(&path, &tab.content)?;
        self.registry.mark_saved(tab_id, &path)?;

        if self.active_tab_id.as_deref() == Some(tab_id) {
            self.refresh_chrome()?;
        }

        Ok(())
    }

    /// Forward a host readiness signal to the cache (staleness-checked there)
    pub fn surface_ready(&mut self, surface: SurfaceId) {
        self.cache.notify_ready(surface);
    }

    // === Session operations ===

    /// Reopen the previous session's documents, or fall back to the
    /// initial file argument, or a single empty tab. Unreadable and
    /// vanished files are skipped, never fatal.
    pub fn restore_session(&mut self, initial_file: Option<&Path>) -> Result<()> {
        let record = self.session.load();
        self.theme = theme_or_default(&record.theme).key.to_string();

        for path in record.tab_paths() {
            if !path.exists() {
                tracing::debug!(path = %path.display(), "Session tab no longer on disk");
                continue;
            }

            if let Err(e) = self.open_file(path) {
                tracing::warn!(path = %path.display(), error = %e, "Skipping session tab");
            }
        }

        if self.registry.is_empty() {
            if let Some(path) = initial_file {
                if let Err(e) = self.open_file(path) {
                    tracing::warn!(path = %path.display(), error = %e, "Could not open initial file");
                    self.ui
                        .notify(&format!("Could not open {}: {e}", path.display()));
                }
            }
        }

        if self.registry.is_empty() {
            self.new_tab()?;
        } else {
            tracing::info!(tabs = self.registry.len(), "Session restored");
        }

        Ok(())
    }

    /// Persist the session. Best effort: a failed write is logged and
    /// must never block window close.
    pub fn shutdown(&mut self) {
        if let Err(e) = self.session.save(&self.registry.open_tabs(), &self.theme) {
            tracing::error!(error = %e, "Failed to save session on exit");
        }
    }

    // === Settings ===

    /// Unknown keys fall back to the default theme rather than failing
    pub fn set_theme(&mut self, key: &str) {
        self.theme = theme_or_default(key).key.to_string();
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    // === Observers ===

    pub fn active_tab(&self) -> Option<LogicalTab> {
        let id = self.active_tab_id.as_deref()?;
        self.registry.get(id).ok()
    }

    pub fn surface_state(&self, tab_id: &str) -> SurfaceState {
        self.cache.state_of(tab_id)
    }

    pub fn registry(&self) -> &TabRegistry {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Window title and explorer focus derive purely from the active
    /// tab's registry record; nothing here mutates state.
    fn refresh_chrome(&mut self) -> Result<()> {
        let Some(active_id) = self.active_tab_id.clone() else {
            self.ui.set_window_title(APP_NAME);
            return Ok(());
        };

        let tab = self.registry.get(&active_id)?;
        let marker = if tab.is_modified { "*" } else { "" };
        self.ui
            .set_window_title(&format!("{marker}{} - {APP_NAME}", tab.display_name()));

        if let Some(path) = tab.file_path.as_deref() {
            self.ui.reveal_file(path);
        }

        Ok(())
    }
}
