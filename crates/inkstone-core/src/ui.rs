//! UI shell collaborator contract
//!
//! The coordinator drives the visible window through this trait and
//! never talks to a toolkit directly. Calls are notifications; the UI
//! must not mutate registry or cache state while handling them.

use std::path::Path;

use inkstone_surface::SurfaceId;

pub trait UiShell {
    /// Show a surface in the tab's content container
    fn attach(&mut self, tab_id: &str, surface: SurfaceId);

    /// Remove whatever surface the tab's container currently shows
    fn detach(&mut self, tab_id: &str);

    fn set_window_title(&mut self, title: &str);

    /// Point the file explorer at the active document
    fn reveal_file(&mut self, path: &Path);

    /// Non-blocking user-visible notice (status bar, toast)
    fn notify(&mut self, message: &str);
}
