//! Editor shell events
//!
//! The UI toolkit delivers its signals as plain values so the
//! coordinator's state machine stays testable without any toolkit.

use std::path::PathBuf;

use inkstone_surface::SurfaceId;

#[derive(Debug, Clone)]
pub enum EditorEvent {
    /// User selected a tab
    TabActivated { tab_id: String },
    /// User asked to close a tab
    TabCloseRequested { tab_id: String },
    /// The editor inside a surface reported changed content
    ContentChanged { tab_id: String, content: String },
    /// The render host finished bringing a surface up
    SurfaceReady { surface: SurfaceId },
    /// Open a document from the file explorer or a dialog
    OpenFileRequested { path: PathBuf },
    /// Open a fresh unsaved buffer
    NewTabRequested,
    /// Save a tab, optionally to a new destination (save-as)
    SaveRequested {
        tab_id: String,
        path: Option<PathBuf>,
    },
    /// User picked a different theme
    ThemeChanged { theme: String },
    /// Window is closing
    Shutdown,
}
