//! Inkstone Core
//!
//! Central coordination layer for the Inkstone editor shell. Rust owns
//! all document state; rendering surfaces are stateless views that can
//! be destroyed and recreated at any time.

mod config;
mod editor;
mod error;
mod event;
mod files;
mod theme;
mod ui;

pub use config::Config;
pub use editor::EditorShell;
pub use error::CoreError;
pub use event::EditorEvent;
pub use files::{open_file, save_file};
pub use theme::{theme_or_default, Theme, THEMES};
pub use ui::UiShell;

// Re-export core components
pub use inkstone_session::{SessionError, SessionRecord, SessionStore, DEFAULT_THEME};
pub use inkstone_surface::{RenderHost, SurfaceCache, SurfaceError, SurfaceId, DEFAULT_CAPACITY};
pub use inkstone_tabs::{LogicalTab, SurfaceState, TabCreation, TabError, TabRegistry};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
