//! Core error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Tab error: {0}")]
    Tab(#[from] inkstone_tabs::TabError),

    #[error("Surface error: {0}")]
    Surface(#[from] inkstone_surface::SurfaceError),

    #[error("Session error: {0}")]
    Session(#[from] inkstone_session::SessionError),

    #[error("File operation failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File is not UTF-8 text: {path}")]
    NotText { path: PathBuf },

    #[error("No save path for tab: {0}")]
    NoSavePath(String),
}
