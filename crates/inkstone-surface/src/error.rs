//! Surface error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("Surface creation failed: {0}")]
    ResourceExhausted(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Tab error: {0}")]
    Tab(#[from] inkstone_tabs::TabError),
}
