//! Tab error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabError {
    #[error("Tab not found: {0}")]
    NotFound(String),

    #[error("A tab is already open for path: {path}")]
    DuplicatePath { path: String, existing_id: String },
}
