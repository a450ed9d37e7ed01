//! Inkstone Tab Registry
//!
//! A tab is the logical document: path, content, modification flag.
//! It exists independently of whether a rendering surface is currently
//! bound to it, so evicting a surface never loses document state.

mod error;
mod registry;
mod state;
mod tab;

pub use error::TabError;
pub use registry::{TabCreation, TabRegistry};
pub use state::SurfaceState;
pub use tab::LogicalTab;

pub type Result<T> = std::result::Result<T, TabError>;
