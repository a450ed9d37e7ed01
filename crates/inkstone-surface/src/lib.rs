//! Inkstone Surface Cache
//!
//! Rendering surfaces (webviews in the shipping host) are expensive, so
//! at most [`DEFAULT_CAPACITY`] of them stay alive while any number of
//! logical tabs remain open. Evicted tabs keep their full document
//! state in the tab registry and get a fresh surface, with content
//! re-injected, on the next activation.

mod cache;
mod error;
mod escape;
mod host;

pub use cache::SurfaceCache;
pub use error::SurfaceError;
pub use escape::escape_for_injection;
pub use host::{RenderHost, SurfaceId};

/// Surfaces kept alive at once in the reference configuration
pub const DEFAULT_CAPACITY: usize = 3;

pub type Result<T> = std::result::Result<T, SurfaceError>;
