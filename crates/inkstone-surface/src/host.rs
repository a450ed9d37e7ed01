//! Render host collaborator contract
//!
//! The cache never depends on the host's rendering technology; it only
//! needs to create, feed, and destroy opaque surfaces. Readiness is
//! delivered back to the cache by the host's event loop via
//! [`crate::SurfaceCache::notify_ready`], on the same thread as every
//! other cache mutation.

use std::path::Path;

use crate::Result;

/// Opaque handle to one rendering surface, minted by the host.
///
/// Handles are never reused across tabs: an evicted tab gets a fresh
/// surface with a fresh id, which is what makes the id usable as a
/// staleness check for late ready signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u64);

impl std::fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "surface-{}", self.0)
    }
}

pub trait RenderHost {
    /// Create an empty surface. It becomes usable only after the host
    /// signals readiness for it.
    ///
    /// Returns [`crate::SurfaceError::ResourceExhausted`] when the host
    /// cannot allocate another surface.
    fn create(&mut self) -> Result<SurfaceId>;

    /// Push document path and transport-escaped content into a ready
    /// surface.
    fn inject(&mut self, surface: SurfaceId, file_path: Option<&Path>, content: &str);

    /// Destroy a surface, flushing any host-side teardown. Must be
    /// tolerated for surfaces the host already considers gone.
    fn destroy(&mut self, surface: SurfaceId);
}
