//! Surface lifecycle state machine
//!
//! Each tab slot moves through:
//! ```text
//! Unbound
//!   ↓ acquire
//! Pending
//!   ↓ host ready signal
//! Ready
//!   ↓ LRU eviction / tab close
//! Evicted | Closed
//! ```
//! Pending may jump straight to Evicted or Closed when the tab is
//! evicted or closed before the host ever signals readiness; the
//! in-flight ready callback then goes stale and must no-op.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceState {
    /// No rendering surface exists for the tab
    Unbound,
    /// Surface created, waiting for the host's ready signal
    Pending,
    /// Surface is live and has received its content
    Ready,
    /// Surface destroyed by cache pressure; tab stays open
    Evicted,
    /// Surface destroyed because the tab was closed
    Closed,
}

impl SurfaceState {
    /// Check if transition to another state is valid
    pub fn can_transition_to(&self, target: SurfaceState) -> bool {
        match (self, target) {
            (SurfaceState::Unbound, SurfaceState::Pending) => true,
            (SurfaceState::Pending, SurfaceState::Ready) => true,
            // Close/evict before readiness cancels the pending continuation
            (SurfaceState::Pending, SurfaceState::Evicted) => true,
            (SurfaceState::Pending, SurfaceState::Closed) => true,
            (SurfaceState::Ready, SurfaceState::Evicted) => true,
            (SurfaceState::Ready, SurfaceState::Closed) => true,
            // An evicted tab re-acquires a fresh surface
            (SurfaceState::Evicted, SurfaceState::Pending) => true,
            // Same state is always valid (no-op)
            (a, b) if *a == b => true,
            _ => false,
        }
    }

    /// Returns true if a surface is currently alive for the tab
    pub fn is_resident(&self) -> bool {
        matches!(self, SurfaceState::Pending | SurfaceState::Ready)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SurfaceState::Unbound => "unbound",
            SurfaceState::Pending => "pending",
            SurfaceState::Ready => "ready",
            SurfaceState::Evicted => "evicted",
            SurfaceState::Closed => "closed",
        }
    }
}

impl std::fmt::Display for SurfaceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        assert!(SurfaceState::Unbound.can_transition_to(SurfaceState::Pending));
        assert!(SurfaceState::Pending.can_transition_to(SurfaceState::Ready));
        assert!(SurfaceState::Pending.can_transition_to(SurfaceState::Evicted));
        assert!(SurfaceState::Pending.can_transition_to(SurfaceState::Closed));
        assert!(SurfaceState::Ready.can_transition_to(SurfaceState::Evicted));
        assert!(SurfaceState::Ready.can_transition_to(SurfaceState::Closed));
        assert!(SurfaceState::Evicted.can_transition_to(SurfaceState::Pending));
    }

    #[test]
    fn test_invalid_transitions() {
        // A surface is never reused: closed is terminal
        assert!(!SurfaceState::Closed.can_transition_to(SurfaceState::Pending));
        assert!(!SurfaceState::Closed.can_transition_to(SurfaceState::Ready));
        // Readiness cannot be granted without a surface
        assert!(!SurfaceState::Unbound.can_transition_to(SurfaceState::Ready));
        assert!(!SurfaceState::Evicted.can_transition_to(SurfaceState::Ready));
    }

    #[test]
    fn test_residency() {
        assert!(SurfaceState::Pending.is_resident());
        assert!(SurfaceState::Ready.is_resident());
        assert!(!SurfaceState::Unbound.is_resident());
        assert!(!SurfaceState::Evicted.is_resident());
        assert!(!SurfaceState::Closed.is_resident());
    }
}
