#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod pose;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use pose::{normalize_yaw, Pose};

/// Host tick rate the engine is tuned for (20 TPS => 50 ms per tick).
pub const TICKS_PER_SECOND: u64 = 20;

/// Fixed tick type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick of any timeline.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }

    /// Ticks elapsed since `earlier` (saturating).
    pub fn since(self, earlier: SimTick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// Identity of a player (or any other actor) able to interact with menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u64);

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

/// Host-assigned identifier of a spawned world primitive.
///
/// Interaction events delivered by the host carry the id of the primitive
/// that was hit, so this doubles as the interaction identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PrimitiveId(pub u64);

impl std::fmt::Display for PrimitiveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "prim#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_advance_and_since() {
        let start = SimTick::ZERO;
        let later = start.advance(25);
        assert_eq!(later, SimTick(25));
        assert_eq!(later.since(start), 25);
        assert_eq!(start.since(later), 0);
    }
}
