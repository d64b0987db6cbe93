//! Anchor motion: how a menu's anchor pose drifts from one sync pass to the next.

use holomenu_core::{normalize_yaw, Pose};

/// Strategy deciding the anchor pose for the next sync pass.
pub trait AnchorMotion: Send + Sync {
    /// Pose to use for this pass, given the pose of the previous one.
    fn advance(&self, current: Pose) -> Pose;
}

/// Anchor that never moves on its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticAnchor;

impl AnchorMotion for StaticAnchor {
    fn advance(&self, current: Pose) -> Pose {
        current
    }
}

/// Anchor turning a fixed number of degrees per sync pass.
#[derive(Debug, Clone, Copy)]
pub struct SpinningAnchor {
    /// Yaw change per pass, in degrees (negative turns the other way).
    pub degrees_per_pass: f32,
}

impl SpinningAnchor {
    /// Create a spinning anchor.
    pub fn new(degrees_per_pass: f32) -> Self {
        Self { degrees_per_pass }
    }
}

impl AnchorMotion for SpinningAnchor {
    fn advance(&self, current: Pose) -> Pose {
        current.with_yaw(normalize_yaw(current.yaw + self.degrees_per_pass))
    }
}
