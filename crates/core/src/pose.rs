//! World-space pose (position + yaw) of anchors and primitives.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Position plus horizontal facing, in degrees.
///
/// Pitch is not tracked: menus and their elements only ever turn about the
/// vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// World position.
    pub position: Vec3,
    /// Yaw in degrees, not necessarily normalized.
    pub yaw: f32,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
        }
    }
}

impl Pose {
    /// Create a pose from a position and yaw.
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw }
    }

    /// Pose at `position` facing yaw 0.
    pub fn at(position: Vec3) -> Self {
        Self::new(position, 0.0)
    }

    /// Builder: replace the yaw.
    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    /// Same pose translated by `delta`.
    pub fn translated(self, delta: Vec3) -> Self {
        Self {
            position: self.position + delta,
            yaw: self.yaw,
        }
    }

    /// Yaw folded into `[0, 360)`.
    pub fn normalized_yaw(&self) -> f32 {
        normalize_yaw(self.yaw)
    }
}

/// Fold an arbitrary yaw (degrees) into `[0, 360)`.
pub fn normalize_yaw(yaw: f32) -> f32 {
    let folded = yaw.rem_euclid(360.0);
    // rem_euclid can round tiny negative inputs up to exactly 360.
    if folded >= 360.0 {
        0.0
    } else {
        folded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_into_range() {
        assert_eq!(normalize_yaw(0.0), 0.0);
        assert_eq!(normalize_yaw(360.0), 0.0);
        assert_eq!(normalize_yaw(-90.0), 270.0);
        assert_eq!(normalize_yaw(450.0), 90.0);
        assert_eq!(normalize_yaw(-720.0), 0.0);
    }

    #[test]
    fn tiny_negative_yaw_stays_below_360() {
        let yaw = normalize_yaw(-1.0e-7);
        assert!((0.0..360.0).contains(&yaw), "got {yaw}");
    }

    #[test]
    fn translated_keeps_yaw() {
        let pose = Pose::new(Vec3::new(1.0, 2.0, 3.0), 45.0);
        let moved = pose.translated(Vec3::X);
        assert_eq!(moved.position, Vec3::new(2.0, 2.0, 3.0));
        assert_eq!(moved.yaw, 45.0);
    }
}
