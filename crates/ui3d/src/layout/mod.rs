//! Anchor-relative layout.
//!
//! Element offsets are authored for a menu facing yaw 0 and are re-projected
//! whenever the anchor turns. Rotation is quantized to four facings so text
//! and item billboards stay axis-aligned and legible.

pub mod anchor;

pub use anchor::{AnchorMotion, SpinningAnchor, StaticAnchor};

use glam::Vec3;
use holomenu_core::{normalize_yaw, Pose};

/// One of the four quantized menu facings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    /// Yaw sector `[315, 45)`, centred on 0.
    South,
    /// Yaw sector `[45, 135)`, centred on 90.
    West,
    /// Yaw sector `[135, 225)`, centred on 180.
    North,
    /// Yaw sector `[225, 315)`, centred on 270.
    East,
}

impl Facing {
    /// Facing for a yaw in degrees. Sector boundaries belong to the sector above.
    pub fn from_yaw(yaw: f32) -> Self {
        let degrees = normalize_yaw(yaw);

        if !(45.0..315.0).contains(&degrees) {
            Facing::South
        } else if (45.0..135.0).contains(&degrees) {
            Facing::West
        } else if (135.0..225.0).contains(&degrees) {
            Facing::North
        } else {
            Facing::East
        }
    }

    /// Centre yaw of the sector.
    pub fn yaw(self) -> f32 {
        match self {
            Facing::South => 0.0,
            Facing::West => 90.0,
            Facing::North => 180.0,
            Facing::East => 270.0,
        }
    }

    /// Rotate an anchor-local vector into world axes. Y is left untouched.
    pub fn rotate(self, local: Vec3) -> Vec3 {
        let Vec3 { x, y, z } = local;
        match self {
            Facing::South => Vec3::new(x, y, z),
            Facing::West => Vec3::new(-z, y, x),
            Facing::North => Vec3::new(-x, y, -z),
            Facing::East => Vec3::new(z, y, -x),
        }
    }
}

/// World pose of an element at `offset` from `anchor`.
///
/// The result keeps the anchor's (un-normalized) yaw so both primitives of an
/// element face the same way as the anchor.
pub fn project(anchor: Pose, offset: Vec3) -> Pose {
    let rotated = Facing::from_yaw(anchor.yaw).rotate(offset);
    Pose::new(anchor.position + rotated, anchor.yaw)
}
