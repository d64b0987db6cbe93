//! Property-based tests for yaw-quantized offset projection
//!
//! - Each quarter-turn sector maps offsets with one fixed axis permutation
//! - Sector boundaries resolve to the sector above
//! - Yaw outside [0, 360) behaves like its normalized value
//! - Projection preserves offset length and height

use glam::Vec3;
use holomenu_core::Pose;
use holomenu_ui3d::{project, Facing};
use proptest::prelude::*;

fn offset() -> impl Strategy<Value = Vec3> {
    (-16.0f32..16.0, -16.0f32..16.0, -16.0f32..16.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn expected(yaw: f32, o: Vec3) -> Vec3 {
    if !(45.0..315.0).contains(&yaw) {
        o
    } else if yaw < 135.0 {
        Vec3::new(-o.z, o.y, o.x)
    } else if yaw < 225.0 {
        Vec3::new(-o.x, o.y, -o.z)
    } else {
        Vec3::new(o.z, o.y, -o.x)
    }
}

proptest! {
    /// Property: the projected position is the anchor plus the sector's permutation of the offset
    #[test]
    fn projection_matches_sector_permutation(
        yaw in 0.0f32..360.0,
        o in offset(),
        anchor in offset(),
    ) {
        let pose = project(Pose::new(anchor, yaw), o);
        prop_assert_eq!(pose.position, anchor + expected(yaw, o));
        prop_assert_eq!(pose.yaw, yaw);
    }

    /// Property: boundary yaws belong to the sector above
    #[test]
    fn boundaries_resolve_upwards(
        boundary in prop_oneof![Just(45.0f32), Just(135.0), Just(225.0), Just(315.0)],
        o in offset(),
    ) {
        let at_boundary = project(Pose::new(Vec3::ZERO, boundary), o).position;
        let inside = project(Pose::new(Vec3::ZERO, boundary + 10.0), o).position;
        prop_assert_eq!(at_boundary, inside);
    }

    /// Property: whole turns do not change the facing
    #[test]
    fn yaw_is_periodic(half_degrees in 0u32..720, turns in -3i32..3) {
        let yaw = half_degrees as f32 * 0.5;
        let shifted = yaw + 360.0 * turns as f32;
        prop_assert_eq!(Facing::from_yaw(shifted), Facing::from_yaw(yaw));
    }

    /// Property: projection is a rotation about Y
    #[test]
    fn projection_preserves_length_and_height(yaw in 0.0f32..360.0, o in offset()) {
        let projected = project(Pose::new(Vec3::ZERO, yaw), o).position;
        prop_assert_eq!(projected.y, o.y);
        prop_assert!((projected.length() - o.length()).abs() < 1e-4);
    }
}

#[test]
fn cardinal_yaws_use_documented_permutations() {
    let o = Vec3::new(1.0, 2.0, 3.0);
    let at = |yaw: f32| project(Pose::new(Vec3::ZERO, yaw), o).position;
    assert_eq!(at(0.0), Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(at(90.0), Vec3::new(-3.0, 2.0, 1.0));
    assert_eq!(at(180.0), Vec3::new(-1.0, 2.0, -3.0));
    assert_eq!(at(270.0), Vec3::new(3.0, 2.0, -1.0));
}
