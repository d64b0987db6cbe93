//! Element animation: positional deltas, opacity, and button press feedback.

use crate::host::DisplayTransform;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Scale multiplier applied while a button press is shown.
pub const PRESS_SCALE_FACTOR: f32 = 1.2;

/// Ticks the press magnification is held before restoring and publishing.
pub const PRESS_RESTORE_TICKS: u64 = 4;

/// Kind of a single animation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationKind {
    /// Move along -X.
    Left,
    /// Move along +X.
    Right,
    /// Move along +Y.
    Up,
    /// Move along -Y.
    Down,
    /// Move along +Z.
    Forward,
    /// Move along -Z.
    Backward,
    /// Set opacity to the step value.
    Opacity,
    /// Do nothing.
    None,
}

/// Animation descriptor: a kind plus a step magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    /// What the step does.
    pub kind: AnimationKind,
    /// Distance for directional kinds, opacity for [`AnimationKind::Opacity`].
    pub step: f32,
}

/// Result of applying an [`Animation`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationFrame {
    /// Anchor-local positional delta.
    pub delta: Vec3,
    /// Opacity to display with.
    pub opacity: f32,
}

impl Animation {
    /// Create an animation.
    pub fn new(kind: AnimationKind, step: f32) -> Self {
        Self { kind, step }
    }

    /// An animation that changes nothing.
    pub fn none() -> Self {
        Self::new(AnimationKind::None, 0.0)
    }

    /// Compute the delta and opacity for this step.
    pub fn apply(&self) -> AnimationFrame {
        let s = self.step;
        let mut frame = AnimationFrame {
            delta: Vec3::ZERO,
            opacity: 1.0,
        };

        match self.kind {
            AnimationKind::Left => frame.delta.x = -s,
            AnimationKind::Right => frame.delta.x = s,
            AnimationKind::Up => frame.delta.y = s,
            AnimationKind::Down => frame.delta.y = -s,
            AnimationKind::Forward => frame.delta.z = s,
            AnimationKind::Backward => frame.delta.z = -s,
            AnimationKind::Opacity => frame.opacity = s,
            AnimationKind::None => {}
        }

        frame
    }
}

/// Visual feedback an element plays when its owner presses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressFeedback {
    /// Publish immediately, no visual change.
    #[default]
    None,
    /// Briefly magnify, restore, then publish.
    Button,
    /// Dim the display, publish immediately.
    Fade,
}

/// Transform shown during a button press: `original` scaled by `factor`.
pub fn pressed_transform(original: DisplayTransform, factor: f32) -> DisplayTransform {
    DisplayTransform {
        scale: original.scale * factor,
        ..original
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directional_kinds_move_along_one_axis() {
        let cases = [
            (AnimationKind::Left, Vec3::new(-0.5, 0.0, 0.0)),
            (AnimationKind::Right, Vec3::new(0.5, 0.0, 0.0)),
            (AnimationKind::Up, Vec3::new(0.0, 0.5, 0.0)),
            (AnimationKind::Down, Vec3::new(0.0, -0.5, 0.0)),
            (AnimationKind::Forward, Vec3::new(0.0, 0.0, 0.5)),
            (AnimationKind::Backward, Vec3::new(0.0, 0.0, -0.5)),
        ];
        for (kind, expected) in cases {
            let frame = Animation::new(kind, 0.5).apply();
            assert_eq!(frame.delta, expected, "{kind:?}");
            assert_eq!(frame.opacity, 1.0, "{kind:?}");
        }
    }

    #[test]
    fn opacity_kind_sets_opacity_only() {
        let frame = Animation::new(AnimationKind::Opacity, 0.25).apply();
        assert_eq!(frame.delta, Vec3::ZERO);
        assert_eq!(frame.opacity, 0.25);
    }

    #[test]
    fn none_is_identity() {
        let frame = Animation::none().apply();
        assert_eq!(frame.delta, Vec3::ZERO);
        assert_eq!(frame.opacity, 1.0);
    }

    #[test]
    fn pressed_transform_scales_only() {
        let original = DisplayTransform {
            translation: Vec3::new(0.0, 0.1, 0.0),
            scale: Vec3::splat(2.0),
            opacity: 0.8,
        };
        let pressed = pressed_transform(original, PRESS_SCALE_FACTOR);
        assert!((pressed.scale - Vec3::splat(2.4)).length() < 1e-6);
        assert_eq!(pressed.translation, original.translation);
        assert_eq!(pressed.opacity, original.opacity);
    }
}
