//! Tunables shared by every menu.

use crate::animation::{PRESS_RESTORE_TICKS, PRESS_SCALE_FACTOR};
use serde::{Deserialize, Serialize};

/// Per-menu behaviour settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MenuSettings {
    /// Seconds of inactivity before the menu cleans itself up.
    pub timeout_secs: u64,
    /// Whether the inactivity watchdog may clean the menu up.
    pub auto_cleanup: bool,
    /// Ticks between position sync passes.
    pub sync_interval_ticks: u64,
    /// Ticks between watchdog checks (20 = one second at 20 TPS).
    pub watchdog_interval_ticks: u64,
    /// Ticks a button press stays magnified before the event is published.
    pub press_restore_ticks: u64,
    /// Scale multiplier of the button press animation.
    pub press_scale: f32,
    /// Opacity a fade-feedback element drops to when pressed.
    pub fade_opacity: f32,
    /// Width of each element's interaction volume.
    pub hitbox_width: f32,
    /// Height of each element's interaction volume.
    pub hitbox_height: f32,
    /// Radius searched when claiming the nearest actor as owner.
    pub owner_search_radius: f32,
}

impl Default for MenuSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            auto_cleanup: true,
            sync_interval_ticks: 5,
            watchdog_interval_ticks: 20,
            press_restore_ticks: PRESS_RESTORE_TICKS,
            press_scale: PRESS_SCALE_FACTOR,
            fade_opacity: 0.5,
            hitbox_width: 1.0,
            hitbox_height: 1.0,
            owner_search_radius: 10.0,
        }
    }
}

impl MenuSettings {
    /// Clamp values that would stall the scheduler or break rendering.
    pub fn sanitized(mut self) -> Self {
        self.sync_interval_ticks = self.sync_interval_ticks.max(1);
        self.watchdog_interval_ticks = self.watchdog_interval_ticks.max(1);
        self.fade_opacity = self.fade_opacity.clamp(0.0, 1.0);
        self.hitbox_width = self.hitbox_width.max(0.0);
        self.hitbox_height = self.hitbox_height.max(0.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_rejects_zero_intervals() {
        let settings = MenuSettings {
            sync_interval_ticks: 0,
            watchdog_interval_ticks: 0,
            fade_opacity: 3.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(settings.sync_interval_ticks, 1);
        assert_eq!(settings.watchdog_interval_ticks, 1);
        assert_eq!(settings.fade_opacity, 1.0);
    }
}
