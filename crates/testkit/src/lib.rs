#![warn(missing_docs)]
//! Deterministic test surfaces: a hand-driven clock and a tick-stepped menu harness.

use glam::Vec3;
use holomenu_core::{ActorId, Pose, SimTick, TICKS_PER_SECOND};
use holomenu_server::Server;
use holomenu_ui3d::{
    Clock, Element, ElementBuilder, InteractOutcome, Menu, MenuBuilder, MenuError,
    MenuInteraction, MenuSettings,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Once};

/// Clock that only moves when told to. Keeps millisecond precision.
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicU64,
}

impl ManualClock {
    /// Clock reading `secs`.
    pub fn starting_at(secs: u64) -> Self {
        Self {
            millis: AtomicU64::new(secs.saturating_mul(1_000)),
        }
    }

    /// Jump to `secs`.
    pub fn set(&self, secs: u64) {
        self.set_millis(secs.saturating_mul(1_000));
    }

    /// Jump to `millis`.
    pub fn set_millis(&self, millis: u64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    /// Move forward by `secs`.
    pub fn advance_secs(&self, secs: u64) {
        self.advance_millis(secs.saturating_mul(1_000));
    }

    /// Move forward by `millis`.
    pub fn advance_millis(&self, millis: u64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }
}

static TRACING: Once = Once::new();

/// Install a test-writer subscriber honoring `RUST_LOG`, once per process.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Headless server on a [`ManualClock`], stepped explicitly by tests.
pub struct MenuHarness {
    server: Server,
    clock: Arc<ManualClock>,
}

impl MenuHarness {
    /// Harness with default settings.
    pub fn new() -> Self {
        Self::with_settings(MenuSettings::default())
    }

    /// Harness with custom settings; the clock starts at 1000 s.
    pub fn with_settings(settings: MenuSettings) -> Self {
        init_tracing();
        let clock = Arc::new(ManualClock::starting_at(1_000));
        let server = Server::with_clock(settings, clock.clone());
        Self { server, clock }
    }

    /// Underlying server.
    pub fn server(&self) -> &Server {
        &self.server
    }

    /// Inactivity clock.
    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Builder preset from the manager.
    pub fn builder(&self) -> MenuBuilder {
        self.server.manager().builder()
    }

    /// Open a menu at `root` owned by `owner`.
    pub fn open_menu(&self, root: Pose, owner: ActorId) -> Result<Arc<Menu>, MenuError> {
        self.server
            .manager()
            .open(self.builder().root(root).owner(owner))
    }

    /// Add a text element to `menu`.
    pub fn text_element(
        &self,
        menu: &Arc<Menu>,
        offset: Vec3,
        flag: &str,
    ) -> Result<Arc<Element>, MenuError> {
        ElementBuilder::new(menu)
            .offset(offset)
            .flag(flag)
            .text(flag)
            .build()
    }

    /// Run `ticks` ticks without touching the clock.
    pub fn step(&self, ticks: u64) -> SimTick {
        self.server.run_ticks(ticks)
    }

    /// Advance the clock by `secs`, running the matching number of ticks one second at a time.
    pub fn advance_secs(&self, secs: u64) -> SimTick {
        for _ in 0..secs {
            self.clock.advance_secs(1);
            self.server.run_ticks(TICKS_PER_SECOND);
        }
        self.server.now()
    }

    /// Press `element`'s hitbox as `actor` through the router.
    pub fn press(&self, element: &Element, actor: ActorId) -> Option<InteractOutcome> {
        self.server.interact(element.interaction_id(), actor)
    }

    /// Take published interactions.
    pub fn drain_events(&self) -> Vec<MenuInteraction> {
        self.server.drain_events()
    }
}

impl Default for MenuHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_moves_only_when_told() {
        let clock = ManualClock::starting_at(5);
        assert_eq!(clock.now_secs(), 5);
        clock.advance_secs(3);
        assert_eq!(clock.now_secs(), 8);
        clock.set(1);
        assert_eq!(clock.now_secs(), 1);
        clock.advance_millis(1_999);
        assert_eq!(clock.now_millis(), 2_999);
        assert_eq!(clock.now_secs(), 2);
    }

    #[test]
    fn advance_secs_runs_a_second_of_ticks_per_second() {
        let harness = MenuHarness::new();
        let tick = harness.advance_secs(2);
        assert_eq!(tick, SimTick(2 * TICKS_PER_SECOND));
        assert_eq!(harness.clock().now_secs(), 1_002);
    }

    #[test]
    fn harness_menu_publishes_owner_presses() {
        let harness = MenuHarness::new();
        let owner = ActorId(3);
        let menu = harness.open_menu(Pose::default(), owner).unwrap();
        let element = harness.text_element(&menu, Vec3::X, "go").unwrap();
        assert_eq!(harness.press(&element, owner), Some(InteractOutcome::Published));
        assert_eq!(harness.drain_events().len(), 1);
    }
}
