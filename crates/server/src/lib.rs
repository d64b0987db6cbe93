#![warn(missing_docs)]
//! Headless host for the menu engine: tick scheduler, in-memory world and event queue.

pub mod events;
pub mod scheduler;
pub mod world;

pub use events::{EventQueue, InteractionRecord, JsonlSink};
pub use scheduler::TickScheduler;
pub use world::{HeadlessWorld, PrimitiveRecord};

use holomenu_core::{ActorId, PrimitiveId, SimTick};
use holomenu_ui3d::{
    Clock, Host, InteractOutcome, MenuInteraction, MenuManager, MenuSettings, SystemClock,
};
use std::sync::Arc;
use tracing::trace;

/// Deterministic server harness driving menus one tick at a time.
pub struct Server {
    scheduler: Arc<TickScheduler>,
    world: Arc<HeadlessWorld>,
    events: Arc<EventQueue>,
    manager: MenuManager,
}

impl Server {
    /// Server on the system clock.
    pub fn new(settings: MenuSettings) -> Self {
        Self::with_parts(settings, Arc::new(SystemClock), EventQueue::new())
    }

    /// Server on a custom clock.
    pub fn with_clock(settings: MenuSettings, clock: Arc<dyn Clock>) -> Self {
        Self::with_parts(settings, clock, EventQueue::new())
    }

    /// Server on a custom clock publishing into `events`.
    pub fn with_parts(settings: MenuSettings, clock: Arc<dyn Clock>, events: EventQueue) -> Self {
        let scheduler = Arc::new(TickScheduler::new());
        let world = Arc::new(HeadlessWorld::new());
        let events = Arc::new(events);
        let host = Host::new(
            world.clone(),
            scheduler.clone(),
            events.clone(),
            world.clone(),
            clock,
        );
        Self {
            scheduler,
            world,
            events,
            manager: MenuManager::with_settings(host, settings),
        }
    }

    /// Run one tick of scheduled work.
    pub fn tick(&self) -> SimTick {
        self.events.set_tick(self.scheduler.now().advance(1));
        let tick = self.scheduler.run_tick();
        self.manager.prune();
        trace!(tick = tick.0, "server tick");
        tick
    }

    /// Run `ticks` ticks.
    pub fn run_ticks(&self, ticks: u64) -> SimTick {
        for _ in 0..ticks {
            self.tick();
        }
        self.scheduler.now()
    }

    /// Deliver a host interaction event and let the engine route it.
    pub fn interact(&self, primitive: PrimitiveId, actor: ActorId) -> Option<InteractOutcome> {
        self.manager.handle_interaction(primitive, actor)
    }

    /// Take published interactions.
    pub fn drain_events(&self) -> Vec<MenuInteraction> {
        self.events.drain()
    }

    /// Current tick.
    pub fn now(&self) -> SimTick {
        self.scheduler.now()
    }

    /// Menu manager.
    pub fn manager(&self) -> &MenuManager {
        &self.manager
    }

    /// Collaborator bundle handed to menus.
    pub fn host(&self) -> &Host {
        self.manager.host()
    }

    /// In-memory world.
    pub fn world(&self) -> &Arc<HeadlessWorld> {
        &self.world
    }

    /// Tick scheduler.
    pub fn scheduler(&self) -> &Arc<TickScheduler> {
        &self.scheduler
    }

    /// Event queue.
    pub fn events(&self) -> &Arc<EventQueue> {
        &self.events
    }
}

impl Default for Server {
    fn default() -> Self {
        Self::new(MenuSettings::default())
    }
}
