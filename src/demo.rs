//! Scripted headless session: one menu, an owner pressing through it, an intruder getting refused.

use crate::config::AppConfig;
use anyhow::{Context, Result};
use glam::Vec3;
use holomenu_core::{ActorId, Pose, TICKS_PER_SECOND};
use holomenu_server::{EventQueue, JsonlSink, Server};
use holomenu_ui3d::{
    ElementBuilder, ElementGroup, InteractOutcome, ItemPayload, Menu, PressFeedback,
    SpinningAnchor, SystemClock,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const OWNER: ActorId = ActorId(1);
const INTRUDER: ActorId = ActorId(2);

/// Counters reported when the session ends.
#[derive(Debug, Default)]
pub struct DemoSummary {
    pub ticks: u64,
    pub published: u64,
    pub rejected: u64,
    pub menu_closed_early: bool,
}

pub struct Demo {
    server: Server,
    menu: Arc<Menu>,
    press_every_ticks: u64,
    summary: DemoSummary,
}

impl Demo {
    pub fn new(cfg: &AppConfig) -> Result<Self> {
        let events = match &cfg.demo.event_log {
            Some(path) => EventQueue::with_sink(
                JsonlSink::create(path)
                    .with_context(|| format!("creating event log {}", path.display()))?,
            ),
            None => EventQueue::new(),
        };
        let server = Server::with_parts(cfg.menu.clone(), Arc::new(SystemClock), events);

        let root = Pose::at(Vec3::new(0.0, 65.0, 0.0));
        server.world().place_actor(OWNER, root.position + Vec3::new(0.0, 0.0, 2.0));
        server.world().place_actor(INTRUDER, root.position + Vec3::new(4.0, 0.0, 0.0));

        let mut builder = server.manager().builder().root(root);
        if cfg.demo.spin_degrees != 0.0 {
            builder = builder.motion(SpinningAnchor::new(cfg.demo.spin_degrees));
        }
        let menu = server.manager().open(builder).context("opening demo menu")?;
        let owner = menu.claim_nearest_owner();
        info!(menu = %menu.id(), owner = ?owner, "demo menu ready");

        let row = ElementGroup::new(0, Vec3::new(0.0, 1.0, 1.5));
        for (x, flag, label) in [(-1.0, "prev", "<"), (0.0, "select", "Select"), (1.0, "next", ">")]
        {
            ElementBuilder::new(&menu)
                .group(row)
                .offset(Vec3::new(x, 0.0, 0.0))
                .flag(flag)
                .text(label)
                .press_feedback(PressFeedback::Button)
                .build()
                .with_context(|| format!("adding element {flag}"))?;
        }
        ElementBuilder::new(&menu)
            .offset(Vec3::new(0.0, 2.0, 1.5))
            .flag("preview")
            .item(ItemPayload::new("diamond_sword"))
            .press_feedback(PressFeedback::Fade)
            .build()
            .context("adding preview element")?;

        Ok(Self {
            server,
            menu,
            press_every_ticks: cfg.demo.press_every_ticks.max(1),
            summary: DemoSummary::default(),
        })
    }

    /// Advance one tick and run whatever the script does on it.
    pub fn step(&mut self) {
        let tick = self.server.tick();
        self.summary.ticks = tick.0;

        if self.menu.is_cleaned() {
            self.summary.menu_closed_early = true;
        } else if tick.0 % self.press_every_ticks == 0 {
            self.script_press(tick.0 / self.press_every_ticks);
        }

        for event in self.server.drain_events() {
            info!(flag = %event.flag, actor = %event.actor, "demo received interaction");
            self.summary.published += 1;
            // Presses are edge-triggered; re-arm the element once handled.
            if let Some(element) = self
                .menu
                .elements()
                .into_iter()
                .find(|element| element.flag() == event.flag)
            {
                element.reset_press();
            }
        }
    }

    fn script_press(&mut self, round: u64) {
        let elements = self.menu.elements();
        if elements.is_empty() {
            return;
        }
        let element = &elements[(round as usize) % elements.len()];
        let actor = if round % 5 == 4 { INTRUDER } else { OWNER };
        let outcome = self.server.interact(element.interaction_id(), actor);
        debug!(flag = element.flag(), %actor, ?outcome, "scripted press");
        if outcome == Some(InteractOutcome::Rejected) {
            self.summary.rejected += 1;
        }
    }

    pub fn run_stepped(mut self, ticks: u64) -> DemoSummary {
        for _ in 0..ticks {
            self.step();
        }
        self.finish()
    }

    pub fn run_realtime(mut self, ticks: u64) -> Result<DemoSummary> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .context("building tokio runtime")?;
        runtime.block_on(async {
            let mut interval =
                tokio::time::interval(Duration::from_millis(1_000 / TICKS_PER_SECOND));
            for _ in 0..ticks {
                interval.tick().await;
                self.step();
            }
        });
        Ok(self.finish())
    }

    fn finish(self) -> DemoSummary {
        self.server.manager().cleanup_all();
        info!(
            live_primitives = self.server.world().live_count(),
            "demo shut down"
        );
        self.summary
    }
}
