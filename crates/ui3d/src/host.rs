//! Collaborator seams the engine drives: world, scheduler, event bus, actors, clock.
//!
//! The engine never touches a concrete world. Everything it spawns, moves or
//! removes goes through [`WorldHost`], and everything time-based goes through
//! [`Scheduler`] and [`Clock`].

use crate::components::ItemPayload;
use crate::interaction::MenuInteraction;
use glam::Vec3;
use holomenu_core::{ActorId, Pose, PrimitiveId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Failures reported by the world host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// No world is loaded at the requested location.
    #[error("no world available at the requested location")]
    NoWorld,
    /// The primitive was never spawned by this host.
    #[error("unknown primitive {0}")]
    UnknownPrimitive(PrimitiveId),
    /// The primitive has already been removed.
    #[error("primitive {0} is already destroyed")]
    Destroyed(PrimitiveId),
    /// The primitive does not support the requested operation.
    #[error("primitive {id} does not support {operation}")]
    Unsupported {
        /// Target primitive.
        id: PrimitiveId,
        /// Operation name.
        operation: &'static str,
    },
}

/// How a display primitive orients itself towards viewers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Billboard {
    /// Keep the spawned rotation.
    Fixed,
    /// Rotate about the vertical axis only.
    Vertical,
    /// Always face the viewer.
    #[default]
    Center,
}

/// Initializer for a primitive spawned through [`WorldHost::spawn`].
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveSpec {
    /// Visible text.
    Text {
        /// Text content.
        text: String,
        /// Orientation mode.
        billboard: Billboard,
    },
    /// Visible item model.
    Item {
        /// Item content.
        item: ItemPayload,
        /// Orientation mode.
        billboard: Billboard,
    },
    /// Invisible hit-test volume.
    Interaction {
        /// Horizontal extent in world units.
        width: f32,
        /// Vertical extent in world units.
        height: f32,
        /// Whether the host reports hits on this volume.
        responsive: bool,
    },
}

/// Visual transform of a display primitive, relative to its position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayTransform {
    /// Render offset from the primitive position.
    pub translation: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
}

impl Default for DisplayTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            scale: Vec3::ONE,
            opacity: 1.0,
        }
    }
}

/// The 3D world hosting menu primitives.
pub trait WorldHost: Send + Sync {
    /// Spawn a primitive at `pose`.
    fn spawn(&self, pose: Pose, spec: PrimitiveSpec) -> Result<PrimitiveId, HostError>;

    /// Move a primitive, including its yaw.
    fn teleport(&self, id: PrimitiveId, pose: Pose) -> Result<(), HostError>;

    /// Set yaw and pitch of a primitive.
    fn set_rotation(&self, id: PrimitiveId, yaw: f32, pitch: f32) -> Result<(), HostError>;

    /// Current visual transform of a display primitive.
    fn transform(&self, id: PrimitiveId) -> Result<DisplayTransform, HostError>;

    /// Replace the visual transform of a display primitive.
    fn set_transform(&self, id: PrimitiveId, transform: DisplayTransform)
        -> Result<(), HostError>;

    /// Replace the content of a text primitive.
    fn set_text(&self, id: PrimitiveId, text: &str) -> Result<(), HostError>;

    /// Replace the content of an item primitive.
    fn set_item(&self, id: PrimitiveId, item: &ItemPayload) -> Result<(), HostError>;

    /// Remove a primitive from the world.
    fn remove(&self, id: PrimitiveId) -> Result<(), HostError>;

    /// Whether the primitive is gone (removed, or never existed).
    fn is_destroyed(&self, id: PrimitiveId) -> bool;
}

/// What a periodic task wants after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskControl {
    /// Run again after the interval.
    Continue,
    /// Never run again.
    Stop,
}

/// Cancellation token for a scheduled task.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: u64,
    cancelled: Arc<AtomicBool>,
}

impl TaskHandle {
    /// Create a live handle with the given scheduler-local id.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Scheduler-local id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Mark the task cancelled. A cancelled task never runs again.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether [`TaskHandle::cancel`] has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Periodic task callback.
pub type PeriodicTask = Box<dyn FnMut() -> TaskControl + Send>;

/// One-shot task callback.
pub type OnceTask = Box<dyn FnOnce() + Send>;

/// Fixed-rate cooperative tick scheduler.
pub trait Scheduler: Send + Sync {
    /// Run `task` every `interval_ticks` ticks, first run on the next tick.
    fn schedule_periodic(&self, interval_ticks: u64, task: PeriodicTask) -> TaskHandle;

    /// Run `task` once after `delay_ticks` ticks.
    fn schedule_once(&self, delay_ticks: u64, task: OnceTask) -> TaskHandle;

    /// Cancel a task. Cancelling twice, or cancelling a finished task, is fine.
    fn cancel(&self, handle: &TaskHandle) {
        handle.cancel();
    }
}

/// Sink for interactions the application reacts to.
pub trait EventBus: Send + Sync {
    /// Publish a completed interaction.
    fn publish(&self, event: MenuInteraction);
}

/// An actor found by [`ActorDirectory::nearby_actors`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyActor {
    /// Actor identity.
    pub id: ActorId,
    /// Actor position.
    pub position: Vec3,
}

/// Query and messaging surface for actors (players).
pub trait ActorDirectory: Send + Sync {
    /// Actors within `radius` of `center`.
    fn nearby_actors(&self, center: Vec3, radius: f32) -> Vec<NearbyActor>;

    /// Send a short notice to an actor.
    fn notify(&self, actor: ActorId, message: &str);
}

/// Wall clock used for inactivity timeouts.
pub trait Clock: Send + Sync {
    /// Milliseconds since an arbitrary fixed epoch.
    fn now_millis(&self) -> u64;

    /// Whole seconds since the same epoch.
    fn now_secs(&self) -> u64 {
        self.now_millis() / 1_000
    }
}

/// [`Clock`] backed by the system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0)
    }
}

/// Bundle of collaborators shared by every menu and element.
#[derive(Clone)]
pub struct Host {
    /// World the primitives live in.
    pub world: Arc<dyn WorldHost>,
    /// Tick scheduler.
    pub scheduler: Arc<dyn Scheduler>,
    /// Interaction event sink.
    pub events: Arc<dyn EventBus>,
    /// Actor query/messaging.
    pub actors: Arc<dyn ActorDirectory>,
    /// Inactivity clock.
    pub clock: Arc<dyn Clock>,
}

impl Host {
    /// Assemble a host from its parts.
    pub fn new(
        world: Arc<dyn WorldHost>,
        scheduler: Arc<dyn Scheduler>,
        events: Arc<dyn EventBus>,
        actors: Arc<dyn ActorDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            world,
            scheduler,
            events,
            actors,
            clock,
        }
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host").finish_non_exhaustive()
    }
}
