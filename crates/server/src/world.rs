//! In-memory world host for headless runs and tests.

use glam::Vec3;
use holomenu_core::{ActorId, Pose, PrimitiveId};
use holomenu_ui3d::{
    ActorDirectory, DisplayTransform, HostError, ItemPayload, NearbyActor, PrimitiveSpec,
    WorldHost,
};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Everything the headless world knows about one primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveRecord {
    /// Current spawn initializer (content updates are written back here).
    pub spec: PrimitiveSpec,
    /// Current pose.
    pub pose: Pose,
    /// Current pitch.
    pub pitch: f32,
    /// Display transform (identity for interaction primitives).
    pub transform: DisplayTransform,
}

impl PrimitiveRecord {
    /// Whether this is a display (text or item) primitive.
    pub fn is_display(&self) -> bool {
        !matches!(self.spec, PrimitiveSpec::Interaction { .. })
    }
}

/// Notices kept for inspection; older ones are dropped first.
pub const NOTICE_CAPACITY: usize = 256;

#[derive(Default)]
struct WorldState {
    next_id: u64,
    unavailable: bool,
    primitives: HashMap<PrimitiveId, PrimitiveRecord>,
    actors: BTreeMap<ActorId, Vec3>,
    notices: VecDeque<(ActorId, String)>,
}

/// World host that keeps primitives and actors in memory.
#[derive(Default)]
pub struct HeadlessWorld {
    state: RwLock<WorldState>,
}

impl HeadlessWorld {
    /// Empty, available world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the world being unloaded: spawns fail with [`HostError::NoWorld`].
    pub fn set_available(&self, available: bool) {
        self.write().unavailable = !available;
    }

    /// Place (or move) an actor.
    pub fn place_actor(&self, actor: ActorId, position: Vec3) {
        self.write().actors.insert(actor, position);
    }

    /// Remove an actor.
    pub fn remove_actor(&self, actor: ActorId) {
        self.write().actors.remove(&actor);
    }

    /// Snapshot of one live primitive. Removed primitives are forgotten.
    pub fn primitive(&self, id: PrimitiveId) -> Option<PrimitiveRecord> {
        self.read().primitives.get(&id).cloned()
    }

    /// Number of primitives not yet removed.
    pub fn live_count(&self) -> usize {
        self.read().primitives.len()
    }

    /// Remove a primitive behind the engine's back, as another plugin might.
    pub fn force_remove(&self, id: PrimitiveId) {
        self.write().primitives.remove(&id);
    }

    /// Notices sent to `actor` that are still retained, oldest first.
    pub fn notices_for(&self, actor: ActorId) -> Vec<String> {
        self.read()
            .notices
            .iter()
            .filter(|(to, _)| *to == actor)
            .map(|(_, message)| message.clone())
            .collect()
    }

    fn with_live<T>(
        &self,
        id: PrimitiveId,
        apply: impl FnOnce(&mut PrimitiveRecord) -> Result<T, HostError>,
    ) -> Result<T, HostError> {
        let mut state = self.write();
        let issued = id.0 <= state.next_id;
        match state.primitives.get_mut(&id) {
            Some(record) => apply(record),
            // Ids are never reused, so an issued id with no record was removed.
            None if issued => Err(HostError::Destroyed(id)),
            None => Err(HostError::UnknownPrimitive(id)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, WorldState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, WorldState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl WorldHost for HeadlessWorld {
    fn spawn(&self, pose: Pose, spec: PrimitiveSpec) -> Result<PrimitiveId, HostError> {
        let mut state = self.write();
        if state.unavailable {
            return Err(HostError::NoWorld);
        }
        state.next_id += 1;
        let id = PrimitiveId(state.next_id);
        state.primitives.insert(
            id,
            PrimitiveRecord {
                spec,
                pose,
                pitch: 0.0,
                transform: DisplayTransform::default(),
            },
        );
        debug!(primitive = %id, "spawned primitive");
        Ok(id)
    }

    fn teleport(&self, id: PrimitiveId, pose: Pose) -> Result<(), HostError> {
        self.with_live(id, |record| {
            record.pose = pose;
            Ok(())
        })
    }

    fn set_rotation(&self, id: PrimitiveId, yaw: f32, pitch: f32) -> Result<(), HostError> {
        self.with_live(id, |record| {
            record.pose.yaw = yaw;
            record.pitch = pitch;
            Ok(())
        })
    }

    fn transform(&self, id: PrimitiveId) -> Result<DisplayTransform, HostError> {
        self.with_live(id, |record| {
            if !record.is_display() {
                return Err(HostError::Unsupported {
                    id,
                    operation: "transform",
                });
            }
            Ok(record.transform)
        })
    }

    fn set_transform(
        &self,
        id: PrimitiveId,
        transform: DisplayTransform,
    ) -> Result<(), HostError> {
        self.with_live(id, |record| {
            if !record.is_display() {
                return Err(HostError::Unsupported {
                    id,
                    operation: "set_transform",
                });
            }
            record.transform = transform;
            Ok(())
        })
    }

    fn set_text(&self, id: PrimitiveId, text: &str) -> Result<(), HostError> {
        self.with_live(id, |record| match &mut record.spec {
            PrimitiveSpec::Text { text: current, .. } => {
                *current = text.to_string();
                Ok(())
            }
            _ => Err(HostError::Unsupported {
                id,
                operation: "set_text",
            }),
        })
    }

    fn set_item(&self, id: PrimitiveId, item: &ItemPayload) -> Result<(), HostError> {
        self.with_live(id, |record| match &mut record.spec {
            PrimitiveSpec::Item { item: current, .. } => {
                *current = item.clone();
                Ok(())
            }
            _ => Err(HostError::Unsupported {
                id,
                operation: "set_item",
            }),
        })
    }

    fn remove(&self, id: PrimitiveId) -> Result<(), HostError> {
        let mut state = self.write();
        if state.primitives.remove(&id).is_some() {
            return Ok(());
        }
        if id.0 <= state.next_id {
            Err(HostError::Destroyed(id))
        } else {
            Err(HostError::UnknownPrimitive(id))
        }
    }

    fn is_destroyed(&self, id: PrimitiveId) -> bool {
        !self.read().primitives.contains_key(&id)
    }
}

impl ActorDirectory for HeadlessWorld {
    fn nearby_actors(&self, center: Vec3, radius: f32) -> Vec<NearbyActor> {
        self.read()
            .actors
            .iter()
            .filter(|(_, position)| position.distance(center) <= radius)
            .map(|(id, position)| NearbyActor {
                id: *id,
                position: *position,
            })
            .collect()
    }

    fn notify(&self, actor: ActorId, message: &str) {
        debug!(%actor, message, "actor notice");
        let mut state = self.write();
        if state.notices.len() == NOTICE_CAPACITY {
            state.notices.pop_front();
        }
        state.notices.push_back((actor, message.to_string()));
    }
}
