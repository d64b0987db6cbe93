//! Menu: an anchor plus the elements positioned around it.
//!
//! A menu owns its elements, keeps them locked to the anchor on a fixed tick
//! interval, routes presses to them, and cleans everything up after a period
//! of inactivity.

use crate::components::{Element, ElementId, GroupId};
use crate::error::MenuError;
use crate::host::{Host, PrimitiveSpec, TaskControl, TaskHandle};
use crate::interaction::{InteractOutcome, InteractionIndex};
use crate::layout::{AnchorMotion, StaticAnchor};
use crate::registry::SnapshotList;
use crate::settings::MenuSettings;
use holomenu_core::{ActorId, Pose, PrimitiveId};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use tracing::{debug, info, warn};

static NEXT_MENU_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique menu identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MenuId(pub u64);

impl MenuId {
    fn next() -> Self {
        Self(NEXT_MENU_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for MenuId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "menu#{}", self.0)
    }
}

/// Menu lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    /// Created, anchor not spawned, tasks not running.
    Initializing,
    /// Syncing and accepting interactions.
    Active,
    /// Torn down. Terminal.
    Cleaned,
}

/// Construction parameters of a [`Menu`].
pub struct MenuSpec {
    /// Initial anchor pose.
    pub root: Pose,
    /// Actor allowed to press elements.
    pub owner: Option<ActorId>,
    /// Behaviour settings.
    pub settings: MenuSettings,
    /// Anchor drift between sync passes.
    pub motion: Box<dyn AnchorMotion>,
    /// Index interaction ids are published to.
    pub index: Arc<InteractionIndex>,
}

impl MenuSpec {
    /// Static menu at `root` with default settings and a private index.
    pub fn new(root: Pose) -> Self {
        Self {
            root,
            owner: None,
            settings: MenuSettings::default(),
            motion: Box::new(StaticAnchor),
            index: Arc::new(InteractionIndex::new()),
        }
    }
}

struct AnchorState {
    pose: Pose,
    primitive: Option<PrimitiveId>,
}

struct Lifecycle {
    state: MenuState,
    sync_task: Option<TaskHandle>,
    watchdog: Option<TaskHandle>,
}

/// Floating menu anchored in the world.
pub struct Menu {
    id: MenuId,
    me: Weak<Menu>,
    host: Host,
    settings: MenuSettings,
    root: Pose,
    motion: Box<dyn AnchorMotion>,
    index: Arc<InteractionIndex>,
    anchor: Mutex<AnchorState>,
    owner: RwLock<Option<ActorId>>,
    timeout_secs: AtomicU64,
    auto_cleanup: AtomicBool,
    last_interaction: AtomicU64,
    elements: SnapshotList<Arc<Element>>,
    lifecycle: Mutex<Lifecycle>,
}

impl Menu {
    /// Create a menu in [`MenuState::Initializing`]. Call [`Menu::initialize`] next.
    pub fn new(host: Host, spec: MenuSpec) -> Arc<Menu> {
        let settings = spec.settings.sanitized();
        let now = host.clock.now_millis();
        Arc::new_cyclic(|me| Menu {
            id: MenuId::next(),
            me: me.clone(),
            timeout_secs: AtomicU64::new(settings.timeout_secs),
            auto_cleanup: AtomicBool::new(settings.auto_cleanup),
            last_interaction: AtomicU64::new(now),
            host,
            settings,
            root: spec.root,
            motion: spec.motion,
            index: spec.index,
            anchor: Mutex::new(AnchorState {
                pose: spec.root,
                primitive: None,
            }),
            owner: RwLock::new(spec.owner),
            elements: SnapshotList::new(),
            lifecycle: Mutex::new(Lifecycle {
                state: MenuState::Initializing,
                sync_task: None,
                watchdog: None,
            }),
        })
    }

    /// Spawn the anchor and start the sync and watchdog tasks.
    ///
    /// Failing to spawn the anchor is logged; the menu still becomes active.
    /// Calling this on a menu that is not initializing does nothing.
    pub fn initialize(&self) {
        let mut lifecycle = self.lock_lifecycle();
        if lifecycle.state != MenuState::Initializing {
            return;
        }

        let anchor = self.host.world.spawn(
            self.root,
            PrimitiveSpec::Interaction {
                width: 0.0,
                height: 0.0,
                responsive: false,
            },
        );
        match anchor {
            Ok(id) => self.lock_anchor().primitive = Some(id),
            Err(err) => warn!(menu = %self.id, "failed to spawn anchor: {err}"),
        }

        let me = self.me.clone();
        lifecycle.sync_task = Some(self.host.scheduler.schedule_periodic(
            self.settings.sync_interval_ticks,
            Box::new(move || match me.upgrade() {
                Some(menu) if !menu.is_cleaned() => {
                    menu.sync_pass();
                    TaskControl::Continue
                }
                _ => TaskControl::Stop,
            }),
        ));

        let me = self.me.clone();
        lifecycle.watchdog = Some(self.host.scheduler.schedule_periodic(
            self.settings.watchdog_interval_ticks,
            Box::new(move || match me.upgrade() {
                Some(menu) if !menu.watchdog_check() => TaskControl::Continue,
                _ => TaskControl::Stop,
            }),
        ));

        lifecycle.state = MenuState::Active;
        drop(lifecycle);

        info!(
            menu = %self.id,
            x = self.root.position.x,
            y = self.root.position.y,
            z = self.root.position.z,
            yaw = self.root.yaw,
            "menu opened"
        );
    }

    /// Menu id.
    pub fn id(&self) -> MenuId {
        self.id
    }

    /// Collaborators this menu drives.
    pub fn host(&self) -> &Host {
        &self.host
    }

    /// Settings the menu was created with.
    pub fn settings(&self) -> &MenuSettings {
        &self.settings
    }

    /// Lifecycle state.
    pub fn state(&self) -> MenuState {
        self.lock_lifecycle().state
    }

    /// Whether the menu is syncing and accepting presses.
    pub fn is_active(&self) -> bool {
        self.state() == MenuState::Active
    }

    /// Whether the menu has been torn down.
    pub fn is_cleaned(&self) -> bool {
        self.state() == MenuState::Cleaned
    }

    /// Pose the menu was created at.
    pub fn root_pose(&self) -> Pose {
        self.root
    }

    /// Current anchor pose.
    pub fn anchor_pose(&self) -> Pose {
        self.lock_anchor().pose
    }

    /// Anchor primitive, if it was spawned and not yet removed.
    pub fn anchor_primitive(&self) -> Option<PrimitiveId> {
        self.lock_anchor().primitive
    }

    /// Move the anchor and re-place every element immediately.
    pub fn set_anchor_pose(&self, pose: Pose) {
        if self.is_cleaned() {
            return;
        }
        self.move_anchor(pose);
        self.sync_elements(pose);
    }

    /// Register an element. Counts as activity.
    pub fn add_element(&self, element: Arc<Element>) -> Result<(), MenuError> {
        let lifecycle = self.lock_lifecycle();
        if lifecycle.state == MenuState::Cleaned {
            return Err(MenuError::MenuClosed(self.id));
        }
        self.index.insert(element.interaction_id(), self.id, self.me.clone());
        self.elements.push(element);
        drop(lifecycle);

        self.touch();
        Ok(())
    }

    /// Elements in insertion order.
    pub fn elements(&self) -> Vec<Arc<Element>> {
        self.elements.snapshot().to_vec()
    }

    /// Number of live elements.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Element by id.
    pub fn element(&self, id: ElementId) -> Option<Arc<Element>> {
        self.elements.snapshot().iter().find(|e| e.id() == id).cloned()
    }

    /// Element whose interaction primitive is `id`.
    pub fn element_by_interaction(&self, id: PrimitiveId) -> Option<Arc<Element>> {
        self.elements
            .snapshot()
            .iter()
            .find(|e| e.interaction_id() == id)
            .cloned()
    }

    /// Elements tagged with `group`.
    pub fn group_elements(&self, group: GroupId) -> Vec<Arc<Element>> {
        self.elements
            .snapshot()
            .iter()
            .filter(|e| e.group() == Some(group))
            .cloned()
            .collect()
    }

    /// Clean up every element tagged with `group`. Returns how many there were.
    pub fn cleanup_group(&self, group: GroupId) -> usize {
        let members = self.group_elements(group);
        for element in &members {
            element.cleanup();
        }
        members.len()
    }

    /// One synchronization pass: advance the anchor, then re-place elements.
    pub fn sync_pass(&self) {
        if !self.is_active() {
            return;
        }
        let current = self.anchor_pose();
        let pose = self.motion.advance(current);
        if pose != current {
            self.move_anchor(pose);
        }
        self.sync_elements(pose);
    }

    /// Route a press on interaction primitive `id` to its element.
    ///
    /// Returns `None` when no element matches or the menu is not active.
    pub fn dispatch(&self, id: PrimitiveId, actor: ActorId) -> Option<InteractOutcome> {
        if !self.is_active() {
            return None;
        }
        let elements = self.elements.snapshot();
        let element = elements.iter().find(|e| e.interaction_id() == id)?;

        let outcome = element.on_interact(actor);
        self.touch();
        debug!(menu = %self.id, element = %element.id(), %actor, ?outcome, "dispatched interaction");
        Some(outcome)
    }

    /// Watchdog check. Cleans the menu up once it has been idle for the
    /// timeout. Returns `true` when the menu is (now) cleaned.
    pub fn watchdog_check(&self) -> bool {
        match self.state() {
            MenuState::Cleaned => return true,
            MenuState::Initializing => return false,
            MenuState::Active => {}
        }
        if !self.auto_cleanup() {
            return false;
        }

        let idle_ms = self.idle_millis();
        let timeout = self.timeout_secs();
        if idle_ms >= timeout.saturating_mul(1_000) {
            info!(menu = %self.id, idle_ms, timeout, "menu timed out");
            self.cleanup();
            return true;
        }
        false
    }

    /// Clean up every element; the menu stays usable.
    pub fn clear(&self) {
        let elements = self.elements.take();
        for element in elements.iter() {
            element.cleanup();
        }
    }

    /// Tear the menu down: elements, anchor, and tasks. Safe to call repeatedly.
    pub fn cleanup(&self) {
        let tasks = {
            let mut lifecycle = self.lock_lifecycle();
            if lifecycle.state == MenuState::Cleaned {
                return;
            }
            lifecycle.state = MenuState::Cleaned;
            [lifecycle.sync_task.take(), lifecycle.watchdog.take()]
        };
        for task in tasks.iter().flatten() {
            self.host.scheduler.cancel(task);
        }

        self.clear();

        let anchor = self.lock_anchor().primitive.take();
        if let Some(id) = anchor {
            if !self.host.world.is_destroyed(id) {
                if let Err(err) = self.host.world.remove(id) {
                    warn!(menu = %self.id, "error removing anchor primitive: {err}");
                }
            }
        }

        self.index.remove_menu(self.id);
        info!(menu = %self.id, "menu cleaned up");
    }

    /// Actor allowed to press elements.
    pub fn owner(&self) -> Option<ActorId> {
        *self.owner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Change the owner.
    pub fn set_owner(&self, owner: Option<ActorId>) {
        *self.owner.write().unwrap_or_else(PoisonError::into_inner) = owner;
    }

    /// Make the actor nearest to the anchor the owner, searching within the
    /// configured radius. Leaves the owner unchanged when nobody is in range.
    pub fn claim_nearest_owner(&self) -> Option<ActorId> {
        let center = self.anchor_pose().position;
        let radius = self.settings.owner_search_radius;
        let nearest = self
            .host
            .actors
            .nearby_actors(center, radius)
            .into_iter()
            .filter(|actor| actor.position.distance(center) <= radius)
            .min_by(|a, b| {
                a.position
                    .distance_squared(center)
                    .total_cmp(&b.position.distance_squared(center))
            })?;

        self.set_owner(Some(nearest.id));
        debug!(menu = %self.id, owner = %nearest.id, "claimed nearest owner");
        Some(nearest.id)
    }

    /// Inactivity timeout in seconds.
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.load(Ordering::Relaxed)
    }

    /// Change the inactivity timeout.
    pub fn set_timeout_secs(&self, timeout_secs: u64) {
        self.timeout_secs.store(timeout_secs, Ordering::Relaxed);
    }

    /// Whether the watchdog may clean the menu up.
    pub fn auto_cleanup(&self) -> bool {
        self.auto_cleanup.load(Ordering::Relaxed)
    }

    /// Enable or disable watchdog cleanup.
    pub fn set_auto_cleanup(&self, enabled: bool) {
        self.auto_cleanup.store(enabled, Ordering::Relaxed);
    }

    /// Clock milliseconds of the last activity.
    pub fn last_interaction_millis(&self) -> u64 {
        self.last_interaction.load(Ordering::Relaxed)
    }

    /// Milliseconds since the last activity.
    pub fn idle_millis(&self) -> u64 {
        self.host
            .clock
            .now_millis()
            .saturating_sub(self.last_interaction_millis())
    }

    /// Whole seconds since the last activity.
    pub fn idle_secs(&self) -> u64 {
        self.idle_millis() / 1_000
    }

    /// Remove `element` from the collection and the interaction index.
    pub(crate) fn detach(&self, element: &Element) {
        let id = element.id();
        self.elements.remove_where(|e| e.id() == id);
        self.index.remove(element.interaction_id());
    }

    fn touch(&self) {
        self.last_interaction
            .store(self.host.clock.now_millis(), Ordering::Relaxed);
    }

    fn move_anchor(&self, pose: Pose) {
        let mut anchor = self.lock_anchor();
        anchor.pose = pose;
        if let Some(id) = anchor.primitive {
            if let Err(err) = self.host.world.teleport(id, pose) {
                warn!(menu = %self.id, "failed to move anchor: {err}");
            }
        }
    }

    fn sync_elements(&self, pose: Pose) {
        for element in self.elements.snapshot().iter() {
            element.update_location(pose);
        }
    }

    fn lock_anchor(&self) -> MutexGuard<'_, AnchorState> {
        self.anchor.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Menu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Menu")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("anchor", &self.anchor_pose())
            .field("owner", &self.owner())
            .field("elements", &self.element_count())
            .finish_non_exhaustive()
    }
}
