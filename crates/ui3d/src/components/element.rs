//! A single menu element: one display primitive plus one interaction primitive.
//!
//! Elements are created through their menu and register themselves into it.
//! The element keeps only a weak back-reference; the menu owns the element.

use crate::animation::{pressed_transform, Animation, AnimationKind, PressFeedback};
use crate::components::{DisplayContent, DisplayKind, ItemPayload};
use crate::error::MenuError;
use crate::host::{DisplayTransform, Host, HostError, PrimitiveSpec, TaskHandle};
use crate::interaction::{InteractOutcome, MenuInteraction};
use crate::layout::{self, Facing};
use crate::menu::{Menu, MenuId};
use crate::settings::MenuSettings;
use glam::Vec3;
use holomenu_core::{ActorId, Pose, PrimitiveId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::{debug, warn};

/// Notice sent to actors pressing a menu they do not own.
pub const NOT_OWNER_NOTICE: &str = "You do not own this menu!";

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique element identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub u64);

impl ElementId {
    fn next() -> Self {
        Self(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

/// Caller-chosen tag grouping elements of one menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(pub u32);

/// A group of elements sharing a base offset from the anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementGroup {
    /// Group tag.
    pub id: GroupId,
    /// Offset added to every member's own offset.
    pub origin: Vec3,
}

impl ElementGroup {
    /// Create a group.
    pub fn new(id: u32, origin: Vec3) -> Self {
        Self {
            id: GroupId(id),
            origin,
        }
    }
}

/// Everything needed to create an element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSpec {
    /// Anchor-relative offset, authored for yaw 0.
    pub offset: Vec3,
    /// Application flag carried by the published event.
    pub flag: String,
    /// Declared display kind.
    pub display: DisplayKind,
    /// Display payload. Must match `display`.
    pub content: DisplayContent,
    /// Press feedback.
    pub feedback: PressFeedback,
    /// Optional group tag.
    pub group: Option<GroupId>,
    /// Interaction volume `(width, height)`; the menu settings when unset.
    pub hitbox: Option<(f32, f32)>,
}

impl ElementSpec {
    /// Spec whose declared kind is taken from the payload.
    pub fn new(offset: Vec3, flag: impl Into<String>, content: DisplayContent) -> Self {
        Self {
            offset,
            flag: flag.into(),
            display: content.kind(),
            content,
            feedback: PressFeedback::None,
            group: None,
            hitbox: None,
        }
    }

    /// Builder: set press feedback.
    pub fn with_feedback(mut self, feedback: PressFeedback) -> Self {
        self.feedback = feedback;
        self
    }

    /// Builder: tag with a group.
    pub fn with_group(mut self, group: GroupId) -> Self {
        self.group = Some(group);
        self
    }
}

#[derive(Debug)]
struct ElementState {
    feedback: PressFeedback,
    pressed: bool,
    destroyed: bool,
    pose: Pose,
    motion: Option<Animation>,
    /// Pending press animations, oldest first, keyed by press sequence.
    press_tasks: Vec<(u64, TaskHandle)>,
    press_seq: u64,
    /// Display transform from before the first pending press animation.
    rest_transform: Option<DisplayTransform>,
}

/// Interactive element of a menu.
pub struct Element {
    id: ElementId,
    me: Weak<Element>,
    menu: Weak<Menu>,
    menu_id: MenuId,
    host: Host,
    flag: String,
    offset: Vec3,
    display_kind: DisplayKind,
    group: Option<GroupId>,
    display: PrimitiveId,
    hitbox: PrimitiveId,
    state: Mutex<ElementState>,
}

impl Element {
    /// Create an element on `menu` and register it there.
    ///
    /// The payload is checked against the declared kind before anything is
    /// spawned. On any later failure the primitives spawned so far are removed
    /// again, so no partial element is left behind.
    pub fn create(menu: &Arc<Menu>, spec: ElementSpec) -> Result<Arc<Element>, MenuError> {
        if menu.is_cleaned() {
            return Err(MenuError::MenuClosed(menu.id()));
        }
        let found = spec.content.kind();
        if found != spec.display {
            return Err(MenuError::PayloadMismatch {
                expected: spec.display,
                found,
            });
        }

        let host = menu.host().clone();
        let settings = menu.settings();
        let pose = layout::project(menu.anchor_pose(), spec.offset);

        let (width, height) = spec
            .hitbox
            .unwrap_or((settings.hitbox_width, settings.hitbox_height));

        let display = host.world.spawn(pose, spec.content.to_spec())?;
        let hitbox = match host.world.spawn(
            pose,
            PrimitiveSpec::Interaction {
                width: width.max(0.0),
                height: height.max(0.0),
                responsive: true,
            },
        ) {
            Ok(id) => id,
            Err(err) => {
                discard_primitive(&host, display);
                return Err(err.into());
            }
        };

        let element = Arc::new_cyclic(|me| Element {
            id: ElementId::next(),
            me: me.clone(),
            menu: Arc::downgrade(menu),
            menu_id: menu.id(),
            host,
            flag: spec.flag,
            offset: spec.offset,
            display_kind: spec.display,
            group: spec.group,
            display,
            hitbox,
            state: Mutex::new(ElementState {
                feedback: spec.feedback,
                pressed: false,
                destroyed: false,
                pose,
                motion: None,
                press_tasks: Vec::new(),
                press_seq: 0,
                rest_transform: None,
            }),
        });

        if let Err(err) = menu.add_element(element.clone()) {
            element.release_primitives();
            return Err(err);
        }

        debug!(
            menu = %element.menu_id,
            element = %element.id,
            interaction = %element.hitbox,
            "element created"
        );
        Ok(element)
    }

    /// Element id.
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Id of the interaction primitive; the address of player interactions.
    pub fn interaction_id(&self) -> PrimitiveId {
        self.hitbox
    }

    /// Id of the display primitive.
    pub fn display_id(&self) -> PrimitiveId {
        self.display
    }

    /// Id of the owning menu.
    pub fn menu_id(&self) -> MenuId {
        self.menu_id
    }

    /// Owning menu, unless it has been dropped.
    pub fn menu(&self) -> Option<Arc<Menu>> {
        self.menu.upgrade()
    }

    /// Application flag.
    pub fn flag(&self) -> &str {
        &self.flag
    }

    /// Anchor-relative offset.
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    /// Display kind.
    pub fn display_kind(&self) -> DisplayKind {
        self.display_kind
    }

    /// Group tag, if any.
    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    /// World pose computed by the last placement.
    pub fn pose(&self) -> Pose {
        self.lock_state().pose
    }

    /// Whether [`Element::cleanup`] has run.
    pub fn is_destroyed(&self) -> bool {
        self.lock_state().destroyed
    }

    /// Re-place both primitives relative to `anchor`.
    pub fn update_location(&self, anchor: Pose) {
        let mut state = self.lock_state();
        if state.destroyed {
            return;
        }

        let pose = layout::project(anchor, self.offset);
        state.pose = pose;

        for id in [self.display, self.hitbox] {
            if let Err(err) = self.host.world.teleport(id, pose) {
                warn!(element = %self.id, primitive = %id, "failed to move primitive: {err}");
            }
            if let Err(err) = self.host.world.set_rotation(id, pose.yaw, 0.0) {
                warn!(element = %self.id, primitive = %id, "failed to rotate primitive: {err}");
            }
        }

        if let Some(motion) = state.motion {
            if let Err(err) = self.apply_animation(&state, motion) {
                warn!(element = %self.id, "failed to apply motion: {err}");
            }
        }
    }

    /// Handle a press by `actor`.
    ///
    /// Only the menu owner can press. Presses are edge-triggered: once pressed
    /// the element ignores further presses until the application resets it.
    pub fn on_interact(&self, actor: ActorId) -> InteractOutcome {
        let Some(menu) = self.menu.upgrade() else {
            return InteractOutcome::Ignored;
        };
        if self.is_destroyed() {
            return InteractOutcome::Ignored;
        }

        if menu.owner() != Some(actor) {
            self.host.actors.notify(actor, NOT_OWNER_NOTICE);
            debug!(menu = %self.menu_id, element = %self.id, %actor, "rejected non-owner press");
            return InteractOutcome::Rejected;
        }

        let event = MenuInteraction {
            menu: self.menu_id,
            flag: self.flag.clone(),
            actor,
        };

        let mut state = self.lock_state();
        if state.destroyed {
            return InteractOutcome::Ignored;
        }
        if state.pressed {
            return InteractOutcome::AlreadyPressed;
        }
        state.pressed = true;

        match state.feedback {
            PressFeedback::Button => {
                match self.start_press_animation(&mut state, menu.settings(), event.clone()) {
                    Ok(()) => return InteractOutcome::Deferred,
                    Err(err) => {
                        warn!(element = %self.id, "press animation failed, publishing now: {err}");
                    }
                }
            }
            PressFeedback::Fade => {
                let fade = Animation::new(AnimationKind::Opacity, menu.settings().fade_opacity);
                if let Err(err) = self.apply_animation(&state, fade) {
                    warn!(element = %self.id, "fade feedback failed: {err}");
                }
            }
            PressFeedback::None => {}
        }
        drop(state);

        debug!(menu = %self.menu_id, element = %self.id, %actor, "publishing interaction");
        self.host.events.publish(event);
        InteractOutcome::Published
    }

    /// Destroy both primitives and leave the menu. Safe to call repeatedly.
    pub fn cleanup(&self) {
        self.release_primitives();
        if let Some(menu) = self.menu.upgrade() {
            menu.detach(self);
        }
    }

    /// Replace the text of a text element.
    pub fn set_text(&self, text: &str) -> Result<(), MenuError> {
        if self.display_kind != DisplayKind::Text {
            return Err(MenuError::IllegalState(
                "cannot set text on a non-text display".into(),
            ));
        }
        let _state = self.lock_state();
        self.host.world.set_text(self.display, text)?;
        Ok(())
    }

    /// Replace the item of an item element.
    pub fn set_item(&self, item: &ItemPayload) -> Result<(), MenuError> {
        if self.display_kind != DisplayKind::Item {
            return Err(MenuError::IllegalState(
                "cannot set item on a non-item display".into(),
            ));
        }
        let _state = self.lock_state();
        self.host.world.set_item(self.display, item)?;
        Ok(())
    }

    /// Set a uniform display scale.
    pub fn set_scale(&self, scale: f32) -> Result<(), MenuError> {
        let _state = self.lock_state();
        let current = self.host.world.transform(self.display)?;
        self.host.world.set_transform(
            self.display,
            DisplayTransform {
                scale: Vec3::splat(scale),
                ..current
            },
        )?;
        Ok(())
    }

    /// Rotate the display primitive. Overwritten by the next sync pass.
    pub fn set_rotation(&self, yaw: f32, pitch: f32) -> Result<(), MenuError> {
        let _state = self.lock_state();
        self.host.world.set_rotation(self.display, yaw, pitch)?;
        Ok(())
    }

    /// Press feedback.
    pub fn press_feedback(&self) -> PressFeedback {
        self.lock_state().feedback
    }

    /// Change press feedback.
    pub fn set_press_feedback(&self, feedback: PressFeedback) {
        self.lock_state().feedback = feedback;
    }

    /// Whether the element has been pressed and not reset.
    pub fn is_pressed(&self) -> bool {
        self.lock_state().pressed
    }

    /// Set press state directly.
    pub fn set_pressed(&self, pressed: bool) {
        self.lock_state().pressed = pressed;
    }

    /// Clear press state and undo fade feedback.
    pub fn reset_press(&self) {
        let mut state = self.lock_state();
        state.pressed = false;
        if state.feedback == PressFeedback::Fade && !state.destroyed {
            if let Err(err) = self.apply_animation(&state, Animation::none()) {
                warn!(element = %self.id, "failed to restore opacity: {err}");
            }
        }
    }

    /// Animation applied after every sync pass, if any.
    pub fn motion(&self) -> Option<Animation> {
        self.lock_state().motion
    }

    /// Set or clear the per-pass animation.
    pub fn set_motion(&self, motion: Option<Animation>) {
        self.lock_state().motion = motion;
    }

    /// Apply one animation step to the display transform.
    ///
    /// The delta is anchor-relative and rotated with the menu's facing; the
    /// primitive's position is not changed.
    pub fn animate(&self, animation: Animation) -> Result<(), MenuError> {
        let state = self.lock_state();
        if state.destroyed {
            return Err(HostError::Destroyed(self.display).into());
        }
        self.apply_animation(&state, animation)?;
        Ok(())
    }

    fn apply_animation(&self, state: &ElementState, animation: Animation) -> Result<(), HostError> {
        let frame = animation.apply();
        let facing = Facing::from_yaw(state.pose.yaw);
        let current = self.host.world.transform(self.display)?;
        // Directional steps leave opacity alone so fade feedback survives sync passes.
        let opacity = match animation.kind {
            AnimationKind::Opacity | AnimationKind::None => frame.opacity,
            _ => current.opacity,
        };
        self.host.world.set_transform(
            self.display,
            DisplayTransform {
                translation: current.translation + facing.rotate(frame.delta),
                opacity,
                ..current
            },
        )
    }

    fn start_press_animation(
        &self,
        state: &mut ElementState,
        settings: &MenuSettings,
        event: MenuInteraction,
    ) -> Result<(), HostError> {
        let rest = match state.rest_transform {
            Some(rest) => rest,
            None => self.host.world.transform(self.display)?,
        };
        self.host
            .world
            .set_transform(self.display, pressed_transform(rest, settings.press_scale))?;
        state.rest_transform = Some(rest);

        state.press_seq += 1;
        let seq = state.press_seq;
        let me = self.me.clone();
        let task = self.host.scheduler.schedule_once(
            settings.press_restore_ticks,
            Box::new(move || {
                if let Some(element) = me.upgrade() {
                    element.finish_press(seq, event);
                }
            }),
        );
        state.press_tasks.push((seq, task));
        Ok(())
    }

    fn finish_press(&self, seq: u64, event: MenuInteraction) {
        let mut state = self.lock_state();
        state.press_tasks.retain(|(pending, _)| *pending != seq);
        if state.destroyed {
            return;
        }
        // Only the last pending animation restores the resting transform.
        if state.press_tasks.is_empty() {
            if let Some(rest) = state.rest_transform.take() {
                if let Err(err) = self.host.world.set_transform(self.display, rest) {
                    warn!(element = %self.id, "failed to restore pressed display: {err}");
                }
            }
        }
        drop(state);

        debug!(menu = %self.menu_id, element = %self.id, actor = %event.actor, "publishing interaction");
        self.host.events.publish(event);
    }

    fn release_primitives(&self) {
        let mut state = self.lock_state();
        state.destroyed = true;
        for (_, task) in state.press_tasks.drain(..) {
            self.host.scheduler.cancel(&task);
        }
        state.rest_transform = None;
        for id in [self.display, self.hitbox] {
            discard_primitive(&self.host, id);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ElementState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("menu", &self.menu_id)
            .field("flag", &self.flag)
            .field("offset", &self.offset)
            .field("display_kind", &self.display_kind)
            .field("display", &self.display)
            .field("hitbox", &self.hitbox)
            .finish_non_exhaustive()
    }
}

/// Remove a primitive unless the host already considers it gone.
fn discard_primitive(host: &Host, id: PrimitiveId) {
    if host.world.is_destroyed(id) {
        return;
    }
    if let Err(err) = host.world.remove(id) {
        warn!(primitive = %id, "failed to remove primitive: {err}");
    }
}
