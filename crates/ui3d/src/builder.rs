//! Builders for menus and elements.

use crate::animation::PressFeedback;
use crate::components::{DisplayContent, DisplayKind, Element, ElementGroup, ElementSpec, ItemPayload};
use crate::error::MenuError;
use crate::host::Host;
use crate::interaction::InteractionIndex;
use crate::layout::{AnchorMotion, StaticAnchor};
use crate::menu::{Menu, MenuSpec};
use crate::settings::MenuSettings;
use glam::Vec3;
use holomenu_core::{ActorId, Pose};
use std::sync::Arc;

/// Builds and initializes a [`Menu`].
pub struct MenuBuilder {
    host: Host,
    root: Option<Pose>,
    owner: Option<ActorId>,
    settings: MenuSettings,
    motion: Box<dyn AnchorMotion>,
    index: Option<Arc<InteractionIndex>>,
}

impl MenuBuilder {
    /// Start a builder with default settings.
    pub fn new(host: Host) -> Self {
        Self {
            host,
            root: None,
            owner: None,
            settings: MenuSettings::default(),
            motion: Box::new(StaticAnchor),
            index: None,
        }
    }

    /// Initial anchor pose (required).
    pub fn root(mut self, root: Pose) -> Self {
        self.root = Some(root);
        self
    }

    /// Replace all settings. Apply before the per-field setters.
    pub fn settings(mut self, settings: MenuSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Inactivity timeout in seconds.
    pub fn timeout_secs(mut self, seconds: u64) -> Self {
        self.settings.timeout_secs = seconds;
        self
    }

    /// Actor allowed to press elements.
    pub fn owner(mut self, owner: ActorId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Whether the watchdog may clean the menu up.
    pub fn auto_cleanup(mut self, enabled: bool) -> Self {
        self.settings.auto_cleanup = enabled;
        self
    }

    /// Anchor drift between sync passes.
    pub fn motion(mut self, motion: impl AnchorMotion + 'static) -> Self {
        self.motion = Box::new(motion);
        self
    }

    /// Interaction index the menu registers its elements in.
    pub fn index(mut self, index: Arc<InteractionIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Create and initialize the menu.
    pub fn build(self) -> Result<Arc<Menu>, MenuError> {
        let root = self.root.ok_or(MenuError::MissingField("root"))?;
        let spec = MenuSpec {
            root,
            owner: self.owner,
            settings: self.settings,
            motion: self.motion,
            index: self.index.unwrap_or_default(),
        };
        let menu = Menu::new(self.host, spec);
        menu.initialize();
        Ok(menu)
    }
}

/// Builds an [`Element`] on an existing menu.
pub struct ElementBuilder<'a> {
    menu: &'a Arc<Menu>,
    offset: Vec3,
    flag: Option<String>,
    display: Option<DisplayKind>,
    content: Option<DisplayContent>,
    feedback: PressFeedback,
    group: Option<ElementGroup>,
    hitbox: Option<(f32, f32)>,
}

impl<'a> ElementBuilder<'a> {
    /// Start a builder for `menu`.
    pub fn new(menu: &'a Arc<Menu>) -> Self {
        Self {
            menu,
            offset: Vec3::ZERO,
            flag: None,
            display: None,
            content: None,
            feedback: PressFeedback::None,
            group: None,
            hitbox: None,
        }
    }

    /// Offset from the anchor (or from the group origin).
    pub fn offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Application flag carried by the published event (required).
    pub fn flag(mut self, flag: impl Into<String>) -> Self {
        self.flag = Some(flag.into());
        self
    }

    /// Show text.
    pub fn text(self, text: impl Into<String>) -> Self {
        self.display(DisplayKind::Text, DisplayContent::Text(text.into()))
    }

    /// Show an item.
    pub fn item(self, item: ItemPayload) -> Self {
        self.display(DisplayKind::Item, DisplayContent::Item(item))
    }

    /// Declare kind and payload separately; they are checked on build.
    pub fn display(mut self, kind: DisplayKind, content: DisplayContent) -> Self {
        self.display = Some(kind);
        self.content = Some(content);
        self
    }

    /// Press feedback.
    pub fn press_feedback(mut self, feedback: PressFeedback) -> Self {
        self.feedback = feedback;
        self
    }

    /// Place the element in a group.
    pub fn group(mut self, group: ElementGroup) -> Self {
        self.group = Some(group);
        self
    }

    /// Size of the interaction volume, overriding the menu settings.
    pub fn hitbox(mut self, width: f32, height: f32) -> Self {
        self.hitbox = Some((width, height));
        self
    }

    /// Create the element on the menu.
    pub fn build(self) -> Result<Arc<Element>, MenuError> {
        let flag = self.flag.ok_or(MenuError::MissingField("flag"))?;
        let content = self.content.ok_or(MenuError::MissingField("content"))?;
        let display = self.display.unwrap_or_else(|| content.kind());
        let origin = self.group.map(|g| g.origin).unwrap_or(Vec3::ZERO);

        let spec = ElementSpec {
            offset: origin + self.offset,
            flag,
            display,
            content,
            feedback: self.feedback,
            group: self.group.map(|g| g.id),
            hitbox: self.hitbox,
        };
        Element::create(self.menu, spec)
    }
}
