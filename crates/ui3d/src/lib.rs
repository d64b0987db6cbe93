//! Floating, player-anchored menus for tick-driven 3D worlds.
//!
//! A [`Menu`] is an invisible anchor with a set of [`Element`]s placed at
//! fixed offsets around it. Every few ticks the menu re-projects those offsets
//! through the anchor's yaw (quantized to four facings, see [`layout`]) so the
//! panel stays locked to a moving, turning anchor. Presses arrive from the host
//! as interaction primitive ids, are routed by [`MenuManager`], checked against
//! the menu owner, and published to the application as [`MenuInteraction`]s.
//!
//! The world, scheduler, event bus, actor query and clock are collaborators
//! behind the traits in [`host`].
//!
//! # Example
//!
//! ```rust,no_run
//! use glam::Vec3;
//! use holomenu_core::{ActorId, Pose};
//! use holomenu_ui3d::{ElementBuilder, Host, MenuManager, PressFeedback};
//!
//! fn open(host: Host, player: ActorId) -> Result<(), holomenu_ui3d::MenuError> {
//!     let manager = MenuManager::new(host);
//!     let menu = manager.open(
//!         manager
//!             .builder()
//!             .root(Pose::at(Vec3::new(0.0, 65.0, 0.0)))
//!             .owner(player)
//!             .timeout_secs(30),
//!     )?;
//!
//!     ElementBuilder::new(&menu)
//!         .offset(Vec3::new(1.0, 0.5, 0.0))
//!         .flag("confirm")
//!         .text("Confirm")
//!         .press_feedback(PressFeedback::Button)
//!         .build()?;
//!     Ok(())
//! }
//! ```

pub mod animation;
pub mod builder;
pub mod components;
pub mod error;
pub mod host;
pub mod interaction;
pub mod layout;
pub mod manager;
pub mod menu;
pub mod registry;
pub mod settings;

// Re-export commonly used types
pub use animation::{Animation, AnimationFrame, AnimationKind, PressFeedback};
pub use builder::{ElementBuilder, MenuBuilder};
pub use components::{
    DisplayContent, DisplayKind, Element, ElementGroup, ElementId, ElementSpec, GroupId,
    ItemPayload, NOT_OWNER_NOTICE,
};
pub use error::MenuError;
pub use host::{
    ActorDirectory, Billboard, Clock, DisplayTransform, EventBus, Host, HostError, NearbyActor,
    OnceTask, PeriodicTask, PrimitiveSpec, Scheduler, SystemClock, TaskControl, TaskHandle,
    WorldHost,
};
pub use interaction::{InteractOutcome, InteractionIndex, MenuInteraction};
pub use layout::{project, AnchorMotion, Facing, SpinningAnchor, StaticAnchor};
pub use manager::MenuManager;
pub use menu::{Menu, MenuId, MenuSpec, MenuState};
pub use registry::SnapshotList;
pub use settings::MenuSettings;

/// Version of the ui3d crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
