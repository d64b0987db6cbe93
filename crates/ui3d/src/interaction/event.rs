//! Interaction results.

use crate::menu::MenuId;
use holomenu_core::ActorId;
use serde::{Deserialize, Serialize};

/// Published once per owner-validated, non-duplicate press.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuInteraction {
    /// Menu the pressed element belongs to.
    pub menu: MenuId,
    /// Application flag of the pressed element.
    pub flag: String,
    /// Actor that pressed it.
    pub actor: ActorId,
}

/// What an interaction with an element did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractOutcome {
    /// Actor is not the menu owner; they were told so.
    Rejected,
    /// Element was already pressed and has not been reset.
    AlreadyPressed,
    /// Element has been cleaned up.
    Ignored,
    /// Event published immediately.
    Published,
    /// Press animation running; event follows when it completes.
    Deferred,
}

impl InteractOutcome {
    /// Whether this interaction pressed the element.
    pub fn is_press(self) -> bool {
        matches!(self, InteractOutcome::Published | InteractOutcome::Deferred)
    }
}
