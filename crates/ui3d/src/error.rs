//! Errors surfaced to callers of the menu API.

use crate::components::DisplayKind;
use crate::host::HostError;
use crate::menu::MenuId;
use thiserror::Error;

/// Errors raised while building or mutating menus and elements.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MenuError {
    /// Display payload does not match the declared display kind.
    #[error("display payload is {found:?} but the element was declared {expected:?}")]
    PayloadMismatch {
        /// Declared display kind.
        expected: DisplayKind,
        /// Kind of the supplied payload.
        found: DisplayKind,
    },
    /// A builder was finished without a required field.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    /// Operation not valid for this element's display kind.
    #[error("illegal state: {0}")]
    IllegalState(String),
    /// The menu has been cleaned up and accepts no new elements.
    #[error("menu {0} has been cleaned up")]
    MenuClosed(MenuId),
    /// World host failure.
    #[error(transparent)]
    Host(#[from] HostError),
}
