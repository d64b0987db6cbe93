//! Menu elements and the content they display.

pub mod display;
pub mod element;

pub use display::{DisplayContent, DisplayKind, ItemPayload};
pub use element::{Element, ElementGroup, ElementId, ElementSpec, GroupId, NOT_OWNER_NOTICE};
