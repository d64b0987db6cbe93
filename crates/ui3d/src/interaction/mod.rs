//! Interaction plumbing: the published event, dispatch outcomes, and the
//! side index from interaction primitives to their owning menu.

pub mod event;
pub mod index;

pub use event::{InteractOutcome, MenuInteraction};
pub use index::InteractionIndex;
