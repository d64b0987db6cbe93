//! Side index from interaction primitive to owning menu.

use crate::menu::{Menu, MenuId};
use holomenu_core::PrimitiveId;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, Weak};

/// Maps interaction primitive ids to the menu owning the element.
///
/// Entries hold a weak reference, so a dropped menu is detected on lookup.
#[derive(Debug, Default)]
pub struct InteractionIndex {
    entries: RwLock<HashMap<PrimitiveId, (MenuId, Weak<Menu>)>>,
}

impl InteractionIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `id` to the menu `owner`.
    pub fn insert(&self, id: PrimitiveId, owner: MenuId, menu: Weak<Menu>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, (owner, menu));
    }

    /// Stop routing `id`.
    pub fn remove(&self, id: PrimitiveId) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }

    /// Stop routing every id that belongs to `menu`.
    pub fn remove_menu(&self, menu: MenuId) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|_, (owner, _)| *owner != menu);
    }

    /// Menu owning `id`, if it is still alive. Dead entries are dropped.
    pub fn lookup(&self, id: PrimitiveId) -> Option<Arc<Menu>> {
        let found = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .map(|(_, menu)| menu.upgrade());

        match found {
            Some(Some(menu)) => Some(menu),
            Some(None) => {
                self.remove(id);
                None
            }
            None => None,
        }
    }

    /// Number of routed ids.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing is routed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
