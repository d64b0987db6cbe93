//! Menu manager: tracks open menus and routes host interaction events.

use crate::builder::MenuBuilder;
use crate::host::Host;
use crate::interaction::{InteractOutcome, InteractionIndex};
use crate::menu::{Menu, MenuId};
use crate::settings::MenuSettings;
use holomenu_core::{ActorId, PrimitiveId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

/// Registry of open menus and the entry point for host interaction events.
pub struct MenuManager {
    host: Host,
    settings: MenuSettings,
    index: Arc<InteractionIndex>,
    menus: RwLock<HashMap<MenuId, Arc<Menu>>>,
}

impl MenuManager {
    /// Create a manager using default menu settings.
    pub fn new(host: Host) -> Self {
        Self::with_settings(host, MenuSettings::default())
    }

    /// Create a manager whose menus start from `settings`.
    pub fn with_settings(host: Host, settings: MenuSettings) -> Self {
        Self {
            host,
            settings,
            index: Arc::new(InteractionIndex::new()),
            menus: RwLock::new(HashMap::new()),
        }
    }

    /// Builder preset with this manager's host, settings and index.
    pub fn builder(&self) -> MenuBuilder {
        MenuBuilder::new(self.host.clone())
            .settings(self.settings.clone())
            .index(self.index.clone())
    }

    /// Build a menu and start tracking it.
    pub fn open(&self, builder: MenuBuilder) -> Result<Arc<Menu>, crate::MenuError> {
        let menu = builder.index(self.index.clone()).build()?;
        let mut menus = self.menus.write().unwrap_or_else(PoisonError::into_inner);
        menus.retain(|_, open| !open.is_cleaned());
        menus.insert(menu.id(), menu.clone());
        Ok(menu)
    }

    /// Host interaction event: `actor` hit interaction primitive `primitive`.
    ///
    /// Unknown or stale ids are expected and yield `None`.
    pub fn handle_interaction(
        &self,
        primitive: PrimitiveId,
        actor: ActorId,
    ) -> Option<InteractOutcome> {
        let Some(menu) = self.index.lookup(primitive) else {
            debug!(%primitive, %actor, "interaction on unrouted primitive");
            return None;
        };
        if menu.is_cleaned() {
            self.index.remove_menu(menu.id());
            self.menus
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&menu.id());
            return None;
        }
        menu.dispatch(primitive, actor)
    }

    /// Tracked menu by id.
    pub fn menu(&self, id: MenuId) -> Option<Arc<Menu>> {
        self.menus
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// All tracked menus.
    pub fn menus(&self) -> Vec<Arc<Menu>> {
        self.menus
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    /// Number of tracked menus. Cleaned ones count until the next prune.
    pub fn menu_count(&self) -> usize {
        self.menus
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Stop tracking cleaned menus. Returns how many were dropped.
    pub fn prune(&self) -> usize {
        let mut menus = self.menus.write().unwrap_or_else(PoisonError::into_inner);
        let before = menus.len();
        menus.retain(|_, menu| !menu.is_cleaned());
        let pruned = before - menus.len();
        if pruned > 0 {
            debug!(pruned, "pruned cleaned menus");
        }
        pruned
    }

    /// Clean up and forget every menu.
    pub fn cleanup_all(&self) {
        let menus: Vec<Arc<Menu>> = self
            .menus
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .drain()
            .map(|(_, menu)| menu)
            .collect();
        let count = menus.len();
        for menu in menus {
            menu.cleanup();
        }
        info!(count, "cleaned up all menus");
    }

    /// Interaction index shared by this manager's menus.
    pub fn index(&self) -> &Arc<InteractionIndex> {
        &self.index
    }

    /// Collaborators handed to new menus.
    pub fn host(&self) -> &Host {
        &self.host
    }
}
