//! Menu model: entries for user overrides, decoupled from any toolkit.
//!
//! Entries carry only an opaque [`EntryId`]; what an entry does lives in a
//! side table keyed by that id. A front-end renders [`Menu::items`], calls
//! [`Menu::activate`] on selection and asks [`Menu::checked`] which radio
//! items to show as active.

use std::collections::HashMap;

use crate::actuator::Actuator;
use crate::coordinator::Coordinator;
use crate::state::{DeviceState, Orientation, Posture};

/// Opaque identity of a selectable entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub usize);

/// What selecting an entry does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    SetPosture(Posture),
    SetOrientation(Orientation),
}

/// A rendered menu line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    /// Group heading.
    Separator { label: &'static str },
    /// Radio entry; entries between two separators form one group.
    Radio { id: EntryId, label: &'static str },
}

/// The tray menu: posture entries and tablet orientation entries.
#[derive(Debug, Clone)]
pub struct Menu {
    items: Vec<MenuItem>,
    actions: HashMap<EntryId, MenuAction>,
}

impl Menu {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            actions: HashMap::new(),
        }
    }

    /// "Type" and "Tablet Orientation" groups.
    pub fn standard() -> Self {
        let mut menu = Self::new();
        menu.separator("Type");
        menu.radio("Laptop Mode", MenuAction::SetPosture(Posture::Laptop));
        menu.radio("Tablet Mode", MenuAction::SetPosture(Posture::Tablet));
        menu.separator("Tablet Orientation");
        menu.radio(
            "Windows Button on Bottom",
            MenuAction::SetOrientation(Orientation::Normal),
        );
        menu.radio(
            "Windows Button to the Right",
            MenuAction::SetOrientation(Orientation::Right),
        );
        menu.radio(
            "Windows Button on Top",
            MenuAction::SetOrientation(Orientation::Inverted),
        );
        menu.radio(
            "Windows Button to the Left",
            MenuAction::SetOrientation(Orientation::Left),
        );
        menu
    }

    pub fn separator(&mut self, label: &'static str) {
        self.items.push(MenuItem::Separator { label });
    }

    pub fn radio(&mut self, label: &'static str, action: MenuAction) -> EntryId {
        let id = EntryId(self.actions.len());
        self.items.push(MenuItem::Radio { id, label });
        self.actions.insert(id, action);
        id
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn action(&self, id: EntryId) -> Option<MenuAction> {
        self.actions.get(&id).copied()
    }

    /// First entry bound to `action`.
    pub fn entry_for(&self, action: MenuAction) -> Option<EntryId> {
        self.items.iter().find_map(|item| match item {
            MenuItem::Radio { id, .. } if self.actions.get(id) == Some(&action) => Some(*id),
            _ => None,
        })
    }

    /// Dispatch a selection. Returns whether the state changed.
    pub fn activate<A: Actuator>(&self, id: EntryId, coordinator: &Coordinator<A>) -> bool {
        match self.action(id) {
            Some(MenuAction::SetPosture(p)) => coordinator.set_posture(p),
            Some(MenuAction::SetOrientation(o)) => coordinator.set_orientation(o),
            None => {
                log::debug!("no action bound to entry {:?}", id);
                false
            }
        }
    }

    /// Entries that should render as selected for `state`.
    pub fn checked(&self, state: &DeviceState) -> Vec<EntryId> {
        let mut ids: Vec<EntryId> = self
            .actions
            .iter()
            .filter(|(_, action)| match action {
                MenuAction::SetPosture(p) => *p == state.posture,
                MenuAction::SetOrientation(o) => *o == state.orientation,
            })
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}
