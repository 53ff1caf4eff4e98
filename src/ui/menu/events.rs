//! Notifications raised by the menu bar. Arguments are mutable so subscribers can veto or
//! substitute.

use crate::ui::core::listeners::Listeners;
use crate::ui::menu::model::{MenuGroup, MenuKey};

/// Raised before a top-level menu opens.
#[derive(Debug)]
pub struct MenuOpening {
    pub group: MenuKey,
    /// Set to swap the group's contents before it is shown.
    pub replacement: Option<MenuGroup>,
    pub cancel: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOpened {
    pub parent: Option<MenuKey>,
    pub group: MenuKey,
    pub depth: usize,
}

/// Raised before a popup closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuClosing {
    pub group: MenuKey,
    /// The bar is switching to another menu rather than closing for good.
    pub reopen: bool,
    pub is_submenu: bool,
    pub cancel: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuAllClosed;

#[derive(Debug, Default)]
pub struct MenuEvents {
    pub opening: Listeners<MenuOpening>,
    pub opened: Listeners<MenuOpened>,
    pub closing: Listeners<MenuClosing>,
    pub all_closed: Listeners<MenuAllClosed>,
}
