//! The menu tree.
//!
//! Menus are declared as owned [`MenuGroup`] values and flattened into a [`MenuTree`] arena, so
//! parent links are plain keys instead of back-references.

use crate::core::error::Result;
use crate::core::event::Key;
use crate::ui::menu::hotkey::{parse_title, Title, DEFAULT_HOTKEY_SPECIFIER};
use crate::ui::stack::Application;
use compact_str::CompactString;
use slotmap::SlotMap;
use std::fmt;
use std::rc::Rc;

slotmap::new_key_type! {
    pub struct MenuKey;
}

pub type MenuAction = Rc<dyn Fn(&mut Application) -> Result<()>>;
pub type Predicate = Rc<dyn Fn() -> bool>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckStyle {
    #[default]
    NoCheck,
    Checkbox,
    Radio,
}

#[derive(Clone)]
pub struct MenuEntry {
    title: CompactString,
    help: CompactString,
    shortcut: Option<Key>,
    checked: bool,
    check_style: CheckStyle,
    action: Option<MenuAction>,
    can_execute: Option<Predicate>,
    enabled: bool,
    parent: Option<MenuKey>,
}

impl MenuEntry {
    pub fn new(title: impl Into<CompactString>) -> Self {
        Self {
            title: title.into(),
            help: CompactString::default(),
            shortcut: None,
            checked: false,
            check_style: CheckStyle::NoCheck,
            action: None,
            can_execute: None,
            enabled: true,
            parent: None,
        }
    }

    pub fn help(mut self, help: impl Into<CompactString>) -> Self {
        self.help = help.into();
        self
    }

    pub fn shortcut(mut self, key: Key) -> Self {
        self.shortcut = Some(key.normalized());
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn check_style(mut self, style: CheckStyle) -> Self {
        self.check_style = style;
        self
    }

    pub fn on_action(mut self, f: impl Fn(&mut Application) -> Result<()> + 'static) -> Self {
        self.action = Some(Rc::new(f));
        self
    }

    pub fn can_execute(mut self, f: impl Fn() -> bool + 'static) -> Self {
        self.can_execute = Some(Rc::new(f));
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn help_text(&self) -> &str {
        &self.help
    }

    pub fn shortcut_key(&self) -> Option<Key> {
        self.shortcut
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn style(&self) -> CheckStyle {
        self.check_style
    }

    pub fn action(&self) -> Option<&MenuAction> {
        self.action.as_ref()
    }

    pub fn parent(&self) -> Option<MenuKey> {
        self.parent
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_title(&mut self, title: impl Into<CompactString>) {
        self.title = title.into();
    }

    /// The static flag and the `can_execute` predicate, evaluated now.
    pub fn is_enabled(&self) -> bool {
        self.enabled && self.can_execute.as_ref().map_or(true, |f| f())
    }
}

impl fmt::Debug for MenuEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuEntry")
            .field("title", &self.title)
            .field("shortcut", &self.shortcut)
            .field("checked", &self.checked)
            .field("check_style", &self.check_style)
            .field("has_action", &self.action.is_some())
            .field("enabled", &self.enabled)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum MenuItem {
    Separator,
    Entry(MenuEntry),
    Group(MenuGroup),
}

/// A titled collection of items. At the bar level, a group without items but with an action is a
/// command that runs as soon as it is activated.
#[derive(Debug, Clone)]
pub struct MenuGroup {
    pub entry: MenuEntry,
    pub items: Vec<MenuItem>,
}

impl MenuGroup {
    pub fn new(title: impl Into<CompactString>) -> Self {
        Self {
            entry: MenuEntry::new(title),
            items: Vec::new(),
        }
    }

    pub fn command(entry: MenuEntry) -> Self {
        Self {
            entry,
            items: Vec::new(),
        }
    }

    pub fn help(mut self, help: impl Into<CompactString>) -> Self {
        self.entry = self.entry.help(help);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.entry = self.entry.enabled(enabled);
        self
    }

    pub fn entry(mut self, entry: MenuEntry) -> Self {
        self.items.push(MenuItem::Entry(entry));
        self
    }

    pub fn separator(mut self) -> Self {
        self.items.push(MenuItem::Separator);
        self
    }

    pub fn group(mut self, group: MenuGroup) -> Self {
        self.items.push(MenuItem::Group(group));
        self
    }
}

#[derive(Debug, Clone)]
pub enum MenuNode {
    Separator { parent: Option<MenuKey> },
    Command(MenuEntry),
    Submenu {
        entry: MenuEntry,
        children: Vec<MenuKey>,
    },
}

impl MenuNode {
    pub fn entry(&self) -> Option<&MenuEntry> {
        match self {
            MenuNode::Separator { .. } => None,
            MenuNode::Command(entry) | MenuNode::Submenu { entry, .. } => Some(entry),
        }
    }

    pub fn entry_mut(&mut self) -> Option<&mut MenuEntry> {
        match self {
            MenuNode::Separator { .. } => None,
            MenuNode::Command(entry) | MenuNode::Submenu { entry, .. } => Some(entry),
        }
    }

    pub fn children(&self) -> &[MenuKey] {
        match self {
            MenuNode::Submenu { children, .. } => children,
            _ => &[],
        }
    }

    pub fn parent(&self) -> Option<MenuKey> {
        match self {
            MenuNode::Separator { parent } => *parent,
            MenuNode::Command(entry) | MenuNode::Submenu { entry, .. } => entry.parent,
        }
    }

    pub fn is_separator(&self) -> bool {
        matches!(self, MenuNode::Separator { .. })
    }
}

#[derive(Debug)]
pub struct MenuTree {
    nodes: SlotMap<MenuKey, MenuNode>,
    bar: Vec<MenuKey>,
    specifier: char,
}

impl MenuTree {
    pub fn new(groups: Vec<MenuGroup>) -> Self {
        Self::with_specifier(groups, DEFAULT_HOTKEY_SPECIFIER)
    }

    pub fn with_specifier(groups: Vec<MenuGroup>, specifier: char) -> Self {
        let mut tree = Self {
            nodes: SlotMap::with_key(),
            bar: Vec::with_capacity(groups.len()),
            specifier,
        };
        for group in groups {
            let key = tree.insert_group(group, None);
            tree.bar.push(key);
        }
        tree
    }

    fn insert_group(&mut self, group: MenuGroup, parent: Option<MenuKey>) -> MenuKey {
        let MenuGroup { mut entry, items } = group;
        entry.parent = parent;
        let key = self.nodes.insert(MenuNode::Submenu {
            entry,
            children: Vec::with_capacity(items.len()),
        });
        let children: Vec<MenuKey> = items
            .into_iter()
            .map(|item| self.insert_item(item, key))
            .collect();
        if let Some(MenuNode::Submenu { children: slot, .. }) = self.nodes.get_mut(key) {
            *slot = children;
        }
        key
    }

    fn insert_item(&mut self, item: MenuItem, parent: MenuKey) -> MenuKey {
        match item {
            MenuItem::Separator => self.nodes.insert(MenuNode::Separator {
                parent: Some(parent),
            }),
            MenuItem::Entry(mut entry) => {
                entry.parent = Some(parent);
                self.nodes.insert(MenuNode::Command(entry))
            }
            MenuItem::Group(group) => self.insert_group(group, Some(parent)),
        }
    }

    pub fn specifier(&self) -> char {
        self.specifier
    }

    pub fn bar(&self) -> &[MenuKey] {
        &self.bar
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, key: MenuKey) -> Option<&MenuNode> {
        self.nodes.get(key)
    }

    pub fn entry(&self, key: MenuKey) -> Option<&MenuEntry> {
        self.nodes.get(key).and_then(MenuNode::entry)
    }

    pub fn entry_mut(&mut self, key: MenuKey) -> Option<&mut MenuEntry> {
        self.nodes.get_mut(key).and_then(MenuNode::entry_mut)
    }

    pub fn children(&self, key: MenuKey) -> &[MenuKey] {
        match self.nodes.get(key) {
            Some(node) => node.children(),
            None => &[],
        }
    }

    pub fn parent(&self, key: MenuKey) -> Option<MenuKey> {
        self.nodes.get(key).and_then(MenuNode::parent)
    }

    pub fn title(&self, key: MenuKey) -> Option<Title> {
        self.entry(key)
            .map(|entry| parse_title(entry.title(), self.specifier))
    }

    pub fn hotkey(&self, key: MenuKey) -> Option<char> {
        self.title(key).and_then(|t| t.hotkey())
    }

    /// Separators and unknown keys are never enabled.
    pub fn is_enabled(&self, key: MenuKey) -> bool {
        self.entry(key).is_some_and(MenuEntry::is_enabled)
    }

    /// A group with at least one child; activating it opens a popup.
    pub fn is_submenu(&self, key: MenuKey) -> bool {
        matches!(self.nodes.get(key), Some(MenuNode::Submenu { children, .. }) if !children.is_empty())
    }

    /// A bar-level group with no children but an action.
    pub fn is_bar_command(&self, key: MenuKey) -> bool {
        self.bar.contains(&key)
            && !self.is_submenu(key)
            && self.entry(key).is_some_and(|e| e.action().is_some())
    }

    pub fn depth(&self, key: MenuKey) -> usize {
        let mut depth = 0;
        let mut cur = self.parent(key);
        while let Some(parent) = cur {
            depth += 1;
            cur = self.parent(parent);
        }
        depth
    }

    /// Swaps the bar group at `key` for `group`; returns the new group's key.
    ///
    /// Returns `None` when `key` is not a bar group.
    pub fn replace_group(&mut self, key: MenuKey, group: MenuGroup) -> Option<MenuKey> {
        let index = self.bar.iter().position(|k| *k == key)?;
        self.remove_subtree(key);
        let new_key = self.insert_group(group, None);
        self.bar[index] = new_key;
        Some(new_key)
    }

    fn remove_subtree(&mut self, key: MenuKey) {
        let mut stack = vec![key];
        while let Some(key) = stack.pop() {
            if let Some(node) = self.nodes.remove(key) {
                stack.extend_from_slice(node.children());
            }
        }
    }

    /// The first enabled entry bound to `shortcut`, in bar order, depth first.
    pub fn find_shortcut(&self, shortcut: Key) -> Option<MenuKey> {
        let mut stack: Vec<MenuKey> = self.bar.iter().rev().copied().collect();
        while let Some(key) = stack.pop() {
            let Some(node) = self.nodes.get(key) else {
                continue;
            };
            if let Some(entry) = node.entry() {
                if entry.shortcut == Some(shortcut)
                    && entry.action.is_some()
                    && entry.is_enabled()
                {
                    return Some(key);
                }
            }
            stack.extend(node.children().iter().rev().copied());
        }
        None
    }

    pub fn set_checked(&mut self, key: MenuKey, checked: bool) -> bool {
        match self.entry_mut(key) {
            Some(entry) => {
                entry.checked = checked;
                true
            }
            None => false,
        }
    }

    /// Checks `key` and unchecks its radio-style siblings.
    pub fn check_radio(&mut self, key: MenuKey) -> bool {
        let Some(parent) = self.parent(key) else {
            return self.set_checked(key, true);
        };
        let siblings = self.children(parent).to_vec();
        for sibling in siblings {
            if let Some(entry) = self.entry_mut(sibling) {
                if sibling == key {
                    entry.checked = true;
                } else if entry.check_style == CheckStyle::Radio {
                    entry.checked = false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/menu/model.rs"]
mod tests;
