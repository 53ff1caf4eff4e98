//! The menu bar state machine.
//!
//! The bar is `Closed`, `BarFocused` (titles highlighted, no popup) or `PopupOpen { depth }`
//! with a cascade of `depth` popups. Every transition that shows or hides a popup goes through
//! [`MenuBar::open_menu`], [`MenuBar::open_submenu`], [`MenuBar::close_innermost`] or
//! [`MenuBar::close_all`], which raise the notifications in [`MenuEvents`].
//!
//! Commands never run inside a handler: selecting one closes the menus and schedules the action
//! through the [`EventCx`].

use crate::core::event::{Key, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEventKind};
use crate::settings::MenuSettings;
use crate::ui::core::geom::{Pos, Rect};
use crate::ui::core::id::{Id, IdPath};
use crate::ui::core::widget::{Ui, Widget};
use crate::ui::menu::events::{MenuAllClosed, MenuClosing, MenuEvents, MenuOpened, MenuOpening};
use crate::ui::menu::hotkey::hotkey_matches;
use crate::ui::menu::model::{MenuKey, MenuTree};
use crate::ui::menu::popup::{Popup, PopupRow};
use crate::ui::mouse::ViewMouse;
use crate::ui::view::{EventCx, EventResult};
use crate::ui::widgets::menu::{popup_size, MenuBarWidget, MenuStyles, PopupWidget};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Closed,
    BarFocused,
    PopupOpen { depth: usize },
}

pub const DEFAULT_ACTIVATION_KEY: Key = Key::simple(KeyCode::F(9));

/// Behaviour switches. `single_frame_submenus` and `up_down_as_left_right` exclude each other:
/// enabling one turns the other off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuOptions {
    single_frame_submenus: bool,
    up_down_as_left_right: bool,
    activation_key: Key,
}

impl Default for MenuOptions {
    fn default() -> Self {
        Self {
            single_frame_submenus: false,
            up_down_as_left_right: false,
            activation_key: DEFAULT_ACTIVATION_KEY,
        }
    }
}

impl MenuOptions {
    pub fn from_settings(settings: &MenuSettings) -> Self {
        let mut options = Self::default();
        options.set_up_down_as_left_right(settings.up_down_as_left_right);
        // Applied last so it wins when both are set.
        options.set_single_frame_submenus(settings.single_frame_submenus);
        match crate::settings::parse_keybinding(&settings.activation_key) {
            Some(key) => options.activation_key = key,
            None => tracing::warn!(
                value = %settings.activation_key,
                "invalid menu activation key, using {}",
                DEFAULT_ACTIVATION_KEY
            ),
        }
        options
    }

    pub fn single_frame_submenus(&self) -> bool {
        self.single_frame_submenus
    }

    pub fn up_down_as_left_right(&self) -> bool {
        self.up_down_as_left_right
    }

    pub fn activation_key(&self) -> Key {
        self.activation_key
    }

    pub fn set_single_frame_submenus(&mut self, on: bool) {
        self.single_frame_submenus = on;
        if on {
            self.up_down_as_left_right = false;
        }
    }

    pub fn set_up_down_as_left_right(&mut self, on: bool) {
        self.up_down_as_left_right = on;
        if on {
            self.single_frame_submenus = false;
        }
    }

    pub fn set_activation_key(&mut self, key: Key) {
        self.activation_key = key;
    }
}

pub struct MenuBar {
    id: Id,
    tree: MenuTree,
    events: MenuEvents,
    options: MenuOptions,
    styles: MenuStyles,
    focused: bool,
    selected: Option<usize>,
    popups: Vec<Popup>,
    frame: Rect,
    screen: Rect,
    /// `(x, width)` of each bar title on screen.
    spans: Vec<(u16, u16)>,
}

impl std::fmt::Debug for MenuBar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuBar")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("selected", &self.selected)
            .field("options", &self.options)
            .finish()
    }
}

impl MenuBar {
    pub fn new(tree: MenuTree) -> Self {
        Self {
            id: Id::named("menubar"),
            tree,
            events: MenuEvents::default(),
            options: MenuOptions::default(),
            styles: MenuStyles::default(),
            focused: false,
            selected: None,
            popups: Vec::new(),
            frame: Rect::default(),
            screen: Rect::default(),
            spans: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: MenuOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_styles(mut self, styles: MenuStyles) -> Self {
        self.styles = styles;
        self
    }

    /// Derives the bar's id (and so its popups' ids) from the owning top-level view.
    pub(crate) fn bind(&mut self, owner: Id) {
        self.id = IdPath::root("menubar").push_u64(owner.0).finish();
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn tree(&self) -> &MenuTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut MenuTree {
        &mut self.tree
    }

    pub fn events_mut(&mut self) -> &mut MenuEvents {
        &mut self.events
    }

    pub fn options(&self) -> MenuOptions {
        self.options
    }

    pub fn options_mut(&mut self) -> &mut MenuOptions {
        &mut self.options
    }

    pub fn styles(&self) -> &MenuStyles {
        &self.styles
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn spans(&self) -> &[(u16, u16)] {
        &self.spans
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn popups(&self) -> &[Popup] {
        &self.popups
    }

    pub fn state(&self) -> MenuState {
        if !self.popups.is_empty() {
            MenuState::PopupOpen {
                depth: self.popups.len(),
            }
        } else if self.focused {
            MenuState::BarFocused
        } else {
            MenuState::Closed
        }
    }

    pub fn is_active(&self) -> bool {
        self.state() != MenuState::Closed
    }

    pub fn owns(&self, id: Id) -> bool {
        id == self.id || self.popups.iter().any(|p| p.id() == id)
    }

    pub fn part_frame(&self, id: Id) -> Option<Rect> {
        if id == self.id {
            return Some(self.frame);
        }
        self.popups.iter().find(|p| p.id() == id).map(Popup::rect)
    }

    fn popup_id(&self, depth: usize) -> Id {
        IdPath::from_id(self.id)
            .push_str("popup")
            .push_u64(depth as u64)
            .finish()
    }

    pub fn layout(&mut self, frame: Rect, screen: Rect) {
        self.frame = frame;
        self.screen = screen;
        self.spans.clear();
        let mut x = frame.x.saturating_add(1);
        for &key in self.tree.bar() {
            let w = self.tree.title(key).map_or(0, |t| t.width()) as u16 + 2;
            self.spans.push((x, w));
            x = x.saturating_add(w).saturating_add(1);
        }
        for idx in 0..self.popups.len() {
            self.place_popup(idx);
        }
    }

    fn place_popup(&mut self, idx: usize) {
        let (w, h) = popup_size(&self.tree, &self.popups[idx]);
        let anchor = if idx == 0 {
            let x = self
                .selected
                .and_then(|i| self.spans.get(i))
                .map_or(self.frame.x, |(x, _)| *x);
            Pos::new(x, self.frame.y.saturating_add(1))
        } else if self.options.single_frame_submenus {
            self.popups[0].rect().origin()
        } else {
            let parent = &self.popups[idx - 1];
            let row = parent.current().unwrap_or(0) as u16;
            Pos::new(parent.rect().right(), parent.rect().y.saturating_add(row))
        };
        let rect = self.screen.clamp_box(anchor, w, h);
        self.popups[idx].set_rect(rect);
    }

    /// Highlights bar entry `index` without opening it.
    fn focus(&mut self, index: usize, cx: &mut EventCx) {
        let was_focused = self.focused;
        self.focused = true;
        self.selected = Some(index);
        if self.popups.is_empty() && !was_focused {
            cx.grab_mouse(self.id);
        }
        cx.redraw();
    }

    /// Opens the popup of bar entry `index`, closing any other open menu first. A bar command
    /// runs instead. Returns `false` when the entry is disabled or a listener vetoed.
    pub fn open_menu(&mut self, index: usize, cx: &mut EventCx) -> bool {
        let Some(&key) = self.tree.bar().get(index) else {
            return false;
        };
        if !self.tree.is_enabled(key) {
            return false;
        }
        if let Some(first) = self.popups.first() {
            if first.group() == key {
                return true;
            }
            if !self.close_popups(true, cx) {
                return false;
            }
        }
        if self.tree.is_bar_command(key) {
            self.selected = Some(index);
            self.run_command(key, cx);
            return true;
        }

        let mut opening = MenuOpening {
            group: key,
            replacement: None,
            cancel: false,
        };
        self.events.opening.emit(&mut opening);
        if opening.cancel {
            tracing::debug!(index, "menu opening vetoed");
            return false;
        }
        let key = match opening
            .replacement
            .and_then(|group| self.tree.replace_group(key, group))
        {
            Some(new_key) => {
                // The replacement may have a different title width.
                self.layout(self.frame, self.screen);
                new_key
            }
            None => key,
        };
        if self.tree.is_bar_command(key) {
            self.selected = Some(index);
            self.run_command(key, cx);
            return true;
        }

        self.focused = true;
        self.selected = Some(index);
        self.push_popup(key, None, cx);
        true
    }

    /// Opens the submenu under the innermost popup's highlight.
    pub fn open_submenu(&mut self, cx: &mut EventCx) -> bool {
        let Some(key) = self.popups.last().and_then(Popup::current_key) else {
            return false;
        };
        if !self.tree.is_submenu(key) || !self.tree.is_enabled(key) {
            return false;
        }
        self.open_child(key, cx)
    }

    fn open_child(&mut self, key: MenuKey, cx: &mut EventCx) -> bool {
        if self.popups.iter().any(|p| p.group() == key) {
            return true;
        }
        let parent = self.tree.parent(key);
        self.push_popup(key, parent, cx);
        true
    }

    fn push_popup(&mut self, group: MenuKey, parent: Option<MenuKey>, cx: &mut EventCx) {
        let depth = self.popups.len() + 1;
        let with_back = self.options.single_frame_submenus && depth > 1;
        let popup = Popup::new(self.popup_id(depth), group, depth, with_back, &self.tree);
        let popup_id = popup.id();
        self.popups.push(popup);
        self.place_popup(depth - 1);

        tracing::debug!(depth, "menu popup opened");
        let mut opened = MenuOpened {
            parent,
            group,
            depth,
        };
        self.events.opened.emit(&mut opened);
        cx.grab_mouse(popup_id);
        cx.redraw();
    }

    /// Closes the innermost popup unless a `MenuClosing` listener vetoes.
    pub fn close_innermost(&mut self, reopen: bool, cx: &mut EventCx) -> bool {
        let Some(popup) = self.popups.last() else {
            return false;
        };
        let mut closing = MenuClosing {
            group: popup.group(),
            reopen,
            is_submenu: popup.depth() > 1,
            cancel: false,
        };
        self.events.closing.emit(&mut closing);
        if closing.cancel {
            tracing::debug!(depth = self.popups.len(), "menu closing vetoed");
            return false;
        }
        let Some(popup) = self.popups.pop() else {
            return false;
        };
        cx.release_mouse(popup.id());
        match self.popups.last() {
            Some(parent) => cx.grab_mouse(parent.id()),
            None => cx.grab_mouse(self.id),
        }
        tracing::debug!(depth = popup.depth(), "menu popup closed");
        cx.redraw();
        true
    }

    fn close_popups(&mut self, reopen: bool, cx: &mut EventCx) -> bool {
        while !self.popups.is_empty() {
            if !self.close_innermost(reopen, cx) {
                return false;
            }
        }
        true
    }

    fn close_to_depth(&mut self, depth: usize, cx: &mut EventCx) -> bool {
        while self.popups.len() > depth {
            if !self.close_innermost(false, cx) {
                return false;
            }
        }
        true
    }

    /// Closes every popup and unfocuses the bar. Returns `false` if a popup vetoed closing.
    pub fn close_all(&mut self, cx: &mut EventCx) -> bool {
        if !self.close_popups(false, cx) {
            return false;
        }
        let was_active = self.focused;
        self.focused = false;
        self.selected = None;
        cx.release_mouse(self.id);
        if was_active {
            self.events.all_closed.emit(&mut MenuAllClosed);
            cx.redraw();
        }
        true
    }

    fn run_command(&mut self, key: MenuKey, cx: &mut EventCx) {
        let action = self.tree.entry(key).and_then(|e| e.action().cloned());
        tracing::debug!(
            title = self.tree.entry(key).map_or("", |e| e.title()),
            "menu command selected"
        );
        self.close_all(cx);
        if let Some(action) = action {
            cx.schedule(move |app| action(app));
        }
    }

    fn activate_node(&mut self, key: MenuKey, cx: &mut EventCx) -> bool {
        if !self.tree.is_enabled(key) {
            return false;
        }
        if self.tree.is_submenu(key) {
            self.open_child(key, cx)
        } else {
            self.run_command(key, cx);
            true
        }
    }

    /// Activates the innermost popup's highlighted row.
    pub fn activate_current(&mut self, cx: &mut EventCx) -> bool {
        match self.popups.last().and_then(Popup::current_row) {
            Some(PopupRow::Back) => self.close_innermost(false, cx),
            Some(PopupRow::Node(key)) => self.activate_node(key, cx),
            None => false,
        }
    }

    pub fn move_down(&mut self, cx: &mut EventCx) -> bool {
        self.move_highlight(true, cx)
    }

    pub fn move_up(&mut self, cx: &mut EventCx) -> bool {
        self.move_highlight(false, cx)
    }

    fn move_highlight(&mut self, forward: bool, cx: &mut EventCx) -> bool {
        let Some(popup) = self.popups.last_mut() else {
            return false;
        };
        let moved = if forward {
            popup.move_down(&self.tree)
        } else {
            popup.move_up(&self.tree)
        };
        let landed = popup.current_key();
        if !moved {
            return false;
        }
        cx.redraw();
        if self.options.up_down_as_left_right {
            if let Some(key) = landed {
                if self.tree.is_submenu(key) && self.tree.is_enabled(key) {
                    self.open_child(key, cx);
                }
            }
        }
        true
    }

    fn bar_hotkey_matches(&self, ch: char) -> Vec<usize> {
        self.tree
            .bar()
            .iter()
            .enumerate()
            .filter(|(_, key)| self.tree.is_enabled(**key) && hotkey_matches(self.tree.hotkey(**key), ch))
            .map(|(idx, _)| idx)
            .collect()
    }

    fn step_bar(&self, from: Option<usize>, forward: bool) -> Option<usize> {
        let len = self.tree.bar().len();
        if len == 0 {
            return None;
        }
        let start = from.unwrap_or(if forward { len - 1 } else { 0 });
        (1..=len)
            .map(|offset| {
                if forward {
                    (start + offset) % len
                } else {
                    (start + len - offset % len) % len
                }
            })
            .find(|&idx| self.tree.is_enabled(self.tree.bar()[idx]))
    }

    /// Moves to the neighbouring bar menu, opening it if it has a popup.
    fn switch_menu(&mut self, forward: bool, cx: &mut EventCx) -> bool {
        let Some(next) = self.step_bar(self.selected, forward) else {
            return false;
        };
        if Some(next) == self.selected {
            return false;
        }
        if !self.close_popups(true, cx) {
            return false;
        }
        let key = self.tree.bar()[next];
        if self.tree.is_bar_command(key) {
            self.focus(next, cx);
            true
        } else {
            self.open_menu(next, cx)
        }
    }

    /// The activation key, shortcut chords, then Alt+letter bar hot-keys.
    pub fn handle_hot_key(&mut self, key: &KeyEvent, cx: &mut EventCx) -> EventResult {
        if key.is_release() {
            return EventResult::Ignored;
        }
        if self.options.activation_key.matches(key) {
            if self.is_active() {
                self.close_all(cx);
            } else if let Some(first) = self.step_bar(None, true) {
                if self.tree.is_bar_command(self.tree.bar()[first]) {
                    self.focus(first, cx);
                } else {
                    self.open_menu(first, cx);
                }
            }
            return EventResult::Consumed;
        }

        let chord = Key::from(*key);
        if let Some(target) = self.tree.find_shortcut(chord) {
            self.run_command(target, cx);
            return EventResult::Consumed;
        }

        if let KeyCode::Char(ch) = key.code {
            if key.modifiers.contains(KeyModifiers::ALT)
                && !key.modifiers.contains(KeyModifiers::CONTROL)
            {
                let matches = self.bar_hotkey_matches(ch);
                if let [index] = matches[..] {
                    self.open_menu(index, cx);
                    return EventResult::Consumed;
                }
            }
        }
        EventResult::Ignored
    }

    /// Navigation while the bar is focused or a popup is open.
    pub fn handle_key(&mut self, key: &KeyEvent, cx: &mut EventCx) -> EventResult {
        if key.is_release() {
            return EventResult::Ignored;
        }
        match self.state() {
            MenuState::Closed => EventResult::Ignored,
            MenuState::BarFocused => self.handle_bar_key(key, cx),
            MenuState::PopupOpen { depth } => self.handle_popup_key(key, depth, cx),
        }
    }

    fn handle_bar_key(&mut self, key: &KeyEvent, cx: &mut EventCx) -> EventResult {
        match key.code {
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                if let Some(next) = self.step_bar(self.selected, forward) {
                    self.focus(next, cx);
                }
            }
            KeyCode::Enter | KeyCode::Down => {
                if let Some(index) = self.selected {
                    self.open_menu(index, cx);
                }
            }
            KeyCode::Esc => {
                self.close_all(cx);
            }
            _ => {
                let Some(ch) = key.plain_char() else {
                    return EventResult::Ignored;
                };
                if let [index] = self.bar_hotkey_matches(ch)[..] {
                    self.open_menu(index, cx);
                }
            }
        }
        EventResult::Consumed
    }

    fn handle_popup_key(&mut self, key: &KeyEvent, depth: usize, cx: &mut EventCx) -> EventResult {
        match key.code {
            KeyCode::Up => {
                self.move_up(cx);
            }
            KeyCode::Down => {
                self.move_down(cx);
            }
            KeyCode::Home | KeyCode::End => {
                if let Some(popup) = self.popups.last_mut() {
                    let changed = if key.code == KeyCode::Home {
                        popup.select_first(&self.tree)
                    } else {
                        popup.select_last(&self.tree)
                    };
                    if changed {
                        cx.redraw();
                    }
                }
            }
            KeyCode::Left => {
                if depth > 1 {
                    self.close_innermost(false, cx);
                } else {
                    self.switch_menu(false, cx);
                }
            }
            KeyCode::Right => {
                if !self.open_submenu(cx) && depth == 1 {
                    self.switch_menu(true, cx);
                }
            }
            KeyCode::Enter => {
                self.activate_current(cx);
            }
            KeyCode::Esc => {
                self.close_innermost(false, cx);
            }
            _ => {
                // Keys the popup has no use for still stop here while it is open.
                let Some(ch) = key.plain_char() else {
                    return EventResult::Consumed;
                };
                let Some(popup) = self.popups.last_mut() else {
                    return EventResult::Consumed;
                };
                let matches = popup.hotkey_rows(ch, &self.tree);
                if let Some(&first) = matches.first() {
                    if popup.select(first, &self.tree) {
                        cx.redraw();
                    }
                    if matches.len() == 1 {
                        self.activate_current(cx);
                    }
                }
            }
        }
        EventResult::Consumed
    }

    pub fn handle_mouse(&mut self, event: &ViewMouse, cx: &mut EventCx) -> EventResult {
        let pos = event.screen;
        let hit = if self.options.single_frame_submenus {
            self.popups
                .len()
                .checked_sub(1)
                .filter(|&last| self.popups[last].rect().contains(pos))
        } else {
            self.popups.iter().rposition(|p| p.rect().contains(pos))
        };
        if let Some(index) = hit {
            self.mouse_on_popup(index, pos, event.kind, cx);
            return EventResult::Consumed;
        }
        if self.frame.contains(pos) {
            self.mouse_on_bar(pos, event.kind, cx);
            return EventResult::Consumed;
        }

        let was_active = self.is_active();
        if matches!(event.kind, MouseEventKind::Down(_)) {
            if self.popups.is_empty() {
                self.close_all(cx);
            } else {
                self.close_innermost(false, cx);
            }
        }
        was_active.into()
    }

    fn bar_index_at(&self, x: u16) -> Option<usize> {
        self.spans
            .iter()
            .position(|&(start, w)| x >= start && x < start.saturating_add(w))
    }

    fn mouse_on_bar(&mut self, pos: Pos, kind: MouseEventKind, cx: &mut EventCx) {
        let index = self.bar_index_at(pos.x);
        match kind {
            MouseEventKind::Down(MouseButton::Left) => match index {
                Some(i) if self.selected == Some(i) && !self.popups.is_empty() => {
                    self.close_all(cx);
                }
                Some(i) => {
                    self.open_menu(i, cx);
                }
                None => {
                    self.close_all(cx);
                }
            },
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                if let Some(i) = index {
                    if !self.popups.is_empty() && self.selected != Some(i) {
                        self.open_menu(i, cx);
                    }
                }
            }
            _ => {}
        }
    }

    fn mouse_on_popup(&mut self, index: usize, pos: Pos, kind: MouseEventKind, cx: &mut EventCx) {
        let Some(row) = self.popups[index].row_at(pos) else {
            return;
        };
        if !self.popups[index].is_eligible(row, &self.tree) {
            return;
        }
        match kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                // Hovering the row whose submenu is already open keeps that submenu.
                let open_child = match self.popups[index].rows().get(row) {
                    Some(PopupRow::Node(key)) => {
                        self.popups.get(index + 1).is_some_and(|p| p.group() == *key)
                    }
                    _ => false,
                };
                let keep = if open_child { index + 2 } else { index + 1 };
                if !self.close_to_depth(keep, cx) {
                    return;
                }
                if self.popups[index].select(row, &self.tree) {
                    cx.redraw();
                }
                if !self.options.single_frame_submenus {
                    if let Some(PopupRow::Node(key)) = self.popups[index].current_row() {
                        if self.tree.is_submenu(key) {
                            self.open_child(key, cx);
                        }
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if !self.close_to_depth(index + 1, cx) {
                    return;
                }
                self.popups[index].select(row, &self.tree);
                self.activate_current(cx);
            }
            _ => {}
        }
    }

    pub(crate) fn paint(&self, ui: &mut Ui, owner: Id) {
        MenuBarWidget { bar: self, owner }.ui(ui);
    }

    /// Popups paint after every top-level view so they stay above everything.
    pub(crate) fn paint_popups(&self, ui: &mut Ui, owner: Id) {
        if self.options.single_frame_submenus {
            if let Some(popup) = self.popups.last() {
                PopupWidget {
                    bar: self,
                    popup,
                    owner,
                }
                .ui(ui);
            }
            return;
        }
        for popup in &self.popups {
            PopupWidget {
                bar: self,
                popup,
                owner,
            }
            .ui(ui);
        }
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/menu/bar.rs"]
mod tests;
