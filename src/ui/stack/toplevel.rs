use crate::core::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use crate::ui::core::geom::{Insets, Pos, Rect};
use crate::ui::core::id::{Id, IdPath};
use crate::ui::core::listeners::{ListenerId, Listeners};
use crate::ui::core::painter::BorderKind;
use crate::ui::core::style::{Color, Mod, Style};
use crate::ui::core::tree::{Node, NodeKind};
use crate::ui::core::widget::Ui;
use crate::ui::menu::MenuBar;
use crate::ui::mouse::ViewMouse;
use crate::ui::view::{EventCx, EventResult, View};
use compact_str::CompactString;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Fill,
    Centered { width: u16, height: u16 },
    At(Rect),
}

/// Raised by `Application::request_stop` before a view stops. Set `cancel` to veto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Closing {
    pub view: Id,
    pub cancel: bool,
}

/// Raised on the container when a child top-level view is ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildClosed {
    pub child: Id,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyPass {
    Hot,
    Normal,
    Cold,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TopLevelStyles {
    pub base: Style,
    pub border: Style,
    pub title: Style,
}

impl Default for TopLevelStyles {
    fn default() -> Self {
        let base = Style::colors(Color::Indexed(7), Color::Indexed(4));
        Self {
            base,
            border: base,
            title: base.add_mod(Mod::BOLD),
        }
    }
}

struct Child {
    id: Id,
    /// Relative to the content area.
    frame: Rect,
    view: Box<dyn View>,
}

type InitHook = Box<dyn FnOnce(&mut TopLevel)>;

/// A stacked window: optional border and title, an optional menu bar and child views.
pub struct TopLevel {
    id: Option<Id>,
    title: CompactString,
    placement: Placement,
    frame: Rect,
    content: Rect,
    modal: bool,
    visible: bool,
    running: bool,
    container: bool,
    bordered: bool,
    initialized: bool,
    styles: TopLevelStyles,
    children: Vec<Child>,
    focused: Option<usize>,
    next_child: u64,
    menu_bar: Option<MenuBar>,
    init_hooks: Vec<InitHook>,
    closing: Listeners<Closing>,
    child_closed: Listeners<ChildClosed>,
}

impl fmt::Debug for TopLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopLevel")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("frame", &self.frame)
            .field("modal", &self.modal)
            .field("visible", &self.visible)
            .field("running", &self.running)
            .field("container", &self.container)
            .field("children", &self.children.len())
            .field("menu_bar", &self.menu_bar)
            .finish()
    }
}

impl TopLevel {
    pub fn new(title: impl Into<CompactString>) -> Self {
        Self {
            id: None,
            title: title.into(),
            placement: Placement::Fill,
            frame: Rect::default(),
            content: Rect::default(),
            modal: false,
            visible: true,
            running: false,
            container: false,
            bordered: false,
            initialized: false,
            styles: TopLevelStyles::default(),
            children: Vec::new(),
            focused: None,
            next_child: 0,
            menu_bar: None,
            init_hooks: Vec::new(),
            closing: Listeners::new(),
            child_closed: Listeners::new(),
        }
    }

    /// A bordered, centered modal dialog.
    pub fn dialog(title: impl Into<CompactString>, width: u16, height: u16) -> Self {
        Self::new(title)
            .modal(true)
            .bordered(true)
            .placement(Placement::Centered { width, height })
    }

    pub fn with_id(mut self, id: Id) -> Self {
        self.id = Some(id);
        self
    }

    pub fn modal(mut self, modal: bool) -> Self {
        self.modal = modal;
        self
    }

    pub fn container(mut self, container: bool) -> Self {
        self.container = container;
        self
    }

    pub fn bordered(mut self, bordered: bool) -> Self {
        self.bordered = bordered;
        self
    }

    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_styles(mut self, styles: TopLevelStyles) -> Self {
        self.styles = styles;
        self
    }

    pub fn with_menu_bar(mut self, bar: MenuBar) -> Self {
        self.menu_bar = Some(bar);
        self
    }

    pub fn with_child(mut self, view: impl View + 'static, frame: Rect) -> Self {
        self.add(view, frame);
        self
    }

    /// Runs once, when the view is first begun.
    pub fn on_init(mut self, f: impl FnOnce(&mut TopLevel) + 'static) -> Self {
        self.init_hooks.push(Box::new(f));
        self
    }

    pub fn on_closing(&mut self, f: impl FnMut(&mut Closing) + 'static) -> ListenerId {
        self.closing.subscribe(f)
    }

    pub fn closing_listeners(&mut self) -> &mut Listeners<Closing> {
        &mut self.closing
    }

    pub fn on_child_closed(&mut self, f: impl FnMut(&mut ChildClosed) + 'static) -> ListenerId {
        self.child_closed.subscribe(f)
    }

    pub fn child_closed_listeners(&mut self) -> &mut Listeners<ChildClosed> {
        &mut self.child_closed
    }

    pub fn id(&self) -> Option<Id> {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<CompactString>) {
        self.title = title.into();
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn content_area(&self) -> Rect {
        self.content
    }

    pub fn is_modal(&self) -> bool {
        self.modal
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_container(&self) -> bool {
        self.container
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn menu_bar(&self) -> Option<&MenuBar> {
        self.menu_bar.as_ref()
    }

    pub fn menu_bar_mut(&mut self) -> Option<&mut MenuBar> {
        self.menu_bar.as_mut()
    }

    /// Adds a child view at `frame`, relative to the content area.
    pub fn add(&mut self, view: impl View + 'static, frame: Rect) -> Id {
        self.add_boxed(Box::new(view), frame)
    }

    pub fn add_boxed(&mut self, view: Box<dyn View>, frame: Rect) -> Id {
        let id = self.child_id(self.next_child);
        self.next_child += 1;
        let focusable = view.focusable();
        self.children.push(Child { id, frame, view });
        if self.focused.is_none() && focusable {
            self.set_focus(Some(self.children.len() - 1));
        }
        id
    }

    pub fn remove(&mut self, id: Id) -> Option<Box<dyn View>> {
        let idx = self.children.iter().position(|c| c.id == id)?;
        if self.focused == Some(idx) {
            self.set_focus(None);
        }
        let child = self.children.remove(idx);
        if let Some(focused) = self.focused {
            if focused > idx {
                self.focused = Some(focused - 1);
            }
        }
        if self.focused.is_none() {
            self.focus_step(true);
        }
        Some(child.view)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn child_ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.children.iter().map(|c| c.id)
    }

    pub fn focused_child(&self) -> Option<Id> {
        self.focused
            .and_then(|idx| self.children.get(idx))
            .map(|c| c.id)
    }

    pub fn focus(&mut self, id: Id) -> bool {
        match self.children.iter().position(|c| c.id == id) {
            Some(idx) if self.children[idx].view.focusable() => {
                self.set_focus(Some(idx));
                true
            }
            _ => false,
        }
    }

    fn set_focus(&mut self, idx: Option<usize>) {
        if self.focused == idx {
            return;
        }
        if let Some(child) = self.focused.and_then(|i| self.children.get_mut(i)) {
            child.view.on_blur();
        }
        self.focused = idx;
        if let Some(child) = idx.and_then(|i| self.children.get_mut(i)) {
            child.view.on_focus();
        }
    }

    fn focus_step(&mut self, forward: bool) -> bool {
        let len = self.children.len();
        if len == 0 {
            return false;
        }
        let start = self.focused.unwrap_or(if forward { len - 1 } else { 0 });
        for offset in 1..=len {
            let idx = if forward {
                (start + offset) % len
            } else {
                (start + len - offset % len) % len
            };
            if self.children[idx].view.focusable() {
                let changed = self.focused != Some(idx);
                self.set_focus(Some(idx));
                return changed;
            }
        }
        false
    }

    fn child_id(&self, n: u64) -> Id {
        let base = match self.id {
            Some(id) => IdPath::from_id(id),
            None => IdPath::root("toplevel"),
        };
        base.push_str("child").push_u64(n).finish()
    }

    pub(crate) fn assign_id(&mut self, id: Id) {
        self.id = Some(id);
        // Child ids derive from the owner; re-derive those added before the id was known.
        for n in 0..self.children.len() {
            let child_id = self.child_id(n as u64);
            self.children[n].id = child_id;
        }
        if let Some(bar) = &mut self.menu_bar {
            bar.bind(id);
        }
    }

    pub(crate) fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub(crate) fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        for hook in std::mem::take(&mut self.init_hooks) {
            hook(self);
        }
    }

    pub(crate) fn layout(&mut self, screen: Rect) {
        self.frame = match self.placement {
            Placement::Fill => screen,
            Placement::Centered { width, height } => screen.centered(width, height),
            Placement::At(rect) => rect.intersect(screen),
        };
        let inner = if self.bordered {
            self.frame.inset(Insets::all(1))
        } else {
            self.frame
        };
        let (bar_row, content) = if self.menu_bar.is_some() {
            inner.split_top(1)
        } else {
            (Rect::default(), inner)
        };
        self.content = content;
        if let Some(bar) = &mut self.menu_bar {
            bar.layout(bar_row, screen);
        }
    }

    pub(crate) fn owns(&self, id: Id) -> bool {
        self.id == Some(id)
            || self.children.iter().any(|c| c.id == id)
            || self.menu_bar.as_ref().is_some_and(|b| b.owns(id))
    }

    /// Absolute frame of the view itself or one of its parts.
    pub(crate) fn part_frame(&self, id: Id) -> Option<Rect> {
        if self.id == Some(id) {
            return Some(self.frame);
        }
        if let Some(child) = self.children.iter().find(|c| c.id == id) {
            return Some(self.content.child(child.frame));
        }
        self.menu_bar.as_ref().and_then(|b| b.part_frame(id))
    }

    pub(crate) fn emit_closing(&mut self) -> bool {
        let mut args = Closing {
            view: self.id.unwrap_or(Id::raw(0)),
            cancel: false,
        };
        self.closing.emit(&mut args);
        args.cancel
    }

    pub(crate) fn notify_child_closed(&mut self, child: Id) {
        self.child_closed.emit(&mut ChildClosed { child });
    }

    pub(crate) fn dispatch_key(
        &mut self,
        pass: KeyPass,
        key: &KeyEvent,
        cx: &mut EventCx,
    ) -> EventResult {
        match pass {
            KeyPass::Hot => {
                if let Some(bar) = &mut self.menu_bar {
                    if bar.handle_hot_key(key, cx).is_consumed() {
                        return EventResult::Consumed;
                    }
                    if bar.is_active() {
                        return EventResult::Ignored;
                    }
                }
                for child in &mut self.children {
                    if child.view.handle_hot_key(key, cx).is_consumed() {
                        return EventResult::Consumed;
                    }
                }
                EventResult::Ignored
            }
            KeyPass::Normal => {
                if let Some(bar) = self.menu_bar.as_mut().filter(|b| b.is_active()) {
                    if bar.handle_key(key, cx).is_consumed() {
                        return EventResult::Consumed;
                    }
                }
                if let Some(child) = self.focused.and_then(|i| self.children.get_mut(i)) {
                    if child.view.handle_key(key, cx).is_consumed() {
                        return EventResult::Consumed;
                    }
                }
                let cycled = match key.code {
                    KeyCode::Tab => self.focus_step(true),
                    KeyCode::BackTab => self.focus_step(false),
                    _ => return EventResult::Ignored,
                };
                if cycled {
                    cx.redraw();
                }
                cycled.into()
            }
            KeyPass::Cold => {
                for child in &mut self.children {
                    if child.view.handle_cold_key(key, cx).is_consumed() {
                        return EventResult::Consumed;
                    }
                }
                EventResult::Ignored
            }
        }
    }

    /// Delivers a mouse event to the part `target` (the view itself, a child, the menu bar or
    /// one of its popups).
    pub(crate) fn dispatch_mouse(
        &mut self,
        target: Id,
        event: &MouseEvent,
        cx: &mut EventCx,
    ) -> EventResult {
        if let Some(bar) = self.menu_bar.as_mut().filter(|b| b.owns(target)) {
            let frame = bar.part_frame(target).unwrap_or_default();
            return bar.handle_mouse(&ViewMouse::from_event(event, frame), cx);
        }
        let content = self.content;
        if let Some(idx) = self.children.iter().position(|c| c.id == target) {
            if event.kind == MouseEventKind::Down(MouseButton::Left)
                && self.children[idx].view.focusable()
                && self.focused != Some(idx)
            {
                self.set_focus(Some(idx));
                cx.redraw();
            }
            let child = &mut self.children[idx];
            let frame = content.child(child.frame);
            return child
                .view
                .handle_mouse(&ViewMouse::from_event(event, frame), cx);
        }
        // The background swallows clicks so they do not fall through to views beneath.
        if self.id == Some(target) {
            return EventResult::Consumed;
        }
        EventResult::Ignored
    }

    pub(crate) fn mouse_leave(&mut self, target: Id) {
        if let Some(child) = self.children.iter_mut().find(|c| c.id == target) {
            child.view.on_mouse_leave();
        }
    }

    pub(crate) fn cursor(&self) -> Option<Pos> {
        let child = self.focused.and_then(|i| self.children.get(i))?;
        let frame = self.content.child(child.frame);
        let rel = child.view.cursor_position()?;
        let pos = Pos::new(frame.x.saturating_add(rel.x), frame.y.saturating_add(rel.y));
        frame.contains(pos).then_some(pos)
    }

    pub(crate) fn paint(&mut self, ui: &mut Ui) {
        let Some(id) = self.id else {
            return;
        };
        let frame = self.frame;
        ui.painter.fill_rect(frame, self.styles.base);
        ui.push_node(Node::new(id, id, frame, ui.layer, NodeKind::TopLevel));
        if self.bordered {
            let kind = if self.modal {
                BorderKind::Double
            } else {
                BorderKind::Plain
            };
            ui.painter.border(frame, self.styles.border, kind);
            if !self.title.is_empty() && frame.w > 4 {
                let title = format!(" {} ", self.title);
                let clip = Rect::new(frame.x + 1, frame.y, frame.w - 2, 1);
                ui.painter
                    .text_clipped(Pos::new(frame.x + 2, frame.y), title, self.styles.title, clip);
            }
        }

        let content = self.content;
        let child_layer = ui.layer.saturating_add(1);
        for child in &mut self.children {
            let area = content.child(child.frame);
            if area.is_empty() {
                continue;
            }
            child.view.render(ui.painter, area);
            ui.push_node(Node::new(child.id, id, area, child_layer, NodeKind::Child));
        }

        if let Some(bar) = &self.menu_bar {
            bar.paint(ui, id);
        }
    }

    pub(crate) fn paint_popups(&self, ui: &mut Ui) {
        if let (Some(id), Some(bar)) = (self.id, &self.menu_bar) {
            bar.paint_popups(ui, id);
        }
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/stack/toplevel.rs"]
mod tests;
