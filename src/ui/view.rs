//! The contract between the application and the views it hosts.
//!
//! Views never hold a reference to the [`Application`]. Handlers record what they want done in an
//! [`EventCx`] and the application applies those effects once routing of the event has finished.

use crate::core::error::Result;
use crate::core::event::KeyEvent;
use crate::ui::core::geom::{Pos, Rect};
use crate::ui::core::id::Id;
use crate::ui::core::painter::Painter;
use crate::ui::mouse::ViewMouse;
use crate::ui::stack::Application;
use std::fmt;

pub trait View {
    fn render(&mut self, painter: &mut Painter, area: Rect);

    /// First pass: offered to every view top to bottom before anyone sees the normal pass.
    fn handle_hot_key(&mut self, _key: &KeyEvent, _cx: &mut EventCx) -> EventResult {
        EventResult::Ignored
    }

    fn handle_key(&mut self, _key: &KeyEvent, _cx: &mut EventCx) -> EventResult {
        EventResult::Ignored
    }

    /// Last pass, for keys nobody wanted.
    fn handle_cold_key(&mut self, _key: &KeyEvent, _cx: &mut EventCx) -> EventResult {
        EventResult::Ignored
    }

    fn handle_mouse(&mut self, _event: &ViewMouse, _cx: &mut EventCx) -> EventResult {
        EventResult::Ignored
    }

    fn on_mouse_leave(&mut self) {}

    fn focusable(&self) -> bool {
        true
    }

    fn on_focus(&mut self) {}

    fn on_blur(&mut self) {}

    /// Cursor position relative to the view's area.
    fn cursor_position(&self) -> Option<Pos> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Consumed,
    Ignored,
}

impl EventResult {
    pub fn is_consumed(&self) -> bool {
        matches!(self, EventResult::Consumed)
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, EventResult::Ignored)
    }
}

impl From<bool> for EventResult {
    fn from(consumed: bool) -> Self {
        if consumed {
            EventResult::Consumed
        } else {
            EventResult::Ignored
        }
    }
}

pub type IdleCallback = Box<dyn FnOnce(&mut Application) -> Result<()>>;

pub enum Effect {
    GrabMouse(Id),
    /// Releases the grab only if `Id` still holds it.
    ReleaseMouse(Id),
    /// `None` targets the current view.
    RequestStop(Option<Id>),
    Idle(IdleCallback),
    Redraw,
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::GrabMouse(id) => f.debug_tuple("GrabMouse").field(id).finish(),
            Effect::ReleaseMouse(id) => f.debug_tuple("ReleaseMouse").field(id).finish(),
            Effect::RequestStop(id) => f.debug_tuple("RequestStop").field(id).finish(),
            Effect::Idle(_) => f.write_str("Idle(..)"),
            Effect::Redraw => f.write_str("Redraw"),
        }
    }
}

#[derive(Debug)]
pub struct EventCx {
    screen: Rect,
    owner: Option<Id>,
    effects: Vec<Effect>,
}

impl EventCx {
    pub fn new(screen: Rect) -> Self {
        Self {
            screen,
            owner: None,
            effects: Vec::new(),
        }
    }

    pub fn screen(&self) -> Rect {
        self.screen
    }

    /// The top-level view the event is being delivered to.
    pub fn owner(&self) -> Option<Id> {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: Option<Id>) {
        self.owner = owner;
    }

    pub fn grab_mouse(&mut self, id: Id) {
        self.effects.push(Effect::GrabMouse(id));
    }

    pub fn release_mouse(&mut self, id: Id) {
        self.effects.push(Effect::ReleaseMouse(id));
    }

    /// Asks the view that received the event to stop.
    pub fn request_stop(&mut self) {
        self.effects.push(Effect::RequestStop(self.owner));
    }

    pub fn request_stop_of(&mut self, id: Option<Id>) {
        self.effects.push(Effect::RequestStop(id));
    }

    /// Queues `f` to run on the loop thread once the current iteration's input is handled.
    pub fn schedule(&mut self, f: impl FnOnce(&mut Application) -> Result<()> + 'static) {
        self.effects.push(Effect::Idle(Box::new(f)));
    }

    pub fn redraw(&mut self) {
        self.effects.push(Effect::Redraw);
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub(crate) fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ui/view.rs"]
mod tests;
