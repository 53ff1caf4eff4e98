//! Mouse capture and per-view coordinate translation.

use crate::core::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use crate::ui::core::geom::{Pos, Rect};
use crate::ui::core::id::Id;

/// A mouse event as a view sees it: coordinates relative to the view's frame.
///
/// Local coordinates are signed because a view holding the grab still receives events that fall
/// left of or above its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewMouse {
    pub kind: MouseEventKind,
    pub x: i32,
    pub y: i32,
    pub screen: Pos,
    pub modifiers: KeyModifiers,
}

impl ViewMouse {
    pub fn from_event(event: &MouseEvent, frame: Rect) -> Self {
        Self {
            kind: event.kind,
            x: event.column as i32 - frame.x as i32,
            y: event.row as i32 - frame.y as i32,
            screen: Pos::new(event.column, event.row),
            modifiers: event.modifiers,
        }
    }

    pub fn is_inside(&self, frame: Rect) -> bool {
        self.x >= 0 && self.y >= 0 && self.x < frame.w as i32 && self.y < frame.h as i32
    }

    pub fn is_left_press(&self) -> bool {
        self.kind == MouseEventKind::Down(MouseButton::Left)
    }

    pub fn is_left_release(&self) -> bool {
        self.kind == MouseEventKind::Up(MouseButton::Left)
    }
}

/// The single application-wide capture slot.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MouseGrab {
    owner: Option<Id>,
}

impl MouseGrab {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(&self) -> Option<Id> {
        self.owner
    }

    pub fn is_grabbed_by(&self, id: Id) -> bool {
        self.owner == Some(id)
    }

    /// Replaces any previous holder; returns it.
    pub fn grab(&mut self, id: Id) -> Option<Id> {
        self.owner.replace(id)
    }

    pub fn release(&mut self) -> Option<Id> {
        self.owner.take()
    }

    pub fn release_if(&mut self, id: Id) -> bool {
        if self.owner == Some(id) {
            self.owner = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ui/mouse.rs"]
mod tests;
