use super::toplevel::KeyPass;
use super::{Application, StopOutcome};
use crate::core::error::Result;
use crate::core::event::{InputEvent, KeyEvent, MouseEvent, MouseEventKind};
use crate::ui::core::geom::{Pos, Rect};
use crate::ui::core::id::Id;
use crate::ui::view::{Effect, EventCx};

impl Application {
    /// Routes one input event. Returns `true` if routing stopped a view.
    pub fn process_event(&mut self, event: InputEvent) -> Result<bool> {
        match event {
            InputEvent::Key(key) => self.process_key(&key),
            InputEvent::Mouse(mouse) => self.process_mouse(&mouse),
            InputEvent::Resize(w, h) => {
                self.resize(Rect::new(0, 0, w, h));
                Ok(false)
            }
            InputEvent::FocusGained | InputEvent::FocusLost => Ok(false),
            InputEvent::Paste(text) => {
                tracing::trace!(len = text.len(), "paste ignored");
                Ok(false)
            }
        }
    }

    pub(crate) fn resize(&mut self, screen: Rect) {
        if self.screen == screen {
            return;
        }
        tracing::debug!(w = screen.w, h = screen.h, "screen resized");
        self.screen = screen;
        for view in &mut self.stack {
            view.layout(screen);
        }
        self.needs_redraw = true;
    }

    /// Offers `key` to the pushed views, top to bottom, in the hot, normal and cold passes.
    /// A running modal ends each pass.
    pub(crate) fn process_key(&mut self, key: &KeyEvent) -> Result<bool> {
        if key.is_release() {
            return Ok(false);
        }
        let mut cx = EventCx::new(self.screen);
        'passes: for pass in [KeyPass::Hot, KeyPass::Normal, KeyPass::Cold] {
            for idx in (0..self.stack.len()).rev() {
                let view = &mut self.stack[idx];
                if !view.is_running() || !view.is_visible() {
                    continue;
                }
                cx.set_owner(view.id());
                if view.dispatch_key(pass, key, &mut cx).is_consumed() {
                    tracing::trace!(?pass, view = ?view.id(), "key consumed");
                    break 'passes;
                }
                if view.is_modal() {
                    break;
                }
            }
        }
        self.apply_effects(cx.take_effects())
    }

    pub(crate) fn process_mouse(&mut self, event: &MouseEvent) -> Result<bool> {
        let pos = Pos::new(event.column, event.row);
        let mut cx = EventCx::new(self.screen);

        if let Some(grab) = self.grab.owner() {
            match self.stack.iter().position(|v| v.owns(grab)) {
                Some(idx) => {
                    self.leave_if_outside(grab, pos);
                    let view = &mut self.stack[idx];
                    cx.set_owner(view.id());
                    view.dispatch_mouse(grab, event, &mut cx);
                    return self.apply_effects(cx.take_effects());
                }
                None => {
                    tracing::debug!(%grab, "dropping grab held by a view that is gone");
                    self.grab.release();
                }
            }
        }

        let hit = self.hit_tree.hit_test(pos).map(|n| (n.owner, n.id));
        self.update_hover(hit);
        let Some((owner, part)) = hit else {
            return Ok(false);
        };
        tracing::trace!(%owner, %part, x = pos.x, y = pos.y, "mouse hit");
        if matches!(event.kind, MouseEventKind::Down(_)) && self.current != Some(owner) {
            self.bring_to_front(owner)?;
        }
        if let Some(view) = self.stack.iter_mut().find(|v| v.id() == Some(owner)) {
            cx.set_owner(Some(owner));
            view.dispatch_mouse(part, event, &mut cx);
        }
        self.apply_effects(cx.take_effects())
    }

    /// While a grab is held, the hovered part only learns the pointer left once it is outside.
    fn leave_if_outside(&mut self, grab: Id, pos: Pos) {
        let Some((owner, part)) = self.hovered else {
            return;
        };
        if part == grab {
            return;
        }
        let Some(view) = self.stack.iter_mut().find(|v| v.id() == Some(owner)) else {
            self.hovered = None;
            return;
        };
        if view.part_frame(part).is_some_and(|f| f.contains(pos)) {
            return;
        }
        view.mouse_leave(part);
        self.hovered = None;
    }

    fn update_hover(&mut self, hit: Option<(Id, Id)>) {
        if self.hovered == hit {
            return;
        }
        if let Some((owner, part)) = self.hovered.take() {
            if let Some(view) = self.stack.iter_mut().find(|v| v.id() == Some(owner)) {
                view.mouse_leave(part);
            }
        }
        self.hovered = hit;
    }

    /// Applies what handlers recorded. Returns `true` if a view was stopped.
    pub(crate) fn apply_effects(&mut self, effects: Vec<Effect>) -> Result<bool> {
        let mut stopped = false;
        for effect in effects {
            match effect {
                Effect::GrabMouse(id) => self.grab_mouse(id),
                Effect::ReleaseMouse(id) => {
                    self.grab.release_if(id);
                }
                Effect::RequestStop(id) => {
                    stopped |= self.request_stop(id)? == StopOutcome::Stopped;
                }
                Effect::Idle(f) => self.idle.push_back(f),
                Effect::Redraw => self.needs_redraw = true,
            }
        }
        Ok(stopped)
    }
}
