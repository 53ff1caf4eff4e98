//! The view stack.
//!
//! [`Application`] owns every pushed [`TopLevel`] in z-order (index 0 is the base), decides which
//! one is current, routes input to them and runs the loop that pumps input, invoke-bridge
//! callbacks and idle callbacks.
//!
//! - `mod.rs`: lifecycle (`begin`, `end`, `request_stop`, `bring_to_front`)
//! - `route.rs`: key and mouse routing, effect application
//! - `run.rs`: the run loop
//! - `paint.rs`: composing a frame and handing it to the driver

mod paint;
mod route;
mod run;
pub mod toplevel;

pub use toplevel::{ChildClosed, Closing, Placement, TopLevel, TopLevelStyles};

use crate::core::error::{Result, UiError};
use crate::settings::Settings;
use crate::ui::backend::Driver;
use crate::ui::core::geom::Rect;
use crate::ui::core::id::{Id, IdPath};
use crate::ui::core::painter::Painter;
use crate::ui::core::tree::UiTree;
use crate::ui::invoke::{InvokeQueue, Invoker};
use crate::ui::menu::MenuBar;
use crate::ui::mouse::MouseGrab;
use crate::ui::view::{EventCx, IdleCallback};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// What [`Application::request_stop`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    /// A closing listener vetoed.
    Cancelled,
    /// The stop is not legitimate, e.g. a running modal sits above the view.
    Refused,
    NotRunning,
}

type ErrorHandler = Box<dyn FnMut(&UiError) -> bool>;

pub struct Application {
    stack: Vec<TopLevel>,
    ids: FxHashSet<Id>,
    current: Option<Id>,
    grab: MouseGrab,
    /// `(owner, part)` the pointer was last over.
    hovered: Option<(Id, Id)>,
    driver: Box<dyn Driver>,
    screen: Rect,
    painter: Painter,
    hit_tree: UiTree,
    idle: VecDeque<IdleCallback>,
    invoke: InvokeQueue,
    settings: Settings,
    needs_redraw: bool,
    next_auto_id: u64,
    error_handler: Option<ErrorHandler>,
    frames: u64,
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("stack", &self.stack_ids())
            .field("current", &self.current)
            .field("grab", &self.grab.owner())
            .field("screen", &self.screen)
            .field("idle", &self.idle.len())
            .finish()
    }
}

impl Application {
    pub fn new(driver: Box<dyn Driver>, settings: Settings) -> Self {
        let settings = settings.normalized();
        let screen = driver.size();
        #[allow(unused_mut)]
        let mut invoke = InvokeQueue::bounded(settings.invoke_queue_capacity);
        #[cfg(unix)]
        if let Some(wakeup) = driver.wakeup() {
            invoke.set_wakeup(wakeup);
        }
        Self {
            stack: Vec::new(),
            ids: FxHashSet::default(),
            current: None,
            grab: MouseGrab::new(),
            hovered: None,
            driver,
            screen,
            painter: Painter::new(),
            hit_tree: UiTree::new(),
            idle: VecDeque::new(),
            invoke,
            settings,
            needs_redraw: true,
            next_auto_id: 0,
            error_handler: None,
            frames: 0,
        }
    }

    pub fn with_driver(driver: impl Driver + 'static) -> Self {
        Self::new(Box::new(driver), Settings::default())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn screen(&self) -> Rect {
        self.screen
    }

    /// A handle other threads use to run callbacks on the loop thread.
    pub fn invoker(&self) -> Invoker {
        self.invoke.invoker()
    }

    /// Installs the handler consulted when a callback fails inside [`Application::run`].
    /// Returning `true` keeps the loop going.
    pub fn set_error_handler(&mut self, handler: impl FnMut(&UiError) -> bool + 'static) {
        self.error_handler = Some(Box::new(handler));
    }

    pub fn current(&self) -> Option<Id> {
        self.current
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Pushed ids, base first.
    pub fn stack_ids(&self) -> Vec<Id> {
        self.stack.iter().filter_map(TopLevel::id).collect()
    }

    pub fn contains(&self, id: Id) -> bool {
        self.ids.contains(&id)
    }

    pub fn view(&self, id: Id) -> Option<&TopLevel> {
        self.stack.iter().find(|v| v.id() == Some(id))
    }

    pub fn view_mut(&mut self, id: Id) -> Option<&mut TopLevel> {
        self.needs_redraw = true;
        self.stack.iter_mut().find(|v| v.id() == Some(id))
    }

    pub fn is_running(&self, id: Id) -> bool {
        self.view(id).is_some_and(TopLevel::is_running)
    }

    pub fn mouse_grab(&self) -> Option<Id> {
        self.grab.owner()
    }

    pub fn grab_mouse(&mut self, id: Id) {
        if let Some(previous) = self.grab.grab(id) {
            if previous != id {
                tracing::trace!(%previous, %id, "mouse grab replaced");
            }
        }
    }

    pub fn ungrab_mouse(&mut self) -> Option<Id> {
        self.grab.release()
    }

    /// Idle callbacks waiting for the next iteration.
    pub fn pending_idle(&self) -> usize {
        self.idle.len()
    }

    pub fn add_idle(&mut self, f: impl FnOnce(&mut Application) -> Result<()> + 'static) {
        self.idle.push_back(Box::new(f));
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    fn index_of(&self, id: Id) -> Option<usize> {
        self.stack.iter().position(|v| v.id() == Some(id))
    }

    fn container_id(&self) -> Option<Id> {
        self.stack
            .iter()
            .find(|v| v.is_container())
            .and_then(TopLevel::id)
    }

    /// Index of the top-most running modal.
    fn active_modal(&self) -> Option<usize> {
        self.stack
            .iter()
            .rposition(|v| v.is_running() && v.is_modal())
    }

    fn next_auto_id(&mut self) -> Id {
        loop {
            let id = IdPath::root("termstack.view")
                .push_u64(self.next_auto_id)
                .finish();
            self.next_auto_id += 1;
            if !self.ids.contains(&id) {
                return id;
            }
        }
    }

    fn set_current(&mut self, id: Option<Id>) {
        if self.current != id {
            tracing::debug!(from = ?self.current, to = ?id, "current view changed");
            self.current = id;
            self.needs_redraw = true;
        }
    }

    /// A running modal always wins; otherwise the top-most running, visible view.
    pub(crate) fn refresh_current(&mut self) {
        let next = match self.active_modal() {
            Some(idx) => self.stack[idx].id(),
            None => self
                .stack
                .iter()
                .rev()
                .find(|v| v.is_running() && v.is_visible())
                .and_then(TopLevel::id),
        };
        self.set_current(next);
    }

    /// Pushes `view`, initializes it, lays it out and paints the first frame.
    ///
    /// A container begun on a non-empty stack is inserted at the base.
    pub fn begin(&mut self, mut view: TopLevel) -> Result<Id> {
        if view.is_container() {
            if let Some(existing) = self.container_id() {
                return Err(UiError::DuplicateContainer { existing });
            }
        }
        let id = match view.id() {
            Some(id) if self.ids.contains(&id) => return Err(UiError::DuplicateIdentity(id)),
            Some(id) => id,
            None => self.next_auto_id(),
        };

        view.assign_id(id);
        view.set_running(true);
        view.initialize();
        view.layout(self.screen);

        let blocked = self.active_modal().is_some() && !view.is_modal();
        let at_base = view.is_container() && !self.stack.is_empty();
        tracing::debug!(
            %id,
            modal = view.is_modal(),
            container = view.is_container(),
            depth = self.stack.len(),
            "begin view"
        );
        if at_base {
            self.stack.insert(0, view);
        } else {
            self.stack.push(view);
        }
        self.ids.insert(id);
        if !blocked && !at_base {
            self.set_current(Some(id));
        }

        self.needs_redraw = true;
        self.draw()?;
        Ok(id)
    }

    /// Pops `id`, which must be the stack top, and hands it back.
    pub fn end(&mut self, id: Id) -> Result<TopLevel> {
        let top = self.stack.last().and_then(TopLevel::id);
        if top != Some(id) {
            return Err(if self.ids.contains(&id) {
                UiError::UnbalancedEnd { view: id, top }
            } else {
                UiError::UnknownView(id)
            });
        }
        let Some(mut view) = self.stack.pop() else {
            return Err(UiError::UnknownView(id));
        };
        self.ids.remove(&id);
        view.set_running(false);

        if let Some(owner) = self.grab.owner() {
            if view.owns(owner) {
                self.grab.release();
            }
        }
        if self.hovered.is_some_and(|(owner, _)| owner == id) {
            self.hovered = None;
        }
        if !view.is_container() {
            if let Some(container) = self.stack.iter_mut().find(|v| v.is_container()) {
                container.notify_child_closed(id);
            }
        }
        tracing::debug!(%id, depth = self.stack.len(), "end view");

        self.current = None;
        self.refresh_current();
        self.needs_redraw = true;
        Ok(view)
    }

    /// Asks `id` (or the current view) to stop. Observed by its run loop at the next check.
    pub fn request_stop(&mut self, id: Option<Id>) -> Result<StopOutcome> {
        let Some(target) = id.or(self.current) else {
            return Ok(StopOutcome::NotRunning);
        };
        let Some(idx) = self.index_of(target) else {
            return Err(UiError::UnknownView(target));
        };
        if !self.stack[idx].is_running() {
            return Ok(StopOutcome::NotRunning);
        }

        let view = &self.stack[idx];
        let modal_above = self.stack[idx + 1..]
            .iter()
            .any(|v| v.is_running() && v.is_modal());
        if modal_above && (view.is_modal() || view.is_container()) {
            tracing::warn!(%target, "stop refused: a running modal sits above the view");
            return Ok(StopOutcome::Refused);
        }

        if self.stack[idx].is_container() {
            // Children first, top-most first; a veto aborts the rest.
            for child in (idx + 1..self.stack.len()).rev() {
                let view = &mut self.stack[child];
                if !view.is_running() {
                    continue;
                }
                if view.emit_closing() {
                    tracing::debug!(%target, "container stop vetoed by a child");
                    return Ok(StopOutcome::Cancelled);
                }
                view.set_running(false);
            }
        }

        if self.stack[idx].emit_closing() {
            tracing::debug!(%target, "stop vetoed");
            return Ok(StopOutcome::Cancelled);
        }
        self.stack[idx].set_running(false);
        tracing::debug!(%target, "view stopped");
        self.needs_redraw = true;
        Ok(StopOutcome::Stopped)
    }

    /// Raises a running, non-modal child view above its siblings and makes it current.
    pub fn bring_to_front(&mut self, id: Id) -> Result<bool> {
        let Some(idx) = self.index_of(id) else {
            return Err(UiError::UnknownView(id));
        };
        let view = &self.stack[idx];
        if self.active_modal().is_some()
            || view.is_modal()
            || view.is_container()
            || !view.is_running()
        {
            return Ok(false);
        }
        if idx + 1 != self.stack.len() {
            let view = self.stack.remove(idx);
            self.stack.push(view);
        }
        self.set_current(Some(id));
        self.needs_redraw = true;
        Ok(true)
    }

    /// Runs `f` against the menu bar of view `id`, applying whatever effects it records.
    pub fn with_menu_bar<R>(
        &mut self,
        id: Id,
        f: impl FnOnce(&mut MenuBar, &mut EventCx) -> R,
    ) -> Result<Option<R>> {
        let mut cx = EventCx::new(self.screen);
        cx.set_owner(Some(id));
        let Some(bar) = self
            .stack
            .iter_mut()
            .find(|v| v.id() == Some(id))
            .and_then(TopLevel::menu_bar_mut)
        else {
            return Ok(None);
        };
        let out = f(bar, &mut cx);
        self.apply_effects(cx.take_effects())?;
        Ok(Some(out))
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/stack/mod.rs"]
mod tests;
