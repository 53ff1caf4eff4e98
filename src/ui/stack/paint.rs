use super::{Application, TopLevel};
use crate::core::error::Result;
use crate::ui::core::widget::Ui;

/// Layers reserved per stacked view: background, children, menu bar.
const LAYERS_PER_VIEW: u16 = 4;

impl Application {
    /// Paints every visible running view base first, then every open popup, and presents the
    /// frame. Stopped views waiting for `end` are skipped.
    ///
    /// The hit-test tree is rebuilt along the way. Views beneath the top-most running modal
    /// are painted but not registered, so the pointer cannot reach them.
    pub fn draw(&mut self) -> Result<()> {
        self.painter.clear();
        self.hit_tree.clear();
        let modal = self.active_modal();
        let reachable = |idx: usize, view: &TopLevel| {
            view.is_running() && modal.map_or(true, |m| idx >= m)
        };

        let mut ui = Ui::new(self.screen, &mut self.painter, &mut self.hit_tree);
        for (idx, view) in self.stack.iter_mut().enumerate() {
            if !view.is_visible() || !view.is_running() {
                continue;
            }
            ui.layer = (idx as u16).saturating_mul(LAYERS_PER_VIEW);
            ui.hit_testing = reachable(idx, view);
            view.paint(&mut ui);
        }
        for (idx, view) in self.stack.iter().enumerate() {
            if !view.is_visible() || !view.is_running() {
                continue;
            }
            ui.hit_testing = reachable(idx, view);
            view.paint_popups(&mut ui);
        }

        let cursor = self
            .current
            .and_then(|id| self.view(id))
            .and_then(TopLevel::cursor);
        self.driver.present(self.painter.cmds(), cursor)?;
        self.needs_redraw = false;
        self.frames += 1;
        tracing::trace!(
            frame = self.frames,
            cmds = self.painter.len(),
            nodes = self.hit_tree.nodes().len(),
            "frame presented"
        );
        Ok(())
    }
}
