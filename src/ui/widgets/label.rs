use crate::ui::core::geom::{Pos, Rect};
use crate::ui::core::painter::Painter;
use crate::ui::core::style::Style;
use crate::ui::view::View;
use compact_str::CompactString;

/// Static text, one line per `\n`.
#[derive(Debug, Clone)]
pub struct Label {
    text: CompactString,
    style: Style,
}

impl Label {
    pub fn new(text: impl Into<CompactString>) -> Self {
        Self {
            text: text.into(),
            style: Style::default(),
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<CompactString>) {
        self.text = text.into();
    }
}

impl View for Label {
    fn render(&mut self, painter: &mut Painter, area: Rect) {
        for (dy, line) in self.text.lines().enumerate().take(area.h as usize) {
            painter.text_clipped(
                Pos::new(area.x, area.y.saturating_add(dy as u16)),
                line,
                self.style,
                area,
            );
        }
    }

    fn focusable(&self) -> bool {
        false
    }
}
