use crate::ui::core::geom::{Pos, Rect};
use crate::ui::core::id::Id;
use crate::ui::core::painter::BorderKind;
use crate::ui::core::style::{Color, Mod, Style};
use crate::ui::core::tree::{Node, NodeKind};
use crate::ui::core::widget::{Ui, Widget};
use crate::ui::menu::bar::MenuBar;
use crate::ui::menu::hotkey::Title;
use crate::ui::menu::model::{CheckStyle, MenuTree};
use crate::ui::menu::popup::{Popup, PopupRow};
use unicode_width::UnicodeWidthStr;

/// Popups share one layer band above every top-level view.
pub const POPUP_LAYER: u16 = 0xF000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuStyles {
    pub bar: Style,
    pub bar_selected: Style,
    pub base: Style,
    pub border: Style,
    pub selected: Style,
    pub disabled: Style,
    pub hotkey: Style,
}

impl Default for MenuStyles {
    fn default() -> Self {
        let base = Style::colors(Color::Indexed(0), Color::Indexed(7));
        let selected = Style::colors(Color::Indexed(15), Color::Indexed(0));
        Self {
            bar: base,
            bar_selected: selected,
            base,
            border: base,
            selected,
            disabled: base.fg(Color::Indexed(8)),
            hotkey: Style::new().add_mod(Mod::UNDERLINE),
        }
    }
}

const CHECK_COLUMNS: usize = 2;

struct RowLabel {
    check: &'static str,
    title: Title,
    right: String,
    arrow: bool,
}

fn row_label(tree: &MenuTree, popup: &Popup, row: PopupRow) -> Option<RowLabel> {
    let key = match row {
        PopupRow::Node(key) => key,
        PopupRow::Back => {
            let title = tree.title(popup.group())?;
            return Some(RowLabel {
                check: "◄ ",
                title,
                right: String::new(),
                arrow: false,
            });
        }
    };
    let entry = tree.entry(key)?;
    let check = match (entry.style(), entry.is_checked()) {
        (CheckStyle::Radio, true) => "● ",
        (CheckStyle::Radio, false) => "○ ",
        (_, true) => "√ ",
        (_, false) => "  ",
    };
    let right = match entry.shortcut_key() {
        Some(key) => key.to_string(),
        None => entry.help_text().to_string(),
    };
    Some(RowLabel {
        check,
        title: tree.title(key)?,
        right,
        arrow: tree.is_submenu(key),
    })
}

/// Outer size of a popup including its border.
pub fn popup_size(tree: &MenuTree, popup: &Popup) -> (u16, u16) {
    let mut inner = 0usize;
    let mut any_arrow = false;
    for &row in popup.rows() {
        let Some(label) = row_label(tree, popup, row) else {
            continue;
        };
        let right = if label.right.is_empty() {
            0
        } else {
            label.right.width() + 2
        };
        inner = inner.max(CHECK_COLUMNS + label.title.width() + right);
        any_arrow |= label.arrow;
    }
    if any_arrow {
        inner += 2;
    }
    let w = (inner + 2).min(u16::MAX as usize) as u16;
    let h = (popup.rows().len() + 2).min(u16::MAX as usize) as u16;
    (w.max(4), h)
}

fn paint_title(ui: &mut Ui, pos: Pos, title: &Title, style: Style, hotkey: Style, clip: Rect) {
    let (before, key, after) = title.split();
    ui.painter.text_clipped(pos, before, style, clip);
    let mut x = pos.x.saturating_add(before.width() as u16);
    if !key.is_empty() {
        ui.painter
            .text_clipped(Pos::new(x, pos.y), key, style.patch(hotkey), clip);
        x = x.saturating_add(key.width() as u16);
    }
    ui.painter.text_clipped(Pos::new(x, pos.y), after, style, clip);
}

pub struct MenuBarWidget<'a> {
    pub bar: &'a MenuBar,
    pub owner: Id,
}

impl Widget for MenuBarWidget<'_> {
    fn ui(&mut self, ui: &mut Ui) {
        let frame = self.bar.frame();
        if frame.is_empty() {
            return;
        }
        let styles = self.bar.styles();
        let tree = self.bar.tree();
        ui.painter.fill_rect(frame, styles.bar);
        ui.push_node(Node::new(
            self.bar.id(),
            self.owner,
            frame,
            ui.layer.saturating_add(2),
            NodeKind::MenuBar,
        ));

        let active = self.bar.is_active();
        for (idx, (&key, &(x, w))) in tree.bar().iter().zip(self.bar.spans()).enumerate() {
            let Some(title) = tree.title(key) else {
                continue;
            };
            let style = if active && self.bar.selected() == Some(idx) {
                styles.bar_selected
            } else if tree.is_enabled(key) {
                styles.bar
            } else {
                styles.disabled
            };
            let span = Rect::new(x, frame.y, w, 1).intersect(frame);
            ui.painter.fill_rect(span, style);
            paint_title(
                ui,
                Pos::new(x.saturating_add(1), frame.y),
                &title,
                style,
                styles.hotkey,
                span,
            );
        }
    }
}

pub struct PopupWidget<'a> {
    pub bar: &'a MenuBar,
    pub popup: &'a Popup,
    pub owner: Id,
}

impl Widget for PopupWidget<'_> {
    fn ui(&mut self, ui: &mut Ui) {
        let rect = self.popup.rect();
        if rect.w < 3 || rect.h < 3 {
            return;
        }
        let tree = self.bar.tree();
        let styles = self.bar.styles();

        ui.push_node(Node::new(
            self.popup.id(),
            self.owner,
            rect,
            POPUP_LAYER.saturating_add(self.popup.depth() as u16),
            NodeKind::Popup {
                depth: self.popup.depth(),
            },
        ));
        ui.painter.fill_rect(rect, styles.base);
        ui.painter.border(rect, styles.border, BorderKind::Plain);

        for (idx, &row) in self.popup.rows().iter().enumerate() {
            let Some(row_rect) = self.popup.row_rect(idx) else {
                break;
            };
            if let PopupRow::Node(key) = row {
                if tree.node(key).is_some_and(|n| n.is_separator()) {
                    paint_separator(ui, rect, row_rect.y, styles.border);
                    continue;
                }
            }
            let Some(label) = row_label(tree, self.popup, row) else {
                continue;
            };
            let enabled = match row {
                PopupRow::Back => true,
                PopupRow::Node(key) => tree.is_enabled(key),
            };
            let style = if self.popup.current() == Some(idx) {
                styles.selected
            } else if enabled {
                styles.base
            } else {
                styles.disabled
            };
            paint_row(ui, row_rect, &label, style, styles.hotkey);
        }
    }
}

fn paint_separator(ui: &mut Ui, popup: Rect, y: u16, style: Style) {
    ui.painter.hline(Pos::new(popup.x, y), popup.w, '─', style);
    ui.painter.text(Pos::new(popup.x, y), "├", style);
    ui.painter
        .text(Pos::new(popup.right().saturating_sub(1), y), "┤", style);
}

fn paint_row(ui: &mut Ui, row: Rect, label: &RowLabel, style: Style, hotkey: Style) {
    ui.painter.fill_rect(row, style);
    ui.painter.text_clipped(row.origin(), label.check, style, row);
    let title_x = row.x.saturating_add(CHECK_COLUMNS as u16);
    paint_title(
        ui,
        Pos::new(title_x, row.y),
        &label.title,
        style,
        hotkey,
        row,
    );

    let mut right_edge = row.right();
    if label.arrow {
        right_edge = right_edge.saturating_sub(2);
        ui.painter
            .text_clipped(Pos::new(right_edge, row.y), " ►", style, row);
    }
    if !label.right.is_empty() {
        let x = right_edge.saturating_sub(label.right.width() as u16);
        ui.painter
            .text_clipped(Pos::new(x, row.y), label.right.as_str(), style, row);
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/widgets/menu.rs"]
mod tests;
