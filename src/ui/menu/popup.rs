use crate::ui::core::geom::{Pos, Rect};
use crate::ui::core::id::Id;
use crate::ui::menu::hotkey::hotkey_matches;
use crate::ui::menu::model::{MenuKey, MenuTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupRow {
    /// Single-frame mode only: returns to the parent popup.
    Back,
    Node(MenuKey),
}

/// One open popup showing the children of `group`.
#[derive(Debug, Clone)]
pub struct Popup {
    id: Id,
    group: MenuKey,
    depth: usize,
    rows: Vec<PopupRow>,
    current: Option<usize>,
    rect: Rect,
}

impl Popup {
    pub fn new(id: Id, group: MenuKey, depth: usize, with_back: bool, tree: &MenuTree) -> Self {
        let mut rows = Vec::with_capacity(tree.children(group).len() + 1);
        if with_back {
            rows.push(PopupRow::Back);
        }
        rows.extend(tree.children(group).iter().copied().map(PopupRow::Node));

        let mut popup = Self {
            id,
            group,
            depth,
            rows,
            current: None,
            rect: Rect::default(),
        };
        // Prefer the first real entry over the back row.
        let first_entry = (0..popup.rows.len())
            .find(|&i| matches!(popup.rows[i], PopupRow::Node(_)) && popup.is_eligible(i, tree));
        match first_entry {
            Some(idx) => {
                popup.select(idx, tree);
            }
            None => {
                popup.select_first(tree);
            }
        }
        popup
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn group(&self) -> MenuKey {
        self.group
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn rows(&self) -> &[PopupRow] {
        &self.rows
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn current_row(&self) -> Option<PopupRow> {
        self.current.and_then(|i| self.rows.get(i).copied())
    }

    pub fn current_key(&self) -> Option<MenuKey> {
        match self.current_row()? {
            PopupRow::Node(key) => Some(key),
            PopupRow::Back => None,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub(crate) fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    /// Rows that keyboard navigation may land on: the back row and enabled entries.
    pub fn is_eligible(&self, idx: usize, tree: &MenuTree) -> bool {
        match self.rows.get(idx) {
            Some(PopupRow::Back) => true,
            Some(PopupRow::Node(key)) => tree.is_enabled(*key),
            None => false,
        }
    }

    pub fn select(&mut self, idx: usize, tree: &MenuTree) -> bool {
        if !self.is_eligible(idx, tree) {
            return false;
        }
        let changed = self.current != Some(idx);
        self.current = Some(idx);
        changed
    }

    pub fn select_first(&mut self, tree: &MenuTree) -> bool {
        match (0..self.rows.len()).find(|&i| self.is_eligible(i, tree)) {
            Some(idx) => self.select(idx, tree),
            None => false,
        }
    }

    pub fn select_last(&mut self, tree: &MenuTree) -> bool {
        match (0..self.rows.len()).rev().find(|&i| self.is_eligible(i, tree)) {
            Some(idx) => self.select(idx, tree),
            None => false,
        }
    }

    /// Moves to the next eligible row, wrapping. Leaves the selection alone when no row is
    /// eligible. Returns whether the selection changed.
    pub fn move_down(&mut self, tree: &MenuTree) -> bool {
        self.step(tree, true)
    }

    pub fn move_up(&mut self, tree: &MenuTree) -> bool {
        self.step(tree, false)
    }

    fn step(&mut self, tree: &MenuTree, forward: bool) -> bool {
        let len = self.rows.len();
        if len == 0 {
            return false;
        }
        let start = match self.current {
            Some(c) => c,
            None if forward => len - 1,
            None => 0,
        };
        for offset in 1..=len {
            let idx = if forward {
                (start + offset) % len
            } else {
                (start + len - offset % len) % len
            };
            if self.is_eligible(idx, tree) {
                return self.select(idx, tree);
            }
        }
        false
    }

    /// Eligible rows whose hot-key matches `ch`, in row order.
    pub fn hotkey_rows(&self, ch: char, tree: &MenuTree) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(idx, row)| match row {
                PopupRow::Node(key) => {
                    self.is_eligible(*idx, tree) && hotkey_matches(tree.hotkey(*key), ch)
                }
                PopupRow::Back => false,
            })
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Screen rect of row `idx` (inside the border).
    pub fn row_rect(&self, idx: usize) -> Option<Rect> {
        let inner_h = self.rect.h.saturating_sub(2) as usize;
        if idx >= self.rows.len() || idx >= inner_h {
            return None;
        }
        Some(Rect::new(
            self.rect.x.saturating_add(1),
            self.rect.y.saturating_add(1 + idx as u16),
            self.rect.w.saturating_sub(2),
            1,
        ))
    }

    pub fn row_at(&self, pos: Pos) -> Option<usize> {
        (0..self.rows.len()).find(|&idx| self.row_rect(idx).is_some_and(|r| r.contains(pos)))
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/menu/popup.rs"]
mod tests;
