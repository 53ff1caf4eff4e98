use super::geom::Rect;
use super::painter::Painter;
use super::tree::{Node, UiTree};

/// One paint pass: a target rect plus the painter and hit-test tree being filled.
pub struct Ui<'a> {
    pub rect: Rect,
    pub painter: &'a mut Painter,
    pub tree: &'a mut UiTree,
    pub layer: u16,
    /// Views painted under a running modal are visible but not hit-testable.
    pub hit_testing: bool,
}

impl<'a> Ui<'a> {
    pub fn new(rect: Rect, painter: &'a mut Painter, tree: &'a mut UiTree) -> Self {
        Self {
            rect,
            painter,
            tree,
            layer: 0,
            hit_testing: true,
        }
    }

    pub fn with_rect<R>(&mut self, rect: Rect, f: impl FnOnce(&mut Ui<'_>) -> R) -> R {
        let mut child = Ui {
            rect,
            painter: self.painter,
            tree: self.tree,
            layer: self.layer,
            hit_testing: self.hit_testing,
        };
        f(&mut child)
    }

    pub fn push_node(&mut self, node: Node) {
        if self.hit_testing {
            self.tree.push(node);
        }
    }
}

pub trait Widget {
    fn ui(&mut self, ui: &mut Ui);
}
