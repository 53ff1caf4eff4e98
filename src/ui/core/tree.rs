use super::geom::{Pos, Rect};
use super::id::Id;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// The background of a top-level view.
    TopLevel,
    Child,
    MenuBar,
    Popup { depth: usize },
}

/// A hit-testable region, registered while painting.
///
/// `owner` is the top-level view the region belongs to; `id` is the part itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node {
    pub id: Id,
    pub owner: Id,
    pub rect: Rect,
    pub layer: u16,
    pub z: u32,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(id: Id, owner: Id, rect: Rect, layer: u16, kind: NodeKind) -> Self {
        Self {
            id,
            owner,
            rect,
            layer,
            z: 0,
            kind,
        }
    }

    pub fn contains(&self, p: Pos) -> bool {
        self.rect.contains(p)
    }
}

#[derive(Clone, Debug, Default)]
pub struct UiTree {
    nodes: Vec<Node>,
}

impl UiTree {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: Id) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn push(&mut self, mut node: Node) {
        // Default z-order: insertion order within the same layer.
        if node.z == 0 {
            node.z = self.nodes.len() as u32;
        }
        self.nodes.push(node);
    }

    pub fn hit_test(&self, p: Pos) -> Option<&Node> {
        // Highest layer wins; within a layer, higher z wins.
        self.nodes
            .iter()
            .filter(|n| n.contains(p))
            .max_by(|a, b| (a.layer, a.z).cmp(&(b.layer, b.z)))
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/ui/core/tree.rs"]
mod tests;
