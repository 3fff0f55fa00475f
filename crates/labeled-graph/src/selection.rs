use crate::scene::{EdgeId, NodeId, ShapeId};

/// How a newly picked shape combines with the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectMode {
    /// Drop everything else, keep only the picked shape.
    #[default]
    Replace,
    /// Flip the picked shape, leave the rest alone.
    Toggle,
    /// Add the picked shape, leave the rest alone.
    Add,
}

/// Ordered set of selected shapes. Order is the order of selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    shapes: Vec<ShapeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn contains(&self, shape: ShapeId) -> bool {
        self.shapes.contains(&shape)
    }

    pub fn apply(&mut self, shape: ShapeId, mode: SelectMode) {
        match mode {
            SelectMode::Replace => {
                self.shapes.clear();
                self.shapes.push(shape);
            }
            SelectMode::Toggle => {
                if !self.remove(shape) {
                    self.shapes.push(shape);
                }
            }
            SelectMode::Add => {
                if !self.contains(shape) {
                    self.shapes.push(shape);
                }
            }
        }
    }

    /// Returns whether the shape was selected.
    pub fn remove(&mut self, shape: ShapeId) -> bool {
        let before = self.shapes.len();
        self.shapes.retain(|s| *s != shape);
        self.shapes.len() != before
    }

    pub fn retain(&mut self, keep: impl FnMut(&ShapeId) -> bool) {
        self.shapes.retain(keep);
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.shapes.iter().copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.iter().filter_map(ShapeId::node)
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.iter().filter_map(ShapeId::edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(i: u32) -> ShapeId {
        ShapeId::Node(NodeId::new(i as usize))
    }

    fn e(i: u32) -> ShapeId {
        ShapeId::Edge(EdgeId::new(i as usize))
    }

    #[test]
    fn test_replace_toggle_add() {
        let mut sel = Selection::new();
        sel.apply(n(0), SelectMode::Replace);
        sel.apply(n(1), SelectMode::Add);
        sel.apply(e(0), SelectMode::Toggle);
        assert_eq!(sel.iter().collect::<Vec<_>>(), vec![n(0), n(1), e(0)]);

        sel.apply(n(0), SelectMode::Toggle);
        assert_eq!(sel.iter().collect::<Vec<_>>(), vec![n(1), e(0)]);

        // Adding twice keeps a single entry
        sel.apply(n(1), SelectMode::Add);
        assert_eq!(sel.len(), 2);

        sel.apply(n(2), SelectMode::Replace);
        assert_eq!(sel.iter().collect::<Vec<_>>(), vec![n(2)]);
    }

    #[test]
    fn test_projections_keep_selection_order() {
        let mut sel = Selection::new();
        sel.apply(n(3), SelectMode::Add);
        sel.apply(e(1), SelectMode::Add);
        sel.apply(n(1), SelectMode::Add);

        let nodes: Vec<_> = sel.nodes().collect();
        assert_eq!(nodes, vec![NodeId::new(3), NodeId::new(1)]);
        let edges: Vec<_> = sel.edges().collect();
        assert_eq!(edges, vec![EdgeId::new(1)]);
    }
}
