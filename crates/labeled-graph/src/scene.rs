// Scene module - the collection of shapes on the canvas and every
// operation that mutates it

use std::collections::BTreeSet;

use log::debug;
use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;

use crate::edge::Edge;
use crate::geometry::{Point, Rect};
use crate::label::KeyValue;
use crate::node::Node;
use crate::selection::{SelectMode, Selection};

pub type NodeId = NodeIndex;
pub type EdgeId = EdgeIndex;
pub type SceneGraph = StableGraph<Node, Edge>;

/// Any shape on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeId {
    Node(NodeId),
    Edge(EdgeId),
}

impl ShapeId {
    pub fn node(self) -> Option<NodeId> {
        match self {
            ShapeId::Node(id) => Some(id),
            ShapeId::Edge(_) => None,
        }
    }

    pub fn edge(self) -> Option<EdgeId> {
        match self {
            ShapeId::Edge(id) => Some(id),
            ShapeId::Node(_) => None,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("node {0:?} is not in the scene")]
    UnknownNode(NodeId),
    #[error("edge {0:?} is not in the scene")]
    UnknownEdge(EdgeId),
}

/// Shapes removed by a single batch deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deletion {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
}

impl Deletion {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn contains(&self, shape: ShapeId) -> bool {
        match shape {
            ShapeId::Node(id) => self.nodes.contains(&id),
            ShapeId::Edge(id) => self.edges.contains(&id),
        }
    }
}

/// Owns every node and edge.
///
/// Edges are stored as graph edges, so their endpoints are always nodes
/// of this scene: removing a node removes its incident edges with it.
/// Insertion order is tracked separately because the stable graph reuses
/// vacant indices.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    graph: SceneGraph,
    node_order: Vec<NodeId>,
    edge_order: Vec<EdgeId>,
    selection: Selection,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, shape: ShapeId) -> bool {
        match shape {
            ShapeId::Node(id) => self.graph.contains_node(id),
            ShapeId::Edge(id) => self.graph.edge_weight(id).is_some(),
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.graph.node_weight(id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.graph.edge_weight(id)
    }

    /// Nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.node_order
            .iter()
            .filter_map(|&id| self.graph.node_weight(id).map(|n| (id, n)))
    }

    /// Edges in creation order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edge_order
            .iter()
            .filter_map(|&id| self.graph.edge_weight(id).map(|e| (id, e)))
    }

    pub fn edge_endpoints(&self, id: EdgeId) -> Option<(NodeId, NodeId)> {
        self.graph.edge_endpoints(id)
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = self.graph.add_node(node);
        self.node_order.push(id);
        debug!("added node {}", id.index());
        id
    }

    pub fn add_edge(
        &mut self,
        source: NodeId,
        dest: NodeId,
    ) -> Result<EdgeId, SceneError> {
        self.insert_edge(Edge::new(), source, dest)
    }

    /// Bind a lazily constructed edge to two nodes and add it.
    pub fn insert_edge(
        &mut self,
        mut edge: Edge,
        source: NodeId,
        dest: NodeId,
    ) -> Result<EdgeId, SceneError> {
        let src = self.node(source).ok_or(SceneError::UnknownNode(source))?;
        let dst = self.node(dest).ok_or(SceneError::UnknownNode(dest))?;
        edge.adjust(Some(src), Some(dst));

        let id = self.graph.add_edge(source, dest, edge);
        self.edge_order.push(id);
        debug!(
            "added edge {} ({} -> {})",
            id.index(),
            source.index(),
            dest.index()
        );
        Ok(id)
    }

    /// Rebind an existing edge to new endpoints, keeping its label.
    ///
    /// The edge is re-inserted, so callers must use the returned id. It is
    /// often the old one, since the graph reuses the freed slot. Selection
    /// and drawing order follow it.
    pub fn set_edge_nodes(
        &mut self,
        edge: EdgeId,
        source: NodeId,
        dest: NodeId,
    ) -> Result<EdgeId, SceneError> {
        if !self.graph.contains_node(source) {
            return Err(SceneError::UnknownNode(source));
        }
        if !self.graph.contains_node(dest) {
            return Err(SceneError::UnknownNode(dest));
        }
        let weight = self
            .graph
            .remove_edge(edge)
            .ok_or(SceneError::UnknownEdge(edge))?;

        let was_selected = self.selection.contains(ShapeId::Edge(edge));
        self.selection.remove(ShapeId::Edge(edge));
        let position = self.edge_order.iter().position(|&e| e == edge);
        self.edge_order.retain(|&e| e != edge);

        let new_id = self.insert_edge(weight, source, dest)?;
        // insert_edge appended; move it back to the old slot
        if let Some(pos) = position {
            self.edge_order.pop();
            self.edge_order.insert(pos, new_id);
        }
        if was_selected {
            self.selection.apply(ShapeId::Edge(new_id), SelectMode::Add);
        }
        Ok(new_id)
    }

    // ------------------------------------------------------------------
    // Removal
    // ------------------------------------------------------------------

    /// Remove a node and every edge whose source or destination it is.
    ///
    /// Returns the ids of the removed edges, or `None` for an unknown node.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Vec<EdgeId>> {
        if !self.graph.contains_node(id) {
            return None;
        }

        let incident = self.incident_edges(id);
        for edge in &incident {
            self.forget_edge(*edge);
        }
        self.graph.remove_node(id);
        self.node_order.retain(|&n| n != id);
        self.selection.remove(ShapeId::Node(id));

        debug!(
            "removed node {} with {} incident edge(s)",
            id.index(),
            incident.len()
        );
        Some(incident)
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
        let edge = self.graph.remove_edge(id)?;
        self.forget_edge(id);
        debug!("removed edge {}", id.index());
        Some(edge)
    }

    /// Remove every selected node (with its edges) and every selected edge.
    pub fn delete_selection(&mut self) -> Deletion {
        let nodes: Vec<NodeId> = self.selection.nodes().collect();
        let edges: Vec<EdgeId> = self.selection.edges().collect();
        let mut deletion = Deletion::default();

        for node in nodes {
            if let Some(removed_edges) = self.remove_node(node) {
                deletion.nodes.push(node);
                deletion.edges.extend(removed_edges);
            }
        }
        for edge in edges {
            // Already gone if one of its endpoints was selected too
            if self.remove_edge(edge).is_some() {
                deletion.edges.push(edge);
            }
        }

        self.selection.clear();
        deletion
    }

    fn incident_edges(&self, id: NodeId) -> Vec<EdgeId> {
        let ids: BTreeSet<EdgeId> = self
            .graph
            .edges_directed(id, Direction::Outgoing)
            .chain(self.graph.edges_directed(id, Direction::Incoming))
            .map(|e| e.id())
            .collect();
        ids.into_iter().collect()
    }

    fn forget_edge(&mut self, id: EdgeId) {
        self.edge_order.retain(|&e| e != id);
        self.selection.remove(ShapeId::Edge(id));
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    pub fn move_node(
        &mut self,
        id: NodeId,
        dx: f32,
        dy: f32,
    ) -> Result<(), SceneError> {
        let node = self
            .graph
            .node_weight_mut(id)
            .ok_or(SceneError::UnknownNode(id))?;
        node.translate(dx, dy);
        for edge in self.incident_edges(id) {
            self.adjust_edge(edge);
        }
        Ok(())
    }

    /// Drag every selected node by the same delta.
    pub fn move_selection(&mut self, dx: f32, dy: f32) {
        let mut touched = BTreeSet::new();
        let nodes: Vec<NodeId> = self.selection.nodes().collect();
        for id in nodes {
            if let Some(node) = self.graph.node_weight_mut(id) {
                node.translate(dx, dy);
                touched.extend(self.incident_edges(id));
            }
        }
        for edge in touched {
            self.adjust_edge(edge);
        }
    }

    /// Recompute an edge's line from its endpoints' current geometry.
    pub fn adjust_edge(&mut self, id: EdgeId) {
        let Some((source, dest)) = self.graph.edge_endpoints(id) else {
            return;
        };
        let Some(weight) = self.graph.edge_weight_mut(id) else {
            return;
        };
        let mut edge = std::mem::take(weight);
        edge.adjust(
            self.graph.node_weight(source),
            self.graph.node_weight(dest),
        );
        if let Some(weight) = self.graph.edge_weight_mut(id) {
            *weight = edge;
        }
    }

    /// Topmost shape under `p`: nodes first, newest on top, then edges.
    pub fn hit_test(&self, p: Point) -> Option<ShapeId> {
        let node = self
            .node_order
            .iter()
            .rev()
            .find(|&&id| self.graph.node_weight(id).is_some_and(|n| n.contains(p)))
            .map(|&id| ShapeId::Node(id));

        node.or_else(|| {
            self.edge_order
                .iter()
                .rev()
                .find(|&&id| {
                    self.graph.edge_weight(id).is_some_and(|e| e.contains(p))
                })
                .map(|&id| ShapeId::Edge(id))
        })
    }

    // ------------------------------------------------------------------
    // Labels
    // ------------------------------------------------------------------

    pub fn label(&self, shape: ShapeId) -> Result<&KeyValue, SceneError> {
        match shape {
            ShapeId::Node(id) => self
                .node(id)
                .map(Node::label)
                .ok_or(SceneError::UnknownNode(id)),
            ShapeId::Edge(id) => self
                .edge(id)
                .map(Edge::label)
                .ok_or(SceneError::UnknownEdge(id)),
        }
    }

    pub fn set_label(
        &mut self,
        shape: ShapeId,
        label: KeyValue,
    ) -> Result<(), SceneError> {
        match shape {
            ShapeId::Node(id) => self
                .graph
                .node_weight_mut(id)
                .ok_or(SceneError::UnknownNode(id))?
                .set_label(label),
            ShapeId::Edge(id) => self
                .graph
                .edge_weight_mut(id)
                .ok_or(SceneError::UnknownEdge(id))?
                .set_label(label),
        }
        debug!("relabeled {:?}", shape);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_selected(&self, shape: ShapeId) -> bool {
        self.selection.contains(shape)
    }

    pub fn selected_nodes(&self) -> Vec<NodeId> {
        self.selection.nodes().collect()
    }

    pub fn selected_edges(&self) -> Vec<EdgeId> {
        self.selection.edges().collect()
    }

    /// Unknown shapes are ignored.
    pub fn select(&mut self, shape: ShapeId, mode: SelectMode) {
        if self.contains(shape) {
            self.selection.apply(shape, mode);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Select every shape lying entirely inside `rect`.
    pub fn select_in_rect(&mut self, rect: Rect, mode: SelectMode) {
        let inside: Vec<ShapeId> = self
            .nodes()
            .filter(|(_, node)| rect.contains_rect(&node.bounds()))
            .map(|(id, _)| ShapeId::Node(id))
            .chain(
                self.edges()
                    .filter(|(_, edge)| {
                        edge.line().is_some_and(|line| {
                            rect.contains(line.start) && rect.contains(line.end)
                        })
                    })
                    .map(|(id, _)| ShapeId::Edge(id)),
            )
            .collect();

        if mode == SelectMode::Replace {
            self.selection.clear();
        }
        let per_shape = match mode {
            SelectMode::Toggle => SelectMode::Toggle,
            SelectMode::Replace | SelectMode::Add => SelectMode::Add,
        };
        for shape in inside {
            self.selection.apply(shape, per_shape);
        }
    }
}
