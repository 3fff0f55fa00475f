use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::edit::{EditSession, EditSessions};
use crate::geometry::{Point, Rect};
use crate::node::{DEFAULT_NODE_DIAMETER, Node};
use crate::pending::PendingPair;
use crate::scene::{Deletion, EdgeId, NodeId, Scene, SceneError, ShapeId};
use crate::selection::SelectMode;

/// How edges come into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgePolicy {
    /// Select exactly two nodes, then ask for an edge.
    #[default]
    Explicit,
    /// Every second newly created node is joined to the one before it.
    Streaming,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorOptions {
    pub node_diameter: f32,
    pub edge_policy: EdgePolicy,
    /// Open the edit form of every freshly created shape.
    pub edit_on_create: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            node_diameter: DEFAULT_NODE_DIAMETER,
            edge_policy: EdgePolicy::default(),
            edit_on_create: true,
        }
    }
}

/// Editing state of one canvas: the scene plus the bookkeeping that must
/// never outlive the shapes it refers to (pending pair, open edit forms).
#[derive(Debug, Clone, Default)]
pub struct Editor {
    scene: Scene,
    options: EditorOptions,
    pending: PendingPair,
    sessions: EditSessions,
}

impl Editor {
    pub fn new(options: EditorOptions) -> Self {
        Self {
            scene: Scene::new(),
            options,
            pending: PendingPair::new(),
            sessions: EditSessions::new(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn pending(&self) -> &PendingPair {
        &self.pending
    }

    pub fn sessions(&self) -> &EditSessions {
        &self.sessions
    }

    pub fn set_edge_policy(&mut self, policy: EdgePolicy) {
        if self.options.edge_policy != policy {
            self.options.edge_policy = policy;
            self.pending.clear();
        }
    }

    /// Applies to nodes created from now on.
    pub fn set_node_diameter(&mut self, diameter: f32) {
        self.options.node_diameter = diameter;
    }

    // ------------------------------------------------------------------
    // Toolbar actions
    // ------------------------------------------------------------------

    /// New node centred on `cursor`.
    pub fn create_node_at(&mut self, cursor: Point) -> NodeId {
        let node = Node::centered_at(cursor, self.options.node_diameter);
        let id = self.scene.add_node(node);

        if self.options.edit_on_create {
            self.open_editor(ShapeId::Node(id));
        }
        if self.options.edge_policy == EdgePolicy::Streaming
            && let Some((source, dest)) = self.pending.push(id)
        {
            self.connect(source, dest);
        }
        id
    }

    /// Edge between the two selected nodes, in selection order.
    ///
    /// Any other selection count is a no-op.
    pub fn create_edge(&mut self) -> Option<EdgeId> {
        let selected = self.scene.selected_nodes();
        match selected.as_slice() {
            [source, dest] => self.connect(*source, *dest),
            _ => {
                debug!(
                    "create edge ignored: {} node(s) selected",
                    selected.len()
                );
                None
            }
        }
    }

    fn connect(&mut self, source: NodeId, dest: NodeId) -> Option<EdgeId> {
        match self.scene.add_edge(source, dest) {
            Ok(id) => {
                if self.options.edit_on_create {
                    self.open_editor(ShapeId::Edge(id));
                }
                Some(id)
            }
            Err(e) => {
                warn!("could not create edge: {}", e);
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Removal
    // ------------------------------------------------------------------

    pub fn delete_selection(&mut self) -> Deletion {
        let deletion = self.scene.delete_selection();
        self.forget(&deletion);
        deletion
    }

    pub fn remove_node(&mut self, id: NodeId) -> Option<Vec<EdgeId>> {
        let edges = self.scene.remove_node(id)?;
        self.forget(&Deletion {
            nodes: vec![id],
            edges: edges.clone(),
        });
        Some(edges)
    }

    fn forget(&mut self, deletion: &Deletion) {
        for node in &deletion.nodes {
            self.pending.forget(*node);
        }
        self.sessions.retain(|shape| !deletion.contains(shape));
    }

    // ------------------------------------------------------------------
    // Selection and dragging
    // ------------------------------------------------------------------

    pub fn select(&mut self, shape: ShapeId, mode: SelectMode) {
        self.scene.select(shape, mode);
    }

    pub fn select_in_rect(&mut self, rect: Rect, mode: SelectMode) {
        self.scene.select_in_rect(rect, mode);
    }

    pub fn clear_selection(&mut self) {
        self.scene.clear_selection();
    }

    pub fn drag_selection(&mut self, dx: f32, dy: f32) {
        self.scene.move_selection(dx, dy);
    }

    pub fn move_node(
        &mut self,
        id: NodeId,
        dx: f32,
        dy: f32,
    ) -> Result<(), SceneError> {
        self.scene.move_node(id, dx, dy)
    }

    // ------------------------------------------------------------------
    // Edit forms
    // ------------------------------------------------------------------

    /// Open the edit form for `shape`; an already open form is reused.
    ///
    /// Returns true only when a new form was opened.
    pub fn open_editor(&mut self, shape: ShapeId) -> bool {
        match self.scene.label(shape) {
            Ok(label) => self.sessions.open(shape, label),
            Err(e) => {
                warn!("cannot edit: {}", e);
                false
            }
        }
    }

    pub fn edit_session_mut(
        &mut self,
        shape: ShapeId,
    ) -> Option<&mut EditSession> {
        self.sessions.get_mut(shape)
    }

    /// Write the form back into its shape and close it.
    pub fn save_edit(&mut self, shape: ShapeId) -> Result<(), SceneError> {
        let Some(session) = self.sessions.take(shape) else {
            return Ok(());
        };
        self.scene.set_label(shape, session.commit())
    }

    /// Close the form without touching the shape.
    pub fn cancel_edit(&mut self, shape: ShapeId) -> bool {
        self.sessions.take(shape).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::KeyValue;

    fn quiet_editor(policy: EdgePolicy) -> Editor {
        Editor::new(EditorOptions {
            edge_policy: policy,
            edit_on_create: false,
            ..EditorOptions::default()
        })
    }

    /// Node whose top-left corner is at (x, y).
    fn node_at(editor: &mut Editor, x: f32, y: f32) -> NodeId {
        let d = editor.options().node_diameter;
        editor.create_node_at(Point::new(x + d / 2.0, y + d / 2.0))
    }

    #[test]
    fn test_scenario_create_connect_delete() {
        let mut editor = quiet_editor(EdgePolicy::Explicit);
        let n1 = node_at(&mut editor, 10.0, 10.0);
        let n2 = node_at(&mut editor, 100.0, 100.0);
        assert_eq!(editor.scene().node(n1).unwrap().origin(), Point::new(10.0, 10.0));
        assert_eq!(editor.scene().node(n2).unwrap().diameter(), 60.0);

        editor.select(ShapeId::Node(n1), SelectMode::Replace);
        editor.select(ShapeId::Node(n2), SelectMode::Add);
        let edge = editor.create_edge().expect("two nodes selected");

        assert_eq!(editor.scene().edge_count(), 1);
        assert_eq!(editor.scene().edge_endpoints(edge), Some((n1, n2)));

        editor.select(ShapeId::Node(n1), SelectMode::Replace);
        editor.delete_selection();

        let nodes: Vec<_> = editor.scene().nodes().map(|(id, _)| id).collect();
        assert_eq!(nodes, vec![n2]);
        assert_eq!(editor.scene().edge_count(), 0);
    }

    #[test]
    fn test_create_edge_needs_exactly_two_nodes() {
        let mut editor = quiet_editor(EdgePolicy::Explicit);
        let a = node_at(&mut editor, 0.0, 0.0);
        let b = node_at(&mut editor, 100.0, 0.0);
        let c = node_at(&mut editor, 200.0, 0.0);

        assert_eq!(editor.create_edge(), None, "nothing selected");

        editor.select(ShapeId::Node(a), SelectMode::Replace);
        assert_eq!(editor.create_edge(), None, "one node selected");

        editor.select(ShapeId::Node(b), SelectMode::Add);
        editor.select(ShapeId::Node(c), SelectMode::Add);
        assert_eq!(editor.create_edge(), None, "three nodes selected");
        assert_eq!(editor.scene().edge_count(), 0);
    }

    #[test]
    fn test_edge_direction_follows_selection_order() {
        let mut editor = quiet_editor(EdgePolicy::Explicit);
        let a = node_at(&mut editor, 0.0, 0.0);
        let b = node_at(&mut editor, 100.0, 0.0);

        editor.select(ShapeId::Node(b), SelectMode::Replace);
        editor.select(ShapeId::Node(a), SelectMode::Add);
        let edge = editor.create_edge().unwrap();
        assert_eq!(editor.scene().edge_endpoints(edge), Some((b, a)));
    }

    #[test]
    fn test_selected_edge_does_not_count_as_node() {
        let mut editor = quiet_editor(EdgePolicy::Explicit);
        let a = node_at(&mut editor, 0.0, 0.0);
        let b = node_at(&mut editor, 100.0, 0.0);
        editor.select(ShapeId::Node(a), SelectMode::Replace);
        editor.select(ShapeId::Node(b), SelectMode::Add);
        let edge = editor.create_edge().unwrap();

        editor.select(ShapeId::Edge(edge), SelectMode::Add);
        assert!(editor.create_edge().is_some());
        assert_eq!(editor.scene().edge_count(), 2);
    }

    #[test]
    fn test_delete_one_of_many_nodes() {
        let mut editor = quiet_editor(EdgePolicy::Explicit);
        let ids: Vec<_> = (0..5)
            .map(|i| node_at(&mut editor, i as f32 * 100.0, 0.0))
            .collect();
        let mut edges = Vec::new();
        for pair in ids.windows(2) {
            editor.select(ShapeId::Node(pair[0]), SelectMode::Replace);
            editor.select(ShapeId::Node(pair[1]), SelectMode::Add);
            edges.push(editor.create_edge().unwrap());
        }

        editor.select(ShapeId::Node(ids[2]), SelectMode::Replace);
        let deletion = editor.delete_selection();

        assert_eq!(editor.scene().node_count(), 4);
        assert_eq!(deletion.edges, vec![edges[1], edges[2]]);
        assert_eq!(editor.scene().edge_endpoints(edges[0]), Some((ids[0], ids[1])));
        assert_eq!(editor.scene().edge_endpoints(edges[3]), Some((ids[3], ids[4])));
    }

    #[test]
    fn test_streaming_policy_pairs_new_nodes() {
        let mut editor = quiet_editor(EdgePolicy::Streaming);
        let a = node_at(&mut editor, 0.0, 0.0);
        assert_eq!(editor.scene().edge_count(), 0);
        assert_eq!(editor.pending().waiting(), Some(a));

        let b = node_at(&mut editor, 100.0, 0.0);
        assert_eq!(editor.scene().edge_count(), 1);
        let (edge, _) = editor.scene().edges().next().unwrap();
        assert_eq!(editor.scene().edge_endpoints(edge), Some((a, b)));
        assert_eq!(editor.pending().waiting(), None);
    }

    #[test]
    fn test_streaming_forgets_deleted_pending_node() {
        let mut editor = quiet_editor(EdgePolicy::Streaming);
        let a = node_at(&mut editor, 0.0, 0.0);
        editor.select(ShapeId::Node(a), SelectMode::Replace);
        editor.delete_selection();
        assert_eq!(editor.pending().waiting(), None);

        // The next node starts a fresh pair instead of joining a dead one
        let b = node_at(&mut editor, 100.0, 0.0);
        assert_eq!(editor.scene().edge_count(), 0);
        assert_eq!(editor.pending().waiting(), Some(b));
    }

    #[test]
    fn test_save_overwrites_and_cancel_keeps() {
        let mut editor = quiet_editor(EdgePolicy::Explicit);
        let n = ShapeId::Node(node_at(&mut editor, 0.0, 0.0));
        editor.scene.set_label(n, KeyValue::new("K0", "V0")).unwrap();

        // Open, type, cancel
        assert!(editor.open_editor(n));
        let session = editor.edit_session_mut(n).unwrap();
        session.key = "typed".to_string();
        assert!(editor.cancel_edit(n));
        assert_eq!(editor.scene().label(n).unwrap(), &KeyValue::new("K0", "V0"));

        // Open, type, save
        assert!(editor.open_editor(n));
        let session = editor.edit_session_mut(n).unwrap();
        assert_eq!(session.key, "K0", "form restarts from the stored pair");
        session.key = "K1".to_string();
        session.value = "V1".to_string();
        editor.save_edit(n).unwrap();

        assert_eq!(editor.scene().label(n).unwrap(), &KeyValue::new("K1", "V1"));
        let captions = editor.scene().node(n.node().unwrap()).unwrap().captions();
        assert_eq!(captions.key.text, "K1");
        assert_eq!(captions.value.text, "V1");
        assert!(editor.sessions().is_empty());
    }

    #[test]
    fn test_open_editor_twice_reuses_form() {
        let mut editor = quiet_editor(EdgePolicy::Explicit);
        let n = ShapeId::Node(node_at(&mut editor, 0.0, 0.0));
        assert!(editor.open_editor(n));
        assert!(!editor.open_editor(n));
        assert_eq!(editor.sessions().len(), 1);
    }

    #[test]
    fn test_edit_on_create_opens_forms() {
        let mut editor = Editor::new(EditorOptions {
            edge_policy: EdgePolicy::Streaming,
            ..EditorOptions::default()
        });
        let a = node_at(&mut editor, 0.0, 0.0);
        let b = node_at(&mut editor, 100.0, 0.0);

        // Two node forms plus the automatically created edge's form
        assert_eq!(editor.sessions().len(), 3);
        assert!(editor.sessions().is_open(ShapeId::Node(a)));
        assert!(editor.sessions().is_open(ShapeId::Node(b)));
    }

    #[test]
    fn test_deleting_shape_closes_its_form() {
        let mut editor = Editor::new(EditorOptions::default());
        let a = node_at(&mut editor, 0.0, 0.0);
        let b = node_at(&mut editor, 100.0, 0.0);
        editor.select(ShapeId::Node(a), SelectMode::Replace);
        editor.select(ShapeId::Node(b), SelectMode::Add);
        let edge = editor.create_edge().unwrap();
        assert!(editor.sessions().is_open(ShapeId::Edge(edge)));

        editor.select(ShapeId::Node(a), SelectMode::Replace);
        editor.delete_selection();

        assert!(!editor.sessions().is_open(ShapeId::Node(a)));
        assert!(!editor.sessions().is_open(ShapeId::Edge(edge)));
        assert!(editor.sessions().is_open(ShapeId::Node(b)));
        // Saving a form whose shape is gone is a no-op
        assert_eq!(editor.save_edit(ShapeId::Edge(edge)), Ok(()));
    }

    #[test]
    fn test_form_for_recycled_id_is_fresh() {
        let mut editor = Editor::new(EditorOptions::default());
        let a = node_at(&mut editor, 0.0, 0.0);
        let old = editor.sessions().get(ShapeId::Node(a)).unwrap().serial();
        editor.select(ShapeId::Node(a), SelectMode::Replace);
        editor.delete_selection();

        // The graph hands the freed slot to the next node
        let b = node_at(&mut editor, 100.0, 0.0);
        assert_eq!(a, b);
        let session = editor.sessions().get(ShapeId::Node(b)).unwrap();
        assert_ne!(session.serial(), old);
        assert_eq!(session.key, "None");
    }

    #[test]
    fn test_remove_node_purges_bookkeeping() {
        let mut editor = Editor::new(EditorOptions {
            edge_policy: EdgePolicy::Streaming,
            ..EditorOptions::default()
        });
        let a = node_at(&mut editor, 0.0, 0.0);
        let b = node_at(&mut editor, 100.0, 0.0);
        let c = node_at(&mut editor, 200.0, 0.0);
        assert_eq!(editor.pending().waiting(), Some(c));

        let removed = editor.remove_node(a).unwrap();
        assert_eq!(removed.len(), 1);
        assert!(!editor.sessions().is_open(ShapeId::Node(a)));
        assert!(editor.sessions().is_open(ShapeId::Node(b)));

        editor.remove_node(c);
        assert_eq!(editor.pending().waiting(), None);
        assert_eq!(editor.remove_node(c), None, "already gone");
    }

    #[test]
    fn test_move_node_keeps_edges_attached() {
        let mut editor = quiet_editor(EdgePolicy::Streaming);
        let a = node_at(&mut editor, 0.0, 0.0);
        let b = node_at(&mut editor, 100.0, 0.0);
        let (edge, _) = editor.scene().edges().next().unwrap();

        editor.move_node(a, 0.0, 50.0).unwrap();
        let scene = editor.scene();
        let (na, nb) = (scene.node(a).unwrap(), scene.node(b).unwrap());
        let line = scene.edge(edge).unwrap().line().unwrap();
        assert_eq!(line.start, na.boundary_point_towards(nb.center()));
        assert_eq!(line.end, nb.boundary_point_towards(na.center()));
    }

    #[test]
    fn test_clear_selection() {
        let mut editor = quiet_editor(EdgePolicy::Explicit);
        let a = node_at(&mut editor, 0.0, 0.0);
        editor.select(ShapeId::Node(a), SelectMode::Replace);
        editor.clear_selection();
        assert!(editor.scene().selection().is_empty());
        assert!(editor.delete_selection().is_empty());
        assert_eq!(editor.scene().node_count(), 1);
    }
}
