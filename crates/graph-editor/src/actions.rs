use labeled_graph::{
    EdgePolicy, Editor, Point, Rect, SelectMode, ShapeId,
};
use log::{debug, warn};

use crate::settings::NODE_DIAMETER_RANGE;

/// Actions that can be dispatched to modify the editor state
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Toolbar Actions
    /// Create a node centred on a canvas position
    CreateNode { at: Point },
    /// Connect the two selected nodes
    CreateEdge,
    /// Remove the selection (Delete key)
    DeleteSelection,
    /// Change the diameter of nodes created from now on
    SetNodeDiameter { diameter: f32 },
    /// Switch between explicit and streaming edge creation
    SetEdgePolicy { policy: EdgePolicy },

    // Canvas Actions
    /// Drop the whole selection (press on empty canvas)
    ClearSelection,
    /// Pick a shape under the pointer
    Select { shape: ShapeId, mode: SelectMode },
    /// Rubber-band selection
    SelectInRect { rect: Rect, mode: SelectMode },
    /// Drag every selected node by a delta
    DragSelection { dx: f32, dy: f32 },

    // Edit Dialog Actions
    /// Open the edit dialog of a shape (double-click)
    OpenEditor { shape: ShapeId },
    /// Replace the text typed into an open dialog
    UpdateEditBuffer {
        shape: ShapeId,
        key: String,
        value: String,
    },
    /// Write the dialog fields back into its shape
    SaveEdit { shape: ShapeId },
    /// Close the dialog, leaving the shape unchanged
    CancelEdit { shape: ShapeId },
}

/// Apply a single action to the editor
pub fn update(editor: &mut Editor, action: Action) {
    match action {
        // Toolbar Actions
        Action::CreateNode { at } => {
            editor.create_node_at(at);
        }
        Action::CreateEdge => {
            editor.create_edge();
        }
        Action::DeleteSelection => {
            let deletion = editor.delete_selection();
            if !deletion.is_empty() {
                debug!(
                    "deleted {} node(s) and {} edge(s)",
                    deletion.nodes.len(),
                    deletion.edges.len()
                );
            }
        }
        Action::SetNodeDiameter { diameter } => {
            editor.set_node_diameter(NODE_DIAMETER_RANGE.clamp(diameter));
        }
        Action::SetEdgePolicy { policy } => {
            editor.set_edge_policy(policy);
        }

        // Canvas Actions
        Action::ClearSelection => editor.clear_selection(),
        Action::Select { shape, mode } => editor.select(shape, mode),
        Action::SelectInRect { rect, mode } => {
            editor.select_in_rect(rect, mode)
        }
        Action::DragSelection { dx, dy } => editor.drag_selection(dx, dy),

        // Edit Dialog Actions
        Action::OpenEditor { shape } => {
            editor.open_editor(shape);
        }
        Action::UpdateEditBuffer { shape, key, value } => {
            if let Some(session) = editor.edit_session_mut(shape) {
                session.key = key;
                session.value = value;
            }
        }
        Action::SaveEdit { shape } => {
            if let Err(e) = editor.save_edit(shape) {
                warn!("edit discarded: {}", e);
            }
        }
        Action::CancelEdit { shape } => {
            editor.cancel_edit(shape);
        }
    }
}
