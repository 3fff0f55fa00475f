pub mod edge;
pub mod edit;
pub mod editor;
pub mod geometry;
pub mod label;
pub mod node;
pub mod pending;
pub mod scene;
pub mod selection;

pub use edge::Edge;
pub use edit::{EditSession, EditSessions};
pub use editor::{EdgePolicy, Editor, EditorOptions};
pub use geometry::{Point, Rect, Segment};
pub use label::{Caption, Captions, KeyValue};
pub use node::Node;
pub use pending::PendingPair;
pub use scene::{Deletion, EdgeId, NodeId, Scene, SceneError, ShapeId};
pub use selection::{SelectMode, Selection};
