//! Interactive graph editor: double-click to add vertices, drag to move them,
//! shift-drag between vertices to connect them, type letters to label a
//! vertex and digits to weight an edge, Delete to remove the selection.

mod blink;
mod component;
mod geometry;
mod graph;
mod labels;
mod render;
mod state;
mod types;

pub use blink::{BlinkTimer, IntervalBlink};
pub use component::GraphEditorCanvas;
pub use geometry::{Point, closest_boundary_point};
pub use graph::{Edge, Graph, TempEdge, Vertex};
pub use labels::{LabelEdit, TakenLetters, encode_label, encode_weight};
pub use state::{EditorSession, Mode};
pub use types::{EdgeId, EditorConfig, Key, LABEL_SPACE, Repaint, Selection, VertexId};
