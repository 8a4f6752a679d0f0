//! # VectorKit Designer
//!
//! The vector-scene editing kernel: interactive geometry tools and the
//! undo/redo history engine operating on a 2D scene graph of vector objects.
//!
//! ## Core Components
//!
//! ### Geometry
//! - **Model**: Points, rectangles, affine transforms, paths and clip masks
//! - **Transform**: Canvas-space to object-space path conversion
//! - **Sampler**: Arc-length sampling, point-at-distance queries, smoothing
//!
//! ### Tools
//! - **Eraser**: Freehand strokes become per-object, object-relative masks
//! - **Text on path**: Characters laid out along a sampled outline
//! - **Membrane brush**: Decorations stamped at even spacing along a stroke
//! - **Right-angle arrow**: Three-click elbow connector with arrowhead
//!
//! ### History
//! - **HistoryManager**: Full and differential snapshots, zip compressed,
//!   bounded, with undo/redo reconstruction
//! - **Persistence**: Snapshot records in JSON files or in memory
//!
//! ## Architecture
//!
//! ```text
//! EditorState (session)
//!   ├── Scene (host scene graph, shared handle)
//!   ├── Tools (eraser, brush, arrow) ── Sampler ── Transform
//!   ├── TextPathEngine
//!   └── HistoryManager ── compression, diff, snapshot records
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use vectorkit_designer::{EditorState, ObjectKind, SceneGraph, SceneObject, ToolKind};
//! use vectorkit_settings::Config;
//!
//! let mut editor = EditorState::new(Config::default()).unwrap();
//! editor.scene().borrow_mut().add_object(
//!     SceneObject::new(ObjectKind::Rectangle { width: 40.0, height: 40.0 }).at(10.0, 10.0),
//! );
//! editor.commit().unwrap();
//!
//! editor.activate_tool(ToolKind::Arrow);
//! editor.pointer_down(0.0, 0.0).unwrap();
//! editor.pointer_down(100.0, 0.0).unwrap();
//! let arrow = editor.pointer_down(100.0, 80.0).unwrap();
//! assert!(arrow.is_some());
//! assert!(editor.undo().unwrap());
//! ```

pub mod arrow;
pub mod brush;
pub mod editor_state;
pub mod eraser;
pub mod history;
pub mod model;
pub mod persistence;
pub mod sampler;
pub mod scene;
pub mod text_path;
pub mod tools;
pub mod transform;

pub use arrow::{arrowhead, ArrowMeta, ArrowState, RightAngleArrowTool};
pub use brush::{
    instance_count, place_instances, BrushState, BrushStrokeMeta, MembraneBrush, Placement,
};
pub use editor_state::EditorState;
pub use eraser::{EraseReport, EraserEngine};
pub use history::{
    FullIndex, HistoryManager, HistorySnapshot, SceneDiff, SnapshotKind, SnapshotRecord,
};
pub use model::{
    placement_transform, transform_scale, Capabilities, ClipMask, Erasable, MaskPath,
    ObjectKind, OverlayKind, PathSampleable, PathSegment, Point, Rect, SceneObject, Style,
    Transform, VectorPath,
};
pub use persistence::{read_records, HistoryFile, JsonFileStore, MemoryStore, SnapshotStore};
pub use sampler::{
    point_at_distance, sample, smooth, total_length, PathPosition, SamplePoint, SampleShape,
};
pub use scene::{Scene, SceneDocument, SceneGraph};
pub use text_path::{
    layout, GlyphPlacement, TextPathEngine, TextPathOptions, TextPathOptionsPatch,
    TextPathRecord,
};
pub use tools::{InteractionSuspension, InteractiveTool, PreviewLayer, ToolKind};
pub use transform::{to_canvas_space, to_object_space};
