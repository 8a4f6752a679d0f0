//! Interactive tool protocol shared by the eraser, brush and arrow tools.

use vectorkit_core::ObjectId;

use crate::model::{ObjectKind, OverlayKind, Point, SceneObject, Style, VectorPath};
use crate::scene::SceneGraph;

/// Which interactive tool is active in an editor session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Eraser,
    Brush,
    Arrow,
}

/// Gesture protocol the UI shell drives from pointer events.
///
/// Only one tool is active at a time. `cancel` must leave the scene exactly
/// as it was before `start`, apart from objects the tool never touched.
pub trait InteractiveTool {
    fn name(&self) -> &'static str;

    fn start(&mut self);

    /// Feeds one pointer position. Tools with a fixed number of points
    /// return `true` when this point completed the shape.
    fn add_point(&mut self, x: f64, y: f64) -> bool;

    /// Refreshes preview geometry for the current cursor position.
    fn update_preview(&mut self, x: f64, y: f64);

    /// Ends the gesture and returns the committed object, if one was made.
    fn finish(&mut self) -> Option<ObjectId>;

    fn cancel(&mut self);

    fn is_active(&self) -> bool;
}

/// Records which objects a tool made non-interactive during a gesture.
///
/// Only objects that were interactive at suspension time are recorded, so
/// restoring never re-enables something the host had disabled itself.
#[derive(Debug, Default)]
pub struct InteractionSuspension {
    suspended: Vec<ObjectId>,
}

impl InteractionSuspension {
    pub fn suspend_all<S: SceneGraph>(scene: &mut S) -> Self {
        let mut suspended = Vec::new();
        for id in scene.object_ids() {
            if scene.is_interactive(id) == Some(true) && scene.set_interactive(id, false) {
                suspended.push(id);
            }
        }
        Self { suspended }
    }

    pub fn suspended(&self) -> &[ObjectId] {
        &self.suspended
    }

    /// Re-enables every recorded object that still exists.
    pub fn restore<S: SceneGraph>(&mut self, scene: &mut S) {
        for id in self.suspended.drain(..) {
            scene.set_interactive(id, true);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.suspended.is_empty()
    }
}

/// Temporary, non-interactive objects a tool draws while a gesture runs.
#[derive(Debug, Default)]
pub struct PreviewLayer {
    ids: Vec<ObjectId>,
}

impl PreviewLayer {
    pub fn add<S: SceneGraph>(&mut self, scene: &mut S, mut object: SceneObject) -> ObjectId {
        object.interactive = false;
        let id = scene.add_object(object);
        self.ids.push(id);
        id
    }

    /// Dashed guide overlay through `points`.
    pub fn add_guide<S: SceneGraph>(
        &mut self,
        scene: &mut S,
        points: &[Point],
        style: Style,
    ) -> ObjectId {
        let guide = SceneObject::new(ObjectKind::Overlay {
            overlay: OverlayKind::Guide,
            path: VectorPath::from_points(points),
        })
        .with_style(style);
        self.add(scene, guide)
    }

    pub fn clear<S: SceneGraph>(&mut self, scene: &mut S) {
        for id in self.ids.drain(..) {
            scene.remove_object(id);
        }
    }

    pub fn ids(&self) -> &[ObjectId] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
