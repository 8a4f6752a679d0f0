//! Eraser: turns a freehand stroke into per-object clip masks.
//!
//! The stroke is captured in canvas space, then mapped into the local space
//! of every object it overlaps and composed with that object's existing
//! mask. Masks live with their object, so moving or rotating the object
//! later carries the erased region along.

use tracing::{debug, info, warn};
use vectorkit_core::{ObjectId, Result, SceneError, Shared};
use vectorkit_settings::EraserSettings;

use crate::model::{
    transform_scale, MaskPath, ObjectKind, OverlayKind, Point, SceneObject, Style, VectorPath,
};
use crate::sampler::smooth;
use crate::scene::SceneGraph;
use crate::tools::{InteractiveTool, PreviewLayer};
use crate::transform::to_object_space;

/// Outcome of one erase gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EraseReport {
    /// Objects that received a mask.
    pub attached: Vec<ObjectId>,
    /// Objects that overlapped the stroke but could not be masked.
    pub failed: Vec<(ObjectId, String)>,
}

impl EraseReport {
    pub fn is_empty(&self) -> bool {
        self.attached.is_empty() && self.failed.is_empty()
    }
}

pub struct EraserEngine<S: SceneGraph> {
    scene: Shared<S>,
    settings: EraserSettings,
    points: Vec<Point>,
    active: bool,
    preview: PreviewLayer,
    last_report: Option<EraseReport>,
}

impl<S: SceneGraph> EraserEngine<S> {
    pub fn new(scene: Shared<S>, settings: EraserSettings) -> Self {
        Self {
            scene,
            settings,
            points: Vec::new(),
            active: false,
            preview: PreviewLayer::default(),
            last_report: None,
        }
    }

    pub fn settings(&self) -> &EraserSettings {
        &self.settings
    }

    /// Report of the most recent finished gesture.
    pub fn last_report(&self) -> Option<&EraseReport> {
        self.last_report.as_ref()
    }

    /// Erasable objects whose bounds overlap the stroke's bounds.
    pub fn find_intersecting(&self, stroke: &VectorPath) -> Vec<ObjectId> {
        self.intersecting(stroke, self.settings.stroke_width)
    }

    fn intersecting(&self, stroke: &VectorPath, width: f64) -> Vec<ObjectId> {
        let Some(stroke_bounds) = stroke.bounds().map(|r| r.inflate(width / 2.0)) else {
            return Vec::new();
        };
        let scene = self.scene.borrow();
        scene
            .objects()
            .into_iter()
            .filter(|obj| obj.capabilities().erasable && !self.preview.ids().contains(&obj.id))
            .filter(|obj| {
                obj.bounding_rect()
                    .is_some_and(|bounds| bounds.intersects(&stroke_bounds))
            })
            .map(|obj| obj.id)
            .collect()
    }

    /// Attaches a canvas-space stroke to one object as a local-space mask.
    pub fn attach(&self, stroke: &VectorPath, id: ObjectId) -> Result<()> {
        self.attach_with_width(stroke, self.settings.stroke_width, id)
    }

    fn attach_with_width(&self, stroke: &VectorPath, width: f64, id: ObjectId) -> Result<()> {
        let mut scene = self.scene.borrow_mut();
        let object = scene
            .object_mut(id)
            .ok_or(SceneError::ObjectNotFound { id })?;
        let transform = object.transform;
        let target = object
            .as_erasable_mut()
            .ok_or_else(|| SceneError::Unsupported {
                id,
                operation: "erase".to_string(),
            })?;

        let local = to_object_space(stroke, id, &transform)?;
        let (sx, sy) = transform_scale(&transform);
        let local_width = width / ((sx + sy) / 2.0);
        target.attach_mask(MaskPath::erase_in_local_space(local, local_width));
        Ok(())
    }

    /// Masks every object the stroke overlaps.
    ///
    /// Failures on individual objects are logged and reported; the rest of
    /// the objects are still erased.
    pub fn erase(&self, stroke: &VectorPath) -> EraseReport {
        self.erase_with_width(stroke, self.settings.stroke_width)
    }

    fn erase_with_width(&self, stroke: &VectorPath, width: f64) -> EraseReport {
        let mut report = EraseReport::default();
        for id in self.intersecting(stroke, width) {
            match self.attach_with_width(stroke, width, id) {
                Ok(()) => report.attached.push(id),
                Err(e) => {
                    warn!("Skipping object {} while erasing: {}", id, e);
                    report.failed.push((id, e.to_string()));
                }
            }
        }
        debug!(
            "Erase stroke masked {} objects ({} failed)",
            report.attached.len(),
            report.failed.len()
        );
        report
    }

    /// Converts standalone legacy erase strokes into per-object masks.
    ///
    /// Returns `true` when at least one stroke was migrated and the scene
    /// needs to be redrawn.
    pub fn migrate_legacy_strokes(&self) -> bool {
        let legacy: Vec<ObjectId> = self
            .scene
            .borrow()
            .objects()
            .into_iter()
            .filter(|obj| matches!(obj.kind, ObjectKind::EraseStroke { .. }))
            .map(|obj| obj.id)
            .collect();

        let mut migrated = 0;
        for id in legacy {
            let removed = self.scene.borrow_mut().remove_object(id);
            let Some(SceneObject {
                kind: ObjectKind::EraseStroke { path, width },
                transform,
                ..
            }) = removed
            else {
                continue;
            };
            let canvas_path = path.transformed(&transform);
            let report = self.erase_with_width(&canvas_path, width);
            debug!(
                "Migrated legacy erase stroke {} onto {} objects",
                id,
                report.attached.len()
            );
            migrated += 1;
        }

        if migrated > 0 {
            info!("Migrated {} legacy erase strokes to clip masks", migrated);
        }
        migrated > 0
    }

    fn preview_style(&self) -> Style {
        Style {
            stroke: Some("#ff4040".to_string()),
            fill: None,
            stroke_width: self.settings.stroke_width,
            opacity: 0.4,
            dash: Vec::new(),
        }
    }
}

impl<S: SceneGraph> InteractiveTool for EraserEngine<S> {
    fn name(&self) -> &'static str {
        "eraser"
    }

    fn start(&mut self) {
        self.points.clear();
        self.active = true;
    }

    fn add_point(&mut self, x: f64, y: f64) -> bool {
        if self.active {
            self.points.push(Point::new(x, y));
        }
        false
    }

    fn update_preview(&mut self, x: f64, y: f64) {
        if !self.active || self.points.is_empty() {
            return;
        }
        let mut trace = self.points.clone();
        trace.push(Point::new(x, y));

        let style = self.preview_style();
        let mut scene = self.scene.borrow_mut();
        self.preview.clear(&mut *scene);
        let stroke = SceneObject::new(ObjectKind::Overlay {
            overlay: OverlayKind::StrokePreview,
            path: VectorPath::from_points(&trace),
        })
        .with_style(style);
        self.preview.add(&mut *scene, stroke);
    }

    fn finish(&mut self) -> Option<ObjectId> {
        self.preview.clear(&mut *self.scene.borrow_mut());
        self.active = false;
        let points = std::mem::take(&mut self.points);
        if points.len() < 2 {
            self.last_report = None;
            return None;
        }

        let stroke = VectorPath::from_points(&smooth(&points));
        self.last_report = Some(self.erase(&stroke));
        None
    }

    fn cancel(&mut self) {
        self.preview.clear(&mut *self.scene.borrow_mut());
        self.points.clear();
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
