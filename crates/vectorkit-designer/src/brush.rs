//! Membrane brush: stamps a decoration at even spacing along a freehand
//! stroke.

use std::collections::HashMap;
use std::f64::consts::FRAC_PI_2;

use tracing::debug;
use vectorkit_core::{ObjectId, Shared};
use vectorkit_settings::BrushSettings;

use crate::model::{placement_transform, ObjectKind, Point, SceneObject};
use crate::sampler::{point_at_distance, smooth, total_length};
use crate::scene::SceneGraph;
use crate::tools::{InteractionSuspension, InteractiveTool, PreviewLayer};

/// Perpendicular offset of the mirrored row, as a multiple of the icon size.
const MIRROR_OFFSET: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushState {
    Idle,
    Drawing,
    Previewing,
    Committed,
    Cancelled,
}

/// One stamped instance of the decoration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Point,
    /// Rotation in degrees.
    pub rotation: f64,
    pub mirrored: bool,
}

/// Number of instances for a stroke of `length`.
pub fn instance_count(length: f64, icon_size: f64, spacing: f64) -> usize {
    let pitch = icon_size + spacing;
    if pitch <= 0.0 || !length.is_finite() {
        return 2;
    }
    ((length / pitch).floor() as usize).max(2)
}

/// Computes instance placements along an already smoothed stroke.
///
/// Instances sit at the centers of `n` equal arc-length slots. With
/// `double_sided`, a second row follows on the other side of the stroke,
/// turned half a revolution.
pub fn place_instances(
    points: &[Point],
    settings: &BrushSettings,
    double_sided: bool,
) -> Vec<Placement> {
    let Some(first) = points.first().copied() else {
        return Vec::new();
    };
    let length = total_length(points);
    let n = instance_count(length, settings.icon_size, settings.spacing);

    let primary: Vec<(Point, f64)> = (0..n)
        .map(|i| {
            if length <= 0.0 {
                return (first, 0.0);
            }
            let d = (i as f64 + 0.5) * length / n as f64;
            point_at_distance(points, d)
                .map(|pos| (pos.point, pos.angle))
                .unwrap_or((first, 0.0))
        })
        .collect();

    let rotation = |angle: f64| {
        if settings.rotate_to_path {
            angle.to_degrees()
        } else {
            0.0
        }
    };

    let mut placements: Vec<Placement> = primary
        .iter()
        .map(|&(position, angle)| Placement {
            position,
            rotation: rotation(angle),
            mirrored: false,
        })
        .collect();

    if double_sided {
        let offset = MIRROR_OFFSET * settings.icon_size;
        placements.extend(primary.iter().map(|&(position, angle)| Placement {
            position: position.offset_polar(angle + FRAC_PI_2, offset),
            rotation: rotation(angle) + 180.0,
            mirrored: true,
        }));
    }
    placements
}

/// Side-table entry for a committed brush stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct BrushStrokeMeta {
    /// Smoothed stroke the instances were placed on.
    pub path: Vec<Point>,
    pub icon_size: f64,
    pub spacing: f64,
    pub double_sided: bool,
    pub instances: usize,
}

pub struct MembraneBrush<S: SceneGraph> {
    scene: Shared<S>,
    settings: BrushSettings,
    decoration: SceneObject,
    state: BrushState,
    points: Vec<Point>,
    preview: PreviewLayer,
    suspension: InteractionSuspension,
    strokes: HashMap<ObjectId, BrushStrokeMeta>,
}

impl<S: SceneGraph> MembraneBrush<S> {
    pub fn new(scene: Shared<S>, settings: BrushSettings) -> Self {
        let decoration = SceneObject::new(ObjectKind::Circle {
            radius: settings.icon_size / 2.0,
        });
        Self {
            scene,
            settings,
            decoration,
            state: BrushState::Idle,
            points: Vec::new(),
            preview: PreviewLayer::default(),
            suspension: InteractionSuspension::default(),
            strokes: HashMap::new(),
        }
    }

    /// Uses `decoration` (centered on its local origin) as the stamped shape.
    pub fn with_decoration(mut self, decoration: SceneObject) -> Self {
        self.decoration = decoration;
        self
    }

    pub fn state(&self) -> BrushState {
        self.state
    }

    pub fn settings(&self) -> &BrushSettings {
        &self.settings
    }

    pub fn stroke_meta(&self, group: ObjectId) -> Option<&BrushStrokeMeta> {
        self.strokes.get(&group)
    }

    /// Ids of the preview instances currently on the canvas.
    pub fn preview_ids(&self) -> &[ObjectId] {
        self.preview.ids()
    }

    fn instance(&self, placement: &Placement, opacity: f64) -> SceneObject {
        let mut instance = self.decoration.clone();
        instance.id = ObjectId::UNASSIGNED;
        instance.transform = instance
            .transform
            .then(&placement_transform(placement.position, placement.rotation));
        instance.style.opacity *= opacity;
        instance
    }

    fn release(&mut self) {
        self.preview.clear(&mut *self.scene.borrow_mut());
        self.suspension.restore(&mut *self.scene.borrow_mut());
        self.points.clear();
    }
}

impl<S: SceneGraph> InteractiveTool for MembraneBrush<S> {
    fn name(&self) -> &'static str {
        "membrane_brush"
    }

    fn start(&mut self) {
        if self.is_active() {
            self.release();
        }
        self.suspension = InteractionSuspension::suspend_all(&mut *self.scene.borrow_mut());
        self.points.clear();
        self.state = BrushState::Drawing;
    }

    fn add_point(&mut self, x: f64, y: f64) -> bool {
        if self.is_active() {
            self.points.push(Point::new(x, y));
        }
        false
    }

    fn update_preview(&mut self, x: f64, y: f64) {
        if !self.is_active() {
            return;
        }
        let mut trace = self.points.clone();
        let cursor = Point::new(x, y);
        if trace.last() != Some(&cursor) {
            trace.push(cursor);
        }
        if trace.len() < 2 {
            return;
        }

        let placements = place_instances(&smooth(&trace), &self.settings, false);
        let instances: Vec<SceneObject> = placements
            .iter()
            .map(|p| self.instance(p, self.settings.preview_opacity))
            .collect();

        let mut scene = self.scene.borrow_mut();
        self.preview.clear(&mut *scene);
        for instance in instances {
            self.preview.add(&mut *scene, instance);
        }
        self.state = BrushState::Previewing;
    }

    fn finish(&mut self) -> Option<ObjectId> {
        if !self.is_active() {
            return None;
        }
        let points = std::mem::take(&mut self.points);
        self.release();
        if points.len() < 2 {
            self.state = BrushState::Cancelled;
            return None;
        }

        let path = smooth(&points);
        let placements = place_instances(&path, &self.settings, self.settings.double_sided);
        let children: Vec<SceneObject> =
            placements.iter().map(|p| self.instance(p, 1.0)).collect();
        let instances = children.len();
        let id = self
            .scene
            .borrow_mut()
            .add_object(SceneObject::new(ObjectKind::Group { children }));

        self.strokes.insert(
            id,
            BrushStrokeMeta {
                path,
                icon_size: self.settings.icon_size,
                spacing: self.settings.spacing,
                double_sided: self.settings.double_sided,
                instances,
            },
        );
        self.state = BrushState::Committed;
        debug!("Committed brush stroke {} with {} instances", id, instances);
        Some(id)
    }

    fn cancel(&mut self) {
        self.release();
        self.state = BrushState::Cancelled;
    }

    fn is_active(&self) -> bool {
        matches!(self.state, BrushState::Drawing | BrushState::Previewing)
    }
}
