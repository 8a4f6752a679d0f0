//! Right-angle arrow: a three-click connector with an arrowhead.
//!
//! The first click sets the start, the second the elbow and the third the
//! tip. While clicking, dashed guides follow the cursor. The finished arrow
//! is one group holding the polyline and the arrowhead.

use std::collections::HashMap;

use smallvec::SmallVec;
use tracing::debug;
use vectorkit_core::{GeometryError, ObjectId, Result, SceneError, Shared};
use vectorkit_settings::ArrowSettings;

use crate::model::{transform_scale, ObjectKind, Point, SceneObject, Style, Transform};
use crate::scene::SceneGraph;
use crate::tools::{InteractionSuspension, InteractiveTool, PreviewLayer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowState {
    Empty,
    StartSet,
    ElbowSet,
    Complete,
}

/// Arrowhead triangle in coordinates relative to its tip.
///
/// `angle` is the direction of travel into the tip, in radians.
pub fn arrowhead(angle: f64, length: f64, half_angle_deg: f64) -> Vec<Point> {
    let spread = half_angle_deg.to_radians();
    let tip = Point::new(0.0, 0.0);
    vec![
        tip,
        tip.offset_polar(angle + std::f64::consts::PI - spread, length),
        tip.offset_polar(angle + std::f64::consts::PI + spread, length),
    ]
}

/// Geometry of a committed arrow, kept beside the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowMeta {
    pub start: Point,
    pub elbow: Point,
    pub end: Point,
}

pub struct RightAngleArrowTool<S: SceneGraph> {
    scene: Shared<S>,
    settings: ArrowSettings,
    points: SmallVec<[Point; 3]>,
    state: ArrowState,
    preview: PreviewLayer,
    suspension: InteractionSuspension,
    arrows: HashMap<ObjectId, ArrowMeta>,
    completed: Option<ObjectId>,
    active: bool,
}

impl<S: SceneGraph> RightAngleArrowTool<S> {
    pub fn new(scene: Shared<S>, settings: ArrowSettings) -> Self {
        Self {
            scene,
            settings,
            points: SmallVec::new(),
            state: ArrowState::Empty,
            preview: PreviewLayer::default(),
            suspension: InteractionSuspension::default(),
            arrows: HashMap::new(),
            completed: None,
            active: false,
        }
    }

    pub fn state(&self) -> ArrowState {
        self.state
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn arrow_meta(&self, group: ObjectId) -> Option<&ArrowMeta> {
        self.arrows.get(&group)
    }

    pub fn preview_ids(&self) -> &[ObjectId] {
        self.preview.ids()
    }

    fn snap(&self, x: f64, y: f64) -> Point {
        match self.settings.grid_size {
            Some(grid) if grid > 0.0 => {
                Point::new((x / grid).round() * grid, (y / grid).round() * grid)
            }
            _ => Point::new(x, y),
        }
    }

    fn line_style(&self, dashed: bool) -> Style {
        Style {
            stroke: Some(self.settings.stroke.clone()),
            fill: None,
            stroke_width: self.settings.stroke_width,
            opacity: 1.0,
            dash: if dashed {
                self.settings.dash.clone()
            } else {
                Vec::new()
            },
        }
    }

    fn head(&self, tip: Point, angle: f64) -> SceneObject {
        SceneObject::new(ObjectKind::Polygon {
            points: arrowhead(angle, self.settings.head_length, self.settings.head_angle_deg),
        })
        .with_transform(Transform::translation(tip.x, tip.y))
        .with_style(Style {
            fill: Some(self.settings.stroke.clone()),
            ..self.line_style(false)
        })
    }

    fn commit(&mut self) -> ObjectId {
        let (start, elbow, end) = (self.points[0], self.points[1], self.points[2]);
        let polyline = SceneObject::new(ObjectKind::Polyline {
            points: vec![start, elbow, end],
        })
        .with_style(self.line_style(false));
        let head = self.head(end, elbow.angle_to(&end));
        let group = SceneObject::new(ObjectKind::Group {
            children: vec![polyline, head],
        });

        self.release();
        let id = self.scene.borrow_mut().add_object(group);
        self.arrows.insert(id, ArrowMeta { start, elbow, end });
        debug!("Committed right-angle arrow {}", id);
        id
    }

    fn release(&mut self) {
        self.preview.clear(&mut *self.scene.borrow_mut());
        self.suspension.restore(&mut *self.scene.borrow_mut());
        self.points.clear();
        self.active = false;
    }

    /// Keeps the arrowhead's on-screen size after `group` was rescaled.
    ///
    /// The head is counter-scaled by the inverse of the group's scale and
    /// stays anchored on the arrow's end point.
    pub fn handle_group_scaled(&self, group: ObjectId) -> Result<()> {
        let meta = self
            .arrows
            .get(&group)
            .ok_or(SceneError::ObjectNotFound { id: group })?;
        let mut scene = self.scene.borrow_mut();
        let object = scene
            .object_mut(group)
            .ok_or(SceneError::ObjectNotFound { id: group })?;
        let (sx, sy) = transform_scale(&object.transform);
        if sx <= f64::EPSILON || sy <= f64::EPSILON {
            return Err(GeometryError::NonInvertibleTransform {
                id: group,
                determinant: object.transform.determinant(),
            }
            .into());
        }

        let ObjectKind::Group { children } = &mut object.kind else {
            return Err(SceneError::Unsupported {
                id: group,
                operation: "arrowhead scaling".to_string(),
            }
            .into());
        };
        let head = children.get_mut(1).ok_or_else(|| SceneError::Unsupported {
            id: group,
            operation: "arrowhead scaling".to_string(),
        })?;
        head.transform = Transform::scale(1.0 / sx, 1.0 / sy)
            .then_translate(lyon::geom::vector(meta.end.x, meta.end.y));
        Ok(())
    }
}

impl<S: SceneGraph> InteractiveTool for RightAngleArrowTool<S> {
    fn name(&self) -> &'static str {
        "right_angle_arrow"
    }

    fn start(&mut self) {
        if self.is_active() {
            self.release();
        }
        self.suspension = InteractionSuspension::suspend_all(&mut *self.scene.borrow_mut());
        self.points.clear();
        self.completed = None;
        self.state = ArrowState::Empty;
        self.active = true;
    }

    fn add_point(&mut self, x: f64, y: f64) -> bool {
        if !self.active {
            return false;
        }
        let point = self.snap(x, y);
        self.points.push(point);
        match self.points.len() {
            1 => {
                self.state = ArrowState::StartSet;
                false
            }
            2 => {
                self.state = ArrowState::ElbowSet;
                false
            }
            _ => {
                self.completed = Some(self.commit());
                self.state = ArrowState::Complete;
                true
            }
        }
    }

    fn update_preview(&mut self, x: f64, y: f64) {
        let cursor = self.snap(x, y);
        let guide = self.line_style(true);
        let head = match self.points.as_slice() {
            [_, elbow] => Some(self.head(cursor, elbow.angle_to(&cursor))),
            _ => None,
        };
        let mut trace: Vec<Point> = self.points.to_vec();
        trace.push(cursor);

        let mut scene = self.scene.borrow_mut();
        self.preview.clear(&mut *scene);
        if !self.active || self.points.is_empty() {
            return;
        }
        self.preview.add_guide(&mut *scene, &trace, guide);
        if let Some(head) = head {
            self.preview.add(&mut *scene, head);
        }
    }

    fn finish(&mut self) -> Option<ObjectId> {
        if self.state != ArrowState::Complete {
            self.cancel();
            return None;
        }
        self.state = ArrowState::Empty;
        self.completed.take()
    }

    fn cancel(&mut self) {
        self.release();
        self.completed = None;
        self.state = ArrowState::Empty;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
