//! Scene objects and the capability markers the tools resolve per kind.

use serde::{Deserialize, Serialize};
use vectorkit_core::ObjectId;

use super::{matrix_serde, ClipMask, MaskPath, Point, Rect, Transform, VectorPath};
use crate::sampler::SampleShape;

/// Helper geometry drawn by the editor itself, never erased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayKind {
    GridLine,
    Ruler,
    Guide,
    Handle,
    StrokePreview,
}

/// Shape data for each supported object type.
///
/// Geometry is in the object's local space; `SceneObject::transform` maps it
/// onto the canvas. Circles and ellipses are centered on the local origin,
/// rectangles span from the origin to `(width, height)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectKind {
    Rectangle {
        width: f64,
        height: f64,
    },
    Circle {
        radius: f64,
    },
    Ellipse {
        rx: f64,
        ry: f64,
    },
    Path {
        path: VectorPath,
    },
    Polyline {
        points: Vec<Point>,
    },
    Polygon {
        points: Vec<Point>,
    },
    /// A text run, anchored at its baseline center.
    Text {
        content: String,
        font_size: f64,
    },
    Group {
        children: Vec<SceneObject>,
    },
    Overlay {
        overlay: OverlayKind,
        path: VectorPath,
    },
    /// Whole-canvas erase stroke written by older documents.
    EraseStroke {
        path: VectorPath,
        width: f64,
    },
}

/// What the tools may do with an object kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub erasable: bool,
    pub path_sampleable: bool,
}

impl ObjectKind {
    pub fn capabilities(&self) -> Capabilities {
        match self {
            ObjectKind::Rectangle { .. }
            | ObjectKind::Circle { .. }
            | ObjectKind::Ellipse { .. }
            | ObjectKind::Path { .. }
            | ObjectKind::Polyline { .. }
            | ObjectKind::Polygon { .. } => Capabilities {
                erasable: true,
                path_sampleable: true,
            },
            ObjectKind::Text { .. } | ObjectKind::Group { .. } => Capabilities {
                erasable: true,
                path_sampleable: false,
            },
            ObjectKind::Overlay { .. } | ObjectKind::EraseStroke { .. } => {
                Capabilities::default()
            }
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ObjectKind::Rectangle { .. } => "rectangle",
            ObjectKind::Circle { .. } => "circle",
            ObjectKind::Ellipse { .. } => "ellipse",
            ObjectKind::Path { .. } => "path",
            ObjectKind::Polyline { .. } => "polyline",
            ObjectKind::Polygon { .. } => "polygon",
            ObjectKind::Text { .. } => "text",
            ObjectKind::Group { .. } => "group",
            ObjectKind::Overlay { .. } => "overlay",
            ObjectKind::EraseStroke { .. } => "erase_stroke",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub stroke: Option<String>,
    pub fill: Option<String>,
    pub stroke_width: f64,
    pub opacity: f64,
    pub dash: Vec<f64>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke: Some("#000000".to_string()),
            fill: None,
            stroke_width: 1.0,
            opacity: 1.0,
            dash: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    #[serde(default)]
    pub id: ObjectId,
    #[serde(flatten)]
    pub kind: ObjectKind,
    #[serde(with = "matrix_serde", default = "super::identity")]
    pub transform: Transform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip: Option<ClipMask>,
    #[serde(default)]
    pub style: Style,
    /// Whether the object reacts to selection and pointer input.
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub interactive: bool,
}

impl SceneObject {
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            id: ObjectId::UNASSIGNED,
            kind,
            transform: Transform::identity(),
            clip: None,
            style: Style::default(),
            interactive: true,
        }
    }

    /// Places the object's local origin at `(x, y)`.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.transform = Transform::translation(x, y);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn capabilities(&self) -> Capabilities {
        self.kind.capabilities()
    }

    /// Bounds in the object's own coordinate space.
    pub fn local_bounds(&self) -> Option<Rect> {
        match &self.kind {
            ObjectKind::Rectangle { width, height } => Some(Rect::new(0.0, 0.0, *width, *height)),
            ObjectKind::Circle { radius } => Some(Rect::new(-radius, -radius, *radius, *radius)),
            ObjectKind::Ellipse { rx, ry } => Some(Rect::new(-rx, -ry, *rx, *ry)),
            ObjectKind::Path { path } | ObjectKind::Overlay { path, .. } => path.bounds(),
            ObjectKind::Polyline { points } | ObjectKind::Polygon { points } => {
                Rect::from_points(points)
            }
            ObjectKind::Text { content, font_size } => {
                let half_width = content.chars().count() as f64 * font_size * 0.3;
                Some(Rect::new(
                    -half_width,
                    -font_size * 0.8,
                    half_width,
                    font_size * 0.2,
                ))
            }
            ObjectKind::Group { children } => children
                .iter()
                .filter_map(SceneObject::bounding_rect)
                .reduce(|a, b| a.union(&b)),
            ObjectKind::EraseStroke { path, width } => {
                path.bounds().map(|r| r.inflate(width / 2.0))
            }
        }
    }

    /// Bounds in the parent's space (the canvas for top-level objects).
    pub fn bounding_rect(&self) -> Option<Rect> {
        self.local_bounds().map(|r| r.transformed(&self.transform))
    }

    /// Clip mask paths mapped onto the canvas with the current transform.
    pub fn mask_in_canvas_space(&self) -> Vec<VectorPath> {
        self.clip
            .as_ref()
            .map(|clip| {
                clip.masks()
                    .iter()
                    .map(|m| m.to_canvas(&self.transform))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn as_erasable_mut(&mut self) -> Option<&mut dyn Erasable> {
        if self.capabilities().erasable {
            Some(self)
        } else {
            None
        }
    }

    pub fn as_path_sampleable(&self) -> Option<&dyn PathSampleable> {
        if self.capabilities().path_sampleable {
            Some(self)
        } else {
            None
        }
    }
}

/// Objects that accept erase masks.
pub trait Erasable {
    fn clip_mask(&self) -> Option<&ClipMask>;

    /// Composes `mask` with whatever mask the object already carries.
    fn attach_mask(&mut self, mask: MaskPath);

    fn clear_mask(&mut self) -> Option<ClipMask>;
}

impl Erasable for SceneObject {
    fn clip_mask(&self) -> Option<&ClipMask> {
        self.clip.as_ref()
    }

    fn attach_mask(&mut self, mask: MaskPath) {
        self.clip = Some(ClipMask::merge(self.clip.take(), mask));
    }

    fn clear_mask(&mut self) -> Option<ClipMask> {
        self.clip.take()
    }
}

/// Objects whose outline can carry text or decorations.
pub trait PathSampleable {
    /// The outline in canvas space, ready for sampling.
    fn sample_shape(&self) -> SampleShape;
}

impl PathSampleable for SceneObject {
    fn sample_shape(&self) -> SampleShape {
        let t = &self.transform;
        let (sx, sy) = super::transform_scale(t);
        let rotation = t.m12.atan2(t.m11);
        let center = Point::new(t.m31, t.m32);

        match &self.kind {
            ObjectKind::Circle { radius } if (sx - sy).abs() < 1e-9 && t.m12.abs() < 1e-12 => {
                SampleShape::Circle {
                    center,
                    radius: radius * sx,
                }
            }
            ObjectKind::Circle { radius } => SampleShape::Ellipse {
                center,
                rx: radius * sx,
                ry: radius * sy,
                rotation,
            },
            ObjectKind::Ellipse { rx, ry } => SampleShape::Ellipse {
                center,
                rx: rx * sx,
                ry: ry * sy,
                rotation,
            },
            ObjectKind::Rectangle { width, height } => {
                let mut corners = Rect::new(0.0, 0.0, *width, *height).corners().to_vec();
                corners.push(corners[0]);
                SampleShape::Polyline(corners.iter().map(|p| p.transformed(t)).collect())
            }
            ObjectKind::Polygon { points } => {
                let mut pts: Vec<Point> = points.iter().map(|p| p.transformed(t)).collect();
                if let Some(first) = pts.first().copied() {
                    pts.push(first);
                }
                SampleShape::Polyline(pts)
            }
            ObjectKind::Polyline { points } => {
                SampleShape::Polyline(points.iter().map(|p| p.transformed(t)).collect())
            }
            ObjectKind::Path { path } => SampleShape::Polyline(path.transformed(t).to_polyline()),
            _ => SampleShape::Polyline(Vec::new()),
        }
    }
}
