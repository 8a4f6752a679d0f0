//! Scene object model: points, rectangles, affine transforms, paths,
//! clip masks and the tagged object kinds the tools dispatch on.

use lyon::geom::euclid::{default::Transform2D, Angle};
use serde::{Deserialize, Serialize};

mod mask;
mod object;
mod path;

pub use mask::{ClipMask, MaskPath};
pub use object::{
    Capabilities, Erasable, ObjectKind, OverlayKind, PathSampleable, SceneObject, Style,
};
pub use path::{PathSegment, VectorPath, FLATTEN_TOLERANCE};

/// Affine matrix mapping an object's local space into canvas space.
pub type Transform = Transform2D<f64>;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Angle in radians of the vector from `self` to `other`.
    pub fn angle_to(&self, other: &Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Moves the point `distance` along the direction `angle` (radians).
    pub fn offset_polar(&self, angle: f64, distance: f64) -> Point {
        Point::new(
            self.x + distance * angle.cos(),
            self.y + distance * angle.sin(),
        )
    }

    pub fn transformed(&self, t: &Transform) -> Point {
        Point::from_lyon(t.transform_point(self.to_lyon()))
    }

    pub fn to_lyon(self) -> lyon::geom::Point<f64> {
        lyon::geom::point(self.x, self.y)
    }

    pub fn from_lyon(p: lyon::geom::Point<f64>) -> Self {
        Self::new(p.x, p.y)
    }
}

/// Axis-aligned rectangle in canvas or local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x: min_x.min(max_x),
            min_y: min_y.min(max_y),
            max_x: max_x.max(min_x),
            max_y: max_y.max(min_y),
        }
    }

    /// Smallest rectangle containing every point, `None` for an empty input.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Rect> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut rect = Rect::new(first.x, first.y, first.x, first.y);
        for p in iter {
            rect.min_x = rect.min_x.min(p.x);
            rect.min_y = rect.min_y.min(p.y);
            rect.max_x = rect.max_x.max(p.x);
            rect.max_y = rect.max_y.max(p.y);
        }
        Some(rect)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Overlap test; rectangles that only touch on an edge count as intersecting.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn inflate(&self, amount: f64) -> Rect {
        Rect::new(
            self.min_x - amount,
            self.min_y - amount,
            self.max_x + amount,
            self.max_y + amount,
        )
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.min_x, self.min_y),
            Point::new(self.max_x, self.min_y),
            Point::new(self.max_x, self.max_y),
            Point::new(self.min_x, self.max_y),
        ]
    }

    /// Axis-aligned bounds of this rectangle after applying `t`.
    pub fn transformed(&self, t: &Transform) -> Rect {
        let corners = self.corners().map(|c| c.transformed(t));
        Rect::from_points(corners.iter()).unwrap_or(*self)
    }
}

/// Rotation by `degrees` about the origin followed by a translation to `at`.
pub fn placement_transform(at: Point, degrees: f64) -> Transform {
    Transform::rotation(Angle::degrees(degrees)).then_translate(lyon::geom::vector(at.x, at.y))
}

/// Scale factors along the transformed x and y axes.
pub fn transform_scale(t: &Transform) -> (f64, f64) {
    (t.m11.hypot(t.m12), t.m21.hypot(t.m22))
}

pub(crate) fn identity() -> Transform {
    Transform::identity()
}

/// Serializes a [`Transform`] as `[m11, m12, m21, m22, m31, m32]`.
pub(crate) mod matrix_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Transform;

    pub fn serialize<S>(t: &Transform, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        [t.m11, t.m12, t.m21, t.m22, t.m31, t.m32].serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Transform, D::Error>
    where
        D: Deserializer<'de>,
    {
        let m = <[f64; 6]>::deserialize(deserializer)?;
        Ok(Transform::new(m[0], m[1], m[2], m[3], m[4], m[5]))
    }
}
