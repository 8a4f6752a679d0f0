//! Vector paths built from move, line and cubic segments.

use lyon::geom::CubicBezierSegment;
use serde::{Deserialize, Serialize};

use super::{Point, Rect, Transform};

/// Tolerance used whenever a path is flattened for sampling or hit testing.
pub const FLATTEN_TOLERANCE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd")]
pub enum PathSegment {
    MoveTo { to: Point },
    LineTo { to: Point },
    CubicTo { ctrl1: Point, ctrl2: Point, to: Point },
    Close,
}

impl PathSegment {
    fn map(self, f: impl Fn(Point) -> Point) -> PathSegment {
        match self {
            PathSegment::MoveTo { to } => PathSegment::MoveTo { to: f(to) },
            PathSegment::LineTo { to } => PathSegment::LineTo { to: f(to) },
            PathSegment::CubicTo { ctrl1, ctrl2, to } => PathSegment::CubicTo {
                ctrl1: f(ctrl1),
                ctrl2: f(ctrl2),
                to: f(to),
            },
            PathSegment::Close => PathSegment::Close,
        }
    }
}

/// An ordered list of path segments.
///
/// A path never caches its arc length: callers that need it flatten once
/// and keep the polyline for the duration of one operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VectorPath {
    pub segments: Vec<PathSegment>,
}

impl VectorPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open polyline path through `points`.
    pub fn from_points(points: &[Point]) -> Self {
        let mut path = VectorPath::new();
        for (i, p) in points.iter().enumerate() {
            if i == 0 {
                path.move_to(*p);
            } else {
                path.line_to(*p);
            }
        }
        path
    }

    pub fn move_to(&mut self, to: Point) -> &mut Self {
        self.segments.push(PathSegment::MoveTo { to });
        self
    }

    pub fn line_to(&mut self, to: Point) -> &mut Self {
        self.segments.push(PathSegment::LineTo { to });
        self
    }

    pub fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) -> &mut Self {
        self.segments.push(PathSegment::CubicTo { ctrl1, ctrl2, to });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.segments.push(PathSegment::Close);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// End points of every segment, control points excluded.
    pub fn anchors(&self) -> Vec<Point> {
        self.segments
            .iter()
            .filter_map(|seg| match seg {
                PathSegment::MoveTo { to }
                | PathSegment::LineTo { to }
                | PathSegment::CubicTo { to, .. } => Some(*to),
                PathSegment::Close => None,
            })
            .collect()
    }

    /// Flattens the path into one polyline per subpath.
    pub fn flatten(&self, tolerance: f64) -> Vec<Vec<Point>> {
        let mut subpaths: Vec<Vec<Point>> = Vec::new();
        let mut current: Vec<Point> = Vec::new();

        for seg in &self.segments {
            match *seg {
                PathSegment::MoveTo { to } => {
                    if current.len() > 1 {
                        subpaths.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push(to);
                }
                PathSegment::LineTo { to } => {
                    if current.is_empty() {
                        current.push(Point::default());
                    }
                    current.push(to);
                }
                PathSegment::CubicTo { ctrl1, ctrl2, to } => {
                    let from = current.last().copied().unwrap_or_default();
                    if current.is_empty() {
                        current.push(from);
                    }
                    let curve = CubicBezierSegment {
                        from: from.to_lyon(),
                        ctrl1: ctrl1.to_lyon(),
                        ctrl2: ctrl2.to_lyon(),
                        to: to.to_lyon(),
                    };
                    current.extend(curve.flattened(tolerance).map(Point::from_lyon));
                }
                PathSegment::Close => {
                    if let (Some(first), Some(last)) = (current.first(), current.last()) {
                        if first != last {
                            let first = *first;
                            current.push(first);
                        }
                    }
                }
            }
        }
        if current.len() > 1 {
            subpaths.push(current);
        }
        subpaths
    }

    /// All subpaths flattened at [`FLATTEN_TOLERANCE`] and joined end to start.
    pub fn to_polyline(&self) -> Vec<Point> {
        self.flatten(FLATTEN_TOLERANCE).into_iter().flatten().collect()
    }

    pub fn length(&self) -> f64 {
        self.flatten(FLATTEN_TOLERANCE)
            .iter()
            .map(|sub| sub.windows(2).map(|w| w[0].distance_to(&w[1])).sum::<f64>())
            .sum()
    }

    /// Bounds of the flattened geometry.
    pub fn bounds(&self) -> Option<Rect> {
        let flat = self.flatten(FLATTEN_TOLERANCE);
        Rect::from_points(flat.iter().flatten())
    }

    /// Copy of the path with every point mapped through `t`.
    pub fn transformed(&self, t: &Transform) -> VectorPath {
        VectorPath {
            segments: self
                .segments
                .iter()
                .map(|seg| seg.map(|p| p.transformed(t)))
                .collect(),
        }
    }
}
