//! Arc-length sampling of outlines and freehand point smoothing.
//!
//! Every engine that places things along a path goes through here:
//! text-on-path samples an object's outline, the membrane brush walks a
//! smoothed freehand stroke with [`point_at_distance`], and the eraser
//! smooths its stroke before turning it into masks.

use std::f64::consts::{FRAC_PI_2, TAU};

use crate::model::Point;

/// Distance slack accepted at the very end of a polyline.
const END_TOLERANCE: f64 = 1e-9;

/// A sampled position with the tangent direction there, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
}

impl SamplePoint {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Result of a distance query along a polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPosition {
    pub point: Point,
    /// Direction of the segment containing `point`, in radians.
    pub angle: f64,
}

/// Canvas-space outline that can be parameterized.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleShape {
    Circle {
        center: Point,
        radius: f64,
    },
    /// Ellipse with its x radius along `rotation` (radians).
    Ellipse {
        center: Point,
        rx: f64,
        ry: f64,
        rotation: f64,
    },
    /// Flattened freeform path.
    Polyline(Vec<Point>),
}

/// Samples `n` points along `shape`.
///
/// Closed shapes start at angle zero and exclude the end point, so the
/// chords between consecutive samples cover the outline once when the last
/// sample is joined back to the first. Polylines are sampled at equal
/// arc-length steps from the first anchor to the last, both included.
pub fn sample(shape: &SampleShape, n: usize) -> Vec<SamplePoint> {
    if n == 0 {
        return Vec::new();
    }
    match shape {
        SampleShape::Circle { center, radius } => (0..n)
            .map(|i| {
                let theta = TAU * i as f64 / n as f64;
                SamplePoint {
                    x: center.x + radius * theta.cos(),
                    y: center.y + radius * theta.sin(),
                    angle: theta + FRAC_PI_2,
                }
            })
            .collect(),
        SampleShape::Ellipse {
            center,
            rx,
            ry,
            rotation,
        } => {
            let (sin_r, cos_r) = rotation.sin_cos();
            (0..n)
                .map(|i| {
                    let theta = TAU * i as f64 / n as f64;
                    let lx = rx * theta.cos();
                    let ly = ry * theta.sin();
                    SamplePoint {
                        x: center.x + lx * cos_r - ly * sin_r,
                        y: center.y + lx * sin_r + ly * cos_r,
                        angle: (ry * theta.cos()).atan2(-rx * theta.sin()) + rotation,
                    }
                })
                .collect()
        }
        SampleShape::Polyline(points) => sample_polyline(points, n),
    }
}

fn sample_polyline(points: &[Point], n: usize) -> Vec<SamplePoint> {
    if points.is_empty() {
        return Vec::new();
    }
    let length = total_length(points);
    if points.len() < 2 || length <= 0.0 {
        let p = points[0];
        return vec![
            SamplePoint {
                x: p.x,
                y: p.y,
                angle: 0.0,
            };
            n
        ];
    }

    let steps = (n.max(2) - 1) as f64;
    (0..n)
        .filter_map(|i| {
            let t = i as f64 / steps;
            point_at_distance(points, (t * length).min(length)).map(|pos| SamplePoint {
                x: pos.point.x,
                y: pos.point.y,
                angle: pos.angle,
            })
        })
        .collect()
}

/// Sum of Euclidean segment lengths.
pub fn total_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance_to(&w[1])).sum()
}

/// Point and segment direction at distance `d` along `points`.
///
/// Returns `None` when `d` is negative or past the end of the polyline;
/// callers treat that as the path being exhausted.
pub fn point_at_distance(points: &[Point], d: f64) -> Option<PathPosition> {
    if points.len() < 2 || d < 0.0 {
        return None;
    }

    let mut travelled = 0.0;
    let mut last_angle = None;
    for w in points.windows(2) {
        let seg_len = w[0].distance_to(&w[1]);
        if seg_len <= 0.0 {
            continue;
        }
        let angle = w[0].angle_to(&w[1]);
        if travelled + seg_len >= d {
            let t = ((d - travelled) / seg_len).clamp(0.0, 1.0);
            return Some(PathPosition {
                point: w[0].lerp(&w[1], t),
                angle,
            });
        }
        travelled += seg_len;
        last_angle = Some(angle);
    }

    match (last_angle, points.last()) {
        (Some(angle), Some(end)) if d - travelled <= END_TOLERANCE => Some(PathPosition {
            point: *end,
            angle,
        }),
        _ => None,
    }
}

/// Catmull-Rom subdivision of a raw pointer trace.
///
/// Each segment gains three interpolated points. At the ends the missing
/// neighbour is replaced by the nearest existing point, so the curve
/// flattens slightly into the first and last anchors.
pub fn smooth(points: &[Point]) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let n = points.len();
    let mut out = Vec::with_capacity(n * 4);
    for i in 0..n - 1 {
        let p0 = if i == 0 { points[0] } else { points[i - 1] };
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = if i + 2 < n { points[i + 2] } else { p2 };

        out.push(p1);
        for t in [0.25, 0.5, 0.75] {
            out.push(catmull_rom(p0, p1, p2, p3, t));
        }
    }
    out.push(points[n - 1]);
    out
}

fn catmull_rom(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let t2 = t * t;
    let t3 = t2 * t;
    let axis = |a: f64, b: f64, c: f64, d: f64| {
        0.5 * (2.0 * b
            + (-a + c) * t
            + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
            + (-a + 3.0 * b - 3.0 * c + d) * t3)
    };
    Point::new(
        axis(p0.x, p1.x, p2.x, p3.x),
        axis(p0.y, p1.y, p2.y, p3.y),
    )
}
