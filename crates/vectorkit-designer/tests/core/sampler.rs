use std::f64::consts::PI;

use proptest::prelude::*;
use vectorkit_designer::model::Point;
use vectorkit_designer::sampler::{point_at_distance, sample, smooth, total_length, SampleShape};

fn closed_chord_length(points: &[Point]) -> f64 {
    let mut loop_points = points.to_vec();
    if let Some(first) = points.first() {
        loop_points.push(*first);
    }
    total_length(&loop_points)
}

proptest! {
    #[test]
    fn circle_chords_approximate_circumference(radius in 0.5f64..500.0, n in 64usize..512) {
        let shape = SampleShape::Circle { center: Point::new(12.0, -7.0), radius };
        let samples = sample(&shape, n);
        prop_assert_eq!(samples.len(), n);

        let points: Vec<Point> = samples.iter().map(|s| s.point()).collect();
        let expected = 2.0 * PI * radius;
        let error = (closed_chord_length(&points) - expected).abs() / expected;
        prop_assert!(error < 0.02, "relative error {} for n = {}", error, n);
    }

    #[test]
    fn point_at_distance_stays_on_straight_line(len in 1.0f64..1000.0, frac in 0.0f64..1.0) {
        let points = [Point::new(0.0, 0.0), Point::new(len / 2.0, 0.0), Point::new(len, 0.0)];
        let pos = point_at_distance(&points, frac * len).unwrap();
        prop_assert!((pos.point.x - frac * len).abs() < 1e-6);
        prop_assert!(pos.point.y.abs() < 1e-12);
        prop_assert!(pos.angle.abs() < 1e-12);
    }
}

#[test]
fn test_circle_sample_angles() {
    let shape = SampleShape::Circle {
        center: Point::new(0.0, 0.0),
        radius: 1.0,
    };
    for (i, s) in sample(&shape, 8).iter().enumerate() {
        let theta = 2.0 * PI * i as f64 / 8.0;
        assert!((s.angle - (theta + PI / 2.0)).abs() < 1e-12);
        assert!((s.x - theta.cos()).abs() < 1e-12);
    }
}

#[test]
fn test_rotated_ellipse_first_sample() {
    let shape = SampleShape::Ellipse {
        center: Point::new(10.0, 10.0),
        rx: 5.0,
        ry: 2.0,
        rotation: PI / 2.0,
    };
    let first = sample(&shape, 16)[0];
    assert!((first.x - 10.0).abs() < 1e-9);
    assert!((first.y - 15.0).abs() < 1e-9);
}

#[test]
fn test_exhausted_path_returns_none() {
    let points = [Point::new(0.0, 0.0), Point::new(3.0, 4.0)];
    assert_eq!(total_length(&points), 5.0);
    assert!(point_at_distance(&points, 5.0).is_some());
    assert!(point_at_distance(&points, 5.1).is_none());
    assert!(point_at_distance(&points[..1], 0.0).is_none());
}

#[test]
fn test_smooth_keeps_endpoints_and_adds_three_per_segment() {
    let raw = [
        Point::new(0.0, 0.0),
        Point::new(10.0, 5.0),
        Point::new(20.0, -5.0),
        Point::new(30.0, 0.0),
    ];
    let smoothed = smooth(&raw);
    assert_eq!(smoothed.len(), (raw.len() - 1) * 4 + 1);
    assert_eq!(smoothed[0], raw[0]);
    assert_eq!(smoothed[4], raw[1]);
    assert_eq!(smoothed[8], raw[2]);
    assert_eq!(*smoothed.last().unwrap(), raw[3]);
}

#[test]
fn test_degenerate_polyline_sampling() {
    let single = SampleShape::Polyline(vec![Point::new(2.0, 2.0)]);
    let samples = sample(&single, 3);
    assert_eq!(samples.len(), 3);
    assert!(samples.iter().all(|s| s.point() == Point::new(2.0, 2.0)));
    assert!(sample(&SampleShape::Polyline(Vec::new()), 4).is_empty());
}
