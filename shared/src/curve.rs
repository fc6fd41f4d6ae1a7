//! Smoothed paths through chart points.
//!
//! Lines use a centripetal Catmull-Rom spline (alpha = 0.5) expressed as
//! cubic Bézier segments, so the curve passes through every data point
//! without overshooting between unevenly spaced ones.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicTo {
        control1: Point,
        control2: Point,
        to: Point,
    },
    Close,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

const CATMULL_ROM_ALPHA: f64 = 0.5;
const EPSILON: f64 = 1e-12;
/// Line segments per Bézier when flattening for drawing or measuring.
pub const FLATTEN_SEGMENTS: usize = 16;

impl Path {
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Smoothed line through `points` in the given order.
    pub fn catmull_rom(points: &[Point]) -> Self {
        let mut commands = Vec::with_capacity(points.len() + 1);
        match points {
            [] => {}
            [only] => commands.push(PathCommand::MoveTo(*only)),
            [first, second] => {
                commands.push(PathCommand::MoveTo(*first));
                commands.push(PathCommand::LineTo(*second));
            }
            _ => {
                commands.push(PathCommand::MoveTo(points[0]));
                let last = points.len() - 1;
                for i in 0..last {
                    // Endpoints are duplicated, which collapses the missing
                    // neighbour's tangent contribution.
                    let p0 = points[i.saturating_sub(1)];
                    let p1 = points[i];
                    let p2 = points[i + 1];
                    let p3 = points[(i + 2).min(last)];
                    commands.push(catmull_rom_segment(p0, p1, p2, p3));
                }
            }
        }
        Self { commands }
    }

    /// Closed region between the smoothed line and a horizontal baseline.
    pub fn area_to_baseline(points: &[Point], baseline: f64) -> Self {
        let mut area = Self::catmull_rom(points);
        if let (Some(first), Some(last)) = (points.first(), points.last()) {
            area.commands.push(PathCommand::LineTo(Point::new(last.x, baseline)));
            area.commands.push(PathCommand::LineTo(Point::new(first.x, baseline)));
            area.commands.push(PathCommand::Close);
        }
        area
    }

    /// Polyline approximation; closing returns to the first point.
    pub fn flatten(&self) -> Vec<Point> {
        let mut flattened: Vec<Point> = Vec::new();
        let mut start = None;
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(point) => {
                    start = Some(point);
                    flattened.push(point);
                }
                PathCommand::LineTo(point) => flattened.push(point),
                PathCommand::CubicTo {
                    control1,
                    control2,
                    to,
                } => {
                    let from = flattened.last().copied().unwrap_or(to);
                    for step in 1..=FLATTEN_SEGMENTS {
                        let t = step as f64 / FLATTEN_SEGMENTS as f64;
                        flattened.push(cubic_point(from, control1, control2, to, t));
                    }
                }
                PathCommand::Close => {
                    if let Some(start) = start {
                        flattened.push(start);
                    }
                }
            }
        }
        flattened
    }

    /// Approximate arc length of the flattened path.
    pub fn length(&self) -> f64 {
        polyline_length(&self.flatten())
    }
}

pub fn polyline_length(points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|pair| pair[0].distance(pair[1]))
        .sum()
}

/// Leading part of `points` covering `fraction` of the polyline's length.
pub fn polyline_prefix(points: &[Point], fraction: f64) -> Vec<Point> {
    let fraction = fraction.clamp(0.0, 1.0);
    if fraction >= 1.0 {
        return points.to_vec();
    }
    let Some(first) = points.first() else {
        return Vec::new();
    };
    let mut remaining = polyline_length(points) * fraction;
    let mut prefix = vec![*first];
    for pair in points.windows(2) {
        let segment = pair[0].distance(pair[1]);
        if segment >= remaining {
            if remaining > EPSILON {
                let t = remaining / segment;
                prefix.push(Point::new(
                    pair[0].x + (pair[1].x - pair[0].x) * t,
                    pair[0].y + (pair[1].y - pair[0].y) * t,
                ));
            }
            break;
        }
        remaining -= segment;
        prefix.push(pair[1]);
    }
    prefix
}

fn catmull_rom_segment(p0: Point, p1: Point, p2: Point, p3: Point) -> PathCommand {
    let d01 = p0.distance(p1);
    let d12 = p1.distance(p2);
    let d23 = p2.distance(p3);

    let l01_a = d01.powf(CATMULL_ROM_ALPHA);
    let l01_2a = d01.powf(2.0 * CATMULL_ROM_ALPHA);
    let l12_a = d12.powf(CATMULL_ROM_ALPHA);
    let l12_2a = d12.powf(2.0 * CATMULL_ROM_ALPHA);
    let l23_a = d23.powf(CATMULL_ROM_ALPHA);
    let l23_2a = d23.powf(2.0 * CATMULL_ROM_ALPHA);

    let mut control1 = p1;
    if l01_a > EPSILON {
        let a = 2.0 * l01_2a + 3.0 * l01_a * l12_a + l12_2a;
        let n = 3.0 * l01_a * (l01_a + l12_a);
        control1 = Point::new(
            (p1.x * a - p0.x * l12_2a + p2.x * l01_2a) / n,
            (p1.y * a - p0.y * l12_2a + p2.y * l01_2a) / n,
        );
    }

    let mut control2 = p2;
    if l23_a > EPSILON {
        let b = 2.0 * l23_2a + 3.0 * l23_a * l12_a + l12_2a;
        let m = 3.0 * l23_a * (l23_a + l12_a);
        control2 = Point::new(
            (p2.x * b + p1.x * l23_2a - p3.x * l12_2a) / m,
            (p2.y * b + p1.y * l23_2a - p3.y * l12_2a) / m,
        );
    }

    PathCommand::CubicTo {
        control1,
        control2,
        to: p2,
    }
}

fn cubic_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let u = 1.0 - t;
    let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
    Point::new(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag() -> Vec<Point> {
        vec![
            Point::new(0.0, 10.0),
            Point::new(10.0, 40.0),
            Point::new(20.0, 5.0),
            Point::new(35.0, 30.0),
        ]
    }

    #[test]
    fn curve_passes_through_every_point() {
        let points = zigzag();
        let path = Path::catmull_rom(&points);
        let mut ends = Vec::new();
        for command in path.commands() {
            match command {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => ends.push(*p),
                PathCommand::CubicTo { to, .. } => ends.push(*to),
                PathCommand::Close => {}
            }
        }
        assert_eq!(ends, points);
    }

    #[test]
    fn collinear_points_produce_straight_segments() {
        let points: Vec<Point> = (0..4).map(|i| Point::new(i as f64 * 10.0, 20.0)).collect();
        let path = Path::catmull_rom(&points);
        for point in path.flatten() {
            assert!((point.y - 20.0).abs() < 1e-9);
        }
        assert!((path.length() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn short_inputs_degrade_gracefully() {
        assert!(Path::catmull_rom(&[]).is_empty());
        assert_eq!(
            Path::catmull_rom(&[Point::new(1.0, 2.0)]).commands(),
            &[PathCommand::MoveTo(Point::new(1.0, 2.0))]
        );
        let two = Path::catmull_rom(&[Point::new(0.0, 0.0), Point::new(3.0, 4.0)]);
        assert!((two.length() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn area_closes_on_baseline() {
        let points = zigzag();
        let area = Path::area_to_baseline(&points, 100.0);
        let flattened = area.flatten();
        assert_eq!(flattened.first(), flattened.last());
        assert!(flattened.contains(&Point::new(35.0, 100.0)));
        assert!(flattened.contains(&Point::new(0.0, 100.0)));
    }

    #[test]
    fn prefix_covers_requested_fraction() {
        let line = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)];
        assert_eq!(polyline_prefix(&line, 0.0), vec![Point::new(0.0, 0.0)]);
        assert_eq!(
            polyline_prefix(&line, 0.75),
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 5.0)]
        );
        assert_eq!(polyline_prefix(&line, 1.0), line);
    }
}
