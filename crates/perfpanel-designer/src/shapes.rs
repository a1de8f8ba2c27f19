//! Perforation shape geometry.
//!
//! One place defines what every shape looks like so the serializers and the
//! statistics calculator agree:
//! - circle, custom and unknown shapes: a circle of diameter `size`
//! - square: edge `size`
//! - rectangle: `size` wide, `0.75 * size` tall
//! - hexagon: six vertices on a circle of diameter `size`
//! - triangle: equilateral with edge `size`, apex up

use perfpanel_core::{Perforation, Point, ShapeKind};
use std::f64::consts::PI;

/// Height-to-width ratio of the rectangle shape
pub const RECTANGLE_ASPECT: f64 = 0.75;

/// Outline of a single perforation
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeOutline {
    /// Circle around `center`
    Circle {
        /// Circle center
        center: Point,
        /// Radius
        radius: f64,
    },
    /// Closed polygon; the last vertex connects back to the first
    Polygon(Vec<Point>),
}

impl ShapeOutline {
    /// Outline for `shape` centered on the origin, unrotated
    pub fn local(shape: ShapeKind, size: f64) -> Self {
        let half = size / 2.0;
        match shape {
            ShapeKind::Square => Self::Polygon(vec![
                Point::new(-half, -half),
                Point::new(half, -half),
                Point::new(half, half),
                Point::new(-half, half),
            ]),
            ShapeKind::Rectangle => {
                let half_h = half * RECTANGLE_ASPECT;
                Self::Polygon(vec![
                    Point::new(-half, -half_h),
                    Point::new(half, -half_h),
                    Point::new(half, half_h),
                    Point::new(-half, half_h),
                ])
            }
            ShapeKind::Hexagon => Self::Polygon(regular_polygon(6, half, 0.0)),
            ShapeKind::Triangle => {
                let circumradius = size / 3f64.sqrt();
                Self::Polygon(regular_polygon(3, circumradius, -90.0))
            }
            ShapeKind::Circle | ShapeKind::Custom | ShapeKind::Unknown => Self::Circle {
                center: Point::default(),
                radius: half,
            },
        }
    }

    /// Outline of a perforation in panel coordinates, rotation applied about
    /// its center
    pub fn placed(perforation: &Perforation) -> Self {
        match Self::local(perforation.shape, perforation.size) {
            Self::Circle { radius, .. } => Self::Circle {
                center: perforation.position,
                radius,
            },
            Self::Polygon(points) => Self::Polygon(
                points
                    .into_iter()
                    .map(|p| {
                        let r = rotate_point(p, perforation.rotation);
                        Point::new(r.x + perforation.position.x, r.y + perforation.position.y)
                    })
                    .collect(),
            ),
        }
    }

    /// Map every coordinate through `f`; circle radii scale by `radius_scale`
    pub fn map<F>(self, radius_scale: f64, f: F) -> Self
    where
        F: Fn(Point) -> Point,
    {
        match self {
            Self::Circle { center, radius } => Self::Circle {
                center: f(center),
                radius: radius * radius_scale,
            },
            Self::Polygon(points) => Self::Polygon(points.into_iter().map(f).collect()),
        }
    }
}

/// Vertices of a regular polygon centered on the origin
fn regular_polygon(sides: u32, radius: f64, start_deg: f64) -> Vec<Point> {
    (0..sides)
        .map(|i| {
            let theta = start_deg.to_radians() + 2.0 * PI * (i as f64) / (sides as f64);
            Point::new(radius * theta.cos(), radius * theta.sin())
        })
        .collect()
}

/// Rotate a point about the origin by `degrees`
pub fn rotate_point(p: Point, degrees: f64) -> Point {
    if degrees.abs() < 1e-12 {
        return p;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    Point::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos)
}

/// Area of one perforation.
///
/// Rectangles use the fixed 4:3 approximation; custom and unknown shapes use
/// the circle formula.
pub fn shape_area(shape: ShapeKind, size: f64) -> f64 {
    let half = size / 2.0;
    match shape {
        ShapeKind::Square => size * size,
        ShapeKind::Rectangle => size * size * RECTANGLE_ASPECT,
        ShapeKind::Hexagon => (3.0 * 3f64.sqrt() / 2.0) * half * half,
        ShapeKind::Triangle => (3f64.sqrt() / 4.0) * size * size,
        ShapeKind::Circle | ShapeKind::Custom | ShapeKind::Unknown => PI * half * half,
    }
}
