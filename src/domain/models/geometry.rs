use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn approx_eq(&self, other: &Point, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

/// Axis-aligned rectangle in canvas coordinates (`y` grows downwards).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest box containing every point, or `None` for an empty slice.
    pub fn enclosing(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);

        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn approx_eq(&self, other: &Bounds, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.width - other.width).abs() <= tolerance
            && (self.height - other.height).abs() <= tolerance
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(x={}, y={}, w={}, h={})",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Angle in radians from the center of `shape` to `point`.
pub fn attachment_angle(shape: &Bounds, point: &Point) -> f64 {
    let center = shape.center();
    (point.y - center.y).atan2(point.x - center.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn enclosing_covers_right_angle_path() {
        let points = [
            Point::new(488.0, 392.0),
            Point::new(619.0, 392.0),
            Point::new(619.0, 227.0),
        ];

        let bounds = Bounds::enclosing(&points).unwrap();
        assert_eq!(bounds, Bounds::new(488.0, 227.0, 131.0, 165.0));
    }

    #[test]
    fn enclosing_empty_is_none() {
        assert!(Bounds::enclosing(&[]).is_none());
    }

    #[test]
    fn attachment_angle_uses_shape_center() {
        let shape = Bounds::new(288.0, 318.0, 200.0, 148.0);
        assert_eq!(attachment_angle(&shape, &Point::new(488.0, 392.0)), 0.0);

        let below = attachment_angle(&shape, &Point::new(388.0, 466.0));
        assert!((below - FRAC_PI_2).abs() < 1e-12);
    }
}
