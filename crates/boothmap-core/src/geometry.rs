//! Normalized coordinate space and the geometry helpers built on it.
//!
//! All booth geometry lives in a percentage space: both axes run from 0 to
//! [`CANVAS_EXTENT`] over the venue container, independent of its pixel
//! size. Rotations are in degrees, clockwise-positive (y grows downward).

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Extent of the normalized canvas on both axes.
pub const CANVAS_EXTENT: f64 = 100.0;

/// Smallest width or height a booth may be resized to.
pub const MIN_BOOTH_SIZE: f64 = 1.0;

/// Angle of `point` as seen from `center`, in degrees within (-180, 180].
pub fn angle_between(center: Point, point: Point) -> f64 {
    let angle = (point.y - center.y).atan2(point.x - center.x).to_degrees();
    if angle <= -180.0 { angle + 360.0 } else { angle }
}

/// Rotate `point` about `center` by `degrees`.
pub fn rotate_point(point: Point, center: Point, degrees: f64) -> Point {
    Affine::rotate_about(degrees.to_radians(), center) * point
}

/// Wrap an angle into [0, 360).
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Clamp a point into the canvas.
pub fn clamp_to_canvas(point: Point) -> Point {
    Point::new(
        point.x.clamp(0.0, CANVAS_EXTENT),
        point.y.clamp(0.0, CANVAS_EXTENT),
    )
}

/// Rectangle corners, named after the compass points used by resize cursors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    #[serde(rename = "nw")]
    TopLeft,
    #[serde(rename = "ne")]
    TopRight,
    #[serde(rename = "sw")]
    BottomLeft,
    #[serde(rename = "se")]
    BottomRight,
}

impl Corner {
    /// All corners, in handle drawing order.
    pub const ALL: [Corner; 4] = [
        Corner::BottomRight,
        Corner::BottomLeft,
        Corner::TopRight,
        Corner::TopLeft,
    ];

    /// The diagonally opposite corner.
    pub fn opposite(self) -> Self {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }

    /// Whether this corner lies on the left edge.
    pub fn is_left(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomLeft)
    }

    /// Whether this corner lies on the top edge.
    pub fn is_top(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }
}

/// An axis-aligned rectangle in the normalized coordinate space.
///
/// Rotation is carried separately by its owner and always applies about
/// [`NormalizedRect::center`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl NormalizedRect {
    /// Create a rectangle from its top-left corner and size.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Center point, the pivot for rotation.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// A corner of the unrotated rectangle.
    pub fn corner(&self, corner: Corner) -> Point {
        match corner {
            Corner::TopLeft => Point::new(self.x, self.y),
            Corner::TopRight => Point::new(self.right(), self.y),
            Corner::BottomLeft => Point::new(self.x, self.bottom()),
            Corner::BottomRight => Point::new(self.right(), self.bottom()),
        }
    }

    /// A corner after rotating the rectangle about its center.
    pub fn rotated_corner(&self, corner: Corner, rotation: f64) -> Point {
        rotate_point(self.corner(corner), self.center(), rotation)
    }

    /// The same size moved to a new top-left corner.
    pub fn with_origin(self, origin: Point) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            ..self
        }
    }

    /// Translate by a vector.
    pub fn translated(self, delta: Vec2) -> Self {
        self.with_origin(self.origin() + delta)
    }

    /// Keep the rectangle inside the canvas: the size is capped at the
    /// canvas extent and the origin is clamped to `[0, 100 - size]`.
    pub fn clamp_to_canvas(self) -> Self {
        let width = self.width.min(CANVAS_EXTENT);
        let height = self.height.min(CANVAS_EXTENT);
        Self {
            x: self.x.clamp(0.0, CANVAS_EXTENT - width),
            y: self.y.clamp(0.0, CANVAS_EXTENT - height),
            width,
            height,
        }
    }

    /// Whether every coordinate is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Repair geometry read from untrusted data: non-finite values fall back
    /// to the origin or the size floor, sizes are raised to `min_size`, and
    /// the result is clamped into the canvas.
    pub fn sanitized(self, min_size: f64) -> Self {
        let finite_or = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };
        Self {
            x: finite_or(self.x, 0.0),
            y: finite_or(self.y, 0.0),
            width: finite_or(self.width, min_size).max(min_size),
            height: finite_or(self.height, min_size).max(min_size),
        }
        .clamp_to_canvas()
    }

    /// Whether a point lies inside the rectangle once rotated by `rotation`.
    pub fn contains_rotated(&self, point: Point, rotation: f64) -> bool {
        let local = rotate_point(point, self.center(), -rotation);
        local.x >= self.x && local.x <= self.right() && local.y >= self.y && local.y <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_point_eq(a: Point, b: Point) {
        assert!((a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS, "{a:?} != {b:?}");
    }

    #[test]
    fn test_angle_between_axes() {
        let c = Point::new(50.0, 50.0);
        assert!((angle_between(c, Point::new(60.0, 50.0))).abs() < EPS);
        assert!((angle_between(c, Point::new(50.0, 60.0)) - 90.0).abs() < EPS);
        assert!((angle_between(c, Point::new(50.0, 40.0)) + 90.0).abs() < EPS);
        assert!((angle_between(c, Point::new(40.0, 50.0)) - 180.0).abs() < EPS);
    }

    #[test]
    fn test_rotate_point_zero_and_full_turn() {
        let p = Point::new(12.0, 34.0);
        let c = Point::new(20.0, 20.0);
        assert_point_eq(rotate_point(p, c, 0.0), p);
        assert_point_eq(rotate_point(p, c, 360.0), p);
    }

    #[test]
    fn test_rotate_point_inverse() {
        let p = Point::new(3.5, -7.25);
        let c = Point::new(10.0, 5.0);
        for theta in [15.0, 90.0, 137.0, -45.0, 270.0] {
            let back = rotate_point(rotate_point(p, c, theta), c, -theta);
            assert_point_eq(back, p);
        }
    }

    #[test]
    fn test_rotate_point_is_clockwise_on_screen() {
        // +x rotated by 90 degrees points down (+y) in screen space
        let r = rotate_point(Point::new(1.0, 0.0), Point::ZERO, 90.0);
        assert_point_eq(r, Point::new(0.0, 1.0));
    }

    #[test]
    fn test_normalize_degrees() {
        assert!((normalize_degrees(370.0) - 10.0).abs() < EPS);
        assert!((normalize_degrees(-30.0) - 330.0).abs() < EPS);
        assert!((normalize_degrees(360.0)).abs() < EPS);
    }

    #[test]
    fn test_clamp_to_canvas() {
        let r = NormalizedRect::new(-5.0, 95.0, 10.0, 10.0).clamp_to_canvas();
        assert_eq!(r, NormalizedRect::new(0.0, 90.0, 10.0, 10.0));

        let huge = NormalizedRect::new(10.0, 10.0, 150.0, 20.0).clamp_to_canvas();
        assert!((huge.width - 100.0).abs() < EPS);
        assert!(huge.x.abs() < EPS);
    }

    #[test]
    fn test_sanitized_degenerate() {
        let r = NormalizedRect::new(f64::NAN, 10.0, -3.0, 0.0).sanitized(MIN_BOOTH_SIZE);
        assert!(r.x.abs() < EPS);
        assert!((r.width - MIN_BOOTH_SIZE).abs() < EPS);
        assert!((r.height - MIN_BOOTH_SIZE).abs() < EPS);
    }

    #[test]
    fn test_contains_rotated() {
        // A thin horizontal bar rotated by 90 degrees becomes vertical.
        let bar = NormalizedRect::new(40.0, 49.0, 20.0, 2.0);
        assert!(bar.contains_rotated(Point::new(58.0, 50.0), 0.0));
        assert!(!bar.contains_rotated(Point::new(58.0, 50.0), 90.0));
        assert!(bar.contains_rotated(Point::new(50.0, 58.0), 90.0));
    }

    #[test]
    fn test_corner_opposites() {
        for corner in Corner::ALL {
            assert_eq!(corner.opposite().opposite(), corner);
            assert_ne!(corner.is_left(), corner.opposite().is_left());
            assert_ne!(corner.is_top(), corner.opposite().is_top());
        }
    }
}
