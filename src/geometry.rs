//! Core geometry types.
//!
//! Scene geometry is expressed in image pixels ([`Point`], [`Rect`]); stored
//! annotation geometry is expressed as fractions of the image size
//! ([`NormalizedPoint`], [`NormalizedRect`]). Conversions between the two are
//! always done against an explicit [`ImageSize`].

use serde::{Deserialize, Serialize};

// ============================================================================
// Pixel Space
// ============================================================================

/// A 2D point in scene (image pixel) or view coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    pub fn delta_from(&self, other: Point) -> (f64, f64) {
        (self.x - other.x, self.y - other.y)
    }

    /// Convert to normalized coordinates for the given image size.
    pub fn to_normalized(&self, size: ImageSize) -> NormalizedPoint {
        NormalizedPoint {
            x: self.x / size.width_f64(),
            y: self.y / size.height_f64(),
        }
    }
}

/// An axis-aligned rectangle described by its four edges.
///
/// While a resize is in progress an edge may cross its opposite edge, so
/// `left > right` or `top > bottom` is representable. Call
/// [`Rect::normalized`] before treating the rectangle as a region.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a normalized rectangle spanning two corner points.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        Self {
            left: p1.x.min(p2.x),
            top: p1.y.min(p2.y),
            right: p1.x.max(p2.x),
            bottom: p1.y.max(p2.y),
        }
    }

    /// Zero-size rectangle at a point.
    pub fn at_point(point: Point) -> Self {
        Self::new(point.x, point.y, point.x, point.y)
    }

    /// Signed width (`right - left`).
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Signed height (`bottom - top`).
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.right, self.bottom)
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// Swap crossed edges so that `left <= right` and `top <= bottom`.
    pub fn normalized(&self) -> Rect {
        Rect::from_corners(self.top_left(), self.bottom_right())
    }

    /// Check if a point lies inside the rectangle (edges inclusive).
    pub fn contains(&self, point: Point) -> bool {
        let r = self.normalized();
        point.x >= r.left && point.x <= r.right && point.y >= r.top && point.y <= r.bottom
    }

    /// Translate the rectangle by the given offset.
    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    /// Clip every edge into `[0, width] x [0, height]`.
    ///
    /// Rectangles already inside the image come back unchanged (apart from
    /// edge normalization); everything else is pulled onto the image border.
    pub fn clamp_to(&self, size: ImageSize) -> Rect {
        let (w, h) = (size.width_f64(), size.height_f64());
        let r = self.normalized();
        Rect {
            left: r.left.clamp(0.0, w),
            top: r.top.clamp(0.0, h),
            right: r.right.clamp(0.0, w),
            bottom: r.bottom.clamp(0.0, h),
        }
    }

    /// Check if the rectangle lies entirely inside the image.
    pub fn is_within(&self, size: ImageSize) -> bool {
        let r = self.normalized();
        r.left >= 0.0
            && r.top >= 0.0
            && r.right <= size.width_f64()
            && r.bottom <= size.height_f64()
    }

    /// Convert to normalized coordinates for the given image size.
    pub fn to_normalized(&self, size: ImageSize) -> NormalizedRect {
        let r = self.normalized();
        let (w, h) = (size.width_f64(), size.height_f64());
        NormalizedRect {
            xmin: r.left / w,
            ymin: r.top / h,
            xmax: r.right / w,
            ymax: r.bottom / h,
        }
    }
}

/// Dimensions of the loaded image in pixels. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSize {
    width: u32,
    height: u32,
}

impl ImageSize {
    /// Create an image size, rejecting zero dimensions.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn width_f64(&self) -> f64 {
        f64::from(self.width)
    }

    pub fn height_f64(&self) -> f64 {
        f64::from(self.height)
    }

    /// The full image as a scene rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width_f64(), self.height_f64())
    }
}

// ============================================================================
// Normalized Space
// ============================================================================

/// A point as fractions of image width and height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

impl NormalizedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_pixels(&self, size: ImageSize) -> Point {
        Point::new(self.x * size.width_f64(), self.y * size.height_f64())
    }
}

/// A bounding box as fractions of image width and height, in `[0, 1]`.
///
/// This is the resolution-independent form stored in annotation records and
/// carried by every outbound geometry event.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedRect {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl NormalizedRect {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }

    /// Convert to a scene rectangle for the given image size.
    pub fn to_pixels(&self, size: ImageSize) -> Rect {
        let (w, h) = (size.width_f64(), size.height_f64());
        Rect::new(self.xmin * w, self.ymin * h, self.xmax * w, self.ymax * h)
    }

    /// Check if a normalized point lies inside (edges inclusive).
    pub fn contains(&self, point: NormalizedPoint) -> bool {
        point.x >= self.xmin.min(self.xmax)
            && point.x <= self.xmin.max(self.xmax)
            && point.y >= self.ymin.min(self.ymax)
            && point.y <= self.ymin.max(self.ymax)
    }

    /// Approximate equality with an absolute tolerance per coordinate.
    pub fn approx_eq(&self, other: &NormalizedRect, tolerance: f64) -> bool {
        (self.xmin - other.xmin).abs() <= tolerance
            && (self.ymin - other.ymin).abs() <= tolerance
            && (self.xmax - other.xmax).abs() <= tolerance
            && (self.ymax - other.ymax).abs() <= tolerance
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn size() -> ImageSize {
        ImageSize::new(1000, 500).unwrap()
    }

    fn approx_rect(a: Rect, b: Rect) -> bool {
        (a.left - b.left).abs() < EPSILON
            && (a.top - b.top).abs() < EPSILON
            && (a.right - b.right).abs() < EPSILON
            && (a.bottom - b.bottom).abs() < EPSILON
    }

    #[test]
    fn test_image_size_rejects_zero() {
        assert!(ImageSize::new(0, 10).is_none());
        assert!(ImageSize::new(10, 0).is_none());
        assert!(ImageSize::new(1, 1).is_some());
    }

    #[test]
    fn test_rect_from_corners() {
        let a = Rect::from_corners(Point::new(10.0, 20.0), Point::new(50.0, 80.0));
        let b = Rect::from_corners(Point::new(50.0, 80.0), Point::new(10.0, 20.0));
        assert_eq!(a, b);
        assert_eq!(a.width(), 40.0);
        assert_eq!(a.height(), 60.0);
    }

    #[test]
    fn test_normalized_swaps_crossed_edges() {
        let crossed = Rect::new(50.0, 60.0, 10.0, 20.0);
        assert_eq!(crossed.normalized(), Rect::new(10.0, 20.0, 50.0, 60.0));
        assert!(crossed.contains(Point::new(30.0, 30.0)));
    }

    #[test]
    fn test_contains_is_edge_inclusive() {
        let r = Rect::new(10.0, 10.0, 110.0, 110.0);
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(r.contains(Point::new(110.0, 110.0)));
        assert!(!r.contains(Point::new(5.0, 50.0)));
    }

    #[test]
    fn test_clamp_is_noop_inside_bounds() {
        let inside = [
            Rect::new(0.0, 0.0, 1000.0, 500.0),
            Rect::new(100.0, 100.0, 200.0, 300.0),
            Rect::new(999.0, 499.0, 1000.0, 500.0),
        ];
        for r in inside {
            assert!(r.is_within(size()));
            assert_eq!(r.clamp_to(size()), r);
        }
    }

    #[test]
    fn test_clamp_always_inside_bounds() {
        let outside = [
            Rect::new(-50.0, -20.0, 100.0, 100.0),
            Rect::new(900.0, 400.0, 2000.0, 2000.0),
            Rect::new(1200.0, 600.0, 1300.0, 700.0),
            Rect::new(-300.0, -300.0, -100.0, -100.0),
            Rect::new(2000.0, 2000.0, -10.0, -10.0),
        ];
        for r in outside {
            let c = r.clamp_to(size());
            assert!(c.is_within(size()), "{c:?} escaped the image");
            assert!(c.width() >= 0.0 && c.height() >= 0.0);
        }
        assert_eq!(
            Rect::new(900.0, 400.0, 2000.0, 2000.0).clamp_to(size()),
            Rect::new(900.0, 400.0, 1000.0, 500.0)
        );
    }

    #[test]
    fn test_normalized_round_trip() {
        let samples = [
            NormalizedRect::new(0.0, 0.0, 1.0, 1.0),
            NormalizedRect::new(0.1, 0.2, 0.106, 0.212),
            NormalizedRect::new(0.333, 0.777, 0.5, 0.9),
        ];
        for n in samples {
            let back = n.to_pixels(size()).to_normalized(size());
            assert!(back.approx_eq(&n, EPSILON), "{n:?} -> {back:?}");
        }
    }

    #[test]
    fn test_pixel_round_trip() {
        let samples = [
            Rect::new(0.0, 0.0, 1000.0, 500.0),
            Rect::new(100.0, 100.0, 106.0, 106.0),
            Rect::new(12.5, 3.25, 700.75, 499.0),
        ];
        for p in samples {
            let back = p.to_normalized(size()).to_pixels(size());
            assert!(approx_rect(back, p), "{p:?} -> {back:?}");
        }
    }

    #[test]
    fn test_point_to_normalized() {
        let p = Point::new(250.0, 125.0).to_normalized(size());
        assert!((p.x - 0.25).abs() < EPSILON);
        assert!((p.y - 0.25).abs() < EPSILON);
        let back = p.to_pixels(size());
        assert!((back.x - 250.0).abs() < EPSILON);
    }

    #[test]
    fn test_normalized_contains() {
        let r = NormalizedRect::new(0.1, 0.1, 0.5, 0.5);
        assert!(r.contains(NormalizedPoint::new(0.3, 0.3)));
        assert!(!r.contains(NormalizedPoint::new(0.6, 0.3)));
    }
}
