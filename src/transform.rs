//! Coordinate transforms.
//!
//! Two transforms are involved in every gesture:
//! - [`Affine`]: a box's placement, mapping its local (item) rectangle into
//!   scene coordinates. Moving a box changes its placement, not its rectangle.
//! - [`Viewport`]: the pan/zoom state mapping scene coordinates to the view
//!   (widget) coordinates pointer events arrive in.

use crate::constants::GEOMETRY_EPSILON;
use crate::error::GeometryError;
use crate::geometry::{Point, Rect};

/// A 2D affine transform.
///
/// Maps `(x, y)` to `(m11 * x + m21 * y + dx, m12 * x + m22 * y + dy)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub m11: f64,
    pub m12: f64,
    pub m21: f64,
    pub m22: f64,
    pub dx: f64,
    pub dy: f64,
}

impl Affine {
    pub fn new(m11: f64, m12: f64, m21: f64, m22: f64, dx: f64, dy: f64) -> Self {
        Self {
            m11,
            m12,
            m21,
            m22,
            dx,
            dy,
        }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn translation(dx: f64, dy: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, dx, dy)
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// This transform followed by a translation in the target space.
    pub fn translated(&self, dx: f64, dy: f64) -> Affine {
        Affine {
            dx: self.dx + dx,
            dy: self.dy + dy,
            ..*self
        }
    }

    /// Determinant of the linear part.
    pub fn determinant(&self) -> f64 {
        self.m11 * self.m22 - self.m12 * self.m21
    }

    pub fn map_point(&self, p: Point) -> Point {
        Point::new(
            self.m11 * p.x + self.m21 * p.y + self.dx,
            self.m12 * p.x + self.m22 * p.y + self.dy,
        )
    }

    /// Map a rectangle by its top-left and bottom-right corners.
    ///
    /// Exact for scale + translate placements, which is all the editor
    /// produces. The result is not normalized.
    pub fn map_rect(&self, rect: Rect) -> Rect {
        let tl = self.map_point(rect.top_left());
        let br = self.map_point(rect.bottom_right());
        Rect::new(tl.x, tl.y, br.x, br.y)
    }

    /// Compute the inverse transform.
    pub fn inverse(&self) -> Result<Affine, GeometryError> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < GEOMETRY_EPSILON {
            return Err(GeometryError::NonInvertible { determinant: det });
        }

        let m11 = self.m22 / det;
        let m12 = -self.m12 / det;
        let m21 = -self.m21 / det;
        let m22 = self.m11 / det;
        let dx = -(m11 * self.dx + m21 * self.dy);
        let dy = -(m12 * self.dx + m22 * self.dy);
        Ok(Affine::new(m11, m12, m21, m22, dx, dy))
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::identity()
    }
}

/// Pan/zoom state of the view.
///
/// `view = scene * zoom + pan`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Viewport {
    pub fn new(zoom: f64, pan_x: f64, pan_y: f64) -> Self {
        Self { zoom, pan_x, pan_y }
    }

    /// Identity viewport (zoom=1, no pan).
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// Map a view position into scene coordinates.
    pub fn map_to_scene(&self, view: Point) -> Point {
        Point::new(
            (view.x - self.pan_x) / self.zoom,
            (view.y - self.pan_y) / self.zoom,
        )
    }

    /// Map a scene position into view coordinates.
    pub fn map_from_scene(&self, scene: Point) -> Point {
        Point::new(
            scene.x * self.zoom + self.pan_x,
            scene.y * self.zoom + self.pan_y,
        )
    }

    /// Scene-to-view mapping as an affine transform.
    pub fn to_affine(&self) -> Affine {
        Affine::new(self.zoom, 0.0, 0.0, self.zoom, self.pan_x, self.pan_y)
    }

    /// Scale the zoom by `factor`, keeping the scene point under `anchor`
    /// (a view position) fixed.
    ///
    /// The resulting zoom is clamped to the range spanned by `min_zoom` and
    /// `max_zoom`, in whichever order they are given.
    pub fn zoom_about(&self, factor: f64, anchor: Point, min_zoom: f64, max_zoom: f64) -> Viewport {
        let (low, high) = (min_zoom.min(max_zoom), min_zoom.max(max_zoom));
        let new_zoom = (self.zoom * factor).max(low).min(high);

        // Scene point under the anchor before zoom
        let scene = self.map_to_scene(anchor);

        Viewport {
            zoom: new_zoom,
            pan_x: anchor.x - scene.x * new_zoom,
            pan_y: anchor.y - scene.y * new_zoom,
        }
    }

    /// Apply a pan delta (view pixels).
    pub fn pan_by(&self, dx: f64, dy: f64) -> Viewport {
        Viewport {
            zoom: self.zoom,
            pan_x: self.pan_x + dx,
            pan_y: self.pan_y + dy,
        }
    }

    /// Largest zoom showing all of `scene_rect` inside a view of the given
    /// size, keeping aspect ratio, centered.
    pub fn fit(scene_rect: Rect, view_width: f64, view_height: f64) -> Viewport {
        let r = scene_rect.normalized();
        if r.width() <= 0.0 || r.height() <= 0.0 || view_width <= 0.0 || view_height <= 0.0 {
            return Viewport::identity();
        }

        let zoom = (view_width / r.width()).min(view_height / r.height());
        let center = r.center();
        Viewport {
            zoom,
            pan_x: view_width / 2.0 - center.x * zoom,
            pan_y: view_height / 2.0 - center.y * zoom,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::identity()
    }
}
