//! Global constants for the BBoxEE editor core

/// Width of the band along each box edge that turns a press into a resize (scene pixels)
pub const EDGE_WIDTH: f64 = 8.0;

/// Minimum side length of a newly created box (scene pixels).
/// Drags smaller than this in either dimension are interpreted as clicks.
pub const MIN_BOX_SIZE: f64 = 3.0;

/// Multiplicative zoom step for zoom in
pub const ZOOM_IN_FACTOR: f64 = 1.1;

/// Multiplicative zoom step for zoom out
pub const ZOOM_OUT_FACTOR: f64 = 0.9;

/// Smallest zoom level the viewport accepts
pub const MIN_ZOOM: f64 = 0.01;

/// Largest zoom level the viewport accepts
pub const MAX_ZOOM: f64 = 100.0;

/// Detail text point size as a fraction of the box width
pub const DETAIL_FONT_SCALE: f64 = 0.065;

/// Outline width of displayed boxes
pub const PEN_WIDTH: f32 = 3.0;

/// Tolerance used when comparing floating point geometry
pub const GEOMETRY_EPSILON: f64 = 1e-9;

/// Supported channel counts for loaded images (RGB and RGBA)
pub const SUPPORTED_CHANNELS: [usize; 2] = [3, 4];
