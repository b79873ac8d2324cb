//! Error types for the editor core.

use thiserror::Error;

/// Errors raised by geometry operations.
///
/// None of these are fatal: the editor recovers from each by aborting the
/// current gesture or reinterpreting it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Item placement transform cannot be inverted
    #[error("Transform is not invertible (determinant {determinant})")]
    NonInvertible {
        /// Determinant of the linear part of the transform
        determinant: f64,
    },

    /// A created rectangle is smaller than the minimum box size
    #[error("Degenerate rectangle {width:.1}x{height:.1} (minimum side {min_size})")]
    Degenerate {
        /// Width of the rejected rectangle
        width: f64,
        /// Height of the rejected rectangle
        height: f64,
        /// Minimum accepted side length
        min_size: f64,
    },
}

/// Errors that inbound host calls can return.
#[derive(Error, Debug)]
pub enum EditorError {
    /// Image with a zero dimension
    #[error("Invalid image dimensions {width}x{height}")]
    InvalidDimensions {
        /// Image width in pixels
        width: u32,
        /// Image height in pixels
        height: u32,
    },

    /// Channel count other than RGB or RGBA
    #[error("Unsupported channel count: {0}")]
    UnsupportedChannels(usize),

    /// Pixel buffer length does not match the declared shape
    #[error("Pixel buffer has {actual} bytes, expected {expected}")]
    BufferSizeMismatch {
        /// Bytes implied by width * height * channels
        expected: usize,
        /// Bytes actually supplied
        actual: usize,
    },
}

impl GeometryError {
    /// Create a degenerate rectangle error.
    pub fn degenerate(width: f64, height: f64, min_size: f64) -> Self {
        Self::Degenerate {
            width,
            height,
            min_size,
        }
    }
}
