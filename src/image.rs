//! The image being annotated.
//!
//! The editor does not decode images. Hosts hand over an already decoded,
//! row-major pixel buffer which is kept as a `(height, width, channels)`
//! array for the renderer to draw under the boxes.

use ndarray::{Array3, ArrayView3};

use crate::constants::SUPPORTED_CHANNELS;
use crate::error::EditorError;
use crate::geometry::ImageSize;

/// A decoded RGB or RGBA image.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pixels: Array3<u8>,
    size: ImageSize,
}

impl LoadedImage {
    /// Wrap a row-major pixel buffer.
    pub fn from_raw(
        pixels: Vec<u8>,
        width: u32,
        height: u32,
        channels: usize,
    ) -> Result<Self, EditorError> {
        let size =
            ImageSize::new(width, height).ok_or(EditorError::InvalidDimensions { width, height })?;

        if !SUPPORTED_CHANNELS.contains(&channels) {
            return Err(EditorError::UnsupportedChannels(channels));
        }

        let expected = width as usize * height as usize * channels;
        if pixels.len() != expected {
            return Err(EditorError::BufferSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        let actual = pixels.len();
        let shape = (height as usize, width as usize, channels);
        let pixels = Array3::from_shape_vec(shape, pixels)
            .map_err(|_| EditorError::BufferSizeMismatch { expected, actual })?;

        Ok(Self { pixels, size })
    }

    /// Wrap an existing `(height, width, channels)` array.
    pub fn from_array(pixels: Array3<u8>) -> Result<Self, EditorError> {
        let (height, width, channels) = pixels.dim();
        let invalid = || EditorError::InvalidDimensions {
            width: u32::try_from(width).unwrap_or(u32::MAX),
            height: u32::try_from(height).unwrap_or(u32::MAX),
        };
        let size = u32::try_from(width)
            .ok()
            .zip(u32::try_from(height).ok())
            .and_then(|(w, h)| ImageSize::new(w, h))
            .ok_or_else(invalid)?;

        if !SUPPORTED_CHANNELS.contains(&channels) {
            return Err(EditorError::UnsupportedChannels(channels));
        }

        Ok(Self { pixels, size })
    }

    pub fn size(&self) -> ImageSize {
        self.size
    }

    pub fn channels(&self) -> usize {
        self.pixels.dim().2
    }

    pub fn has_alpha(&self) -> bool {
        self.channels() == 4
    }

    /// Pixel data as a `(height, width, channels)` view.
    pub fn pixels(&self) -> ArrayView3<'_, u8> {
        self.pixels.view()
    }

    /// Bytes per row, for renderers that need a stride.
    pub fn bytes_per_line(&self) -> usize {
        self.size.width() as usize * self.channels()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_rgb() {
        let img = LoadedImage::from_raw(vec![0; 4 * 2 * 3], 4, 2, 3).unwrap();
        assert_eq!(img.size(), ImageSize::new(4, 2).unwrap());
        assert_eq!(img.pixels().dim(), (2, 4, 3));
        assert_eq!(img.bytes_per_line(), 12);
        assert!(!img.has_alpha());
    }

    #[test]
    fn test_pixel_layout_is_row_major() {
        let data: Vec<u8> = (0..(3 * 2 * 4)).map(|v| v as u8).collect();
        let img = LoadedImage::from_raw(data, 3, 2, 4).unwrap();
        // Second row, first pixel, first channel
        assert_eq!(img.pixels()[[1, 0, 0]], 12);
        assert!(img.has_alpha());
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            LoadedImage::from_raw(vec![], 0, 2, 3),
            Err(EditorError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            LoadedImage::from_raw(vec![0; 8], 2, 2, 2),
            Err(EditorError::UnsupportedChannels(2))
        ));
        assert!(matches!(
            LoadedImage::from_raw(vec![0; 10], 2, 2, 3),
            Err(EditorError::BufferSizeMismatch {
                expected: 12,
                actual: 10
            })
        ));
    }

    #[test]
    fn test_from_array() {
        let img = LoadedImage::from_array(Array3::zeros((5, 7, 4))).unwrap();
        assert_eq!(img.size().width(), 7);
        assert_eq!(img.size().height(), 5);
        assert!(LoadedImage::from_array(Array3::zeros((5, 0, 3))).is_err());
    }
}
