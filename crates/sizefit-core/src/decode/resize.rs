//! Resampling to arbitrary target resolutions.
//!
//! All functions return new `PixelBuffer` instances without modifying the input.

use super::{DecodeError, FilterType, PixelBuffer};

/// Produces a buffer at a new resolution from a source buffer.
///
/// Implementations must return a buffer behaviorally identical to `src` when
/// the requested dimensions equal the source dimensions.
pub trait Resampler {
    fn resample(&self, src: &PixelBuffer, width: u32, height: u32)
        -> Result<PixelBuffer, DecodeError>;
}

impl<F> Resampler for F
where
    F: Fn(&PixelBuffer, u32, u32) -> Result<PixelBuffer, DecodeError>,
{
    fn resample(
        &self,
        src: &PixelBuffer,
        width: u32,
        height: u32,
    ) -> Result<PixelBuffer, DecodeError> {
        self(src, width, height)
    }
}

/// Resampler backed by `image::imageops::resize`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterResampler {
    pub filter: FilterType,
}

impl FilterResampler {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl Resampler for FilterResampler {
    fn resample(
        &self,
        src: &PixelBuffer,
        width: u32,
        height: u32,
    ) -> Result<PixelBuffer, DecodeError> {
        resize(src, width, height, self.filter)
    }
}

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::InvalidDimensions` if either target dimension is zero.
pub fn resize(
    image: &PixelBuffer,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<PixelBuffer, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidDimensions { width, height });
    }

    // Fast path: if dimensions match, just clone
    if image.width() == width && image.height() == height {
        return Ok(image.clone());
    }

    let rgb_image = image
        .to_rgb_image()
        .ok_or_else(|| DecodeError::CorruptedFile("Failed to create RgbImage".to_string()))?;

    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());

    PixelBuffer::from_rgb_image(resized)
}
