//! Encoder capability and its error type.

use thiserror::Error;

use crate::decode::PixelBuffer;

/// Errors that can occur while encoding a pixel buffer.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The codec itself is unavailable in this build or environment
    #[error("Encoder unavailable: {0}")]
    Unsupported(String),

    /// The encoder ran but produced no bytes
    #[error("Encoder produced no output")]
    EmptyOutput,

    /// Encoding failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

impl EncodeError {
    /// True when retrying with other parameters cannot help.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, EncodeError::Unsupported(_))
    }
}

/// A single encode call: a borrowed buffer and a quality in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy)]
pub struct EncodeRequest<'a> {
    pub buffer: &'a PixelBuffer,
    pub quality: f64,
}

impl<'a> EncodeRequest<'a> {
    pub fn new(buffer: &'a PixelBuffer, quality: f64) -> Self {
        Self { buffer, quality }
    }
}

/// Lossy encoder primitive.
///
/// Implementations must be deterministic, and the output length must be
/// non-increasing as quality decreases. The search relies on both.
pub trait Encoder {
    fn encode(&self, request: EncodeRequest<'_>) -> Result<Vec<u8>, EncodeError>;
}

impl<F> Encoder for F
where
    F: Fn(&PixelBuffer, f64) -> Result<Vec<u8>, EncodeError>,
{
    fn encode(&self, request: EncodeRequest<'_>) -> Result<Vec<u8>, EncodeError> {
        self(request.buffer, request.quality)
    }
}

/// Map a quality in `[0.0, 1.0]` onto the 1-100 scale most codecs use.
pub fn quality_to_percent(quality: f64) -> u8 {
    if !quality.is_finite() {
        return 1;
    }
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}
