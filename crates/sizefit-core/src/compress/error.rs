//! Errors that abort a compression request.

use thiserror::Error;

use crate::decode::{DecodeError, PixelBuffer};
use crate::encode::EncodeError;

/// Every failure aborts the whole request; there are no partial results.
///
/// An unreachable budget is not an error: the resolution fallback always
/// yields an artifact.
#[derive(Debug, Error)]
pub enum CompressError {
    /// The byte budget is zero, negative, or not a number
    #[error("Target size must be a positive number, got {0}")]
    InvalidBudget(String),

    /// The search configuration violates its bounds
    #[error("Invalid compression config: {0}")]
    InvalidConfig(String),

    /// The input bytes are not a valid or supported image
    #[error("Failed to decode image: {0}")]
    Decode(#[from] DecodeError),

    /// The encoder cannot produce output at all
    #[error("Encoder is not supported in this environment: {0}")]
    EncoderUnsupported(#[source] EncodeError),

    /// A single encode attempt failed
    #[error("Failed to encode {width}x{height} at quality {quality:.2}: {source}")]
    EncodeFailed {
        quality: f64,
        width: u32,
        height: u32,
        #[source]
        source: EncodeError,
    },

    /// The resampler could not produce the working buffer
    #[error("Failed to resample to {width}x{height}: {source}")]
    Resample {
        width: u32,
        height: u32,
        #[source]
        source: DecodeError,
    },
}

impl CompressError {
    /// Classify an encoder failure.
    ///
    /// `first_probe` marks the opening encode of a search: an empty result
    /// there means the codec is unavailable, not that one call misbehaved.
    pub(crate) fn from_encode(
        source: EncodeError,
        buffer: &PixelBuffer,
        quality: f64,
        first_probe: bool,
    ) -> Self {
        let unavailable =
            source.is_unsupported() || (first_probe && matches!(source, EncodeError::EmptyOutput));

        if unavailable {
            CompressError::EncoderUnsupported(source)
        } else {
            CompressError::EncodeFailed {
                quality,
                width: buffer.width(),
                height: buffer.height(),
                source,
            }
        }
    }
}
