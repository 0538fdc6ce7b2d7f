//! Sizefit Core - target-size image compression
//!
//! This crate encodes a raster image so the output fits a byte budget while
//! keeping quality as high as possible. The encoder is a black box that maps
//! quality to bytes; the crate searches quality first and falls back to lower
//! resolutions when no quality in range fits.
//!
//! # Module Structure
//!
//! - `decode` - Pixel buffers, decoding and resampling collaborators
//! - `encode` - The encoder capability plus JPEG and WebP encoders
//! - `compress` - Quality search, resolution fallback, progress, config
//! - `request` - Form-style request parsing (target size, output dimensions)

pub mod compress;
pub mod decode;
pub mod encode;
pub mod request;

pub use compress::{
    compress_to_target, CompressConfig, CompressError, EncodedArtifact, NoProgress,
    ProgressEvent, ProgressSink, TargetCompressor,
};
pub use decode::{DecodeError, PixelBuffer};
pub use encode::{EncodeError, Encoder};
pub use request::CompressRequest;
