//! Decoding and resampling collaborators.
//!
//! This module provides:
//! - [`PixelBuffer`], the immutable RGB raster every stage passes along
//! - The [`Decoder`] capability and an `image`-crate implementation
//! - The [`Resampler`] capability and an `image`-crate implementation
//!
//! Closures with the matching signature implement both traits, so callers can
//! plug in their own decoding or resampling.
//!
//! # Examples
//!
//! ```ignore
//! use sizefit_core::decode::{decode_image, resize, FilterType};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! let half = resize(&image, image.width() / 2, image.height() / 2, FilterType::Bilinear).unwrap();
//! ```

mod reader;
mod resize;
mod types;

pub use reader::{decode_image, Decoder, ImageDecoder};
pub use resize::{resize, FilterResampler, Resampler};
pub use types::{DecodeError, FilterType, Orientation, PixelBuffer};
