//! Lossy encoder primitives.
//!
//! This module provides:
//! - The [`Encoder`] capability the size search drives as a black box
//! - [`JpegEncoder`], baseline JPEG through the `image` crate
//! - [`WebpEncoder`], lossy WebP through libwebp (feature `webp`)
//!
//! Quality is always expressed in `[0.0, 1.0]`; each codec maps it onto its
//! own scale.
//!
//! # Examples
//!
//! ```ignore
//! use sizefit_core::encode::{EncodeRequest, Encoder, JpegEncoder};
//!
//! let bytes = JpegEncoder.encode(EncodeRequest::new(&buffer, 0.9)).unwrap();
//! println!("Encoded {} bytes", bytes.len());
//! ```

mod jpeg;
mod types;
#[cfg(feature = "webp")]
mod webp_lossy;

pub use jpeg::{encode_jpeg, JpegEncoder};
pub use types::{quality_to_percent, EncodeError, EncodeRequest, Encoder};
#[cfg(feature = "webp")]
pub use webp_lossy::WebpEncoder;
