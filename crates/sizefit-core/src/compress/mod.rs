//! Target-size compression.
//!
//! Two cooperating algorithms drive a black-box [`Encoder`](crate::encode::Encoder):
//!
//! - **Quality search** ([`QualitySearch`]) finds the highest quality whose
//!   output fits the budget at a fixed resolution, in a bounded number of
//!   encoder calls.
//! - **Resolution fallback** ([`TargetCompressor`]) halves the resolution
//!   whenever the search comes up empty, and below a width floor accepts a
//!   single fixed-quality encode so every request terminates with an artifact.
//!
//! Each request owns its buffers and search state; nothing is shared between
//! requests, so independent requests can run in parallel without locking.
//!
//! # Examples
//!
//! ```ignore
//! use sizefit_core::compress::{NoProgress, TargetCompressor};
//! use sizefit_core::decode::ImageDecoder;
//! use sizefit_core::encode::JpegEncoder;
//!
//! let compressor = TargetCompressor::new(JpegEncoder);
//! let artifact = compressor.compress_bytes(&ImageDecoder, &bytes, 500 * 1024, &mut NoProgress)?;
//! println!("{} bytes at quality {:.2}", artifact.size_in_bytes(), artifact.quality_used());
//! ```

mod artifact;
mod compressor;
mod config;
mod error;
mod progress;
mod search;

pub use artifact::EncodedArtifact;
pub use compressor::{
    compress_to_target, floor_dimensions, max_resolution_attempts, scaled_dimensions,
    TargetCompressor,
};
pub use config::CompressConfig;
pub use error::CompressError;
pub use progress::{NoProgress, ProgressEvent, ProgressLog, ProgressSink};
pub use search::{QualitySearch, SearchBounds, SearchOutcome};
