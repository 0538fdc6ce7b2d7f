//! Resolution fallback around the quality search.
//!
//! When no quality in range fits at the current resolution, the source is
//! halved and searched again. Once the next halving would drop the width
//! under the resolution floor, the source is resampled to the floor width
//! and encoded once at the fallback quality, and that artifact is returned
//! whether or not it fits. The loop always terminates with an artifact.

use tracing::{info, warn};

use super::progress::{format_kb, format_mb, Reporter};
use super::search::{QualitySearch, SearchOutcome};
use super::{CompressConfig, CompressError, EncodedArtifact, NoProgress, ProgressSink};
use crate::decode::{Decoder, FilterResampler, PixelBuffer, Resampler};
use crate::encode::Encoder;
use crate::request::CompressRequest;

/// Compresses pixel buffers to a byte budget with a caller-supplied encoder.
///
/// Holds no per-request state, so one compressor can serve any number of
/// requests, including from several threads when `E` and `R` are `Sync`.
#[derive(Debug, Clone)]
pub struct TargetCompressor<E, R = FilterResampler> {
    encoder: E,
    resampler: R,
    config: CompressConfig,
}

impl<E: Encoder> TargetCompressor<E> {
    /// Create a compressor with the default resampler and config.
    pub fn new(encoder: E) -> Self {
        Self {
            encoder,
            resampler: FilterResampler::default(),
            config: CompressConfig::default(),
        }
    }
}

impl<E: Encoder, R: Resampler> TargetCompressor<E, R> {
    pub fn with_resampler<R2: Resampler>(self, resampler: R2) -> TargetCompressor<E, R2> {
        TargetCompressor {
            encoder: self.encoder,
            resampler,
            config: self.config,
        }
    }

    pub fn with_config(mut self, config: CompressConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CompressConfig {
        &self.config
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Encode `image` so it fits `target_size` bytes where possible.
    ///
    /// # Errors
    ///
    /// - `CompressError::InvalidBudget` if `target_size` is zero (checked
    ///   before any encoding)
    /// - `CompressError::InvalidConfig` if the config violates its bounds
    /// - `CompressError::EncoderUnsupported` / `EncodeFailed` on any encoder
    ///   failure
    /// - `CompressError::Resample` if a working buffer cannot be produced
    pub fn compress(
        &self,
        image: &PixelBuffer,
        target_size: u64,
        progress: &mut dyn ProgressSink,
    ) -> Result<EncodedArtifact, CompressError> {
        self.check_request(target_size)?;
        self.compress_reporting(image, target_size, &mut Reporter::new(progress))
    }

    /// Decode `bytes` with `decoder`, then [`compress`](Self::compress).
    ///
    /// # Errors
    ///
    /// As [`compress`](Self::compress), plus `CompressError::Decode` when the
    /// bytes cannot be decoded. Nothing is encoded in that case.
    pub fn compress_bytes<D>(
        &self,
        decoder: &D,
        bytes: &[u8],
        target_size: u64,
        progress: &mut dyn ProgressSink,
    ) -> Result<EncodedArtifact, CompressError>
    where
        D: Decoder + ?Sized,
    {
        self.check_request(target_size)?;
        let mut reporter = Reporter::new(progress);

        let image = decode(decoder, bytes, &mut reporter)?;
        self.compress_reporting(&image, target_size, &mut reporter)
    }

    /// Decode, resize to the requested dimensions if any, then compress.
    ///
    /// The requested size only sets the starting resolution; the fallback
    /// may still shrink it further.
    pub fn compress_request<D>(
        &self,
        decoder: &D,
        bytes: &[u8],
        request: &CompressRequest,
        progress: &mut dyn ProgressSink,
    ) -> Result<EncodedArtifact, CompressError>
    where
        D: Decoder + ?Sized,
    {
        self.check_request(request.target_size)?;
        let mut reporter = Reporter::new(progress);

        let decoded = decode(decoder, bytes, &mut reporter)?;
        let (width, height) = request.output_dimensions(decoded.width(), decoded.height());
        let image = if (width, height) == (decoded.width(), decoded.height()) {
            decoded
        } else {
            self.resample(&decoded, width, height)?
        };

        self.compress_reporting(&image, request.target_size, &mut reporter)
    }

    fn check_request(&self, target_size: u64) -> Result<(), CompressError> {
        if target_size == 0 {
            return Err(CompressError::InvalidBudget(target_size.to_string()));
        }
        self.config.validate()
    }

    fn compress_reporting(
        &self,
        image: &PixelBuffer,
        target_size: u64,
        progress: &mut Reporter<'_>,
    ) -> Result<EncodedArtifact, CompressError> {
        let (source_width, source_height) = (image.width(), image.height());
        let search = QualitySearch::from_config(&self.config);
        let mut scale = 1.0_f64;

        loop {
            let (width, height) = scaled_dimensions(source_width, source_height, scale);
            info!(width, height, scale, target = target_size, "resolution attempt");
            progress.update(
                40,
                format!(
                    "Compressing targeting {} MB at {width}x{height}...",
                    format_mb(target_size)
                ),
            );

            let outcome = if scale == 1.0 {
                search.run_reporting(&self.encoder, image, target_size, progress)?
            } else {
                let working = self.resample(image, width, height)?;
                search.run_reporting(&self.encoder, &working, target_size, progress)?
            };

            if let SearchOutcome::Found(artifact) = outcome {
                return Ok(finish(artifact, target_size, progress));
            }

            let Some(floor) = self.config.resolution_floor else {
                return self.fallback(
                    image,
                    source_width,
                    source_height,
                    target_size,
                    progress,
                );
            };

            scale /= 2.0;
            let next_width = f64::from(source_width) * scale;
            let next_height = f64::from(source_height) * scale;
            progress.status(format!(
                "Reducing resolution to {}x{} to hit the target size...",
                next_width.max(1.0).round(),
                next_height.max(1.0).round()
            ));

            if next_width < f64::from(floor) {
                let (width, height) = floor_dimensions(source_width, source_height, floor);
                return self.fallback(image, width, height, target_size, progress);
            }
        }
    }

    /// Single encode at the fallback quality. The budget is not re-checked.
    fn fallback(
        &self,
        image: &PixelBuffer,
        width: u32,
        height: u32,
        target_size: u64,
        progress: &mut Reporter<'_>,
    ) -> Result<EncodedArtifact, CompressError> {
        let quality = self.config.fallback_quality;
        progress.status(format!("Falling back to {width}x{height} at quality {quality:.2}."));

        let working = if (width, height) == (image.width(), image.height()) {
            None
        } else {
            Some(self.resample(image, width, height)?)
        };
        let buffer = working.as_ref().unwrap_or(image);

        let artifact = EncodedArtifact::encode(&self.encoder, buffer, quality)
            .map_err(|e| CompressError::from_encode(e, buffer, quality, false))?;

        if !artifact.fits(target_size) {
            warn!(
                size = artifact.size_in_bytes(),
                target = target_size,
                width,
                height,
                "fallback artifact exceeds the target size"
            );
        }
        Ok(finish(artifact, target_size, progress))
    }

    fn resample(
        &self,
        image: &PixelBuffer,
        width: u32,
        height: u32,
    ) -> Result<PixelBuffer, CompressError> {
        self.resampler
            .resample(image, width, height)
            .map_err(|source| CompressError::Resample {
                width,
                height,
                source,
            })
    }
}

fn decode<D>(
    decoder: &D,
    bytes: &[u8],
    progress: &mut Reporter<'_>,
) -> Result<PixelBuffer, CompressError>
where
    D: Decoder + ?Sized,
{
    progress.update(20, "Decoding image...");
    let image = decoder.decode(bytes)?;
    info!(
        width = image.width(),
        height = image.height(),
        "decoded source image"
    );
    Ok(image)
}

fn finish(
    artifact: EncodedArtifact,
    target_size: u64,
    progress: &mut Reporter<'_>,
) -> EncodedArtifact {
    info!(
        quality = artifact.quality_used(),
        size = artifact.size_in_bytes(),
        width = artifact.width_used(),
        height = artifact.height_used(),
        target = target_size,
        "compression finished"
    );
    progress.update(
        100,
        format!(
            "Finished at quality {:.2}. Output size: {} KB (target {} MB)",
            artifact.quality_used(),
            format_kb(artifact.size_in_bytes()),
            format_mb(target_size)
        ),
    );
    artifact
}

/// Compress `image` with `encoder`, the default resampler and default config.
///
/// # Errors
///
/// See [`TargetCompressor::compress`].
pub fn compress_to_target<E: Encoder>(
    encoder: E,
    image: &PixelBuffer,
    target_size: u64,
    progress: Option<&mut dyn ProgressSink>,
) -> Result<EncodedArtifact, CompressError> {
    let compressor = TargetCompressor::new(encoder);
    match progress {
        Some(sink) => compressor.compress(image, target_size, sink),
        None => compressor.compress(image, target_size, &mut NoProgress),
    }
}

/// Dimensions at `scale`, each rounded and at least 1.
pub fn scaled_dimensions(width: u32, height: u32, scale: f64) -> (u32, u32) {
    let axis = |v: u32| ((f64::from(v) * scale).round() as u32).max(1);
    (axis(width), axis(height))
}

/// Dimensions for the last-resort encode: at most `floor` wide, aspect kept.
pub fn floor_dimensions(width: u32, height: u32, floor: u32) -> (u32, u32) {
    let floor_width = width.min(floor);
    let floor_height =
        ((f64::from(floor_width) / f64::from(width)) * f64::from(height)).round() as u32;
    (floor_width, floor_height.max(1))
}

/// Most resolution attempts a request can make before the fallback.
pub fn max_resolution_attempts(width: u32, floor: u32) -> u32 {
    if width <= floor {
        return 1;
    }
    (f64::from(width) / f64::from(floor)).log2().ceil() as u32 + 1
}
