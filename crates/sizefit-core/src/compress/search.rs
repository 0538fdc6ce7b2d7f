//! Quality search at a fixed resolution.
//!
//! Finds the highest encoder quality whose output fits the byte budget:
//!
//! 1. Probe `max_quality`; if it fits, stop.
//! 2. Bisect `[min_quality, max_quality]` for a fixed number of iterations.
//!    An overshooting midpoint moves `high` to `mid - epsilon`, a fitting
//!    one becomes the best so far and moves `low` to `mid + epsilon`.
//! 3. If no midpoint fit, probe `min_quality` exactly.
//!
//! The encoder runs at most `iterations + 2` times per search.

use tracing::debug;

use super::progress::Reporter;
use super::{CompressConfig, CompressError, EncodedArtifact, ProgressSink};
use crate::decode::PixelBuffer;
use crate::encode::Encoder;

/// Result of one search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Best artifact that fits the budget
    Found(EncodedArtifact),
    /// Nothing in the quality range fits at this resolution
    NotFound,
}

/// Bisection state, threaded through the fold one iteration at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchBounds {
    pub low: f64,
    pub high: f64,
    pub best: Option<EncodedArtifact>,
}

impl SearchBounds {
    pub fn new(low: f64, high: f64) -> Self {
        Self {
            low,
            high,
            best: None,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.high <= self.low
    }

    pub fn midpoint(&self) -> f64 {
        self.low + (self.high - self.low) / 2.0
    }

    /// Fold one probe into the bounds. The probe's quality must be the
    /// current midpoint.
    pub fn narrow(
        self,
        probe: EncodedArtifact,
        target_size: u64,
        epsilon: f64,
        ceiling: f64,
    ) -> Self {
        let mid = probe.quality_used();
        if probe.fits(target_size) {
            Self {
                low: (mid + epsilon).min(ceiling),
                best: Some(probe),
                ..self
            }
        } else {
            Self {
                high: mid - epsilon,
                ..self
            }
        }
    }
}

/// Parameters for one quality search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualitySearch {
    pub max_quality: f64,
    pub min_quality: f64,
    pub epsilon: f64,
    pub iterations: u32,
}

impl QualitySearch {
    pub fn from_config(config: &CompressConfig) -> Self {
        Self {
            max_quality: config.max_quality,
            min_quality: config.min_quality,
            epsilon: config.epsilon,
            iterations: config.iterations,
        }
    }

    /// Upper bound on encoder invocations for one [`QualitySearch::run`].
    pub fn max_encoder_calls(&self) -> u32 {
        self.iterations + 2
    }

    /// Search `buffer` for the best quality that fits `target_size` bytes.
    ///
    /// # Errors
    ///
    /// Any encoder failure aborts the search; it is never retried.
    pub fn run<E>(
        &self,
        encoder: &E,
        buffer: &PixelBuffer,
        target_size: u64,
        progress: &mut dyn ProgressSink,
    ) -> Result<SearchOutcome, CompressError>
    where
        E: Encoder + ?Sized,
    {
        self.run_reporting(encoder, buffer, target_size, &mut Reporter::new(progress))
    }

    pub(crate) fn run_reporting<E>(
        &self,
        encoder: &E,
        buffer: &PixelBuffer,
        target_size: u64,
        progress: &mut Reporter<'_>,
    ) -> Result<SearchOutcome, CompressError>
    where
        E: Encoder + ?Sized,
    {
        let initial = probe(encoder, buffer, self.max_quality, target_size, true)?;
        if initial.fits(target_size) {
            return Ok(SearchOutcome::Found(initial));
        }

        let bounds = (0..self.iterations).try_fold(
            SearchBounds::new(self.min_quality, self.max_quality),
            |bounds, i| {
                if bounds.is_exhausted() {
                    return Ok(bounds);
                }
                let candidate = probe(encoder, buffer, bounds.midpoint(), target_size, false)?;
                progress.percent(bisection_percent(i, self.iterations));
                Ok::<_, CompressError>(bounds.narrow(
                    candidate,
                    target_size,
                    self.epsilon,
                    self.max_quality,
                ))
            },
        )?;

        if let Some(best) = bounds.best {
            return Ok(SearchOutcome::Found(best));
        }

        let floor = probe(encoder, buffer, self.min_quality, target_size, false)?;
        if floor.fits(target_size) {
            Ok(SearchOutcome::Found(floor))
        } else {
            Ok(SearchOutcome::NotFound)
        }
    }
}

fn probe<E>(
    encoder: &E,
    buffer: &PixelBuffer,
    quality: f64,
    target_size: u64,
    first_probe: bool,
) -> Result<EncodedArtifact, CompressError>
where
    E: Encoder + ?Sized,
{
    let artifact = EncodedArtifact::encode(encoder, buffer, quality)
        .map_err(|e| CompressError::from_encode(e, buffer, quality, first_probe))?;

    debug!(
        quality,
        size = artifact.size_in_bytes(),
        target = target_size,
        width = buffer.width(),
        height = buffer.height(),
        "encoder probe"
    );
    Ok(artifact)
}

/// Bar position after bisection step `i`: 40% to 80%, never past 90%.
fn bisection_percent(i: u32, iterations: u32) -> u8 {
    let fraction = f64::from(i + 1) / f64::from(iterations.max(1));
    (40.0 + fraction * 40.0).min(90.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compress::{NoProgress, ProgressLog};
    use crate::encode::EncodeError;
    use std::cell::Cell;

    fn buffer() -> PixelBuffer {
        PixelBuffer::new(8, 8, vec![0; 8 * 8 * 3]).unwrap()
    }

    fn default_search() -> QualitySearch {
        QualitySearch::from_config(&CompressConfig::default())
    }

    /// Size grows linearly with quality: 1000 bytes per unit.
    fn linear(
        calls: &Cell<u32>,
    ) -> impl Fn(&PixelBuffer, f64) -> Result<Vec<u8>, EncodeError> + '_ {
        move |_: &PixelBuffer, q: f64| {
            calls.set(calls.get() + 1);
            Ok(vec![0u8; (q * 1000.0) as usize])
        }
    }

    fn found(outcome: SearchOutcome) -> EncodedArtifact {
        match outcome {
            SearchOutcome::Found(artifact) => artifact,
            SearchOutcome::NotFound => panic!("expected Found"),
        }
    }

    #[test]
    fn test_max_quality_fits_without_bisection() {
        let calls = Cell::new(0);
        let outcome = default_search()
            .run(&linear(&calls), &buffer(), 1000, &mut NoProgress)
            .unwrap();

        let artifact = found(outcome);
        assert_eq!(artifact.quality_used(), 0.95);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_bisection_finds_fitting_quality() {
        let calls = Cell::new(0);
        let outcome = default_search()
            .run(&linear(&calls), &buffer(), 800, &mut NoProgress)
            .unwrap();

        let artifact = found(outcome);
        assert!(artifact.size_in_bytes() <= 800);
        assert!(artifact.quality_used() > 0.78 && artifact.quality_used() <= 0.8);
        assert!(calls.get() <= 12);
    }

    #[test]
    fn test_floor_probe_accepts_min_quality() {
        let calls = Cell::new(0);
        let outcome = default_search()
            .run(&linear(&calls), &buffer(), 600, &mut NoProgress)
            .unwrap();

        let artifact = found(outcome);
        assert_eq!(artifact.quality_used(), 0.6);
        assert_eq!(artifact.size_in_bytes(), 600);
    }

    #[test]
    fn test_unreachable_budget_is_not_found() {
        let calls = Cell::new(0);
        let outcome = default_search()
            .run(&linear(&calls), &buffer(), 500, &mut NoProgress)
            .unwrap();

        assert_eq!(outcome, SearchOutcome::NotFound);
        assert!(calls.get() <= 12);
    }

    #[test]
    fn test_plateau_encoder_terminates_within_bound() {
        let calls = Cell::new(0);
        let encoder = |_: &PixelBuffer, _: f64| {
            calls.set(calls.get() + 1);
            Ok::<_, EncodeError>(vec![0u8; 100])
        };

        let search = default_search();
        let outcome = search.run(&encoder, &buffer(), 50, &mut NoProgress).unwrap();

        assert_eq!(outcome, SearchOutcome::NotFound);
        assert!(calls.get() <= search.max_encoder_calls());
    }

    #[test]
    fn test_step_encoder_prefers_highest_fitting_quality() {
        // Anything above 0.7 is far too big, anything at or below fits.
        let encoder = |_: &PixelBuffer, q: f64| {
            Ok::<_, EncodeError>(vec![0u8; if q > 0.7 { 5000 } else { 100 }])
        };

        let artifact = found(
            default_search()
                .run(&encoder, &buffer(), 1000, &mut NoProgress)
                .unwrap(),
        );
        assert!(artifact.quality_used() <= 0.7);
        assert!(artifact.quality_used() > 0.6);
    }

    #[test]
    fn test_empty_first_probe_is_unsupported() {
        let encoder = |_: &PixelBuffer, _: f64| Ok::<_, EncodeError>(Vec::new());
        let result = default_search().run(&encoder, &buffer(), 1000, &mut NoProgress);
        assert!(matches!(result, Err(CompressError::EncoderUnsupported(_))));
    }

    #[test]
    fn test_failure_mid_search_aborts() {
        let calls = Cell::new(0);
        let encoder = |_: &PixelBuffer, _: f64| {
            calls.set(calls.get() + 1);
            if calls.get() == 1 {
                Ok(vec![0u8; 5000])
            } else {
                Err(EncodeError::EncodingFailed("out of memory".into()))
            }
        };

        let result = default_search().run(&encoder, &buffer(), 1000, &mut NoProgress);
        assert!(matches!(result, Err(CompressError::EncodeFailed { .. })));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_bisection_reports_progress() {
        let calls = Cell::new(0);
        let mut log = ProgressLog::new();
        default_search()
            .run(&linear(&calls), &buffer(), 500, &mut log)
            .unwrap();

        let percents: Vec<u8> = log.events().iter().map(|e| e.percent).collect();
        assert!(!percents.is_empty());
        assert_eq!(percents[0], 44);
        assert!(percents.windows(2).all(|w| w[0] <= w[1]));
        assert!(percents.iter().all(|&p| (40..=90).contains(&p)));
    }

    #[test]
    fn test_narrow_moves_bounds() {
        let fit = EncodedArtifact::new(vec![0; 10], 0.7, 1, 1);
        let bounds = SearchBounds::new(0.6, 0.95).narrow(fit, 10, 0.02, 0.95);
        assert!((bounds.low - 0.72).abs() < 1e-12);
        assert_eq!(bounds.high, 0.95);
        assert!(bounds.best.is_some());

        let over = EncodedArtifact::new(vec![0; 11], 0.7, 1, 1);
        let bounds = SearchBounds::new(0.6, 0.95).narrow(over, 10, 0.02, 0.95);
        assert_eq!(bounds.low, 0.6);
        assert!((bounds.high - 0.68).abs() < 1e-12);
        assert!(bounds.best.is_none());
    }

    #[test]
    fn test_narrow_caps_low_at_ceiling() {
        let fit = EncodedArtifact::new(vec![0; 1], 0.94, 1, 1);
        let bounds = SearchBounds::new(0.93, 0.95).narrow(fit, 10, 0.02, 0.95);
        assert_eq!(bounds.low, 0.95);
        assert!(bounds.is_exhausted());
    }

    #[test]
    fn test_bisection_percent() {
        assert_eq!(bisection_percent(0, 10), 44);
        assert_eq!(bisection_percent(9, 10), 80);
        assert_eq!(bisection_percent(0, 1), 80);
    }
}
