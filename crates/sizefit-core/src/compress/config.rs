//! Tunables for the quality search and the resolution fallback.

use serde::{Deserialize, Serialize};

use super::CompressError;

/// Knobs for [`TargetCompressor`](super::TargetCompressor).
///
/// Every field has a default, so a partial config deserializes cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressConfig {
    /// Quality tried first; also the upper search bound (0.0 to 1.0)
    pub max_quality: f64,
    /// Lowest quality the search may settle on (0.0 to 1.0)
    pub min_quality: f64,
    /// Step past an already-tested midpoint
    pub epsilon: f64,
    /// Bisection iterations per resolution attempt
    pub iterations: u32,
    /// Width below which halving stops; `None` keeps full resolution
    pub resolution_floor: Option<u32>,
    /// Quality for the unconditional last-resort encode
    pub fallback_quality: f64,
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self {
            max_quality: 0.95,
            min_quality: 0.6,
            epsilon: 0.02,
            iterations: 10,
            resolution_floor: Some(1080),
            fallback_quality: 0.8,
        }
    }
}

impl CompressConfig {
    /// Create a config with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Full-resolution variant: wide quality range, no downscaling, and a
    /// last resort at the quality floor.
    pub fn single_pass() -> Self {
        Self {
            min_quality: 0.05,
            resolution_floor: None,
            fallback_quality: 0.05,
            ..Self::default()
        }
    }

    /// Check the invariants the search relies on.
    ///
    /// # Errors
    ///
    /// Returns `CompressError::InvalidConfig` naming the first violated bound.
    pub fn validate(&self) -> Result<(), CompressError> {
        let in_unit = |q: f64| (0.0..=1.0).contains(&q);

        if !(in_unit(self.min_quality) && in_unit(self.max_quality))
            || self.min_quality >= self.max_quality
        {
            return Err(CompressError::InvalidConfig(format!(
                "quality bounds must satisfy 0 <= min < max <= 1, got min={} max={}",
                self.min_quality, self.max_quality
            )));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(CompressError::InvalidConfig(format!(
                "epsilon must be positive, got {}",
                self.epsilon
            )));
        }
        if self.iterations == 0 {
            return Err(CompressError::InvalidConfig(
                "iterations must be at least 1".to_string(),
            ));
        }
        if !in_unit(self.fallback_quality) {
            return Err(CompressError::InvalidConfig(format!(
                "fallback quality must be within 0..=1, got {}",
                self.fallback_quality
            )));
        }
        if self.resolution_floor == Some(0) {
            return Err(CompressError::InvalidConfig(
                "resolution floor must be at least 1 pixel".to_string(),
            ));
        }
        Ok(())
    }
}
