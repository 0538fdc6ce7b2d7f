//! Caller-side request helpers.
//!
//! Turns loosely typed form input (target size in megabytes, optional output
//! width and height) into a validated [`CompressRequest`].

use serde::{Deserialize, Serialize};

use crate::compress::CompressError;

/// Budget used when the caller leaves the target size blank: 1 MiB.
pub const DEFAULT_TARGET_SIZE: u64 = 1024 * 1024;

/// A validated compression request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressRequest {
    /// Byte budget, always > 0 once validated
    pub target_size: u64,
    /// Requested output width; height follows the aspect ratio if unset
    pub width: Option<u32>,
    /// Requested output height; width follows the aspect ratio if unset
    pub height: Option<u32>,
}

impl Default for CompressRequest {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            width: None,
            height: None,
        }
    }
}

impl CompressRequest {
    /// Build a request from raw form fields.
    ///
    /// Blank or invalid dimensions are ignored; the target size must be blank
    /// (default 1 MiB) or a positive number of megabytes.
    ///
    /// # Errors
    ///
    /// Returns `CompressError::InvalidBudget` for an unusable target size.
    pub fn from_form(target_mb: &str, width: &str, height: &str) -> Result<Self, CompressError> {
        Ok(Self {
            target_size: parse_target_size_mb(target_mb)?,
            width: parse_dimension(width),
            height: parse_dimension(height),
        })
    }

    /// Output dimensions for a source of `natural_width` x `natural_height`.
    pub fn output_dimensions(&self, natural_width: u32, natural_height: u32) -> (u32, u32) {
        resolve_dimensions(natural_width, natural_height, self.width, self.height)
    }
}

/// Parse a target size in megabytes (MiB) into bytes.
///
/// An empty string yields [`DEFAULT_TARGET_SIZE`].
///
/// # Errors
///
/// Returns `CompressError::InvalidBudget` if the value is not a finite,
/// positive number.
pub fn parse_target_size_mb(value: &str) -> Result<u64, CompressError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(DEFAULT_TARGET_SIZE);
    }

    trimmed
        .parse::<f64>()
        .ok()
        .and_then(target_size_from_mb)
        .ok_or_else(|| CompressError::InvalidBudget(trimmed.to_string()))
}

/// Convert megabytes (MiB) to bytes, rejecting non-positive values.
pub fn target_size_from_mb(mb: f64) -> Option<u64> {
    if !mb.is_finite() || mb <= 0.0 {
        return None;
    }
    let bytes = (mb * 1024.0 * 1024.0).floor();
    if bytes >= u64::MAX as f64 {
        return None;
    }
    Some((bytes as u64).max(1))
}

/// Parse an optional pixel dimension: a finite positive number, rounded.
///
/// Blank input, garbage, and values that round to zero give `None`.
pub fn parse_dimension(value: &str) -> Option<u32> {
    let parsed = value.trim().parse::<f64>().ok()?;
    if !parsed.is_finite() || parsed <= 0.0 {
        return None;
    }
    let rounded = parsed.round();
    if rounded < 1.0 || rounded > f64::from(u32::MAX) {
        return None;
    }
    Some(rounded as u32)
}

/// Resolve output dimensions from optional requested width and height.
///
/// - both given: used as-is
/// - one given: the other follows the source aspect ratio (at least 1)
/// - neither: the natural dimensions
pub fn resolve_dimensions(
    natural_width: u32,
    natural_height: u32,
    width: Option<u32>,
    height: Option<u32>,
) -> (u32, u32) {
    let derive = |given: u32, from: u32, to: u32| -> u32 {
        let derived = (f64::from(given) / f64::from(from.max(1)) * f64::from(to)).round();
        (derived as u32).max(1)
    };

    match (width, height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => (w, derive(w, natural_width, natural_height)),
        (None, Some(h)) => (derive(h, natural_height, natural_width), h),
        (None, None) => (natural_width, natural_height),
    }
}

/// Replace the final extension of `file_name` with `extension`.
///
/// `photo.jpg` becomes `photo.webp`; names without an extension gain one.
pub fn output_file_name(file_name: &str, extension: &str) -> String {
    let stem = match file_name.rfind('.') {
        Some(dot) if dot + 1 < file_name.len() => &file_name[..dot],
        _ => file_name,
    };
    format!("{stem}.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target_size_default() {
        assert_eq!(parse_target_size_mb("").unwrap(), 1024 * 1024);
        assert_eq!(parse_target_size_mb("   ").unwrap(), 1024 * 1024);
    }

    #[test]
    fn test_parse_target_size_values() {
        assert_eq!(parse_target_size_mb("1").unwrap(), 1_048_576);
        assert_eq!(parse_target_size_mb(" 0.5 ").unwrap(), 524_288);
        assert_eq!(parse_target_size_mb("2.25").unwrap(), 2_359_296);
    }

    #[test]
    fn test_parse_target_size_rejects_bad_input() {
        for bad in ["0", "-1", "abc", "NaN", "inf"] {
            assert!(
                matches!(parse_target_size_mb(bad), Err(CompressError::InvalidBudget(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_tiny_target_rounds_up_to_one_byte() {
        assert_eq!(target_size_from_mb(1e-9), Some(1));
    }

    #[test]
    fn test_parse_dimension() {
        assert_eq!(parse_dimension("1920"), Some(1920));
        assert_eq!(parse_dimension(" 99.6 "), Some(100));
        assert_eq!(parse_dimension(""), None);
        assert_eq!(parse_dimension("0"), None);
        assert_eq!(parse_dimension("0.2"), None);
        assert_eq!(parse_dimension("-5"), None);
        assert_eq!(parse_dimension("wide"), None);
    }

    #[test]
    fn test_resolve_dimensions() {
        assert_eq!(resolve_dimensions(4000, 3000, None, None), (4000, 3000));
        assert_eq!(resolve_dimensions(4000, 3000, Some(800), Some(10)), (800, 10));
        assert_eq!(resolve_dimensions(4000, 3000, Some(1080), None), (1080, 810));
        assert_eq!(resolve_dimensions(4000, 3000, None, Some(300)), (400, 300));
        assert_eq!(resolve_dimensions(4000, 1, Some(10), None), (10, 1));
    }

    #[test]
    fn test_request_from_form() {
        let request = CompressRequest::from_form("0.5", "1080", "").unwrap();
        assert_eq!(request.target_size, 524_288);
        assert_eq!(request.output_dimensions(4000, 3000), (1080, 810));

        assert!(CompressRequest::from_form("-2", "", "").is_err());
        assert_eq!(
            CompressRequest::from_form("", "", "").unwrap(),
            CompressRequest::default()
        );
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("photo.jpg", "webp"), "photo.webp");
        assert_eq!(output_file_name("scan.final.png", "webp"), "scan.final.webp");
        assert_eq!(output_file_name("noext", "webp"), "noext.webp");
        assert_eq!(output_file_name("trailing.", "webp"), "trailing..webp");
    }
}
