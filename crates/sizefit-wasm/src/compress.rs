//! Target-size compression bindings.
//!
//! # Functions
//!
//! - [`compress_to_target`] - Decode an image and re-encode it as WebP under a size budget
//! - [`output_file_name`] - Swap a file name's extension for `.webp`
//!
//! # Example
//!
//! ```typescript
//! import { compress_to_target } from '@sizefit/wasm';
//!
//! // 500 KB budget, 1920px wide, height follows the aspect ratio
//! const result = compress_to_target(bytes, 0.5, 1920, undefined, { maxQuality: 0.9 },
//!   (percent, status) => { bar.value = percent; label.textContent = status; });
//! ```

use crate::types::JsEncodedArtifact;
use serde::Deserialize;
use sizefit_core::compress::{CompressConfig, CompressError, NoProgress, ProgressEvent};
use sizefit_core::decode::ImageDecoder;
use sizefit_core::encode::WebpEncoder;
use sizefit_core::request::{self, CompressRequest, DEFAULT_TARGET_SIZE};
use sizefit_core::TargetCompressor;
use wasm_bindgen::prelude::*;

/// Options object accepted from JavaScript. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CompressOptions {
    /// Start from the full-resolution variant instead of the default
    single_pass: bool,
    max_quality: Option<f64>,
    min_quality: Option<f64>,
    epsilon: Option<f64>,
    iterations: Option<u32>,
    resolution_floor: Option<u32>,
    fallback_quality: Option<f64>,
    /// libwebp effort, 0 to 6
    webp_method: Option<i32>,
}

impl CompressOptions {
    fn config(&self) -> CompressConfig {
        let mut config = if self.single_pass {
            CompressConfig::single_pass()
        } else {
            CompressConfig::default()
        };
        config.max_quality = self.max_quality.unwrap_or(config.max_quality);
        config.min_quality = self.min_quality.unwrap_or(config.min_quality);
        config.epsilon = self.epsilon.unwrap_or(config.epsilon);
        config.iterations = self.iterations.unwrap_or(config.iterations);
        config.fallback_quality = self.fallback_quality.unwrap_or(config.fallback_quality);
        if self.resolution_floor.is_some() {
            config.resolution_floor = self.resolution_floor;
        }
        config
    }

    fn encoder(&self) -> WebpEncoder {
        let mut encoder = WebpEncoder::default();
        if let Some(method) = self.webp_method {
            encoder.method = method;
        }
        encoder
    }
}

/// Compress an image so the WebP output fits a size budget.
///
/// # Arguments
///
/// * `bytes` - Encoded source image (JPEG, PNG or WebP)
/// * `target_size_mb` - Budget in megabytes (MiB); defaults to 1 when omitted
/// * `width` / `height` - Optional output size; a missing side keeps the aspect ratio
/// * `options` - Optional `{ singlePass, maxQuality, minQuality, epsilon,
///   iterations, resolutionFloor, fallbackQuality, webpMethod }`
/// * `on_progress` - Optional `(percent, status) => void` callback
///
/// # Errors
///
/// Returns an error string if the budget or options are invalid, the image
/// cannot be decoded, or the encoder fails. An unreachable budget is not an
/// error: the result may then exceed it.
#[wasm_bindgen]
pub fn compress_to_target(
    bytes: &[u8],
    target_size_mb: Option<f64>,
    width: Option<u32>,
    height: Option<u32>,
    options: JsValue,
    on_progress: Option<js_sys::Function>,
) -> Result<JsEncodedArtifact, JsValue> {
    let request = build_request(target_size_mb, width, height).map_err(to_js_error)?;
    let options = parse_options(options)?;

    let compressor = TargetCompressor::new(options.encoder()).with_config(options.config());
    let result = match on_progress {
        Some(callback) => {
            let mut sink = |event: &ProgressEvent| forward_progress(&callback, event);
            compressor.compress_request(&ImageDecoder, bytes, &request, &mut sink)
        }
        None => compressor.compress_request(&ImageDecoder, bytes, &request, &mut NoProgress),
    };

    result.map(JsEncodedArtifact::from).map_err(to_js_error)
}

/// Replace the extension of `file_name` with `.webp`.
#[wasm_bindgen]
pub fn output_file_name(file_name: &str) -> String {
    request::output_file_name(file_name, "webp")
}

fn build_request(
    target_size_mb: Option<f64>,
    width: Option<u32>,
    height: Option<u32>,
) -> Result<CompressRequest, CompressError> {
    let target_size = match target_size_mb {
        None => DEFAULT_TARGET_SIZE,
        Some(mb) => request::target_size_from_mb(mb)
            .ok_or_else(|| CompressError::InvalidBudget(mb.to_string()))?,
    };

    Ok(CompressRequest {
        target_size,
        width: width.filter(|&w| w > 0),
        height: height.filter(|&h| h > 0),
    })
}

fn parse_options(options: JsValue) -> Result<CompressOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(CompressOptions::default());
    }
    serde_wasm_bindgen::from_value(options)
        .map_err(|e| JsValue::from_str(&format!("Invalid compression options: {}", e)))
}

/// Progress is observational, so a throwing callback is logged and ignored.
fn forward_progress(callback: &js_sys::Function, event: &ProgressEvent) {
    let percent = JsValue::from(event.percent);
    let status = JsValue::from_str(&event.status);
    if let Err(err) = callback.call2(&JsValue::NULL, &percent, &status) {
        web_sys::console::warn_2(&JsValue::from_str("progress callback failed:"), &err);
    }
}

fn to_js_error(err: CompressError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Tests that work on all targets.
///
/// Functions returning `Result<T, JsValue>` only run on wasm32; the core
/// behavior is covered in `sizefit_core::compress`.
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_defaults_to_one_mib() {
        let request = build_request(None, None, None).unwrap();
        assert_eq!(request, CompressRequest::default());
        assert_eq!(request.target_size, 1024 * 1024);
    }

    #[test]
    fn test_build_request_converts_megabytes() {
        let request = build_request(Some(0.5), Some(1920), Some(0)).unwrap();
        assert_eq!(request.target_size, 512 * 1024);
        assert_eq!(request.width, Some(1920));
        assert_eq!(request.height, None);
    }

    #[test]
    fn test_build_request_rejects_bad_budget() {
        for mb in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                build_request(Some(mb), None, None),
                Err(CompressError::InvalidBudget(_))
            ));
        }
    }

    #[test]
    fn test_options_default_to_core_config() {
        let options = CompressOptions::default();
        assert_eq!(options.config(), CompressConfig::default());
        assert_eq!(options.encoder().method, WebpEncoder::default().method);
    }

    #[test]
    fn test_options_override_fields() {
        let options = CompressOptions {
            single_pass: true,
            max_quality: Some(0.9),
            webp_method: Some(6),
            ..Default::default()
        };
        let config = options.config();

        assert_eq!(config.max_quality, 0.9);
        assert_eq!(config.min_quality, 0.05);
        assert_eq!(config.resolution_floor, None);
        assert_eq!(options.encoder().method, 6);
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("holiday.JPG"), "holiday.webp");
        assert_eq!(output_file_name("scan"), "scan.webp");
    }
}
