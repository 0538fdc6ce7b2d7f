//! Lossy WebP encoding through libwebp.

use super::{EncodeError, EncodeRequest, Encoder};

/// libwebp's default effort level.
const DEFAULT_METHOD: i32 = 4;

/// [`Encoder`] producing lossy WebP.
///
/// `method` is libwebp's speed/size trade-off (0 = fastest, 6 = smallest).
#[derive(Debug, Clone, Copy)]
pub struct WebpEncoder {
    pub method: i32,
}

impl Default for WebpEncoder {
    fn default() -> Self {
        Self {
            method: DEFAULT_METHOD,
        }
    }
}

impl Encoder for WebpEncoder {
    fn encode(&self, request: EncodeRequest<'_>) -> Result<Vec<u8>, EncodeError> {
        let buffer = request.buffer;
        let encoder = webp::Encoder::from_rgb(buffer.pixels(), buffer.width(), buffer.height());

        let mut config = webp::WebPConfig::new()
            .map_err(|_| EncodeError::Unsupported("libwebp rejected its default config".into()))?;
        config.lossless = 0;
        config.quality = (request.quality.clamp(0.0, 1.0) * 100.0) as f32;
        config.method = self.method.clamp(0, 6);

        let mem = encoder
            .encode_advanced(&config)
            .map_err(|e| EncodeError::EncodingFailed(format!("WebP encode failed: {e:?}")))?;

        Ok(mem.to_vec())
    }
}
