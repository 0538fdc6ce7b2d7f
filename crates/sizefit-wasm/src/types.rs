//! WASM-compatible wrapper for the compression result.

use sizefit_core::EncodedArtifact;
use wasm_bindgen::prelude::*;

/// An encoded image plus the parameters that produced it.
///
/// The bytes live in WASM memory; the `bytes` getter copies them into a
/// JavaScript `Uint8Array`.
#[wasm_bindgen]
pub struct JsEncodedArtifact {
    bytes: Vec<u8>,
    quality: f64,
    width: u32,
    height: u32,
}

#[wasm_bindgen]
impl JsEncodedArtifact {
    /// Encoded bytes (copied on every access)
    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// Encoded size in bytes
    #[wasm_bindgen(getter)]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Quality the artifact was encoded at (0.0 to 1.0)
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> f64 {
        self.quality
    }

    /// Output width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Output height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl From<EncodedArtifact> for JsEncodedArtifact {
    fn from(artifact: EncodedArtifact) -> Self {
        let quality = artifact.quality_used();
        let (width, height) = (artifact.width_used(), artifact.height_used());
        Self {
            bytes: artifact.into_bytes(),
            quality,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_artifact() {
        let artifact = EncodedArtifact::new(vec![1, 2, 3], 0.8, 1080, 720);
        let js = JsEncodedArtifact::from(artifact);

        assert_eq!(js.bytes(), vec![1, 2, 3]);
        assert_eq!(js.size(), 3);
        assert_eq!(js.quality(), 0.8);
        assert_eq!((js.width(), js.height()), (1080, 720));
    }
}
