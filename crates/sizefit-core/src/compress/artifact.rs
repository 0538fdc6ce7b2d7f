//! The value a successful compression hands back.

use crate::decode::PixelBuffer;
use crate::encode::{EncodeError, EncodeRequest, Encoder};

/// Encoded bytes plus the parameters that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedArtifact {
    bytes: Vec<u8>,
    quality_used: f64,
    width_used: u32,
    height_used: u32,
}

impl EncodedArtifact {
    pub fn new(bytes: Vec<u8>, quality_used: f64, width_used: u32, height_used: u32) -> Self {
        Self {
            bytes,
            quality_used,
            width_used,
            height_used,
        }
    }

    /// Run `encoder` once on `buffer` and wrap the result.
    ///
    /// An encoder that returns zero bytes is reported as
    /// `EncodeError::EmptyOutput`.
    pub fn encode<E>(encoder: &E, buffer: &PixelBuffer, quality: f64) -> Result<Self, EncodeError>
    where
        E: Encoder + ?Sized,
    {
        let bytes = encoder.encode(EncodeRequest::new(buffer, quality))?;
        if bytes.is_empty() {
            return Err(EncodeError::EmptyOutput);
        }
        Ok(Self::new(bytes, quality, buffer.width(), buffer.height()))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn size_in_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn quality_used(&self) -> f64 {
        self.quality_used
    }

    pub fn width_used(&self) -> u32 {
        self.width_used
    }

    pub fn height_used(&self) -> u32 {
        self.height_used
    }

    pub fn fits(&self, target_size: u64) -> bool {
        self.size_in_bytes() <= target_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_records_parameters() {
        let buffer = PixelBuffer::new(4, 2, vec![0; 24]).unwrap();
        let encoder = |_: &PixelBuffer, _: f64| Ok::<_, EncodeError>(vec![7u8; 10]);

        let artifact = EncodedArtifact::encode(&encoder, &buffer, 0.75).unwrap();
        assert_eq!(artifact.size_in_bytes(), 10);
        assert_eq!(artifact.quality_used(), 0.75);
        assert_eq!((artifact.width_used(), artifact.height_used()), (4, 2));
        assert!(artifact.fits(10));
        assert!(!artifact.fits(9));
    }

    #[test]
    fn test_empty_output_is_an_error() {
        let buffer = PixelBuffer::new(1, 1, vec![0; 3]).unwrap();
        let encoder = |_: &PixelBuffer, _: f64| Ok::<_, EncodeError>(Vec::new());

        let result = EncodedArtifact::encode(&encoder, &buffer, 0.5);
        assert!(matches!(result, Err(EncodeError::EmptyOutput)));
    }
}
