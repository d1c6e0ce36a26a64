//! Shared image metadata

/// Metadata shared by every bundle derived from one source image.
///
/// Owned by the caller; bundles only hold a reference, so one metadata
/// value can back both an input bundle and its linear scratch bundle.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageMetadata {
    /// Bit depth of the original samples
    pub bits_per_sample: u8,
    /// Whether the source image is grayscale
    pub grayscale: bool,
}

impl Default for ImageMetadata {
    fn default() -> Self {
        Self {
            bits_per_sample: 8,
            grayscale: false,
        }
    }
}
