//! Color encoding and dimension types

/// Color channel interpretation of a three-plane image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorSpace {
    /// Three independent red/green/blue planes
    Rgb,
    /// Single gray channel broadcast to all three planes
    Gray,
}

/// Transfer function applied to stored samples.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransferFunction {
    /// Samples are linear light
    Linear,
    /// Piecewise sRGB gamma (IEC 61966-2-1)
    Srgb,
    /// Pure power-law gamma with the given exponent
    Gamma(f32),
}

/// How the samples of a color image are to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorEncoding {
    pub color_space: ColorSpace,
    pub transfer: TransferFunction,
}

impl ColorEncoding {
    /// Linear sRGB, optionally grayscale.
    pub fn linear_srgb(gray: bool) -> Self {
        Self {
            color_space: if gray { ColorSpace::Gray } else { ColorSpace::Rgb },
            transfer: TransferFunction::Linear,
        }
    }

    /// Gamma-encoded sRGB, optionally grayscale.
    pub fn srgb(gray: bool) -> Self {
        Self {
            color_space: if gray { ColorSpace::Gray } else { ColorSpace::Rgb },
            transfer: TransferFunction::Srgb,
        }
    }

    pub fn is_gray(&self) -> bool {
        self.color_space == ColorSpace::Gray
    }

    pub fn is_linear(&self) -> bool {
        self.transfer == TransferFunction::Linear
    }

    /// True for the gamma-encoded sRGB transfer specifically.
    pub fn is_srgb_gamma(&self) -> bool {
        self.transfer == TransferFunction::Srgb
    }
}

/// Image dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

impl Dimensions {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
