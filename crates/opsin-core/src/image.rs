//! Planar floating-point image buffers

use crate::consts::{MAX_IMAGE_DIMENSION, MAX_LANES};
use crate::{ColorEncoding, Dimensions, ImageMetadata, OpsinError, OpsinResult};

/// A single plane of f32 samples, row-major.
///
/// The stride is rounded up to a multiple of [`MAX_LANES`] so that any
/// row may be processed in fixed-size lane groups without a scalar
/// tail. Padding samples are zero-initialized and carry no image data.
/// Width and height are fixed at creation.
#[derive(Debug, Clone)]
pub struct ImageF {
    xsize: usize,
    ysize: usize,
    stride: usize,
    data: Vec<f32>,
}

impl ImageF {
    pub fn new(xsize: usize, ysize: usize) -> Self {
        let stride = num_integer::div_ceil(xsize, MAX_LANES) * MAX_LANES;
        Self {
            xsize,
            ysize,
            stride,
            data: vec![0.0; stride * ysize],
        }
    }

    /// Validating constructor for dimensions from untrusted input.
    pub fn try_new(xsize: usize, ysize: usize) -> OpsinResult<Self> {
        if xsize > MAX_IMAGE_DIMENSION || ysize > MAX_IMAGE_DIMENSION {
            return Err(OpsinError::InvalidDimensions {
                width: xsize,
                height: ysize,
            });
        }
        Ok(Self::new(xsize, ysize))
    }

    /// A zero-sized placeholder plane.
    pub fn empty() -> Self {
        Self::new(0, 0)
    }

    pub fn xsize(&self) -> usize {
        self.xsize
    }

    pub fn ysize(&self) -> usize {
        self.ysize
    }

    /// Row length in samples, a multiple of [`MAX_LANES`].
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.xsize, self.ysize)
    }

    pub fn is_empty(&self) -> bool {
        self.xsize == 0 || self.ysize == 0
    }

    /// Full-stride row slice, including padding lanes.
    pub fn row(&self, y: usize) -> &[f32] {
        debug_assert!(y < self.ysize);
        &self.data[y * self.stride..(y + 1) * self.stride]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [f32] {
        debug_assert!(y < self.ysize);
        &mut self.data[y * self.stride..(y + 1) * self.stride]
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn same_size(&self, other: &ImageF) -> bool {
        self.xsize == other.xsize && self.ysize == other.ysize
    }
}

/// Exactly three planes of identical dimensions.
#[derive(Debug, Clone)]
pub struct Image3F {
    planes: [ImageF; 3],
}

impl Image3F {
    pub fn new(xsize: usize, ysize: usize) -> Self {
        Self {
            planes: [
                ImageF::new(xsize, ysize),
                ImageF::new(xsize, ysize),
                ImageF::new(xsize, ysize),
            ],
        }
    }

    pub fn empty() -> Self {
        Self::new(0, 0)
    }

    pub fn xsize(&self) -> usize {
        self.planes[0].xsize()
    }

    pub fn ysize(&self) -> usize {
        self.planes[0].ysize()
    }

    pub fn stride(&self) -> usize {
        self.planes[0].stride()
    }

    pub fn dimensions(&self) -> Dimensions {
        self.planes[0].dimensions()
    }

    pub fn is_empty(&self) -> bool {
        self.planes[0].is_empty()
    }

    pub fn plane(&self, c: usize) -> &ImageF {
        &self.planes[c]
    }

    pub fn plane_mut(&mut self, c: usize) -> &mut ImageF {
        &mut self.planes[c]
    }

    pub fn plane_row(&self, c: usize, y: usize) -> &[f32] {
        self.planes[c].row(y)
    }

    pub fn plane_row_mut(&mut self, c: usize, y: usize) -> &mut [f32] {
        self.planes[c].row_mut(y)
    }

    /// Simultaneous mutable access to all three backing buffers.
    ///
    /// This is what lets a scheduler split each plane into disjoint
    /// row chunks and hand them to independent workers.
    pub fn planes_data_mut(&mut self) -> [&mut [f32]; 3] {
        let [p0, p1, p2] = &mut self.planes;
        [p0.data_mut(), p1.data_mut(), p2.data_mut()]
    }

    pub fn same_size(&self, other: &Image3F) -> bool {
        self.planes[0].same_size(&other.planes[0])
    }

    pub fn into_planes(self) -> [ImageF; 3] {
        self.planes
    }
}

/// A color image paired with its encoding and shared metadata.
///
/// The bundle does not own the metadata; the caller controls its
/// lifetime, which must outlive the bundle (enforced by `'m`).
#[derive(Debug)]
pub struct ImageBundle<'m> {
    metadata: &'m ImageMetadata,
    color: Image3F,
    encoding: ColorEncoding,
}

impl<'m> ImageBundle<'m> {
    /// An empty bundle referencing caller-owned metadata.
    pub fn new(metadata: &'m ImageMetadata) -> Self {
        Self {
            metadata,
            color: Image3F::empty(),
            encoding: ColorEncoding::srgb(metadata.grayscale),
        }
    }

    /// Re-initializes the bundle for reuse as scratch storage.
    pub fn reset(&mut self, metadata: &'m ImageMetadata) {
        self.metadata = metadata;
        self.color = Image3F::empty();
        self.encoding = ColorEncoding::srgb(metadata.grayscale);
    }

    pub fn set_from_image(&mut self, color: Image3F, encoding: ColorEncoding) {
        self.color = color;
        self.encoding = encoding;
    }

    pub fn metadata(&self) -> &'m ImageMetadata {
        self.metadata
    }

    pub fn color(&self) -> &Image3F {
        &self.color
    }

    pub fn color_mut(&mut self) -> &mut Image3F {
        &mut self.color
    }

    pub fn encoding(&self) -> &ColorEncoding {
        &self.encoding
    }

    pub fn is_gray(&self) -> bool {
        self.encoding.is_gray()
    }

    pub fn is_srgb_gamma(&self) -> bool {
        self.encoding.is_srgb_gamma()
    }

    pub fn xsize(&self) -> usize {
        self.color.xsize()
    }

    pub fn ysize(&self) -> usize {
        self.color.ysize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stride_is_lane_multiple() {
        for xsize in [1, 7, 8, 9, 255, 256, 257] {
            let plane = ImageF::new(xsize, 2);
            assert_eq!(plane.stride() % MAX_LANES, 0);
            assert!(plane.stride() >= xsize);
            assert!(plane.stride() < xsize + MAX_LANES);
        }
    }

    #[test]
    fn test_rows_are_disjoint_and_zeroed() {
        let mut plane = ImageF::new(5, 3);
        plane.row_mut(1)[0] = 1.5;
        assert_eq!(plane.row(0)[0], 0.0);
        assert_eq!(plane.row(1)[0], 1.5);
        assert_eq!(plane.row(2)[0], 0.0);
        // Padding lanes start zeroed.
        assert_eq!(plane.row(0)[plane.stride() - 1], 0.0);
    }

    #[test]
    fn test_oversized_plane_is_rejected() {
        let err = ImageF::try_new(MAX_IMAGE_DIMENSION + 1, 1).unwrap_err();
        assert!(matches!(err, OpsinError::InvalidDimensions { .. }));
        assert!(ImageF::try_new(16, 16).is_ok());
    }

    #[test]
    fn test_zero_sized_plane() {
        let plane = ImageF::empty();
        assert!(plane.is_empty());
        assert_eq!(plane.data().len(), 0);
    }

    #[test]
    fn test_bundle_reset_keeps_metadata_reference() {
        let metadata = ImageMetadata {
            bits_per_sample: 16,
            grayscale: true,
        };
        let mut bundle = ImageBundle::new(&metadata);
        bundle.set_from_image(Image3F::new(4, 4), ColorEncoding::linear_srgb(true));
        bundle.reset(&metadata);
        assert!(bundle.color().is_empty());
        assert_eq!(bundle.metadata().bits_per_sample, 16);
        assert!(bundle.is_gray());
    }
}
