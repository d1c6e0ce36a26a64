//! RGB -> YCbCr for codecs that need a chroma-separated representation
//!
//! Full-range BT.601 as defined by JFIF Clause 7:
//! https://www.itu.int/rec/T-REC-T.871-201105-I/en
//!
//! Luma is offset by -128 and chroma terms are normalized by fixed
//! per-channel scales derived from the luma coefficients. No clamping
//! is applied anywhere: inputs and outputs are floating point and may
//! exceed nominal 8-bit range; fixed-range clamping belongs to the
//! downstream encoder.

use num_integer::div_ceil;
use opsin_core::consts::GROUP_DIM;
use opsin_core::{Image3F, ImageF};
use rayon::ThreadPool;
use wide::{f32x4, f32x8};

use crate::dispatch::{self, Target};
use crate::parallel;
use crate::vector::SimdF32;

// NTSC luma coefficients and chroma amplification constants.
const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;
const AMP_R: f32 = 0.701;
const AMP_B: f32 = 0.886;

/// One lane group of RGB to centered luma/chroma. Each output depends
/// only on the co-located inputs, so callers may overwrite the input
/// lanes with the result.
#[inline]
fn ycbcr_kernel<V: SimdF32>(r: V, g: V, b: V) -> (V, V, V) {
    let k128 = V::splat(128.0);
    let norm_r = V::splat(1.0 / (AMP_R + LUMA_G + LUMA_B));
    let norm_b = V::splat(1.0 / (LUMA_R + LUMA_G + AMP_B));

    let r_base = r * V::splat(LUMA_R);
    let r_diff = r * V::splat(AMP_R + LUMA_R);
    let g_base = g * V::splat(LUMA_G);
    let b_base = b * V::splat(LUMA_B);
    let b_diff = b * V::splat(AMP_B + LUMA_B);
    let y_base = r_base + g_base + b_base;

    let y = y_base - k128;
    let cb = (b_diff - y_base) * norm_b;
    let cr = (r_diff - y_base) * norm_r;
    (y, cb, cr)
}

fn ycbcr_row<V: SimdF32>(
    r_row: &[f32],
    g_row: &[f32],
    b_row: &[f32],
    out: [&mut [f32]; 3],
    xsize: usize,
) {
    let [y_row, cb_row, cr_row] = out;
    let mut x = 0;
    while x < xsize {
        let r = V::load(r_row, x);
        let g = V::load(g_row, x);
        let b = V::load(b_row, x);
        let (y, cb, cr) = ycbcr_kernel(r, g, b);
        y.store(y_row, x);
        cb.store(cb_row, x);
        cr.store(cr_row, x);
        x += V::LANES;
    }
}

/// In-place variant: the RGB rows are overwritten with Y/Cb/Cr. All
/// three lane groups are loaded before anything is stored.
fn ycbcr_row_in_place<V: SimdF32>(rows: [&mut [f32]; 3], xsize: usize) {
    let [r_row, g_row, b_row] = rows;
    let mut x = 0;
    while x < xsize {
        let r = V::load(r_row, x);
        let g = V::load(g_row, x);
        let b = V::load(b_row, x);
        let (y, cb, cr) = ycbcr_kernel(r, g, b);
        y.store(r_row, x);
        cb.store(g_row, x);
        cr.store(b_row, x);
        x += V::LANES;
    }
}

fn ycbcr_row_dispatch(
    r_row: &[f32],
    g_row: &[f32],
    b_row: &[f32],
    out: [&mut [f32]; 3],
    xsize: usize,
) {
    match dispatch::current() {
        Target::X8 => ycbcr_row::<f32x8>(r_row, g_row, b_row, out, xsize),
        Target::X4 => ycbcr_row::<f32x4>(r_row, g_row, b_row, out, xsize),
        Target::Scalar => ycbcr_row::<f32>(r_row, g_row, b_row, out, xsize),
    }
}

fn ycbcr_row_in_place_dispatch(rows: [&mut [f32]; 3], xsize: usize) {
    match dispatch::current() {
        Target::X8 => ycbcr_row_in_place::<f32x8>(rows, xsize),
        Target::X4 => ycbcr_row_in_place::<f32x4>(rows, xsize),
        Target::Scalar => ycbcr_row_in_place::<f32>(rows, xsize),
    }
}

/// Rows per parallel work unit: one stripe covers roughly one group's
/// worth of pixels, which amortizes per-task overhead for narrow
/// images while keeping stripes small for wide ones.
fn rows_per_stripe(xsize: usize) -> usize {
    div_ceil(GROUP_DIM * GROUP_DIM, xsize)
}

/// Transforms RGB planes to full-range YCbCr planes.
///
/// Returns immediately (with empty planes) if either dimension is
/// zero. Stripes of consecutive rows fan out over `pool`; `None` runs
/// sequentially with identical results.
///
/// # Panics
///
/// If the three planes do not share dimensions.
pub fn rgb_to_ycbcr(
    r: &ImageF,
    g: &ImageF,
    b: &ImageF,
    pool: Option<&ThreadPool>,
) -> (ImageF, ImageF, ImageF) {
    assert!(
        r.same_size(g) && r.same_size(b),
        "YCbCr input planes must share dimensions"
    );
    let xsize = r.xsize();
    let ysize = r.ysize();
    if xsize == 0 || ysize == 0 {
        return (ImageF::new(xsize, ysize), ImageF::new(xsize, ysize), ImageF::new(xsize, ysize));
    }

    let mut out = Image3F::new(xsize, ysize);
    let stride = out.stride();
    let rows = rows_per_stripe(xsize);
    parallel::for_each_row_chunk(pool, &mut out, rows, |y0, chunk| {
        let [y_chunk, cb_chunk, cr_chunk] = chunk;
        for (i, ((y_row, cb_row), cr_row)) in y_chunk
            .chunks_mut(stride)
            .zip(cb_chunk.chunks_mut(stride))
            .zip(cr_chunk.chunks_mut(stride))
            .enumerate()
        {
            let y = y0 + i;
            ycbcr_row_dispatch(r.row(y), g.row(y), b.row(y), [y_row, cb_row, cr_row], xsize);
        }
    });

    let [y, cb, cr] = out.into_planes();
    (y, cb, cr)
}

/// In-place version: the image's RGB planes become Y/Cb/Cr. Safe
/// because every output sample depends only on the co-located input
/// samples.
pub fn rgb_to_ycbcr_in_place(rgb: &mut Image3F, pool: Option<&ThreadPool>) {
    let xsize = rgb.xsize();
    if rgb.is_empty() {
        return;
    }
    let stride = rgb.stride();
    let rows = rows_per_stripe(xsize);
    parallel::for_each_row_chunk(pool, rgb, rows, |_, chunk| {
        let [r_chunk, g_chunk, b_chunk] = chunk;
        for ((r_row, g_row), b_row) in r_chunk
            .chunks_mut(stride)
            .zip(g_chunk.chunks_mut(stride))
            .zip(b_chunk.chunks_mut(stride))
        {
            ycbcr_row_in_place_dispatch([r_row, g_row, b_row], xsize);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane_of(xsize: usize, ysize: usize, value: f32) -> ImageF {
        let mut plane = ImageF::new(xsize, ysize);
        for y in 0..ysize {
            plane.row_mut(y)[..xsize].fill(value);
        }
        plane
    }

    #[test]
    fn test_gray_maps_to_zero() {
        // Luma coefficients sum to 1 and chroma differences cancel.
        let r = plane_of(8, 2, 128.0);
        let g = plane_of(8, 2, 128.0);
        let b = plane_of(8, 2, 128.0);
        let (y, cb, cr) = rgb_to_ycbcr(&r, &g, &b, None);
        for x in 0..8 {
            assert!(y.row(0)[x].abs() < 1e-4);
            assert!(cb.row(0)[x].abs() < 1e-4);
            assert!(cr.row(0)[x].abs() < 1e-4);
        }
    }

    #[test]
    fn test_pure_red() {
        let r = plane_of(4, 1, 255.0);
        let g = plane_of(4, 1, 0.0);
        let b = plane_of(4, 1, 0.0);
        let (y, cb, cr) = rgb_to_ycbcr(&r, &g, &b, None);
        assert!((y.row(0)[0] - -51.755).abs() < 1e-2);
        assert!((cb.row(0)[0] - -43.028).abs() < 1e-2);
        assert!((cr.row(0)[0] - 127.5).abs() < 1e-2);
    }

    #[test]
    fn test_no_clamping_outside_nominal_range() {
        let r = plane_of(4, 1, 1000.0);
        let g = plane_of(4, 1, 1000.0);
        let b = plane_of(4, 1, 1000.0);
        let (y, _, _) = rgb_to_ycbcr(&r, &g, &b, None);
        assert!((y.row(0)[0] - 872.0).abs() < 1e-2);
    }

    #[test]
    fn test_zero_area_returns_immediately() {
        let r = ImageF::new(0, 4);
        let (y, cb, cr) = rgb_to_ycbcr(&r, &r, &r, None);
        assert!(y.is_empty() && cb.is_empty() && cr.is_empty());
    }

    #[test]
    fn test_in_place_matches_disjoint() {
        let xsize = 13;
        let ysize = 7;
        let mut rgb = Image3F::new(xsize, ysize);
        for c in 0..3 {
            for y in 0..ysize {
                for (x, v) in rgb.plane_row_mut(c, y)[..xsize].iter_mut().enumerate() {
                    *v = ((c * 83 + y * 17 + x * 5) % 256) as f32;
                }
            }
        }
        let (y_ref, cb_ref, cr_ref) =
            rgb_to_ycbcr(rgb.plane(0), rgb.plane(1), rgb.plane(2), None);

        rgb_to_ycbcr_in_place(&mut rgb, None);
        for y in 0..ysize {
            assert_eq!(&rgb.plane_row(0, y)[..xsize], &y_ref.row(y)[..xsize]);
            assert_eq!(&rgb.plane_row(1, y)[..xsize], &cb_ref.row(y)[..xsize]);
            assert_eq!(&rgb.plane_row(2, y)[..xsize], &cr_ref.row(y)[..xsize]);
        }
    }

    #[test]
    fn test_stripe_sizing() {
        // One stripe covers about GROUP_DIM^2 samples.
        assert_eq!(rows_per_stripe(GROUP_DIM), GROUP_DIM);
        assert_eq!(rows_per_stripe(1), GROUP_DIM * GROUP_DIM);
        assert_eq!(rows_per_stripe(GROUP_DIM * GROUP_DIM + 1), 1);
    }

    #[test]
    fn test_pool_matches_sequential() {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(4)
            .build()
            .unwrap();
        let xsize = 33;
        let ysize = 65;
        let mut r = ImageF::new(xsize, ysize);
        let mut g = ImageF::new(xsize, ysize);
        let mut b = ImageF::new(xsize, ysize);
        for y in 0..ysize {
            for x in 0..xsize {
                r.row_mut(y)[x] = (x * y % 255) as f32;
                g.row_mut(y)[x] = ((x + y) % 255) as f32;
                b.row_mut(y)[x] = (x.abs_diff(y) % 255) as f32;
            }
        }
        let (y1, cb1, cr1) = rgb_to_ycbcr(&r, &g, &b, None);
        let (y2, cb2, cr2) = rgb_to_ycbcr(&r, &g, &b, Some(&pool));
        assert_eq!(y1.data(), y2.data());
        assert_eq!(cb1.data(), cb2.data());
        assert_eq!(cr1.data(), cr2.data());
    }
}
