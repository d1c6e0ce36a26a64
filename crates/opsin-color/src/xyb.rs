//! RGB -> XYB opsin transform
//!
//! XYB is the perceptual colorspace used internally by the encoder:
//! an affine "opponent absorbance" mix of linear RGB, a cube-root
//! nonlinearity, and a final remix into a red-green difference (X), a
//! red-green sum (Y) and a blue passthrough (B).

use opsin_core::{ColorEncoding, Image3F, ImageBundle, OpsinResult};
use rayon::ThreadPool;
use wide::{f32x4, f32x8};

use crate::cube_root::cube_root_and_add;
use crate::dispatch::{self, Target};
use crate::parallel;
use crate::srgb::srgb_to_linear_row;
use crate::transform::transform_if_needed;
use crate::vector::SimdF32;

/// Opsin absorbance matrix, row-major 3x3.
pub const OPSIN_ABSORBANCE_MATRIX: [f32; 9] = [
    0.30,
    0.622,
    0.078,
    0.23,
    0.692,
    0.078,
    0.243_422_69,
    0.204_767_44,
    0.551_809_87,
];

/// Bias added to each mixed channel before the cube root.
pub const OPSIN_ABSORBANCE_BIAS: [f32; 3] = [0.003_793_073_3; 3];

/// Inverse of [`OPSIN_ABSORBANCE_MATRIX`], for the decoder direction.
pub const INVERSE_OPSIN_ABSORBANCE_MATRIX: [f32; 9] = [
    11.031_567,
    -9.866_944,
    -0.164_623_05,
    -3.254_147_4,
    4.418_770_3,
    -0.164_623_05,
    -3.658_851_4,
    2.712_923,
    1.945_928_3,
];

/// Broadcast constants for one transform invocation: the nine mixing
/// coefficients and three bias terms, plus the negative cube roots of
/// the biases applied as additive terms after the cube-root step.
///
/// Rebuilt fresh on every call to [`to_xyb`] and discarded at return;
/// it is cheap to build and read-only, so all parallel workers share
/// one table per call.
pub struct AbsorbanceTable {
    mix: [f32; 9],
    bias: [f32; 3],
    neg_bias_cbrt: [f32; 3],
}

impl AbsorbanceTable {
    pub fn new() -> Self {
        Self::with_constants(OPSIN_ABSORBANCE_MATRIX, OPSIN_ABSORBANCE_BIAS)
    }

    /// Builds a table from explicit constants.
    pub fn with_constants(mix: [f32; 9], bias: [f32; 3]) -> Self {
        let neg_bias_cbrt = [-bias[0].cbrt(), -bias[1].cbrt(), -bias[2].cbrt()];
        Self {
            mix,
            bias,
            neg_bias_cbrt,
        }
    }
}

impl Default for AbsorbanceTable {
    fn default() -> Self {
        Self::new()
    }
}

/// 3x4 affine map: three inputs, nine coefficients, one bias per
/// output channel.
#[inline]
fn opsin_absorbance<V: SimdF32>(t: &AbsorbanceTable, r: V, g: V, b: V) -> (V, V, V) {
    let m = &t.mix;
    let mixed0 = V::splat(m[0]).mul_add(
        r,
        V::splat(m[1]).mul_add(g, V::splat(m[2]).mul_add(b, V::splat(t.bias[0]))),
    );
    let mixed1 = V::splat(m[3]).mul_add(
        r,
        V::splat(m[4]).mul_add(g, V::splat(m[5]).mul_add(b, V::splat(t.bias[1]))),
    );
    let mixed2 = V::splat(m[6]).mul_add(
        r,
        V::splat(m[7]).mul_add(g, V::splat(m[8]).mul_add(b, V::splat(t.bias[2]))),
    );
    (mixed0, mixed1, mixed2)
}

/// Converts one lane group of linear RGB to XYB.
#[inline]
fn linear_to_xyb<V: SimdF32>(t: &AbsorbanceTable, r: V, g: V, b: V) -> (V, V, V) {
    let (mixed0, mixed1, mixed2) = opsin_absorbance(t, r, g, b);

    // The mixed channels can go negative for wide-gamut inputs; the
    // cube root kernel requires non-negative inputs, so clamp here.
    let zero = V::splat(0.0);
    let mixed0 = mixed0.max(zero);
    let mixed1 = mixed1.max(zero);
    let mixed2 = mixed2.max(zero);

    let mixed0 = cube_root_and_add(mixed0, V::splat(t.neg_bias_cbrt[0]));
    let mixed1 = cube_root_and_add(mixed1, V::splat(t.neg_bias_cbrt[1]));
    let mixed2 = cube_root_and_add(mixed2, V::splat(t.neg_bias_cbrt[2]));

    // For wide-gamut inputs r/g/b and the X output (but not Y or B)
    // may be negative; that is expected output, not an error.
    let half = V::splat(0.5);
    (
        half * (mixed0 - mixed1),
        half * (mixed0 + mixed1),
        mixed2,
    )
}

/// Scalar convenience for a single sample; the image path below works
/// on whole rows.
pub fn linear_rgb_to_xyb(r: f32, g: f32, b: f32, table: &AbsorbanceTable) -> (f32, f32, f32) {
    linear_to_xyb::<f32>(table, r, g, b)
}

/// Decoder-direction inverse of [`linear_rgb_to_xyb`] for the default
/// opsin constants.
pub fn xyb_to_linear_rgb(x: f32, y: f32, b: f32) -> (f32, f32, f32) {
    let bias = &OPSIN_ABSORBANCE_BIAS;
    let gamma = [
        y + x + bias[0].cbrt(),
        y - x + bias[1].cbrt(),
        b + bias[2].cbrt(),
    ];
    let mixed = [
        gamma[0] * gamma[0] * gamma[0] - bias[0],
        gamma[1] * gamma[1] * gamma[1] - bias[1],
        gamma[2] * gamma[2] * gamma[2] - bias[2],
    ];
    let m = &INVERSE_OPSIN_ABSORBANCE_MATRIX;
    (
        m[0] * mixed[0] + m[1] * mixed[1] + m[2] * mixed[2],
        m[3] * mixed[0] + m[4] * mixed[1] + m[5] * mixed[2],
        m[6] * mixed[0] + m[7] * mixed[1] + m[8] * mixed[2],
    )
}

fn xyb_row<V: SimdF32>(
    t: &AbsorbanceTable,
    r_row: &[f32],
    g_row: &[f32],
    b_row: &[f32],
    out: [&mut [f32]; 3],
    xsize: usize,
) {
    let [x_row, y_row, b_out] = out;
    let mut x = 0;
    while x < xsize {
        let r = V::load(r_row, x);
        let g = V::load(g_row, x);
        let b = V::load(b_row, x);
        let (vx, vy, vb) = linear_to_xyb(t, r, g, b);
        vx.store(x_row, x);
        vy.store(y_row, x);
        vb.store(b_out, x);
        x += V::LANES;
    }
}

pub(crate) fn xyb_row_dispatch(
    t: &AbsorbanceTable,
    r_row: &[f32],
    g_row: &[f32],
    b_row: &[f32],
    out: [&mut [f32]; 3],
    xsize: usize,
) {
    match dispatch::current() {
        Target::X8 => xyb_row::<f32x8>(t, r_row, g_row, b_row, out, xsize),
        Target::X4 => xyb_row::<f32x4>(t, r_row, g_row, b_row, out, xsize),
        Target::Scalar => xyb_row::<f32>(t, r_row, g_row, b_row, out, xsize),
    }
}

/// Converts an input bundle to XYB, writing into `xyb` and returning
/// the bundle that ended up holding the linear RGB data (the input
/// itself when it was already linear, otherwise the scratch bundle).
///
/// The decision tree:
/// - input already linear sRGB: the kernel reads the input directly;
/// - input gamma sRGB: rows are linearized into the scratch bundle
///   with the dedicated sRGB decode, fused with the XYB kernel;
/// - anything else: the generic transform collaborator produces linear
///   RGB into the scratch bundle first (its failure is propagated).
///
/// Rows fan out over `pool`; with no pool the same work runs
/// sequentially with bit-identical results.
///
/// # Panics
///
/// If `xyb` dimensions differ from the input, or if the input is not
/// already linear and no scratch bundle was supplied. Both are caller
/// contract violations.
pub fn to_xyb<'a, 'm>(
    input: &'a ImageBundle<'m>,
    pool: Option<&ThreadPool>,
    xyb: &mut Image3F,
    linear_storage: Option<&'a mut ImageBundle<'m>>,
) -> OpsinResult<&'a ImageBundle<'m>> {
    let xsize = input.xsize();
    let ysize = input.ysize();
    assert!(
        input.color().same_size(xyb),
        "XYB output dimensions must equal input dimensions"
    );

    let target = ColorEncoding::linear_srgb(input.is_gray());
    let already_linear = *input.encoding() == target;
    let already_srgb = input.is_srgb_gamma();

    // Architecture-dependent and cheap: built once per call, shared
    // read-only by all workers, never persisted.
    let table = AbsorbanceTable::new();

    if already_linear {
        let in3 = input.color();
        parallel::for_each_row_chunk(pool, xyb, 1, |y, out_rows| {
            xyb_row_dispatch(
                &table,
                in3.plane_row(0, y),
                in3.plane_row(1, y),
                in3.plane_row(2, y),
                out_rows,
                xsize,
            );
        });
        return Ok(input);
    }

    let linear_storage = linear_storage
        .expect("non-linear input requires a caller-supplied linear scratch bundle");
    // OK to reuse the input's metadata; it is not modified.
    linear_storage.reset(input.metadata());

    if already_srgb {
        linear_storage.set_from_image(Image3F::new(xsize, ysize), target);
        let in3 = input.color();
        parallel::for_each_row_pair(
            pool,
            linear_storage.color_mut(),
            xyb,
            |y, lin_rows, out_rows| {
                let [lin0, lin1, lin2] = lin_rows;
                srgb_to_linear_row(&in3.plane_row(0, y)[..xsize], &mut lin0[..xsize]);
                srgb_to_linear_row(&in3.plane_row(1, y)[..xsize], &mut lin1[..xsize]);
                srgb_to_linear_row(&in3.plane_row(2, y)[..xsize], &mut lin2[..xsize]);
                xyb_row_dispatch(&table, lin0, lin1, lin2, out_rows, xsize);
            },
        );
        return Ok(linear_storage);
    }

    let linear = transform_if_needed(input, &target, pool, linear_storage)?;
    let lin3 = linear.color();
    parallel::for_each_row_chunk(pool, xyb, 1, |y, out_rows| {
        xyb_row_dispatch(
            &table,
            lin3.plane_row(0, y),
            lin3.plane_row(1, y),
            lin3.plane_row(2, y),
            out_rows,
            xsize,
        );
    });
    Ok(linear)
}
