//! Generic linearization collaborator
//!
//! The XYB orchestration takes the dedicated sRGB fast path itself;
//! everything else funnels through `transform_if_needed`, which either
//! hands the input back untouched or materializes a linear copy in the
//! caller's scratch bundle. Failure here is fatal to the transform
//! call and propagates to the caller.

use opsin_core::{ColorEncoding, Image3F, ImageBundle, OpsinError, OpsinResult, TransferFunction};
use rayon::ThreadPool;

use crate::parallel;
use crate::srgb::{gamma_to_linear_row, srgb_to_linear_row};

/// Produces a bundle whose samples are encoded as `target`, converting
/// into `scratch` only when the input encoding differs. Returns
/// whichever bundle holds the target-encoded data.
pub fn transform_if_needed<'a, 'm>(
    input: &'a ImageBundle<'m>,
    target: &ColorEncoding,
    pool: Option<&ThreadPool>,
    scratch: &'a mut ImageBundle<'m>,
) -> OpsinResult<&'a ImageBundle<'m>> {
    if input.encoding() == target {
        return Ok(input);
    }
    if input.encoding().color_space != target.color_space {
        return Err(OpsinError::UnsupportedConversion(format!(
            "cannot convert {:?} to {:?}",
            input.encoding(),
            target
        )));
    }
    if !target.is_linear() {
        return Err(OpsinError::UnsupportedConversion(format!(
            "only linear targets are supported, got {:?}",
            target
        )));
    }

    let transfer = input.encoding().transfer;
    if let TransferFunction::Gamma(g) = transfer {
        if !g.is_finite() || g <= 0.0 {
            return Err(OpsinError::InvalidParameter(format!(
                "gamma exponent must be positive, got {g}"
            )));
        }
    }

    let xsize = input.xsize();
    let mut linear = Image3F::new(xsize, input.ysize());
    let in3 = input.color();
    parallel::for_each_row_chunk(pool, &mut linear, 1, |y, rows| {
        for (c, row) in rows.into_iter().enumerate() {
            let src = &in3.plane_row(c, y)[..xsize];
            let dst = &mut row[..xsize];
            match transfer {
                TransferFunction::Srgb => srgb_to_linear_row(src, dst),
                TransferFunction::Gamma(g) => gamma_to_linear_row(g, src, dst),
                TransferFunction::Linear => dst.copy_from_slice(src),
            }
        }
    });

    scratch.set_from_image(linear, *target);
    Ok(scratch)
}
