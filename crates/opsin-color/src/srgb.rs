//! sRGB and pure-gamma transfer functions

/// Convert one sRGB sample to linear RGB (gamma expansion)
#[inline]
pub fn srgb_to_linear(srgb: f32) -> f32 {
    if srgb <= 0.04045 {
        srgb / 12.92
    } else {
        ((srgb + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert one linear RGB sample to sRGB (gamma compression)
#[inline]
pub fn linear_to_srgb(linear: f32) -> f32 {
    if linear <= 0.0031308 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// Row-oriented sRGB decode, the dedicated fast path used when the
/// input bundle is known to be gamma sRGB. Pure: writes `linear` and
/// nothing else.
pub fn srgb_to_linear_row(srgb: &[f32], linear: &mut [f32]) {
    assert_eq!(srgb.len(), linear.len());
    for (s, l) in srgb.iter().zip(linear.iter_mut()) {
        *l = srgb_to_linear(*s);
    }
}

/// Row-oriented pure power-law decode: `linear = encoded^gamma`.
pub fn gamma_to_linear_row(gamma: f32, encoded: &[f32], linear: &mut [f32]) {
    assert_eq!(encoded.len(), linear.len());
    for (e, l) in encoded.iter().zip(linear.iter_mut()) {
        *l = e.powf(gamma);
    }
}
