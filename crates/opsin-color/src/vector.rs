//! SIMD lane abstraction for the transform kernels
//!
//! Every image kernel in this crate is written once, generically over
//! [`SimdF32`], and instantiated per lane width (1, 4 and 8 lanes via
//! `wide`). The dispatch layer picks one instantiation at runtime.
//!
//! All implementations use plain multiply-then-add for `mul_add`, so
//! every width produces bit-identical results for the same input;
//! reproducibility across deployment hardware is a correctness
//! requirement here, not an optimization detail.

use std::ops::{Add, Mul, Sub};

use wide::{f32x4, f32x8};

/// Bit pattern of `1.0f32` plus a third of it, the bias term of the
/// exponent manipulation below.
const EXP_BIAS: u32 = 0x5480_0000;
/// `1/3` shifted into the exponent field.
const EXP_MUL: u32 = 0x002A_AAAA;

/// A group of f32 lanes processed simultaneously.
pub trait SimdF32: Copy + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self> {
    const LANES: usize;

    /// Broadcasts one scalar to all lanes.
    fn splat(value: f32) -> Self;

    /// Loads `LANES` consecutive samples starting at `row[x]`.
    ///
    /// The row must extend at least `LANES` samples past `x`; plane
    /// strides are padded to guarantee this for in-bounds rows.
    fn load(row: &[f32], x: usize) -> Self;

    /// Stores all lanes to `row[x..x + LANES]`.
    fn store(self, row: &mut [f32], x: usize);

    /// `self * mul + add`, multiply-then-add on every width.
    fn mul_add(self, mul: Self, add: Self) -> Self;

    /// Lane-wise maximum.
    fn max(self, other: Self) -> Self;

    /// Initial estimate of `x^(-1/3)` obtained by reinterpreting the
    /// IEEE-754 bit pattern as an integer and scaling the exponent
    /// field by -1/3. Zero inputs yield a zero estimate instead of
    /// the degenerate exponent result.
    fn recip_cbrt_estimate(self) -> Self;
}

#[inline]
fn recip_cbrt_estimate_scalar(x: f32) -> f32 {
    let bits = x.to_bits();
    // Zero is stored with a zero exponent field, so the bias
    // arithmetic below would produce a bogus estimate and propagate
    // NaNs through the refinement. Route it to a zero estimate.
    if bits == 0 {
        return 0.0;
    }
    // Wrapping: a set sign bit makes the scaled exponent exceed the
    // bias. Negative inputs are out of contract and get an
    // unspecified value, not an abort.
    f32::from_bits(EXP_BIAS.wrapping_sub((bits >> 23).wrapping_mul(EXP_MUL)))
}

impl SimdF32 for f32 {
    const LANES: usize = 1;

    #[inline]
    fn splat(value: f32) -> Self {
        value
    }

    #[inline]
    fn load(row: &[f32], x: usize) -> Self {
        row[x]
    }

    #[inline]
    fn store(self, row: &mut [f32], x: usize) {
        row[x] = self;
    }

    #[inline]
    fn mul_add(self, mul: Self, add: Self) -> Self {
        self * mul + add
    }

    #[inline]
    fn max(self, other: Self) -> Self {
        f32::max(self, other)
    }

    #[inline]
    fn recip_cbrt_estimate(self) -> Self {
        recip_cbrt_estimate_scalar(self)
    }
}

impl SimdF32 for f32x4 {
    const LANES: usize = 4;

    #[inline]
    fn splat(value: f32) -> Self {
        f32x4::splat(value)
    }

    #[inline]
    fn load(row: &[f32], x: usize) -> Self {
        let mut lanes = [0.0f32; 4];
        lanes.copy_from_slice(&row[x..x + 4]);
        f32x4::new(lanes)
    }

    #[inline]
    fn store(self, row: &mut [f32], x: usize) {
        let lanes: [f32; 4] = self.into();
        row[x..x + 4].copy_from_slice(&lanes);
    }

    #[inline]
    fn mul_add(self, mul: Self, add: Self) -> Self {
        self * mul + add
    }

    #[inline]
    fn max(self, other: Self) -> Self {
        f32x4::max(self, other)
    }

    #[inline]
    fn recip_cbrt_estimate(self) -> Self {
        let lanes: [f32; 4] = self.into();
        f32x4::new(lanes.map(recip_cbrt_estimate_scalar))
    }
}

impl SimdF32 for f32x8 {
    const LANES: usize = 8;

    #[inline]
    fn splat(value: f32) -> Self {
        f32x8::splat(value)
    }

    #[inline]
    fn load(row: &[f32], x: usize) -> Self {
        let mut lanes = [0.0f32; 8];
        lanes.copy_from_slice(&row[x..x + 8]);
        f32x8::new(lanes)
    }

    #[inline]
    fn store(self, row: &mut [f32], x: usize) {
        let lanes: [f32; 8] = self.into();
        row[x..x + 8].copy_from_slice(&lanes);
    }

    #[inline]
    fn mul_add(self, mul: Self, add: Self) -> Self {
        self * mul + add
    }

    #[inline]
    fn max(self, other: Self) -> Self {
        f32x8::max(self, other)
    }

    #[inline]
    fn recip_cbrt_estimate(self) -> Self {
        let lanes: [f32; 8] = self.into();
        f32x8::new(lanes.map(recip_cbrt_estimate_scalar))
    }
}
