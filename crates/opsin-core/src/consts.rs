//! Constants shared across the transform stage

/// Side length of one processing group, in pixels.
///
/// Stripe-parallel kernels size their work units so that one stripe
/// covers roughly `GROUP_DIM * GROUP_DIM` samples.
pub const GROUP_DIM: usize = 256;

/// Widest supported SIMD lane count for f32 kernels.
///
/// Image plane strides are rounded up to a multiple of this so that
/// every row can be processed in full lane groups without a scalar
/// tail loop.
pub const MAX_LANES: usize = 8;

/// Maximum supported image dimension
pub const MAX_IMAGE_DIMENSION: usize = 268435456; // 2^28
