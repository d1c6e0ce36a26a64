//! Color space transformations for the encoder front end
//!
//! This crate implements the pixel-level color transforms, including:
//! - RGB -> XYB (the perceptual opsin colorspace used internally)
//! - RGB -> YCbCr (full-range BT.601)
//! - sRGB <-> Linear RGB
//! - A bounded-error cube root primitive shared by the XYB kernel
//!
//! All image kernels exist for several SIMD lane widths; a runtime
//! probe picks the widest one the processor supports, and rows or row
//! stripes fan out over an optional rayon thread pool.

pub mod cube_root;
pub mod dispatch;
pub mod parallel;
pub mod srgb;
pub mod transform;
pub mod vector;
pub mod xyb;
pub mod ycbcr;

pub use cube_root::*;
pub use srgb::*;
pub use transform::*;
pub use xyb::*;
pub use ycbcr::*;
