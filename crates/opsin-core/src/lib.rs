//! Core types for the opsin colorspace transform stage
//!
//! This crate provides the fundamental data structures shared by the
//! transform kernels: planar floating-point images, color encodings,
//! image bundles with caller-owned metadata, and error types.

pub mod consts;
pub mod error;
pub mod image;
pub mod metadata;
pub mod types;

pub use error::{OpsinError, OpsinResult};
pub use image::*;
pub use metadata::*;
pub use types::*;
