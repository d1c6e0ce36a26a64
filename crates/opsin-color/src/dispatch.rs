//! Runtime selection among vector-width kernel instantiations
//!
//! Every kernel is compiled for 8, 4 and 1 lanes. At first use a
//! capability probe picks the widest target the processor supports;
//! the choice is cached in process-wide write-once state and read
//! without synchronization thereafter. All targets produce results
//! within the documented error bounds of each other (the lane
//! abstraction keeps them bit-identical), so the probe affects only
//! throughput, never output.

use std::sync::OnceLock;

/// A vector-width target for the image kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// 8 lanes (AVX2-class hardware)
    X8,
    /// 4 lanes (SSE4.1 / NEON)
    X4,
    /// One lane at a time
    Scalar,
}

impl Target {
    pub fn lanes(self) -> usize {
        match self {
            Target::X8 => 8,
            Target::X4 => 4,
            Target::Scalar => 1,
        }
    }
}

static TARGET: OnceLock<Target> = OnceLock::new();

/// The target selected for this process. Probed once, cached forever.
pub fn current() -> Target {
    *TARGET.get_or_init(detect)
}

#[cfg(target_arch = "x86_64")]
fn detect() -> Target {
    if is_x86_feature_detected!("avx2") {
        Target::X8
    } else if is_x86_feature_detected!("sse4.1") {
        Target::X4
    } else {
        Target::Scalar
    }
}

#[cfg(target_arch = "aarch64")]
fn detect() -> Target {
    // NEON is baseline on AArch64.
    Target::X4
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn detect() -> Target {
    Target::Scalar
}
