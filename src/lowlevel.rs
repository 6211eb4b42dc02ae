//! Low-level building blocks for custom matching pipelines.
//!
//! These expose the template plan, kernels and raw scan functions behind the
//! high-level `Matcher`. Most users should prefer `Matcher` and the feature
//! pipeline.

#[cfg(feature = "rayon")]
pub use crate::kernel::rayon::{scan_full_par, scan_planes_par};
pub use crate::kernel::scalar::Scalar;
#[cfg(feature = "simd")]
pub use crate::kernel::simd::Simd;
pub use crate::kernel::{DefaultKernel, Kernel, WindowSums};
pub use crate::search::scan::{scan_full, scan_planes};
pub use crate::template::TemplatePlan;
