//! CPU reference of the shading pipeline.
//!
//! Every function here has a WGSL twin in [`crate::shader_utils`] that the
//! GPU runs per vertex or per fragment. The Rust versions exist for tests,
//! benchmarks, and tooling that needs the same numbers without a device.

pub mod displacement;
pub mod fragment;
pub mod noise;
pub mod spectrum;

pub use displacement::{displace_vertex, displacement_effect, displacement_noise};
pub use fragment::{compose_fragment, gamma_correct, view_wavelength, FragmentInput, GAMMA};
pub use noise::{fractal_noise, gradient_noise, permute, MAX_OCTAVES};
pub use spectrum::{intensity_factor, wavelength_to_rgb, VISIBLE_MAX, VISIBLE_MIN};
