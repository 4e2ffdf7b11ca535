//! Per-vertex displacement along the surface normal.
//!
//! Mirrors [`crate::shader_utils::DISPLACEMENT_WGSL`].

use glam::Vec3;

use super::noise::fractal_noise;
use crate::params::ShadingParams;

/// Fractal noise sampled at a surface position scrolled by time.
///
/// The position is scaled by the spatial frequency and offset by
/// `time * time_frequency` equally on all three axes.
pub fn displacement_noise(position: Vec3, time: f32, params: &ShadingParams) -> f32 {
    let shifted = position * params.spatial_frequency + Vec3::splat(time * params.time_frequency);
    fractal_noise(shifted, params.octaves, params.amplitude)
}

/// Shape a raw noise value into a bounded offset: `sin(v) * cos(v)`.
///
/// Always within `[-0.5, 0.5]`, so large noise magnitudes never produce
/// unbounded displacement.
#[inline]
pub fn displacement_effect(noise: f32) -> f32 {
    noise.sin() * noise.cos()
}

/// Displaced position of a vertex at `time`.
pub fn displace_vertex(position: Vec3, normal: Vec3, time: f32, params: &ShadingParams) -> Vec3 {
    let effect = displacement_effect(displacement_noise(position, time, params));
    position + normal * effect
}
