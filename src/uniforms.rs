//! Per-frame uniform block shared by the vertex and fragment stages.
//!
//! [`ShadingUniforms`] is the byte-exact mirror of [`UNIFORMS_WGSL`]. It is
//! rebuilt every frame from the live [`ShadingParams`], the time
//! accumulator and the camera, then written into a single uniform buffer.
//!
//! # Layout
//!
//! | Offset | Field | WGSL type |
//! |---|---|---|
//! | 0 | `view_proj` | `mat4x4<f32>` |
//! | 64 | `camera_position` | `vec3<f32>` |
//! | 76 | `time` | `f32` |
//! | 80 | `time_frequency` .. `max_wavelength` | 8 × 4-byte scalars |
//! | 112 | `resolution` | `vec2<f32>` |
//! | 120 | `gamma`, padding | `f32`, `f32` |

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

use crate::params::ShadingParams;
use crate::shading::GAMMA;

/// WGSL declaration matching [`ShadingUniforms`].
pub const UNIFORMS_WGSL: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    camera_position: vec3<f32>,
    time: f32,
    time_frequency: f32,
    spatial_frequency: f32,
    amplitude: f32,
    octaves: i32,
    noise_strength: f32,
    opacity: f32,
    min_wavelength: f32,
    max_wavelength: f32,
    resolution: vec2<f32>,
    gamma: f32,
    _pad: f32,
};
"#;

/// GPU uniform block.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ShadingUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_position: [f32; 3],
    pub time: f32,
    pub time_frequency: f32,
    pub spatial_frequency: f32,
    pub amplitude: f32,
    pub octaves: i32,
    pub noise_strength: f32,
    pub opacity: f32,
    pub min_wavelength: f32,
    pub max_wavelength: f32,
    pub resolution: [f32; 2],
    pub gamma: f32,
    pub _pad: f32,
}

impl ShadingUniforms {
    /// Build the block for one frame.
    ///
    /// `params` is sanitized first, so whatever the panel or CLI produced,
    /// the GPU only ever sees in-range values.
    pub fn new(
        params: &ShadingParams,
        time: f32,
        view_proj: Mat4,
        camera_position: Vec3,
        resolution: Vec2,
    ) -> Self {
        let params = params.sanitized();
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_position: camera_position.to_array(),
            time,
            time_frequency: params.time_frequency,
            spatial_frequency: params.spatial_frequency,
            amplitude: params.amplitude,
            octaves: params.octaves as i32,
            noise_strength: params.noise_strength,
            opacity: params.opacity,
            min_wavelength: params.min_wavelength,
            max_wavelength: params.max_wavelength,
            resolution: resolution.to_array(),
            gamma: GAMMA,
            _pad: 0.0,
        }
    }

    /// Raw bytes for `Queue::write_buffer`.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn test_size_is_uniform_aligned() {
        assert_eq!(size_of::<ShadingUniforms>(), 128);
        assert_eq!(size_of::<ShadingUniforms>() % 16, 0);
    }

    #[test]
    fn test_offsets_match_wgsl_layout() {
        assert_eq!(offset_of!(ShadingUniforms, camera_position), 64);
        assert_eq!(offset_of!(ShadingUniforms, time), 76);
        assert_eq!(offset_of!(ShadingUniforms, time_frequency), 80);
        assert_eq!(offset_of!(ShadingUniforms, octaves), 92);
        assert_eq!(offset_of!(ShadingUniforms, max_wavelength), 108);
        assert_eq!(offset_of!(ShadingUniforms, resolution), 112);
        assert_eq!(offset_of!(ShadingUniforms, gamma), 120);
    }

    #[test]
    fn test_new_sanitizes_params() {
        let params = ShadingParams {
            octaves: 99,
            opacity: 3.0,
            min_wavelength: 800.0,
            max_wavelength: 300.0,
            ..Default::default()
        };
        let u = ShadingUniforms::new(
            &params,
            1.5,
            Mat4::IDENTITY,
            Vec3::new(0.0, -3.0, 8.0),
            Vec2::new(1280.0, 720.0),
        );
        assert_eq!(u.octaves, 10);
        assert_eq!(u.opacity, 1.0);
        assert_eq!(u.min_wavelength, 380.0);
        assert_eq!(u.max_wavelength, 780.0);
        assert_eq!(u.time, 1.5);
        assert_eq!(u.camera_position, [0.0, -3.0, 8.0]);
        assert_eq!(u.resolution, [1280.0, 720.0]);
        assert_eq!(u.gamma, GAMMA);
    }

    #[test]
    fn test_wgsl_declares_every_field() {
        for field in [
            "view_proj", "camera_position", "time", "time_frequency", "spatial_frequency",
            "amplitude", "octaves", "noise_strength", "opacity", "min_wavelength",
            "max_wavelength", "resolution", "gamma",
        ] {
            assert!(UNIFORMS_WGSL.contains(&format!("    {field}:")), "missing {field}");
        }
    }
}
