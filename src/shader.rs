//! Render module assembly.
//!
//! The module is one WGSL source: the uniform block, the noise texture
//! bindings, the shading subroutines from [`crate::shader_utils`], and the
//! `vs_main` / `fs_main` entry points. The fill and wireframe pipelines both
//! use these entry points and differ only in primitive topology.

use crate::shader_utils::all_shading_wgsl;
use crate::uniforms::UNIFORMS_WGSL;

/// Vertex stage entry point.
pub const VERTEX_ENTRY: &str = "vs_main";
/// Fragment stage entry point.
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Generate the complete render shader.
pub fn generate_render_shader() -> String {
    let utils = all_shading_wgsl();

    format!(
        r#"{UNIFORMS_WGSL}
@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@group(0) @binding(1)
var noise_texture: texture_2d<f32>;

@group(0) @binding(2)
var noise_sampler: sampler;

{utils}

struct VertexInput {{
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
}};

struct VertexOutput {{
    @builtin(position) clip_position: vec4<f32>,
    @location(0) local_position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
}};

@vertex
fn {VERTEX_ENTRY}(input: VertexInput) -> VertexOutput {{
    let noise_value = displacement_noise(
        input.position,
        uniforms.time,
        uniforms.spatial_frequency,
        uniforms.time_frequency,
        uniforms.octaves,
        uniforms.amplitude,
    );
    let displaced = input.position + input.normal * displacement_effect(noise_value);

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(displaced, 1.0);
    out.local_position = displaced;
    out.normal = input.normal;
    out.uv = input.uv;
    return out;
}}

@fragment
fn {FRAGMENT_ENTRY}(in: VertexOutput) -> @location(0) vec4<f32> {{
    let repeat_uv = fract(in.uv * uniforms.noise_strength);
    let noise_sample = textureSample(noise_texture, noise_sampler, repeat_uv).r;

    return compose_fragment(
        in.normal,
        in.local_position,
        uniforms.camera_position,
        uniforms.min_wavelength,
        uniforms.max_wavelength,
        noise_sample,
        uniforms.gamma,
        uniforms.opacity,
    );
}}
"#
    )
}
