//! Parses and validates the generated WGSL with naga.
//!
//! These catch type errors and missing functions without a GPU.

use iridescent::shader::generate_render_shader;
use iridescent::shader_utils::{
    all_shading_wgsl, DISPLACEMENT_WGSL, FRAGMENT_WGSL, NOISE_WGSL, SPECTRUM_WGSL,
};
use iridescent::uniforms::UNIFORMS_WGSL;

fn validate_wgsl(code: &str) -> Result<(), String> {
    let module = naga::front::wgsl::parse_str(code)
        .map_err(|e| format!("WGSL parse error: {}", e.emit_to_string(code)))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|e| format!("WGSL validation error: {:?}", e))?;

    Ok(())
}

/// Wraps helper functions in a minimal compute entry point.
fn with_compute_entry(helpers: &str, body: &str) -> String {
    format!(
        r#"{helpers}

@group(0) @binding(0)
var<storage, read_write> output: array<vec4<f32>>;

@compute @workgroup_size(1)
fn main(@builtin(global_invocation_id) id: vec3<u32>) {{
{body}
}}
"#
    )
}

#[test]
fn test_render_shader_validates() {
    let shader = generate_render_shader();
    if let Err(e) = validate_wgsl(&shader) {
        panic!("{e}\n\n{shader}");
    }
}

#[test]
fn test_noise_validates_alone() {
    let shader = with_compute_entry(
        NOISE_WGSL,
        "    let p = vec3<f32>(id) * 0.1;\n    output[id.x] = vec4<f32>(gradient_noise(p), fractal_noise(p, 3, 1.0), 0.0, 1.0);",
    );
    validate_wgsl(&shader).unwrap();
}

#[test]
fn test_displacement_validates_with_noise() {
    let helpers = format!("{NOISE_WGSL}\n{DISPLACEMENT_WGSL}");
    let shader = with_compute_entry(
        &helpers,
        "    let n = displacement_noise(vec3<f32>(id), 1.0, 0.005, 0.032, 3, 1.0);\n    output[id.x] = vec4<f32>(displacement_effect(n));",
    );
    validate_wgsl(&shader).unwrap();
}

#[test]
fn test_fragment_validates_with_spectrum() {
    let helpers = format!("{SPECTRUM_WGSL}\n{FRAGMENT_WGSL}");
    let shader = with_compute_entry(
        &helpers,
        "    output[id.x] = compose_fragment(vec3<f32>(0.0, 0.0, 1.0), vec3<f32>(0.0), vec3<f32>(0.0, 0.0, 5.0), 380.0, 780.0, 0.5, 2.2, 0.4);",
    );
    validate_wgsl(&shader).unwrap();
}

#[test]
fn test_all_utils_validate_together() {
    let shader = with_compute_entry(
        &all_shading_wgsl(),
        "    output[id.x] = vec4<f32>(wavelength_to_rgb(f32(id.x) + 380.0), 1.0);",
    );
    validate_wgsl(&shader).unwrap();
}

#[test]
fn test_uniform_block_validates() {
    let shader = with_compute_entry(
        &format!("{UNIFORMS_WGSL}\n@group(0) @binding(1)\nvar<uniform> uniforms: Uniforms;"),
        "    output[id.x] = vec4<f32>(uniforms.camera_position, uniforms.time);",
    );
    validate_wgsl(&shader).unwrap();
}
