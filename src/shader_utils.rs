//! WGSL sources for the shading subroutines.
//!
//! Each constant is the GPU twin of a module under [`crate::shading`] and
//! evaluates the same formulas per vertex or per fragment. They are plain
//! functions with no bindings, so they can be concatenated in front of any
//! module that declares its own uniforms.
//!
//! # Available Functions
//!
//! ## Noise
//! - `permute3(x: vec3<f32>) -> vec3<f32>` - `mod((x * 34 + 1) * x, 289)` per component
//! - `gradient_noise(p: vec3<f32>) -> f32` - trilinear lattice noise
//! - `fractal_noise(p: vec3<f32>, octaves: i32, amplitude: f32) -> f32`
//!
//! ## Displacement
//! - `displacement_noise(p, time, spatial_frequency, time_frequency, octaves, amplitude) -> f32`
//! - `displacement_effect(v: f32) -> f32` - `sin(v) * cos(v)`
//!
//! ## Spectrum
//! - `wavelength_to_rgb(w: f32) -> vec3<f32>` - black outside `[380, 780]`
//!
//! ## Fragment
//! - `safe_normalize(v: vec3<f32>) -> vec3<f32>`
//! - `gamma_correct(color: vec3<f32>, gamma: f32) -> vec3<f32>`
//! - `compose_fragment(normal, position, camera_position, min_wavelength,
//!   max_wavelength, noise_sample, gamma, opacity) -> vec4<f32>`

/// Permutation, lattice noise and fractal accumulation.
pub const NOISE_WGSL: &str = r#"
const PERMUTE_PERIOD: f32 = 289.0;
const MAX_OCTAVES: i32 = 32;

// GLSL-style mod: result takes the sign of y
fn glsl_mod3(x: vec3<f32>, y: f32) -> vec3<f32> {
    return x - y * floor(x / y);
}

fn permute3(x: vec3<f32>) -> vec3<f32> {
    return glsl_mod3((x * 34.0 + 1.0) * x, PERMUTE_PERIOD);
}

fn lattice_corner(cell: vec3<f32>, local: vec3<f32>, offset: vec3<f32>) -> f32 {
    return dot(permute3(cell + offset), local - offset);
}

fn gradient_noise(p: vec3<f32>) -> f32 {
    let cell = floor(p);
    let local = p - cell;
    let u = local * local * (vec3<f32>(3.0) - 2.0 * local);

    let n000 = lattice_corner(cell, local, vec3<f32>(0.0, 0.0, 0.0));
    let n100 = lattice_corner(cell, local, vec3<f32>(1.0, 0.0, 0.0));
    let n010 = lattice_corner(cell, local, vec3<f32>(0.0, 1.0, 0.0));
    let n110 = lattice_corner(cell, local, vec3<f32>(1.0, 1.0, 0.0));
    let n001 = lattice_corner(cell, local, vec3<f32>(0.0, 0.0, 1.0));
    let n101 = lattice_corner(cell, local, vec3<f32>(1.0, 0.0, 1.0));
    let n011 = lattice_corner(cell, local, vec3<f32>(0.0, 1.0, 1.0));
    let n111 = lattice_corner(cell, local, vec3<f32>(1.0, 1.0, 1.0));

    return mix(
        mix(mix(n000, n100, u.x), mix(n010, n110, u.x), u.y),
        mix(mix(n001, n101, u.x), mix(n011, n111, u.x), u.y),
        u.z
    );
}

fn fractal_noise(p: vec3<f32>, octaves: i32, amplitude: f32) -> f32 {
    let count = clamp(octaves, 1, MAX_OCTAVES);
    var value = 0.0;
    var amp = amplitude;
    var freq = 1.0;
    for (var i = 0; i < count; i++) {
        value += gradient_noise(p * freq) * amp;
        amp *= 0.5;
        freq *= 2.0;
    }
    return value;
}
"#;

/// Time-scrolled displacement along the normal. Requires [`NOISE_WGSL`].
pub const DISPLACEMENT_WGSL: &str = r#"
fn displacement_noise(
    p: vec3<f32>,
    time: f32,
    spatial_frequency: f32,
    time_frequency: f32,
    octaves: i32,
    amplitude: f32,
) -> f32 {
    let shifted = p * spatial_frequency + vec3<f32>(time * time_frequency);
    return fractal_noise(shifted, octaves, amplitude);
}

// Bounded to [-0.5, 0.5]
fn displacement_effect(v: f32) -> f32 {
    return sin(v) * cos(v);
}
"#;

/// Piecewise wavelength to RGB mapping with edge dimming.
pub const SPECTRUM_WGSL: &str = r#"
fn spectral_hue(w: f32) -> vec3<f32> {
    if w >= 380.0 && w < 440.0 {
        return vec3<f32>((440.0 - w) / 60.0, 0.0, 1.0);
    } else if w >= 440.0 && w < 490.0 {
        return vec3<f32>(0.0, (w - 440.0) / 50.0, 1.0);
    } else if w >= 490.0 && w < 510.0 {
        return vec3<f32>(0.0, 1.0, (510.0 - w) / 20.0);
    } else if w >= 510.0 && w < 580.0 {
        return vec3<f32>((w - 510.0) / 70.0, 1.0, 0.0);
    } else if w >= 580.0 && w < 645.0 {
        return vec3<f32>(1.0, (645.0 - w) / 65.0, 0.0);
    } else if w >= 645.0 && w <= 780.0 {
        return vec3<f32>(1.0, 0.0, 0.0);
    }
    return vec3<f32>(0.0);
}

fn intensity_factor(w: f32) -> f32 {
    if w >= 380.0 && w < 420.0 {
        return 0.1 + 0.9 * (w - 380.0) / 40.0;
    } else if w > 700.0 && w <= 780.0 {
        return 0.1 + 0.9 * (780.0 - w) / 80.0;
    }
    return 1.0;
}

fn wavelength_to_rgb(w: f32) -> vec3<f32> {
    return spectral_hue(w) * intensity_factor(w);
}
"#;

/// View-dependent iridescent colour. Requires [`SPECTRUM_WGSL`].
pub const FRAGMENT_WGSL: &str = r#"
// Scaled by the largest component first so length() cannot overflow
fn safe_normalize(v: vec3<f32>) -> vec3<f32> {
    let scale = max(max(abs(v.x), abs(v.y)), abs(v.z));
    if scale <= 0.0 {
        return vec3<f32>(0.0);
    }
    let scaled = v / scale;
    return scaled / length(scaled);
}

fn gamma_correct(color: vec3<f32>, gamma: f32) -> vec3<f32> {
    return pow(color, vec3<f32>(1.0 / gamma));
}

// max/min instead of clamp: stays defined if the bounds cross
fn clamp_wavelength(w: f32, min_w: f32, max_w: f32) -> f32 {
    return min(max(w, min_w), max_w);
}

fn compose_fragment(
    normal: vec3<f32>,
    position: vec3<f32>,
    camera_position: vec3<f32>,
    min_wavelength: f32,
    max_wavelength: f32,
    noise_sample: f32,
    gamma: f32,
    opacity: f32,
) -> vec4<f32> {
    let alignment = dot(safe_normalize(normal), safe_normalize(camera_position * 0.5 - position * 0.5));
    let facing = abs(alignment);

    var wavelength = mix(min_wavelength, max_wavelength, facing);
    let wave_color = wavelength_to_rgb(clamp_wavelength(wavelength, min_wavelength, max_wavelength));
    let base_color = mix(vec3<f32>(1.0), wave_color, 1.0 - facing);

    wavelength += noise_sample;
    let shifted_color = wavelength_to_rgb(clamp_wavelength(wavelength, min_wavelength, max_wavelength));
    let color = mix(base_color, shifted_color, noise_sample);

    return vec4<f32>(gamma_correct(color, gamma), opacity);
}
"#;

/// Every shading subroutine, in dependency order.
pub fn all_shading_wgsl() -> String {
    format!(
        "// Shading subroutines\n{}\n{}\n{}\n{}\n",
        NOISE_WGSL, DISPLACEMENT_WGSL, SPECTRUM_WGSL, FRAGMENT_WGSL
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_contains_every_entry_point() {
        let src = all_shading_wgsl();
        for name in [
            "fn permute3",
            "fn gradient_noise",
            "fn fractal_noise",
            "fn displacement_noise",
            "fn displacement_effect",
            "fn wavelength_to_rgb",
            "fn intensity_factor",
            "fn compose_fragment",
            "fn gamma_correct",
        ] {
            assert!(src.contains(name), "missing {name}");
        }
    }

    #[test]
    fn test_dependencies_come_first() {
        let src = all_shading_wgsl();
        let noise = src.find("fn fractal_noise").unwrap();
        let displacement = src.find("fn displacement_noise").unwrap();
        let spectrum = src.find("fn wavelength_to_rgb").unwrap();
        let fragment = src.find("fn compose_fragment").unwrap();
        assert!(noise < displacement);
        assert!(spectrum < fragment);
    }

    #[test]
    fn test_octave_cap_matches_cpu() {
        let expected = format!("MAX_OCTAVES: i32 = {};", crate::shading::MAX_OCTAVES);
        assert!(NOISE_WGSL.contains(&expected));
    }

    #[test]
    fn test_normalization_is_overflow_safe() {
        assert!(FRAGMENT_WGSL.contains("let scaled = v / scale;"));
        assert!(FRAGMENT_WGSL.contains("camera_position * 0.5 - position * 0.5"));
    }
}
